//! Distance and finger extension tests on hand poses.
//!
//! Extension tests compare the fingertip's distance from the wrist against the distance of the
//! finger's middle joint from the wrist. Since both distances scale together with hand size and
//! camera distance, the ratio between them does not depend on either.

use serde::{Deserialize, Serialize};

use crate::landmark::{Finger, HandPose, Landmark, LandmarkIdx};

/// Joint distances shorter than this are treated as degenerate.
const MIN_JOINT_DISTANCE: f32 = 1e-6;

/// Selects how distances between landmarks are measured.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Euclidean distance in the image plane, ignoring `z`.
    #[default]
    Planar,
    /// Euclidean distance in 3D, including the model's relative depth.
    Spatial,
}

impl DistanceMetric {
    pub fn distance(self, a: Landmark, b: Landmark) -> f32 {
        match self {
            DistanceMetric::Planar => planar_distance(a, b),
            DistanceMetric::Spatial => spatial_distance(a, b),
        }
    }
}

pub fn planar_distance(a: Landmark, b: Landmark) -> f32 {
    nalgebra::distance(&a.point2(), &b.point2())
}

pub fn spatial_distance(a: Landmark, b: Landmark) -> f32 {
    nalgebra::distance(&a.point(), &b.point())
}

/// Distance between the thumb tip and the index fingertip.
pub fn pinch_distance(pose: &HandPose<'_>, metric: DistanceMetric) -> f32 {
    metric.distance(pose[LandmarkIdx::ThumbTip], pose[LandmarkIdx::IndexFingerTip])
}

/// Ratio of the fingertip's distance from the wrist to its middle joint's distance from the wrist.
///
/// A straight finger has a ratio well above 1, a curled one below 1. If the middle joint sits on
/// the wrist, the ratio is 1 (neither extended nor folded).
pub fn extension_ratio(pose: &HandPose<'_>, finger: Finger, metric: DistanceMetric) -> f32 {
    let wrist = pose[LandmarkIdx::Wrist];
    let tip = metric.distance(pose[finger.tip()], wrist);
    let joint = metric.distance(pose[finger.joint()], wrist);
    if joint < MIN_JOINT_DISTANCE {
        return 1.0;
    }
    tip / joint
}

/// Returns whether the fingertip is farther from the wrist than its middle joint by more than a
/// factor of `ratio`.
pub fn is_extended(pose: &HandPose<'_>, finger: Finger, metric: DistanceMetric, ratio: f32) -> bool {
    extension_ratio(pose, finger, metric) > ratio
}

/// Returns whether the fingertip is closer to the wrist than its middle joint by more than a factor
/// of `ratio`.
pub fn is_folded(pose: &HandPose<'_>, finger: Finger, metric: DistanceMetric, ratio: f32) -> bool {
    extension_ratio(pose, finger, metric) * ratio < 1.0
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::landmark::Handedness;
    use crate::test::PoseBuilder;

    use super::*;

    #[test]
    fn metrics() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 1.2);
        assert_relative_eq!(planar_distance(a, b), 0.5);
        assert_relative_eq!(spatial_distance(a, b), 1.3);
        assert_relative_eq!(DistanceMetric::Planar.distance(b, a), 0.5);
    }

    #[test]
    fn extension() {
        let frame = PoseBuilder::new()
            .extend(Finger::Index)
            .frame(Handedness::Left);
        let pose = frame.pose().unwrap();
        let metric = DistanceMetric::Planar;

        assert!(is_extended(&pose, Finger::Index, metric, 1.2));
        assert!(!is_folded(&pose, Finger::Index, metric, 1.1));
        assert!(!is_extended(&pose, Finger::Middle, metric, 1.2));
        assert!(is_folded(&pose, Finger::Middle, metric, 1.1));
    }

    #[test]
    fn extension_is_scale_invariant() {
        let small = PoseBuilder::new().extend(Finger::Index);
        let large = small.clone().scaled(2.5);
        let small = small.frame(Handedness::Left);
        let large = large.frame(Handedness::Left);

        for finger in Finger::ALL {
            assert_relative_eq!(
                extension_ratio(&small.pose().unwrap(), finger, DistanceMetric::Planar),
                extension_ratio(&large.pose().unwrap(), finger, DistanceMetric::Planar),
                max_relative = 1e-4,
            );
        }
    }

    #[test]
    fn degenerate_joint() {
        let mut frame = PoseBuilder::new().frame(Handedness::Left);
        frame.landmarks[LandmarkIdx::RingFingerPip.index()] = frame.landmarks[0];
        let pose = frame.pose().unwrap();
        assert_eq!(extension_ratio(&pose, Finger::Ring, DistanceMetric::Planar), 1.0);
        assert!(!is_extended(&pose, Finger::Ring, DistanceMetric::Planar, 1.2));
        assert!(!is_folded(&pose, Finger::Ring, DistanceMetric::Planar, 1.1));
    }
}
