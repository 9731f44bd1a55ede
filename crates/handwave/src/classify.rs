//! Single-frame static gesture classification.
//!
//! Unlike the [`GestureDetector`](crate::detector::GestureDetector), the classifier has no memory:
//! it looks at one hand pose and names the static gesture it shows, together with a confidence.
//! Its output uses the gesture vocabulary of gesture configurations, so it can be passed straight
//! to [`GestureMapper::process_gesture_with_confidence`].
//!
//! [`GestureMapper::process_gesture_with_confidence`]: crate::mapper::GestureMapper::process_gesture_with_confidence

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{self, DistanceMetric},
    landmark::{Finger, HandFrame, HandPose, LandmarkIdx},
};

/// Static gestures recognized by the [`GestureClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifiedGesture {
    Pinch,
    Peace,
    OpenPalm,
    Fist,
    ThumbsUp,
    PointUp,
    PointDown,
    PinchOut,
}

impl ClassifiedGesture {
    /// All gestures, in tie-breaking order.
    pub const ALL: [Self; 8] = [
        Self::Pinch,
        Self::Peace,
        Self::OpenPalm,
        Self::Fist,
        Self::ThumbsUp,
        Self::PointUp,
        Self::PointDown,
        Self::PinchOut,
    ];

    /// Returns the gesture's name in gesture configurations.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pinch => "pinch",
            Self::Peace => "peace",
            Self::OpenPalm => "openPalm",
            Self::Fist => "fist",
            Self::ThumbsUp => "thumbsUp",
            Self::PointUp => "pointUp",
            Self::PointDown => "pointDown",
            Self::PinchOut => "pinchOut",
        }
    }

    /// The confidence reported when this gesture's pose is recognized.
    pub fn confidence(self) -> f32 {
        match self {
            Self::Pinch => 0.9,
            Self::Peace | Self::OpenPalm | Self::Fist | Self::PinchOut => 0.8,
            Self::ThumbsUp | Self::PointUp | Self::PointDown => 0.75,
        }
    }
}

impl fmt::Display for ClassifiedGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classification result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMatch {
    pub gesture: ClassifiedGesture,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Results have to be strictly more confident than this.
    pub min_confidence: f32,
    pub pinch_threshold: f32,
    /// Exclusive range of thumb-index distances that count as a spread pinch.
    pub pinch_out_range: (f32, f32),
    pub extension_ratio: f32,
    pub fold_ratio: f32,
    pub distance_metric: DistanceMetric,
}

impl ClassifierConfig {
    pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.7;
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_confidence: Self::DEFAULT_MIN_CONFIDENCE,
            pinch_threshold: 0.05,
            pinch_out_range: (0.1, 0.2),
            extension_ratio: 1.2,
            fold_ratio: 1.1,
            distance_metric: DistanceMetric::Planar,
        }
    }
}

/// Names the static gesture shown by a single hand.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Computes the confidence of every gesture for `pose`, in [`ClassifiedGesture::ALL`] order.
    ///
    /// A gesture whose pose is not recognized has a confidence of 0.
    pub fn scores(&self, pose: &HandPose<'_>) -> [(ClassifiedGesture, f32); 8] {
        let c = &self.config;
        let metric = c.distance_metric;
        let extended = |finger| geometry::is_extended(pose, finger, metric, c.extension_ratio);
        let folded = |finger| geometry::is_folded(pose, finger, metric, c.fold_ratio);

        let pinch_distance = geometry::pinch_distance(pose, metric);
        let (out_min, out_max) = c.pinch_out_range;
        let fingers = Finger::FINGERS;
        let extended_count = fingers.iter().filter(|&&f| extended(f)).count();
        let all_folded = fingers.iter().all(|&f| folded(f));

        let wrist = pose[LandmarkIdx::Wrist];
        let index_tip = pose[LandmarkIdx::IndexFingerTip];
        let thumb_tip = pose[LandmarkIdx::ThumbTip];
        let thumb_up = thumb_tip.y < pose[LandmarkIdx::ThumbIp].y
            && thumb_tip.y < pose[LandmarkIdx::IndexFingerMcp].y;
        let index_extended = extended(Finger::Index);

        ClassifiedGesture::ALL.map(|gesture| {
            let recognized = match gesture {
                ClassifiedGesture::Pinch => pinch_distance < c.pinch_threshold,
                ClassifiedGesture::Peace => {
                    index_extended
                        && extended(Finger::Middle)
                        && folded(Finger::Ring)
                        && folded(Finger::Pinky)
                }
                ClassifiedGesture::OpenPalm => extended_count >= 3,
                ClassifiedGesture::Fist => all_folded && !thumb_up,
                ClassifiedGesture::ThumbsUp => all_folded && thumb_up,
                ClassifiedGesture::PointUp => {
                    index_extended
                        && [Finger::Middle, Finger::Ring, Finger::Pinky]
                            .into_iter()
                            .all(folded)
                        && index_tip.y < wrist.y
                }
                ClassifiedGesture::PointDown => index_extended && index_tip.y > wrist.y,
                ClassifiedGesture::PinchOut => pinch_distance > out_min && pinch_distance < out_max,
            };
            let confidence = if recognized { gesture.confidence() } else { 0.0 };
            (gesture, confidence)
        })
    }

    /// Returns the most confident gesture, if any exceeds the minimum confidence.
    ///
    /// Ties go to the gesture listed first in [`ClassifiedGesture::ALL`].
    pub fn classify(&self, pose: &HandPose<'_>) -> Option<GestureMatch> {
        let mut best: Option<GestureMatch> = None;
        for (gesture, confidence) in self.scores(pose) {
            if confidence <= self.config.min_confidence {
                continue;
            }
            if best.map_or(true, |b| confidence > b.confidence) {
                best = Some(GestureMatch {
                    gesture,
                    confidence,
                });
            }
        }
        if let Some(m) = best {
            log::trace!("classified {} ({:.2})", m.gesture, m.confidence);
        }
        best
    }

    /// Classifies the first well-formed hand in a frame.
    pub fn classify_frame(&self, hands: &[HandFrame]) -> Option<GestureMatch> {
        let pose = hands.iter().find_map(HandFrame::pose)?;
        self.classify(&pose)
    }
}
