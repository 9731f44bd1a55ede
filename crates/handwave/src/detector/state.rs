//! Per-hand temporal state and the per-frame gesture rules.

use nalgebra::Point2;

use crate::{
    event::{GestureEvent, GestureEventKind, SwipeDirection},
    filter::{Ema, EmaState, Filter},
    geometry,
    landmark::{Finger, HandKey, HandPose, LandmarkIdx},
};

use super::DetectorConfig;

/// Everything a detector remembers about one hand between frames.
#[derive(Debug, Clone, Default)]
pub struct HandState {
    pinch_active: bool,
    /// Index fingertip position on the previous pinching frame.
    pinch_position: Option<Point2<f32>>,
    /// Thumb-index distance on the previous pinching frame.
    pinch_distance: Option<f32>,
    pinch_filter: EmaState,
    point_up_active: bool,
    v_sign_active: bool,
    /// Index fingertip position on the previous frame, pinching or not.
    last_tip: Option<Point2<f32>>,
    missed_frames: u32,
}

impl HandState {
    pub fn pinch_active(&self) -> bool {
        self.pinch_active
    }

    pub fn pinch_position(&self) -> Option<Point2<f32>> {
        self.pinch_position
    }

    pub fn point_up_active(&self) -> bool {
        self.point_up_active
    }

    pub fn v_sign_active(&self) -> bool {
        self.v_sign_active
    }

    /// Number of consecutive frames this hand has been absent from.
    pub fn missed_frames(&self) -> u32 {
        self.missed_frames
    }

    pub(super) fn miss(&mut self) -> u32 {
        self.missed_frames += 1;
        self.missed_frames
    }

    /// Runs the gesture rules on a newly observed pose and records the resulting events.
    pub(super) fn observe(
        &mut self,
        config: &DetectorConfig,
        smoothing: Option<&Ema>,
        key: HandKey,
        pose: &HandPose<'_>,
        events: &mut Vec<GestureEvent>,
    ) {
        let mut emit = |kind| events.push(GestureEvent::new(key, kind));
        let metric = config.distance_metric;
        self.missed_frames = 0;

        let raw_distance = geometry::pinch_distance(pose, metric);
        let distance = match smoothing {
            Some(ema) => ema.filter(&mut self.pinch_filter, raw_distance),
            None => raw_distance,
        };
        let pinching = distance < config.pinch_threshold;
        let tip = pose[LandmarkIdx::IndexFingerTip].point2();

        if pinching != self.pinch_active {
            self.pinch_active = pinching;
            if pinching {
                emit(GestureEventKind::PinchStart);
            } else {
                self.pinch_position = None;
                self.pinch_distance = None;
                emit(GestureEventKind::PinchEnd);
            }
        }

        if pinching {
            if let Some(prev) = self.pinch_position {
                let delta = tip - prev;
                if delta.x.abs() > config.drag_threshold || delta.y.abs() > config.drag_threshold {
                    emit(GestureEventKind::PinchDrag {
                        dx: delta.x,
                        dy: delta.y,
                    });
                }
            }
            self.pinch_position = Some(tip);

            if let Some(prev) = self.pinch_distance {
                let delta = distance - prev;
                if delta.abs() > config.zoom_threshold {
                    emit(GestureEventKind::PinchZoom { delta, distance });
                }
            }
            self.pinch_distance = Some(distance);
        }

        if let (Some(threshold), Some(prev)) = (config.swipe_threshold, self.last_tip) {
            let delta = tip - prev;
            // Ties go to the horizontal axis.
            let (magnitude, direction) = if delta.x.abs() >= delta.y.abs() {
                let dir = if delta.x > 0.0 {
                    SwipeDirection::Right
                } else {
                    SwipeDirection::Left
                };
                (delta.x.abs(), dir)
            } else {
                let dir = if delta.y > 0.0 {
                    SwipeDirection::Down
                } else {
                    SwipeDirection::Up
                };
                (delta.y.abs(), dir)
            };
            if magnitude > threshold {
                emit(GestureEventKind::Swipe {
                    direction,
                    delta: magnitude,
                });
            }
        }
        self.last_tip = Some(tip);

        let extended =
            |finger| geometry::is_extended(pose, finger, metric, config.extension_ratio);
        let folded = |finger| geometry::is_folded(pose, finger, metric, config.fold_ratio);

        let index_extended = extended(Finger::Index);
        let middle_extended = extended(Finger::Middle);
        let index_raised =
            pose[LandmarkIdx::IndexFingerTip].y < pose[LandmarkIdx::Wrist].y - config.point_up_margin;

        let point_up = index_extended && !middle_extended && index_raised;
        let v_sign =
            index_extended && middle_extended && folded(Finger::Ring) && folded(Finger::Pinky);

        if let Some(kind) = edge(
            &mut self.point_up_active,
            point_up,
            GestureEventKind::PointUp,
            GestureEventKind::PointUpEnd,
        ) {
            emit(kind);
        }
        if let Some(kind) = edge(
            &mut self.v_sign_active,
            v_sign,
            GestureEventKind::VSign,
            GestureEventKind::VSignEnd,
        ) {
            emit(kind);
        }
    }

    /// Ends every active gesture and forgets all history.
    pub(super) fn finish(&mut self, key: HandKey, events: &mut Vec<GestureEvent>) {
        let active = [
            (self.pinch_active, GestureEventKind::PinchEnd),
            (self.point_up_active, GestureEventKind::PointUpEnd),
            (self.v_sign_active, GestureEventKind::VSignEnd),
        ];
        events.extend(
            active
                .into_iter()
                .filter(|(active, _)| *active)
                .map(|(_, kind)| GestureEvent::new(key, kind)),
        );
        *self = Self::default();
    }
}

/// Updates a boolean gesture flag and returns the transition event, if any.
fn edge(
    active: &mut bool,
    now: bool,
    start: GestureEventKind,
    end: GestureEventKind,
) -> Option<GestureEventKind> {
    if *active == now {
        return None;
    }
    *active = now;
    Some(if now { start } else { end })
}
