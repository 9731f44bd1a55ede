//! Gesture events emitted by the [`GestureDetector`](crate::detector::GestureDetector).

use std::{fmt, str::FromStr};

use anyhow::anyhow;

use crate::landmark::HandKey;

/// Names of the events a detector can emit. Listeners subscribe per name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventName {
    PinchStart,
    PinchEnd,
    PinchDrag,
    PinchZoom,
    PointUp,
    PointUpEnd,
    VSign,
    VSignEnd,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
}

impl EventName {
    pub const ALL: [EventName; 12] = [
        EventName::PinchStart,
        EventName::PinchEnd,
        EventName::PinchDrag,
        EventName::PinchZoom,
        EventName::PointUp,
        EventName::PointUpEnd,
        EventName::VSign,
        EventName::VSignEnd,
        EventName::SwipeLeft,
        EventName::SwipeRight,
        EventName::SwipeUp,
        EventName::SwipeDown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventName::PinchStart => "pinch_start",
            EventName::PinchEnd => "pinch_end",
            EventName::PinchDrag => "pinch_drag",
            EventName::PinchZoom => "pinch_zoom",
            EventName::PointUp => "point_up",
            EventName::PointUpEnd => "point_up_end",
            EventName::VSign => "v_sign",
            EventName::VSignEnd => "v_sign_end",
            EventName::SwipeLeft => "swipe_left",
            EventName::SwipeRight => "swipe_right",
            EventName::SwipeUp => "swipe_up",
            EventName::SwipeDown => "swipe_down",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| anyhow!("unknown gesture event `{s}`"))
    }
}

/// Direction of a swipe, in image space (up is towards the top of the image).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// What happened, plus any continuous payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEventKind {
    PinchStart,
    PinchEnd,
    /// The index fingertip moved while pinching.
    PinchDrag {
        dx: f32,
        dy: f32,
    },
    /// The thumb-index distance changed while pinching.
    PinchZoom {
        delta: f32,
        distance: f32,
    },
    PointUp,
    PointUpEnd,
    VSign,
    VSignEnd,
    /// The index fingertip moved farther than the swipe threshold within one frame. `delta` is the
    /// absolute movement along the dominant axis.
    Swipe {
        direction: SwipeDirection,
        delta: f32,
    },
}

/// A gesture event for one hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub hand: HandKey,
    pub kind: GestureEventKind,
}

impl GestureEvent {
    pub fn new(hand: HandKey, kind: GestureEventKind) -> Self {
        Self { hand, kind }
    }

    pub fn name(&self) -> EventName {
        match self.kind {
            GestureEventKind::PinchStart => EventName::PinchStart,
            GestureEventKind::PinchEnd => EventName::PinchEnd,
            GestureEventKind::PinchDrag { .. } => EventName::PinchDrag,
            GestureEventKind::PinchZoom { .. } => EventName::PinchZoom,
            GestureEventKind::PointUp => EventName::PointUp,
            GestureEventKind::PointUpEnd => EventName::PointUpEnd,
            GestureEventKind::VSign => EventName::VSign,
            GestureEventKind::VSignEnd => EventName::VSignEnd,
            GestureEventKind::Swipe { direction, .. } => match direction {
                SwipeDirection::Left => EventName::SwipeLeft,
                SwipeDirection::Right => EventName::SwipeRight,
                SwipeDirection::Up => EventName::SwipeUp,
                SwipeDirection::Down => EventName::SwipeDown,
            },
        }
    }

    /// Returns the gesture name this event triggers in a gesture configuration's `gestureMap`.
    ///
    /// Only activation events trigger gestures. Endings and continuous updates return `None`.
    pub fn gesture_name(&self) -> Option<&'static str> {
        Some(match self.name() {
            EventName::PinchStart => "pinch",
            EventName::PointUp => "pointUp",
            EventName::VSign => "peace",
            EventName::SwipeLeft => "swipeLeft",
            EventName::SwipeRight => "swipeRight",
            EventName::SwipeUp => "swipeUp",
            EventName::SwipeDown => "swipeDown",
            EventName::PinchEnd
            | EventName::PinchDrag
            | EventName::PinchZoom
            | EventName::PointUpEnd
            | EventName::VSignEnd => return None,
        })
    }
}

impl fmt::Display for GestureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.hand)?;
        match self.kind {
            GestureEventKind::PinchDrag { dx, dy } => write!(f, " dx:{dx:.3} dy:{dy:.3}"),
            GestureEventKind::PinchZoom { delta, distance } => {
                write!(f, " delta:{delta:.3} distance:{distance:.3}")
            }
            GestureEventKind::Swipe { delta, .. } => write!(f, " delta:{delta:.3}"),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_strings() {
        for name in EventName::ALL {
            assert_eq!(name.as_str().parse::<EventName>().unwrap(), name);
        }
        assert!("pinch".parse::<EventName>().is_err());
    }

    #[test]
    fn gesture_names() {
        let ev = |kind| GestureEvent::new(HandKey::Left, kind);
        assert_eq!(ev(GestureEventKind::PinchStart).gesture_name(), Some("pinch"));
        assert_eq!(ev(GestureEventKind::PinchEnd).gesture_name(), None);
        assert_eq!(
            ev(GestureEventKind::PinchDrag { dx: 0.1, dy: 0.0 }).gesture_name(),
            None
        );
        assert_eq!(ev(GestureEventKind::VSign).gesture_name(), Some("peace"));
        let swipe = ev(GestureEventKind::Swipe {
            direction: SwipeDirection::Up,
            delta: 0.08,
        });
        assert_eq!(swipe.name(), EventName::SwipeUp);
        assert_eq!(swipe.gesture_name(), Some("swipeUp"));
    }

    #[test]
    fn display() {
        let ev = GestureEvent::new(
            HandKey::Right,
            GestureEventKind::PinchDrag { dx: 0.05, dy: -0.01 },
        );
        assert_eq!(ev.to_string(), "pinch_drag (Right) dx:0.050 dy:-0.010");
        let ev = GestureEvent::new(HandKey::Anonymous(1), GestureEventKind::PointUp);
        assert_eq!(ev.to_string(), "point_up (hand #1)");
    }
}
