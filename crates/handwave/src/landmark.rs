//! Hand landmarks and the per-frame hand data delivered by the landmark source.

use std::{fmt, ops::Index};

use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Number of landmarks the hand pose model outputs per hand.
pub const NUM_LANDMARKS: usize = 21;

/// A landmark in normalized image space.
///
/// `x` and `y` are in `0.0..=1.0`, `z` is depth relative to the wrist. Landmark sources that omit
/// `z` get `0.0`.
#[derive(Debug, Default, PartialEq, PartialOrd, Clone, Copy, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a landmark on the image plane (`z = 0`).
    pub fn planar(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0)
    }

    #[inline]
    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn point(&self) -> Point3<f32> {
        Point3::new(self.x, self.y, self.z)
    }

    /// Projects the landmark onto the image plane, discarding depth.
    #[inline]
    pub fn point2(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the knuckle joint connecting finger and palm.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: Placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl LandmarkIdx {
    /// All landmarks, in model output order.
    pub const ALL: [LandmarkIdx; NUM_LANDMARKS] = {
        use LandmarkIdx::*;
        [
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    };

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The five digits of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// The four fingers, excluding the thumb.
    pub const FINGERS: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> LandmarkIdx {
        match self {
            Finger::Thumb => LandmarkIdx::ThumbTip,
            Finger::Index => LandmarkIdx::IndexFingerTip,
            Finger::Middle => LandmarkIdx::MiddleFingerTip,
            Finger::Ring => LandmarkIdx::RingFingerTip,
            Finger::Pinky => LandmarkIdx::PinkyTip,
        }
    }

    /// The middle joint used as the reference point for extension tests.
    ///
    /// This is the PIP joint for the four fingers and the MCP joint for the thumb (which has no
    /// PIP).
    pub fn joint(self) -> LandmarkIdx {
        match self {
            Finger::Thumb => LandmarkIdx::ThumbMcp,
            Finger::Index => LandmarkIdx::IndexFingerPip,
            Finger::Middle => LandmarkIdx::MiddleFingerPip,
            Finger::Ring => LandmarkIdx::RingFingerPip,
            Finger::Pinky => LandmarkIdx::PinkyPip,
        }
    }
}

/// Which hand the landmark model believes it is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parses a handedness label as reported by the landmark model (`"Left"`/`"Right"`).
    ///
    /// Matching is case-insensitive. Any other label returns `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("left") {
            Some(Handedness::Left)
        } else if label.eq_ignore_ascii_case("right") {
            Some(Handedness::Right)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

/// Key under which per-hand gesture state is tracked.
///
/// Hands without a usable handedness label are keyed by their slot in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandKey {
    Left,
    Right,
    Anonymous(usize),
}

impl From<Handedness> for HandKey {
    fn from(handedness: Handedness) -> Self {
        match handedness {
            Handedness::Left => HandKey::Left,
            Handedness::Right => HandKey::Right,
        }
    }
}

impl fmt::Display for HandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandKey::Left => f.write_str("Left"),
            HandKey::Right => f.write_str("Right"),
            HandKey::Anonymous(slot) => write!(f, "hand #{slot}"),
        }
    }
}

/// One hand's landmarks for a single detection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    pub landmarks: Vec<Landmark>,
    pub handedness: Option<Handedness>,
}

impl HandFrame {
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness) -> Self {
        Self {
            landmarks,
            handedness: Some(handedness),
        }
    }

    /// Creates a hand frame without a handedness label.
    pub fn anonymous(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks,
            handedness: None,
        }
    }

    /// Returns the key this hand is tracked under when it appears at `slot` in a frame.
    pub fn key(&self, slot: usize) -> HandKey {
        match self.handedness {
            Some(handedness) => handedness.into(),
            None => HandKey::Anonymous(slot),
        }
    }

    /// Returns a validated view of the landmarks.
    ///
    /// Returns `None` if there are fewer than [`NUM_LANDMARKS`] landmarks or any of the first
    /// [`NUM_LANDMARKS`] has a non-finite coordinate. Extra trailing landmarks are ignored.
    pub fn pose(&self) -> Option<HandPose<'_>> {
        let landmarks: &[Landmark; NUM_LANDMARKS] =
            self.landmarks.get(..NUM_LANDMARKS)?.try_into().ok()?;
        if landmarks.iter().all(Landmark::is_finite) {
            Some(HandPose { landmarks })
        } else {
            None
        }
    }
}

/// A complete, finite set of hand landmarks that can be indexed by [`LandmarkIdx`].
#[derive(Debug, Clone, Copy)]
pub struct HandPose<'a> {
    landmarks: &'a [Landmark; NUM_LANDMARKS],
}

impl<'a> HandPose<'a> {
    pub fn landmarks(&self) -> &'a [Landmark; NUM_LANDMARKS] {
        self.landmarks
    }
}

impl Index<LandmarkIdx> for HandPose<'_> {
    type Output = Landmark;

    #[inline]
    fn index(&self, idx: LandmarkIdx) -> &Landmark {
        &self.landmarks[idx.index()]
    }
}

/// A classification label attached to a detected hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub score: Option<f32>,
}

/// Results of one landmark model invocation, in the index-aligned layout the model delivers.
///
/// `multi_handedness[i]` describes `multi_hand_landmarks[i]`. The handedness list may be shorter
/// than the landmark list (or missing), in which case the affected hands are anonymous.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandResults {
    #[serde(default)]
    pub multi_hand_landmarks: Vec<Vec<Landmark>>,
    #[serde(default)]
    pub multi_handedness: Vec<Classification>,
}

impl HandResults {
    /// Pairs every landmark set with its handedness label.
    pub fn hand_frames(&self) -> Vec<HandFrame> {
        self.multi_hand_landmarks
            .iter()
            .enumerate()
            .map(|(i, landmarks)| HandFrame {
                landmarks: landmarks.clone(),
                handedness: self
                    .multi_handedness
                    .get(i)
                    .and_then(|class| Handedness::from_label(&class.label)),
            })
            .collect()
    }
}
