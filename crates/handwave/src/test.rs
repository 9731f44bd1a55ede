//! Synthetic hand poses for tests.
//!
//! The default pose is a relaxed, loosely closed right-side-up hand: wrist at the bottom, four
//! fingers curled, thumb resting beside the index finger without touching it.

use crate::landmark::{Finger, HandFrame, Handedness, Landmark, LandmarkIdx, NUM_LANDMARKS};

const WRIST: (f32, f32) = (0.5, 0.8);
const MCP_Y: f32 = 0.7;
const PIP_Y: f32 = 0.6;

#[derive(Debug, Clone)]
pub struct PoseBuilder {
    landmarks: [Landmark; NUM_LANDMARKS],
}

fn column(finger: Finger) -> f32 {
    match finger {
        Finger::Thumb => 0.4,
        Finger::Index => 0.46,
        Finger::Middle => 0.5,
        Finger::Ring => 0.54,
        Finger::Pinky => 0.58,
    }
}

impl PoseBuilder {
    pub fn new() -> Self {
        let mut this = Self {
            landmarks: [Landmark::default(); NUM_LANDMARKS],
        };
        this.set(LandmarkIdx::Wrist, WRIST.0, WRIST.1);
        this.set(LandmarkIdx::ThumbCmc, 0.45, 0.78);
        this.set(LandmarkIdx::ThumbMcp, 0.42, 0.74);
        this.set(LandmarkIdx::ThumbIp, 0.40, 0.73);
        this.set(LandmarkIdx::ThumbTip, 0.38, 0.72);
        for finger in Finger::FINGERS {
            let x = column(finger);
            let mcp = LandmarkIdx::ALL[finger.joint().index() - 1];
            this.set(mcp, x, MCP_Y);
            this.set(finger.joint(), x, PIP_Y);
            this.fold_mut(finger);
        }
        this
    }

    fn set(&mut self, idx: LandmarkIdx, x: f32, y: f32) {
        self.landmarks[idx.index()] = Landmark::planar(x, y);
    }

    fn dip(finger: Finger) -> LandmarkIdx {
        LandmarkIdx::ALL[finger.tip().index() - 1]
    }

    fn fold_mut(&mut self, finger: Finger) {
        match finger {
            Finger::Thumb => {
                self.set(LandmarkIdx::ThumbIp, 0.46, 0.74);
                self.set(LandmarkIdx::ThumbTip, 0.5, 0.76);
            }
            _ => {
                let x = column(finger);
                self.set(finger.joint(), x, PIP_Y);
                self.set(Self::dip(finger), x, 0.62);
                self.set(finger.tip(), x, 0.68);
            }
        }
    }

    /// Straightens a finger so that it points up.
    pub fn extend(mut self, finger: Finger) -> Self {
        match finger {
            Finger::Thumb => {
                self.set(LandmarkIdx::ThumbIp, 0.37, 0.6);
                self.set(LandmarkIdx::ThumbTip, 0.34, 0.5);
            }
            _ => {
                let x = column(finger);
                self.set(finger.joint(), x, PIP_Y);
                self.set(Self::dip(finger), x, 0.5);
                self.set(finger.tip(), x, 0.4);
            }
        }
        self
    }

    /// Curls a finger towards the palm.
    pub fn fold(mut self, finger: Finger) -> Self {
        self.fold_mut(finger);
        self
    }

    /// Straightens the index finger so that it points down, below the wrist.
    pub fn point_down(mut self) -> Self {
        let x = column(Finger::Index);
        self.set(LandmarkIdx::IndexFingerPip, x, 0.9);
        self.set(LandmarkIdx::IndexFingerDip, x, 0.95);
        self.set(LandmarkIdx::IndexFingerTip, x, 1.0);
        self
    }

    /// Brings thumb tip and index fingertip together at `(x, y)`, 0.02 apart.
    ///
    /// The index finger is curled over the thumb, so it does not count as extended.
    pub fn pinch_at(mut self, x: f32, y: f32) -> Self {
        self.set(LandmarkIdx::IndexFingerTip, x, y);
        self.set(LandmarkIdx::IndexFingerDip, x - 0.015, y - 0.02);
        self.set(LandmarkIdx::IndexFingerPip, x - 0.03, y - 0.03);
        self.set(LandmarkIdx::ThumbTip, x + 0.02, y);
        self.set(LandmarkIdx::ThumbIp, x + 0.04, y + 0.03);
        self
    }

    /// Places thumb tip and index fingertip `distance` apart horizontally, index tip at `(x, y)`.
    pub fn thumb_gap(mut self, x: f32, y: f32, distance: f32) -> Self {
        self = self.pinch_at(x, y);
        self.set(LandmarkIdx::ThumbTip, x + distance, y);
        self
    }

    /// Moves the whole hand.
    pub fn moved(mut self, dx: f32, dy: f32) -> Self {
        for lm in &mut self.landmarks {
            lm.x += dx;
            lm.y += dy;
        }
        self
    }

    /// Scales the hand about its wrist.
    pub fn scaled(mut self, factor: f32) -> Self {
        let wrist = self.landmarks[0];
        for lm in &mut self.landmarks {
            lm.x = wrist.x + (lm.x - wrist.x) * factor;
            lm.y = wrist.y + (lm.y - wrist.y) * factor;
        }
        self
    }

    pub fn landmarks(&self) -> Vec<Landmark> {
        self.landmarks.to_vec()
    }

    pub fn frame(&self, handedness: Handedness) -> HandFrame {
        HandFrame::new(self.landmarks(), handedness)
    }

    pub fn anonymous(&self) -> HandFrame {
        HandFrame::anonymous(self.landmarks())
    }
}
