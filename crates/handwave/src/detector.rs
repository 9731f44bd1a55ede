//! Landmark-based gesture detection.
//!
//! A [`GestureDetector`] is fed one batch of [`HandFrame`]s per video frame and turns them into
//! [`GestureEvent`]s. Boolean gestures (pinch, point-up, v-sign) are edge-triggered: their start
//! event fires on the frame the pose is first recognized and their `_end` event on the frame it
//! stops being recognized. Drags, pinch zoom and swipes are emitted on every frame whose movement
//! exceeds the respective threshold.
//!
//! # Hand tracking
//!
//! State is kept per [`HandKey`]. A hand counts as absent on frames that do not contain it. Once a
//! hand has been absent for more than [`DetectorConfig::absence_grace_frames`] consecutive frames,
//! its active gestures receive their `_end` events (pinch, then point-up, then v-sign) and its
//! state is dropped. With the default grace of 0, that happens on the first frame without it.
//!
//! A hand with fewer than 21 landmarks or non-finite coordinates is skipped for that frame. It
//! still counts as present, so a single corrupted frame does not end its gestures.
//!
//! # Event order
//!
//! Within a frame, hands are processed in input order. Per hand, events are emitted in the order
//! pinch start/end, pinch drag, pinch zoom, swipe, point-up, v-sign. Endings caused by absent
//! hands follow, ordered by [`HandKey`].

mod listeners;
mod state;

use std::{collections::BTreeMap, time::Instant};

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::{
    event::{EventName, GestureEvent},
    filter::Ema,
    geometry::DistanceMetric,
    landmark::{HandFrame, HandKey, HandResults, NUM_LANDMARKS},
    source::FrameSource,
    timer::{FpsCounter, Timer},
};

pub use listeners::ListenerId;
pub use state::HandState;

use listeners::Listeners;

/// Thresholds and policies of a [`GestureDetector`].
///
/// All distances are in normalized image coordinates and are measured with
/// [`DetectorConfig::distance_metric`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// A hand pinches while its thumb-index distance is strictly below this.
    pub pinch_threshold: f32,
    /// Minimum per-frame fingertip movement along either axis for a `pinch_drag`.
    pub drag_threshold: f32,
    /// Minimum per-frame change of the thumb-index distance for a `pinch_zoom`.
    pub zoom_threshold: f32,
    /// A finger is extended if its tip is this many times farther from the wrist than its middle
    /// joint.
    pub extension_ratio: f32,
    /// A finger is folded if its middle joint is this many times farther from the wrist than its
    /// tip.
    pub fold_ratio: f32,
    /// How far the index fingertip has to be above the wrist for `point_up`.
    pub point_up_margin: f32,
    /// Per-frame fingertip movement that counts as a swipe. Swipes are disabled when `None`.
    pub swipe_threshold: Option<f32>,
    /// Number of consecutive frames a hand may be missing before its gestures are ended.
    pub absence_grace_frames: u32,
    /// Hands beyond this many in a single frame are ignored.
    pub max_hands: usize,
    pub distance_metric: DistanceMetric,
    /// EMA smoothing factor applied to the thumb-index distance before thresholding. `None`
    /// disables smoothing.
    pub pinch_smoothing: Option<f32>,
}

impl DetectorConfig {
    pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.05;
    pub const DEFAULT_DRAG_THRESHOLD: f32 = 0.003;
    pub const DEFAULT_ZOOM_THRESHOLD: f32 = 0.01;
    pub const DEFAULT_SWIPE_THRESHOLD: f32 = 0.05;

    /// Parses a detector configuration from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self =
            serde_json::from_str(json).context("failed to parse detector configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Enables swipe detection with the default threshold.
    pub fn with_swipes(self) -> Self {
        Self {
            swipe_threshold: Some(Self::DEFAULT_SWIPE_THRESHOLD),
            ..self
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let positive = [
            ("pinch_threshold", self.pinch_threshold),
            ("drag_threshold", self.drag_threshold),
            ("zoom_threshold", self.zoom_threshold),
            ("extension_ratio", self.extension_ratio),
            ("fold_ratio", self.fold_ratio),
        ];
        for (name, value) in positive {
            ensure!(
                value.is_finite() && value > 0.0,
                "`{name}` must be a positive number, got {value}"
            );
        }
        ensure!(
            self.point_up_margin.is_finite(),
            "`point_up_margin` must be finite, got {}",
            self.point_up_margin
        );
        if let Some(threshold) = self.swipe_threshold {
            ensure!(
                threshold.is_finite() && threshold > 0.0,
                "`swipe_threshold` must be a positive number, got {threshold}"
            );
        }
        if let Some(alpha) = self.pinch_smoothing {
            ensure!(
                alpha > 0.0 && alpha <= 1.0,
                "`pinch_smoothing` must be in (0, 1], got {alpha}"
            );
        }
        ensure!(self.max_hands > 0, "`max_hands` must be at least 1");
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: Self::DEFAULT_PINCH_THRESHOLD,
            drag_threshold: Self::DEFAULT_DRAG_THRESHOLD,
            zoom_threshold: Self::DEFAULT_ZOOM_THRESHOLD,
            extension_ratio: 1.2,
            fold_ratio: 1.1,
            point_up_margin: 0.02,
            swipe_threshold: None,
            absence_grace_frames: 0,
            max_hands: 2,
            distance_metric: DistanceMetric::Planar,
            pinch_smoothing: None,
        }
    }
}

/// Turns per-frame hand landmarks into gesture events.
///
/// Frames must be delivered one at a time; all listeners run synchronously inside
/// [`GestureDetector::process_frame`].
pub struct GestureDetector {
    config: DetectorConfig,
    smoothing: Option<Ema>,
    hands: BTreeMap<HandKey, HandState>,
    listeners: Listeners,
    source: Option<Box<dyn FrameSource>>,
    timer: Timer,
    fps: FpsCounter,
    disposed: bool,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::with_valid_config(DetectorConfig::default())
    }
}

impl GestureDetector {
    /// Creates a detector, failing if `config` does not pass [`DetectorConfig::validate`].
    pub fn new(config: DetectorConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: DetectorConfig) -> Self {
        Self {
            smoothing: config.pinch_smoothing.map(Ema::new),
            config,
            hands: BTreeMap::new(),
            listeners: Listeners::default(),
            source: None,
            timer: Timer::new("process_frame"),
            fps: FpsCounter::new("gesture detector"),
            disposed: false,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Registers a listener for events named `name`.
    ///
    /// Listeners registered for the same name are invoked in registration order. The returned
    /// [`ListenerId`] can be passed to [`GestureDetector::off`] to unregister it again.
    pub fn on<F>(&mut self, name: EventName, listener: F) -> ListenerId
    where
        F: FnMut(&GestureEvent) + 'static,
    {
        self.listeners.add(name, Box::new(listener))
    }

    /// Unregisters a listener. Returns `false` (and does nothing) if it was not registered for
    /// `name`.
    pub fn off(&mut self, name: EventName, id: ListenerId) -> bool {
        self.listeners.remove(name, id)
    }

    pub fn listener_count(&self, name: EventName) -> usize {
        self.listeners.count(name)
    }

    /// Hands over the subscription that delivers frames to this detector.
    ///
    /// The source is stopped when the detector is disposed or dropped, or when another source is
    /// attached. Attaching to an already disposed detector stops the source immediately.
    pub fn attach_source<S: FrameSource + 'static>(&mut self, source: S) {
        let mut source: Box<dyn FrameSource> = Box::new(source);
        if self.disposed {
            log::warn!("frame source attached to a disposed gesture detector, stopping it");
            source.stop();
            return;
        }
        if let Some(mut old) = self.source.replace(source) {
            log::debug!("replacing frame source");
            old.stop();
        }
    }

    /// Processes the hands detected in one video frame.
    ///
    /// An empty slice is a valid input (no hands in view). This never fails: malformed hands are
    /// skipped and logged.
    pub fn process_frame(&mut self, hands: &[HandFrame]) {
        if self.disposed {
            log::trace!("ignoring frame, gesture detector is disposed");
            return;
        }

        let start = Instant::now();
        let mut events = Vec::new();

        if hands.len() > self.config.max_hands {
            log::trace!(
                "{} hands in frame, only processing the first {}",
                hands.len(),
                self.config.max_hands
            );
        }

        let mut seen = Vec::with_capacity(self.config.max_hands);
        for (slot, frame) in hands.iter().enumerate().take(self.config.max_hands) {
            let mut key = frame.key(slot);
            if seen.contains(&key) {
                key = HandKey::Anonymous(slot);
            }
            seen.push(key);

            let Some(pose) = frame.pose() else {
                log::warn!(
                    "skipping malformed hand ({key}): expected {NUM_LANDMARKS} finite landmarks, got {}",
                    frame.landmarks.len()
                );
                continue;
            };

            let state = self.hands.entry(key).or_default();
            state.observe(&self.config, self.smoothing.as_ref(), key, &pose, &mut events);
        }

        let grace = self.config.absence_grace_frames;
        self.hands.retain(|&key, state| {
            if seen.contains(&key) || state.miss() <= grace {
                return true;
            }
            log::debug!("{key} left the frame, ending its gestures");
            state.finish(key, &mut events);
            false
        });

        for event in &events {
            log::trace!("{event}");
            self.listeners.emit(event);
        }

        self.timer.record(start.elapsed());
        if self.fps.tick_with(&self.timer) {
            self.timer.reset();
        }
    }

    /// Processes one landmark model result in its index-aligned layout.
    pub fn process_results(&mut self, results: &HandResults) {
        self.process_frame(&results.hand_frames());
    }

    /// Returns the state tracked for `hand`, if it is currently tracked.
    pub fn hand_state(&self, hand: HandKey) -> Option<&HandState> {
        self.hands.get(&hand)
    }

    /// Returns the keys of all currently tracked hands, in [`HandKey`] order.
    pub fn tracked_hands(&self) -> impl Iterator<Item = HandKey> + '_ {
        self.hands.keys().copied()
    }

    /// Forgets the state of one hand, or of all hands if `hand` is `None`.
    ///
    /// No `_end` events are emitted for gestures that were active.
    pub fn reset(&mut self, hand: Option<HandKey>) {
        match hand {
            Some(hand) => {
                self.hands.remove(&hand);
            }
            None => self.hands.clear(),
        }
    }

    /// Timing statistics of [`GestureDetector::process_frame`].
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Stops the attached frame source, drops all listeners and state, and makes further calls to
    /// [`GestureDetector::process_frame`] no-ops.
    ///
    /// Calling this more than once has no further effect.
    pub fn dispose(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.stop();
            log::debug!("frame source stopped");
        }
        if !self.disposed {
            log::debug!("gesture detector disposed ({})", self.timer);
        }
        self.hands.clear();
        self.listeners.clear();
        self.disposed = true;
    }
}

impl Drop for GestureDetector {
    fn drop(&mut self) {
        self.dispose();
    }
}
