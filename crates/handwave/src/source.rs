//! The external frame subscription a detector can own.

/// A running subscription that delivers landmark frames, such as a camera feed driving a hand pose
/// model.
///
/// A [`GestureDetector`](crate::detector::GestureDetector) that owns a source stops it when it is
/// disposed.
pub trait FrameSource {
    /// Stops frame delivery. Must not block on frames still in flight.
    fn stop(&mut self);
}

/// A [`FrameSource`] that runs a closure when stopped.
///
/// Stopping more than once runs the closure only the first time.
#[must_use = "`OnStop` does nothing unless attached to a detector"]
pub struct OnStop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> FrameSource for OnStop<F> {
    fn stop(&mut self) {
        if let Some(cb) = self.0.take() {
            cb();
        }
    }
}

/// Returns a [`FrameSource`] that runs `cb` when stopped.
pub fn on_stop<F: FnOnce()>(cb: F) -> OnStop<F> {
    OnStop(Some(cb))
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    #[test]
    fn on_stop_runs_once() {
        let stops = Rc::new(Cell::new(0));
        let counter = stops.clone();
        let mut source = on_stop(move || counter.set(counter.get() + 1));
        source.stop();
        source.stop();
        assert_eq!(stops.get(), 1);
    }
}
