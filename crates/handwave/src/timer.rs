//! Performance measurement tools.

use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::filter::{Ema, EmaState, Filter};

const EMA_ALPHA: f32 = 0.3;

/// Measures and averages the time an operation takes.
///
/// Timings are smoothed with an exponential moving average. The [`fmt::Display`] impl shows the
/// number of recorded measurements and the current average.
#[derive(Debug, Clone)]
pub struct Timer {
    name: &'static str,
    ema: Ema,
    ema_state: EmaState,
    /// The number of measurements since the last reset.
    count: usize,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ema: Ema::new(EMA_ALPHA),
            ema_state: EmaState::default(),
            count: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Records the duration of one operation.
    pub fn record(&mut self, duration: Duration) {
        self.ema.filter(&mut self.ema_state, duration.as_secs_f32());
        self.count += 1;
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&mut self, timee: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = timee();
        self.record(start.elapsed());
        result
    }

    /// Returns the smoothed average duration, or zero if nothing was recorded since the last reset.
    pub fn average(&self) -> Duration {
        Duration::from_secs_f32(self.ema_state.last().unwrap_or(0.0))
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Discards all recorded timings.
    pub fn reset(&mut self) {
        self.ema_state = EmaState::default();
        self.count = 0;
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let avg_ms = self.average().as_secs_f64() * 1000.0;
        write!(f, "{}: {}x{avg_ms:.01}ms", self.name, self.count)
    }
}

/// Logs frames per second with optional extra data.
#[derive(Debug)]
pub struct FpsCounter {
    name: String,
    frames: u32,
    start: Instant,
}

impl FpsCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            frames: 0,
            start: Instant::now(),
        }
    }

    /// Advances the frame counter by 1 and logs FPS if one second has passed.
    ///
    /// Returns `true` when a log line was emitted and the counter restarted.
    pub fn tick(&mut self) -> bool {
        self.tick_impl(None::<&str>)
    }

    /// Like [`FpsCounter::tick`], but appends `extra` to the log line.
    pub fn tick_with<D: fmt::Display>(&mut self, extra: D) -> bool {
        self.tick_impl(Some(extra))
    }

    fn tick_impl<D: fmt::Display>(&mut self, extra: Option<D>) -> bool {
        self.frames += 1;
        if self.start.elapsed() < Duration::from_secs(1) {
            return false;
        }

        match extra {
            Some(extra) => log::debug!("{}: {} FPS ({})", self.name, self.frames, extra),
            None => log::debug!("{}: {} FPS", self.name, self.frames),
        }
        self.frames = 0;
        self.start = Instant::now();
        true
    }
}
