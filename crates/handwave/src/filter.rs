//! Smoothing filters for noisy per-frame measurements.

/// A filter for values of type `T`.
///
/// The filter parameters live in the implementing type, while the accumulated history lives in a
/// separate [`Filter::State`]. This lets one set of parameters drive any number of independent
/// signals (for example, one per tracked hand).
pub trait Filter<T> {
    /// Per-signal filter state. [`Default::default`] must return the state of a filter that has
    /// not seen any values yet.
    type State: Default;

    /// Adds a new value to the filter, returning the filtered value.
    fn filter(&self, state: &mut Self::State, value: T) -> T;
}

/// An Exponential Moving Average (EMA) filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ema {
    alpha: f32,
}

impl Ema {
    /// Creates a new Exponential Moving Average filter.
    ///
    /// The `alpha` parameter must be between 0.0 and 1.0 and defines how quickly the weight of
    /// older values decays. Values closer to 1.0 favor recent values, values closer to 0.0 smooth
    /// more strongly. An `alpha` of 1.0 disables smoothing.
    ///
    /// # Panics
    ///
    /// This method will panic if `alpha` is not in between 0.0 and 1.0.
    pub fn new(alpha: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&alpha),
            "EMA alpha must be in 0.0..=1.0, got {alpha}"
        );
        Self { alpha }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Filter state for [`Ema`] filters.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EmaState {
    last: Option<f32>,
}

impl EmaState {
    /// Returns the most recent filter output.
    pub fn last(&self) -> Option<f32> {
        self.last
    }
}

impl Filter<f32> for Ema {
    type State = EmaState;

    fn filter(&self, state: &mut EmaState, value: f32) -> f32 {
        let avg = match state.last {
            Some(last) => self.alpha * value + (1.0 - self.alpha) * last,
            None => value,
        };
        state.last = Some(avg);
        avg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema() {
        let ema = Ema::new(0.5);
        let mut state = EmaState::default();
        assert_eq!(ema.filter(&mut state, 1.0), 1.0);
        assert_eq!(ema.filter(&mut state, 2.0), 1.5);
        assert_eq!(ema.filter(&mut state, 2.0), 1.75);
        assert_eq!(state.last(), Some(1.75));
    }

    #[test]
    fn ema_passthrough() {
        let ema = Ema::new(1.0);
        let mut state = EmaState::default();
        for v in [0.3, 0.1, 0.7] {
            assert_eq!(ema.filter(&mut state, v), v);
        }
    }

    #[test]
    #[should_panic]
    fn ema_rejects_alpha() {
        Ema::new(1.5);
    }
}
