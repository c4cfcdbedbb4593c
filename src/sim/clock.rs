//! Fixed-step accumulator
//!
//! Wall-clock time goes in, whole simulation ticks come out. The remainder
//! carries over to the next frame so no time is lost or duplicated.

/// Slack for binary rounding when time arrives in decimal chunks
const EPSILON: f64 = 1e-9;

/// Converts variable frame deltas into a count of fixed ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    fixed_dt: f64,
    accumulator: f64,
}

impl FixedStep {
    /// Step of exactly `1 / hz` seconds
    pub fn from_hz(hz: f64) -> Self {
        Self {
            fixed_dt: 1.0 / hz,
            accumulator: 0.0,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt as f32
    }

    /// Unconsumed time carried to the next frame
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }

    /// Add elapsed wall time and return how many ticks to run.
    ///
    /// Negative or non-finite deltas add nothing.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }

        let mut ticks = 0;
        while self.accumulator + EPSILON >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            ticks += 1;
        }
        if self.accumulator < 0.0 {
            self.accumulator = 0.0;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SIM_DT, SIM_HZ};
    use proptest::prelude::*;

    #[test]
    fn test_whole_ticks_and_remainder() {
        let mut clock = FixedStep::from_hz(SIM_HZ);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.005), 1);
        assert!(clock.remainder() > 0.0 && clock.remainder() < SIM_DT as f64);
        assert_eq!(clock.advance(1.0), 120);
    }

    #[test]
    fn test_bad_deltas_ignored() {
        let mut clock = FixedStep::from_hz(SIM_HZ);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f64::NAN), 0);
        assert_eq!(clock.remainder(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_chunking_does_not_change_tick_count(chunks in prop::collection::vec(1u32..=50, 1..200)) {
            let mut clock = FixedStep::from_hz(SIM_HZ);
            let total_ms: u32 = chunks.iter().sum();
            let ticks: u32 = chunks.iter().map(|ms| clock.advance(*ms as f64 / 1000.0)).sum();
            // 120 Hz: floor(T_ms * 120 / 1000)
            prop_assert_eq!(ticks, total_ms * 120 / 1000);
        }
    }
}
