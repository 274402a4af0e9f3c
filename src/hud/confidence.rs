use rand::Rng;
use serde::Serialize;

pub const CONFIDENCE_MIN: f64 = 80.0;
pub const CONFIDENCE_MAX: f64 = 100.0;
/// Largest per-tick change, in either direction.
pub const CONFIDENCE_MAX_STEP: f64 = 5.0;

/// Decorative confidence readout. Starts at 0 and settles into [80, 100]
/// from the first nudge onward; it is a random walk, not a real signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfidenceMeter {
    value: f64,
}

impl Default for ConfidenceMeter {
    fn default() -> Self {
        Self { value: 0.0 }
    }
}

impl ConfidenceMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Apply one step of the walk. Clamps, never wraps.
    pub fn nudge(&mut self, delta: f64) -> f64 {
        self.value = (self.value + delta).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX);
        self.value
    }

    /// One timer tick: nudge by a uniform delta in [-5, +5].
    pub fn jitter<R: Rng>(&mut self, rng: &mut R) -> f64 {
        let delta = rng.gen_range(-CONFIDENCE_MAX_STEP..=CONFIDENCE_MAX_STEP);
        self.nudge(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn starts_at_zero_before_the_first_tick() {
        assert_eq!(ConfidenceMeter::new().value(), 0.0);
    }

    #[test]
    fn first_nudge_clamps_up_into_range() {
        let mut meter = ConfidenceMeter::new();
        meter.nudge(-5.0);
        assert_eq!(meter.value(), CONFIDENCE_MIN);
    }

    #[test]
    fn stays_in_range_for_any_walk() {
        let mut rng = StdRng::seed_from_u64(0x1d3a);
        let mut meter = ConfidenceMeter::new();
        for _ in 0..10_000 {
            let value = meter.jitter(&mut rng);
            assert!(
                (CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&value),
                "confidence escaped bounds: {value}"
            );
        }
    }

    #[test]
    fn clamps_oversized_deltas_instead_of_wrapping() {
        let mut meter = ConfidenceMeter::new();
        meter.nudge(1_000.0);
        assert_eq!(meter.value(), CONFIDENCE_MAX);
        meter.nudge(-1_000.0);
        assert_eq!(meter.value(), CONFIDENCE_MIN);
    }
}
