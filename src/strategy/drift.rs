// src/strategy/drift.rs

use rand_distr::{Distribution, Normal};

use crate::strategy::rng::SimRng;

/// Closest the drifting assay may come to 0 or to the feed assay.
pub const ASSAY_MARGIN: f64 = 1e-6;

/// Bounded random walk of the tails assay.
///
/// Each step draws from a normal centered on the previous value and clips the
/// result into `(0, feed_assay)`. With zero spread the assay never moves and
/// no random numbers are consumed.
#[derive(Debug, Clone)]
pub struct TailsDrift {
    current: f64,
    feed_assay: f64,
    sigma: f64,
}

impl TailsDrift {
    pub fn new(initial: f64, feed_assay: f64, sigma: f64) -> Self {
        Self {
            current: initial,
            feed_assay,
            sigma,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn is_enabled(&self) -> bool {
        self.sigma > 0.0
    }

    /// Advances one period and returns the new tails assay.
    pub fn step(&mut self, rng: &mut SimRng) -> f64 {
        if !self.is_enabled() {
            return self.current;
        }
        let Ok(normal) = Normal::new(self.current, self.sigma) else {
            return self.current;
        };
        let draw: f64 = normal.sample(&mut rng.0);
        self.current = draw.clamp(ASSAY_MARGIN, self.feed_assay - ASSAY_MARGIN);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sigma_keeps_assay_constant() {
        let mut drift = TailsDrift::new(0.003, 0.0071, 0.0);
        let mut rng = SimRng::from_seed_u64(4);
        for _ in 0..10 {
            assert_eq!(drift.step(&mut rng), 0.003);
        }
    }

    #[test]
    fn drift_stays_inside_valid_range() {
        let mut drift = TailsDrift::new(0.003, 0.0071, 0.01);
        let mut rng = SimRng::from_seed_u64(8);
        for _ in 0..500 {
            let x = drift.step(&mut rng);
            assert!(x > 0.0 && x < 0.0071, "assay {x} escaped the range");
        }
    }

    #[test]
    fn drift_is_repeatable_for_a_seed() {
        let walk = || {
            let mut drift = TailsDrift::new(0.003, 0.0071, 0.0002);
            let mut rng = SimRng::from_seed_u64(21);
            (0..20).map(|_| drift.step(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(walk(), walk());
    }
}
