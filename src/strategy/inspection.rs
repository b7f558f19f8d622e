// src/strategy/inspection.rs

use rand_distr::{Bernoulli, Distribution};

use crate::strategy::implementations::every_random;
use crate::strategy::rng::SimRng;

/// Swipe sampling by an inspector looking for HEU.
#[derive(Debug, Clone)]
pub struct Inspector {
    frequency: i32,
    gate: Option<Bernoulli>,
    n_swipes: u32,
    false_pos: f64,
    false_neg: f64,
}

impl Inspector {
    /// `frequency` is the average number of periods between inspections.
    /// Zero disables inspections entirely; a negative value still consumes
    /// the gating draw each period but never inspects.
    pub fn new(frequency: i32, n_swipes: u32, false_pos: f64, false_neg: f64) -> Self {
        let gate = (frequency != 0).then(|| every_random(frequency.unsigned_abs() as f64));
        Self {
            frequency,
            gate,
            n_swipes,
            false_pos,
            false_neg,
        }
    }

    /// Runs this period's gate. Returns the fraction of positive swipes if an
    /// inspection happened and should be recorded.
    pub fn maybe_inspect(&self, heu_present: bool, rng: &mut SimRng) -> Option<f64> {
        let gate = self.gate.as_ref()?;
        let sampled = gate.sample(&mut rng.0);
        if self.frequency < 0 || !sampled {
            return None;
        }
        Some(self.swipe_fraction(heu_present, rng))
    }

    /// Takes `n_swipes` samples, each reported wrongly at the configured rate.
    pub fn swipe_fraction(&self, heu_present: bool, rng: &mut SimRng) -> f64 {
        if self.n_swipes == 0 {
            return 0.0;
        }
        let flip_rate = if heu_present {
            self.false_neg
        } else {
            self.false_pos
        };
        let positives = (0..self.n_swipes)
            .filter(|_| heu_present ^ flips(flip_rate, rng))
            .count();
        positives as f64 / self.n_swipes as f64
    }
}

fn flips(rate: f64, rng: &mut SimRng) -> bool {
    match Bernoulli::new(rate) {
        Ok(draw) => draw.sample(&mut rng.0),
        Err(_) => false,
    }
}
