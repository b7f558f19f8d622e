// src/strategy/implementations.rs

use rand_distr::{Bernoulli, Distribution};

use crate::simulation::config::{FacilityConfig, SocialBehavior};
use crate::strategy::rng::SimRng;
use crate::strategy::traits::ParticipationPolicy;

// =========================================================================
// 1. Always Active
// =========================================================================

/// Bids every period.
#[derive(Debug, Clone, Default)]
pub struct AlwaysActive;

impl ParticipationPolicy for AlwaysActive {
    fn is_active(&mut self, _period: usize, _rng: &mut SimRng) -> bool {
        true
    }
}

// =========================================================================
// 2. Fixed Interval
// =========================================================================

/// Bids exactly on periods divisible by the interval: 0, n, 2n, ...
#[derive(Debug, Clone)]
pub struct EveryInterval {
    interval: usize,
}

impl EveryInterval {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1) as usize,
        }
    }
}

impl ParticipationPolicy for EveryInterval {
    fn is_active(&mut self, period: usize, _rng: &mut SimRng) -> bool {
        period % self.interval == 0
    }
}

// =========================================================================
// 3. Random Interval
// =========================================================================

/// Bids with probability `1 / interval`, so on average once per interval.
#[derive(Debug, Clone)]
pub struct RandomInterval {
    draw: Bernoulli,
}

impl RandomInterval {
    pub fn new(interval: u32) -> Self {
        Self {
            draw: every_random(interval as f64),
        }
    }
}

impl ParticipationPolicy for RandomInterval {
    fn is_active(&mut self, _period: usize, rng: &mut SimRng) -> bool {
        self.draw.sample(&mut rng.0)
    }
}

/// A draw that comes up true once per `interval` on average.
///
/// Intervals at or below 1 always succeed.
pub fn every_random(interval: f64) -> Bernoulli {
    let p = if interval <= 1.0 { 1.0 } else { 1.0 / interval };
    // p is always within [0, 1] here
    Bernoulli::new(p).unwrap_or_else(|_| unreachable!("probability {p} out of range"))
}

/// Builds the policy named in the configuration.
pub fn policy_from_config(config: &FacilityConfig) -> Box<dyn ParticipationPolicy> {
    match config.social_behav {
        SocialBehavior::None => Box::new(AlwaysActive),
        SocialBehavior::Every => Box::new(EveryInterval::new(config.behav_interval)),
        SocialBehavior::Random => Box::new(RandomInterval::new(config.behav_interval)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_three_is_active_on_multiples_of_three() {
        for _run in 0..3 {
            let mut policy = EveryInterval::new(3);
            let mut rng = SimRng::from_seed_u64(1);
            let active: Vec<usize> = (0..10)
                .filter(|&p| policy.is_active(p, &mut rng))
                .collect();
            assert_eq!(active, vec![0, 3, 6, 9]);
        }
    }

    #[test]
    fn always_active_never_touches_rng() {
        let mut rng = SimRng::from_seed_u64(5);
        let before = rng.0.get_word_pos();
        assert!(AlwaysActive.is_active(12, &mut rng));
        assert_eq!(rng.0.get_word_pos(), before);
    }

    #[test]
    fn random_interval_is_repeatable_and_near_expected_rate() {
        let run = || {
            let mut policy = RandomInterval::new(4);
            let mut rng = SimRng::from_seed_u64(99);
            (0..4000)
                .map(|p| policy.is_active(p, &mut rng))
                .collect::<Vec<_>>()
        };
        let first = run();
        assert_eq!(first, run());
        let hits = first.iter().filter(|&&b| b).count() as f64;
        let rate = hits / first.len() as f64;
        assert!((rate - 0.25).abs() < 0.04, "rate was {rate}");
    }

    #[test]
    fn interval_of_one_always_fires() {
        let mut policy = RandomInterval::new(1);
        let mut rng = SimRng::from_seed_u64(3);
        assert!((0..50).all(|p| policy.is_active(p, &mut rng)));
    }
}
