// src/strategy/traits.rs

use std::fmt::Debug;

use crate::strategy::rng::SimRng;

/// Decides, once per period, whether the facility bids on its product.
///
/// Policies only look at the period number and the facility's RNG; trade
/// content never influences them.
pub trait ParticipationPolicy: Debug + Send + Sync {
    /// # Arguments
    /// * `period` - Zero-based period index.
    /// * `rng` - The facility's random source. Policies that don't need it must
    ///   not draw from it.
    fn is_active(&mut self, period: usize, rng: &mut SimRng) -> bool;
}
