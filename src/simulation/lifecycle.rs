// src/simulation/lifecycle.rs

use crate::error::EnrichError;

/// Hooks the host calls as simulated time advances.
///
/// `on_enter` runs once, then each period gets exactly one
/// `on_period_start` before any trading and one `on_period_end` after it.
pub trait Lifecycle {
    fn on_enter(&mut self, period: usize) -> Result<(), EnrichError>;

    fn on_period_start(&mut self, period: usize);

    fn on_period_end(&mut self, period: usize);
}
