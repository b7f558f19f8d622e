// src/model/tracker.rs

use crate::error::{ConstraintKind, EnrichError};

/// Slack on reservations to absorb floating-point noise from the sizing math.
pub const EPS_RESERVE: f64 = 1e-6;

/// Running totals of SWU and feed consumed in the current period.
#[derive(Debug, Clone)]
pub struct ConstraintTracker {
    swu_capacity: f64,
    feed_available: f64,
    swu_used: f64,
    feed_used: f64,
}

impl ConstraintTracker {
    pub fn new(swu_capacity: f64) -> Self {
        Self {
            swu_capacity,
            feed_available: 0.0,
            swu_used: 0.0,
            feed_used: 0.0,
        }
    }

    /// Zeroes both totals and fixes the feed budget for the period.
    pub fn reset_period(&mut self, feed_available: f64) {
        self.feed_available = feed_available;
        self.swu_used = 0.0;
        self.feed_used = 0.0;
    }

    pub fn capacity(&self, kind: ConstraintKind) -> f64 {
        match kind {
            ConstraintKind::Swu => self.swu_capacity,
            ConstraintKind::Feed => self.feed_available,
        }
    }

    pub fn used(&self, kind: ConstraintKind) -> f64 {
        match kind {
            ConstraintKind::Swu => self.swu_used,
            ConstraintKind::Feed => self.feed_used,
        }
    }

    pub fn remaining(&self, kind: ConstraintKind) -> f64 {
        (self.capacity(kind) - self.used(kind)).max(0.0)
    }

    /// Fails without committing if `amount` is more than what remains.
    pub fn check(&self, kind: ConstraintKind, amount: f64) -> Result<(), EnrichError> {
        let remaining = self.remaining(kind);
        if amount > remaining + EPS_RESERVE {
            return Err(EnrichError::ConstraintExceeded {
                kind,
                requested: amount,
                remaining,
            });
        }
        Ok(())
    }

    pub fn reserve(&mut self, kind: ConstraintKind, amount: f64) -> Result<(), EnrichError> {
        self.check(kind, amount)?;
        // overshoot within tolerance commits only what remains
        let amount = amount.clamp(0.0, self.remaining(kind));
        match kind {
            ConstraintKind::Swu => self.swu_used += amount,
            ConstraintKind::Feed => self.feed_used += amount,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservations_accumulate_until_exhausted() {
        let mut t = ConstraintTracker::new(100.0);
        t.reset_period(50.0);
        t.reserve(ConstraintKind::Swu, 60.0).unwrap();
        t.reserve(ConstraintKind::Swu, 30.0).unwrap();
        assert!((t.remaining(ConstraintKind::Swu) - 10.0).abs() < 1e-12);

        let err = t.reserve(ConstraintKind::Swu, 11.0).unwrap_err();
        assert!(matches!(
            err,
            EnrichError::ConstraintExceeded {
                kind: ConstraintKind::Swu,
                ..
            }
        ));
        assert!((t.used(ConstraintKind::Swu) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_both_totals() {
        let mut t = ConstraintTracker::new(10.0);
        t.reset_period(20.0);
        t.reserve(ConstraintKind::Feed, 20.0).unwrap();
        t.reserve(ConstraintKind::Swu, 5.0).unwrap();
        t.reset_period(8.0);
        assert_eq!(t.used(ConstraintKind::Feed), 0.0);
        assert_eq!(t.used(ConstraintKind::Swu), 0.0);
        assert_eq!(t.remaining(ConstraintKind::Feed), 8.0);
    }

    #[test]
    fn negative_reservations_never_reduce_usage() {
        let mut t = ConstraintTracker::new(10.0);
        t.reset_period(10.0);
        t.reserve(ConstraintKind::Swu, 4.0).unwrap();
        t.reserve(ConstraintKind::Swu, -3.0).unwrap();
        assert_eq!(t.used(ConstraintKind::Swu), 4.0);
    }

    #[test]
    fn rounding_overshoot_never_pushes_usage_past_capacity() {
        let mut t = ConstraintTracker::new(10.0);
        t.reset_period(10.0);
        t.reserve(ConstraintKind::Swu, 10.0 + 5e-7).unwrap();
        t.reserve(ConstraintKind::Swu, 5e-7).unwrap();
        assert_eq!(t.used(ConstraintKind::Swu), 10.0);
        assert_eq!(t.remaining(ConstraintKind::Swu), 0.0);
    }
}
