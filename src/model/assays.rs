// src/model/assays.rs

/// Mass and separative-work conversions for a single enrichment step.
///
/// All functions are pure: identical inputs give bit-identical outputs.
use crate::error::EnrichError;

/// The feed / product / tails assay triple of one enrichment operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assays {
    feed: f64,
    product: f64,
    tails: f64,
}

impl Assays {
    /// Validates the triple.
    ///
    /// Fails with `InvalidAssayConfiguration` unless feed is richer than tails,
    /// and with `InvalidProductAssay` unless `tails < product < 1`.
    pub fn new(feed: f64, product: f64, tails: f64) -> Result<Self, EnrichError> {
        if feed <= tails {
            return Err(EnrichError::InvalidAssayConfiguration { feed, tails });
        }
        if product <= tails || product >= 1.0 {
            return Err(EnrichError::InvalidProductAssay { product, tails });
        }
        Ok(Self {
            feed,
            product,
            tails,
        })
    }
}

/// The separation value function.
///
/// Formula: V(x) = (2x - 1) * ln(x / (1 - x))
pub fn value_function(x: f64) -> f64 {
    (2.0 * x - 1.0) * (x / (1.0 - x)).ln()
}

/// Feed mass needed to make `product_qty` of product.
///
/// Formula: m_f = m_p * (x_p - x_t) / (x_f - x_t)
pub fn feed_qty(product_qty: f64, assays: &Assays) -> f64 {
    product_qty * (assays.product - assays.tails) / (assays.feed - assays.tails)
}

/// Tails mass left over when making `product_qty` of product.
pub fn tails_qty(product_qty: f64, assays: &Assays) -> f64 {
    feed_qty(product_qty, assays) - product_qty
}

/// Separative work needed to make `product_qty` of product.
///
/// Formula: SWU = m_p * V(x_p) + m_t * V(x_t) - m_f * V(x_f)
pub fn swu_required(product_qty: f64, assays: &Assays) -> f64 {
    let feed = feed_qty(product_qty, assays);
    let tails = feed - product_qty;
    product_qty * value_function(assays.product) + tails * value_function(assays.tails)
        - feed * value_function(assays.feed)
}

/// Product mass obtainable from `feed_qty` of feed (inverse of [`feed_qty`]).
pub fn product_qty_from_feed(feed_qty: f64, assays: &Assays) -> f64 {
    feed_qty * (assays.feed - assays.tails) / (assays.product - assays.tails)
}

/// Product mass obtainable from `swu` of separative work.
///
/// SWU is linear in product mass for a fixed triple, so this divides by the
/// per-kilogram requirement.
pub fn product_qty_from_swu(swu: f64, assays: &Assays) -> f64 {
    let per_kg = swu_required(1.0, assays);
    if per_kg <= 0.0 {
        return f64::INFINITY;
    }
    swu / per_kg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn natural() -> Assays {
        Assays::new(0.0071, 0.05, 0.003).unwrap()
    }

    #[test]
    fn reference_values_for_five_percent_product() {
        let a = natural();
        assert!((feed_qty(1.0, &a) - 11.4634).abs() < 1e-3);
        assert!((swu_required(1.0, &a) - 7.2063).abs() < 1e-3);
        assert!((tails_qty(1.0, &a) - 10.4634).abs() < 1e-3);
    }

    #[test]
    fn feed_inverse_recovers_product_mass() {
        let triples = [(0.0071, 0.05, 0.003), (0.0071, 0.9, 0.002), (0.02, 0.2, 0.01)];
        for (f, p, t) in triples {
            let a = Assays::new(f, p, t).unwrap();
            for m in [0.1, 1.0, 37.5, 1000.0] {
                let back = product_qty_from_feed(feed_qty(m, &a), &a);
                assert!((back - m).abs() < 1e-9 * m.max(1.0));
                let back = product_qty_from_swu(swu_required(m, &a), &a);
                assert!((back - m).abs() < 1e-9 * m.max(1.0));
            }
        }
    }

    #[test]
    fn swu_is_non_negative_and_increasing() {
        let a = natural();
        let mut last = 0.0;
        for i in 1..50 {
            let swu = swu_required(i as f64 * 0.5, &a);
            assert!(swu >= 0.0);
            assert!(swu > last);
            last = swu;
        }
    }

    #[test]
    fn equal_feed_and_tails_is_rejected() {
        let err = Assays::new(0.003, 0.05, 0.003).unwrap_err();
        assert!(matches!(err, EnrichError::InvalidAssayConfiguration { .. }));
    }

    #[test]
    fn feed_leaner_than_tails_is_rejected() {
        let err = Assays::new(0.002, 0.05, 0.003).unwrap_err();
        assert!(matches!(
            err,
            EnrichError::InvalidAssayConfiguration { feed, tails } if feed == 0.002 && tails == 0.003
        ));
    }

    #[test]
    fn product_outside_range_is_rejected() {
        assert!(matches!(
            Assays::new(0.0071, 0.002, 0.003),
            Err(EnrichError::InvalidProductAssay { .. })
        ));
        assert!(matches!(
            Assays::new(0.0071, 1.0, 0.003),
            Err(EnrichError::InvalidProductAssay { .. })
        ));
    }

    #[test]
    fn conversions_are_reproducible() {
        let a = natural();
        assert_eq!(swu_required(3.3, &a).to_bits(), swu_required(3.3, &a).to_bits());
    }
}
