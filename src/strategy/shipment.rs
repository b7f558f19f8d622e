// src/strategy/shipment.rs

use crate::model::material::{Material, EPS_MASS};

/// HEU that builds up in the cascade until a full shipment is ready.
///
/// The stock is real enriched material: it was paid for in SWU and feed when
/// it was made, and leaves only as one shipment.
#[derive(Debug, Clone, Default)]
pub struct ShipmentAccumulator {
    threshold: f64,
    stock: Material,
}

impl ShipmentAccumulator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            stock: Material::empty(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.threshold > 0.0
    }

    pub fn accrued(&self) -> f64 {
        self.stock.quantity()
    }

    pub fn stock(&self) -> &Material {
        &self.stock
    }

    /// True once the stock holds at least one full shipment.
    pub fn is_ready(&self) -> bool {
        self.is_enabled() && self.accrued() + EPS_MASS >= self.threshold
    }

    pub fn add(&mut self, heu: Material) {
        self.stock.absorb(heu);
    }

    /// Takes up to `qty` out of the stock.
    pub fn take(&mut self, qty: f64) -> Material {
        let out = self.stock.extract(qty);
        if self.stock.is_empty() {
            self.stock = Material::empty();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_once_threshold_is_reached() {
        let mut acc = ShipmentAccumulator::new(10.0);
        acc.add(Material::uranium(4.0, 0.9));
        acc.add(Material::uranium(4.0, 0.9));
        assert!(!acc.is_ready());
        assert!((acc.accrued() - 8.0).abs() < 1e-12);
        acc.add(Material::uranium(2.0, 0.9));
        assert!(acc.is_ready());
        assert!((acc.stock().assay() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn shipping_the_stock_empties_it() {
        let mut acc = ShipmentAccumulator::new(1.0);
        acc.add(Material::uranium(3.0, 0.85));
        let shipped = acc.take(3.0);
        assert!((shipped.quantity() - 3.0).abs() < 1e-12);
        assert_eq!(acc.accrued(), 0.0);
        assert!(!acc.is_ready());
    }

    #[test]
    fn disabled_accumulator_is_never_ready() {
        let mut acc = ShipmentAccumulator::new(0.0);
        acc.add(Material::uranium(5.0, 0.9));
        assert!(!acc.is_ready());
    }
}
