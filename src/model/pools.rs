// src/model/pools.rs

use std::collections::VecDeque;

use crate::error::EnrichError;
use crate::model::material::{Material, EPS_MASS};

/// Slack allowed when checking a push against capacity (kg).
pub const EPS_CAPACITY: f64 = 1e-6;

/// How a withdrawal picks material from the stored lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalOrder {
    /// Drain the oldest lot first, splitting the last one touched.
    OldestFirst,
    /// Take the same fraction from every lot, so the withdrawn material always
    /// has the pool's mass-weighted composition.
    ProRata,
}

/// An ordered store of material lots with an optional mass bound.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    name: &'static str,
    lots: VecDeque<Material>,
    capacity: f64,
    order: WithdrawalOrder,
}

impl ResourcePool {
    pub fn bounded(name: &'static str, capacity: f64, order: WithdrawalOrder) -> Self {
        Self {
            name,
            lots: VecDeque::new(),
            capacity,
            order,
        }
    }

    pub fn unbounded(name: &'static str, order: WithdrawalOrder) -> Self {
        Self::bounded(name, f64::INFINITY, order)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn total_quantity(&self) -> f64 {
        self.lots.iter().map(Material::quantity).sum()
    }

    /// Free space left before the bound is hit.
    pub fn space(&self) -> f64 {
        (self.capacity - self.total_quantity()).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.total_quantity() <= EPS_MASS
    }

    pub fn lot_count(&self) -> usize {
        self.lots.len()
    }

    /// Everything held, merged into one material. The pool is left untouched.
    pub fn combined(&self) -> Material {
        let mut all = Material::empty();
        for lot in &self.lots {
            all.absorb(*lot);
        }
        all
    }

    /// Stores a new lot at the back of the queue.
    pub fn push(&mut self, material: Material) -> Result<(), EnrichError> {
        let qty = material.quantity();
        if qty <= EPS_MASS {
            return Ok(());
        }
        let space = self.space();
        if qty > space + EPS_CAPACITY {
            return Err(EnrichError::CapacityExceeded {
                requested: qty,
                space,
            });
        }
        self.lots.push_back(material);
        Ok(())
    }

    /// Moves every lot of `from` to the back of this pool, oldest first.
    ///
    /// The bound is not checked here; lots are admitted against it on arrival.
    pub fn transfer_all(&mut self, from: &mut ResourcePool) {
        self.lots.append(&mut from.lots);
    }

    /// Removes up to `max_quantity` kg and returns it as one material.
    ///
    /// A depleted pool gives back less than asked; callers compare the
    /// returned quantity against what they needed.
    pub fn pop(&mut self, max_quantity: f64) -> Material {
        if max_quantity <= 0.0 {
            return Material::empty();
        }
        let withdrawn = match self.order {
            WithdrawalOrder::OldestFirst => self.pop_oldest_first(max_quantity),
            WithdrawalOrder::ProRata => self.pop_pro_rata(max_quantity),
        };
        self.lots.retain(|lot| !lot.is_empty());
        withdrawn
    }

    fn pop_oldest_first(&mut self, max_quantity: f64) -> Material {
        let mut out = Material::empty();
        let mut still_needed = max_quantity;
        while still_needed > EPS_MASS {
            let Some(front) = self.lots.front_mut() else {
                break;
            };
            let taken = front.extract(still_needed);
            still_needed -= taken.quantity();
            out.absorb(taken);
            if front.is_empty() {
                self.lots.pop_front();
            }
        }
        out
    }

    fn pop_pro_rata(&mut self, max_quantity: f64) -> Material {
        let total = self.total_quantity();
        if total <= 0.0 {
            return Material::empty();
        }
        if max_quantity >= total {
            let all = self.combined();
            self.lots.clear();
            return all;
        }
        let frac = max_quantity / total;
        let mut out = Material::empty();
        for lot in self.lots.iter_mut() {
            let share = lot.quantity() * frac;
            out.absorb(lot.extract(share));
        }
        out
    }
}
