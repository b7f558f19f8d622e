// src/region/interact.rs

use std::collections::BTreeMap;

use tracing::debug;

use crate::region::registry::FactorRegistry;
use crate::simulation::records::{HistoryRecord, RecordKind};

/// Maps a net relation in [-1, 1] onto the 0 (alliance) to 10 (conflict) scale.
pub type ConflictScale = fn(f64) -> f64;

/// Candidate conflict scalings. They disagree, and none is assumed; the
/// caller picks one when building a region.
pub mod scales {
    /// Hostile relations map to 5..10, friendly ones to 0..5 rising with
    /// friendliness.
    pub fn split_linear(fractional: f64) -> f64 {
        if fractional <= 0.0 {
            fractional * -5.0 + 5.0
        } else {
            fractional * 5.0
        }
    }

    /// Straight line through (−1, 10), (0, 5), (1, 0).
    pub fn reflected_linear(fractional: f64) -> f64 {
        5.0 - fractional * 5.0
    }

    /// Straight line through (−1, 7.5), (0, 5), (1, 2.5).
    pub fn shifted_half(fractional: f64) -> f64 {
        2.5 * (2.0 - fractional)
    }
}

/// A region that weights a subset of the registered factors and tracks
/// pairwise relations between its member prototypes.
#[derive(Debug, Clone)]
pub struct InteractRegion {
    name: String,
    registry: &'static FactorRegistry,
    weights: BTreeMap<String, f64>,
    relations: BTreeMap<String, BTreeMap<String, i32>>,
    conflict_scale: ConflictScale,
}

impl InteractRegion {
    pub fn new(
        name: impl Into<String>,
        registry: &'static FactorRegistry,
        weights: BTreeMap<String, f64>,
        conflict_scale: ConflictScale,
    ) -> Self {
        Self {
            name: name.into(),
            registry,
            weights,
            relations: BTreeMap::new(),
            conflict_scale,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every registered factor with whether this region gives it a weight,
    /// in registry order.
    pub fn defined_factors(&self) -> Vec<(&'static str, bool)> {
        self.registry
            .names()
            .iter()
            .map(|&factor| (factor, self.weights.contains_key(factor)))
            .collect()
    }

    /// Sets how `prototype` regards `other`: negative hostile, positive friendly.
    pub fn set_relation(&mut self, prototype: &str, other: &str, value: i32) {
        self.relations
            .entry(prototype.to_string())
            .or_default()
            .insert(other.to_string(), value);
    }

    /// Mean relation of `prototype` towards everyone it knows.
    pub fn net_relation(&self, prototype: &str) -> Option<f64> {
        let relations = self.relations.get(prototype)?;
        if relations.is_empty() {
            return None;
        }
        let net: i32 = relations.values().sum();
        Some(net as f64 / relations.len() as f64)
    }

    /// The conflict factor of `prototype` on the 0–10 scale.
    pub fn conflict_factor(&self, prototype: &str) -> Option<f64> {
        let fractional = self.net_relation(prototype)?;
        let scaled = (self.conflict_scale)(fractional);
        debug!(region = %self.name, prototype, fractional, scaled, "conflict factor");
        Some(scaled)
    }

    /// One conflict row per known counterpart of `prototype`, scaled
    /// individually.
    pub fn conflict_records(&self, period: usize, prototype: &str) -> Vec<HistoryRecord> {
        let Some(relations) = self.relations.get(prototype) else {
            return Vec::new();
        };
        relations
            .iter()
            .map(|(other, &value)| {
                HistoryRecord::new(
                    period,
                    RecordKind::Conflict,
                    prototype,
                    other.as_str(),
                    (self.conflict_scale)(value as f64),
                )
            })
            .collect()
    }
}
