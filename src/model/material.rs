// src/model/material.rs

use serde::Serialize;

/// Masses below this are treated as empty.
pub const EPS_MASS: f64 = 1e-9;

/// A quantity of material tracked by isotope mass (kg).
///
/// Only U-235 and U-238 are tracked individually; everything else is lumped
/// into `other`, which never takes part in enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Material {
    u235: f64,
    u238: f64,
    other: f64,
}

impl Material {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pure uranium of the given mass and U-235 weight fraction.
    pub fn uranium(quantity: f64, assay: f64) -> Self {
        Self {
            u235: quantity * assay,
            u238: quantity * (1.0 - assay),
            other: 0.0,
        }
    }

    /// Builds a material from its component masses. Negative masses clamp to 0.
    pub fn from_masses(u235: f64, u238: f64, other: f64) -> Self {
        Self {
            u235: u235.max(0.0),
            u238: u238.max(0.0),
            other: other.max(0.0),
        }
    }

    pub fn quantity(&self) -> f64 {
        self.u235 + self.u238 + self.other
    }

    pub fn u235_mass(&self) -> f64 {
        self.u235
    }

    pub fn u238_mass(&self) -> f64 {
        self.u238
    }

    pub fn uranium_mass(&self) -> f64 {
        self.u235 + self.u238
    }

    pub fn is_empty(&self) -> bool {
        self.quantity() <= EPS_MASS
    }

    /// U-235 fraction relative to the two tracked isotopes. Zero if no uranium.
    pub fn assay(&self) -> f64 {
        let u = self.uranium_mass();
        if u <= 0.0 {
            0.0
        } else {
            self.u235 / u
        }
    }

    /// U-235 mass fraction of the whole material, non-tracked content included.
    pub fn fissile_fraction(&self) -> f64 {
        let q = self.quantity();
        if q <= 0.0 {
            0.0
        } else {
            self.u235 / q
        }
    }

    /// Splits into (uranium part, everything else).
    pub fn split_uranium(&self) -> (Material, Material) {
        (
            Material::from_masses(self.u235, self.u238, 0.0),
            Material::from_masses(0.0, 0.0, self.other),
        )
    }

    /// Removes `quantity` kg with this material's composition and returns it.
    /// Takes everything if `quantity` is at least the held mass.
    pub fn extract(&mut self, quantity: f64) -> Material {
        let total = self.quantity();
        if total <= 0.0 || quantity <= 0.0 {
            return Material::empty();
        }
        if quantity >= total {
            return std::mem::take(self);
        }
        let frac = quantity / total;
        let taken = Material {
            u235: self.u235 * frac,
            u238: self.u238 * frac,
            other: self.other * frac,
        };
        self.u235 -= taken.u235;
        self.u238 -= taken.u238;
        self.other -= taken.other;
        taken
    }

    /// Merges `other` into this material.
    pub fn absorb(&mut self, other: Material) {
        self.u235 += other.u235;
        self.u238 += other.u238;
        self.other += other.other;
    }

    /// Whatever is left of `self` after `part` is taken out, isotope by isotope.
    pub fn remainder_after(&self, part: &Material) -> Material {
        Material::from_masses(
            self.u235 - part.u235,
            self.u238 - part.u238,
            self.other - part.other,
        )
    }
}
