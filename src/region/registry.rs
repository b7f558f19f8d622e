// src/region/registry.rs

use std::sync::OnceLock;

/// Factors a region may weight, in the order they are reported.
pub const MASTER_FACTORS: [&str; 8] = [
    "Enrich",
    "Auth",
    "Conflict",
    "Mil_Sp",
    "Reactors",
    "Mil_Iso",
    "Sci_Net",
    "U_Reserve",
];

static GLOBAL: OnceLock<FactorRegistry> = OnceLock::new();

/// Read-only list of recognised factor names, shared by every region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorRegistry {
    names: Vec<&'static str>,
}

impl FactorRegistry {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            names: names.to_vec(),
        }
    }

    /// The process-wide registry, built on first use from [`MASTER_FACTORS`].
    pub fn global() -> &'static FactorRegistry {
        GLOBAL.get_or_init(|| FactorRegistry::new(&MASTER_FACTORS))
    }

    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| *n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_registry_is_built_once() {
        let a = FactorRegistry::global();
        let b = FactorRegistry::global();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.names().len(), 8);
        assert!(a.contains("Conflict"));
        assert!(!a.contains("Weather"));
    }
}
