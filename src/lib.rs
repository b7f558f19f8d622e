//! Enrichment facility simulation.
//!
//! Models a facility that turns natural uranium feed into enriched product and
//! depleted tails under a per-period SWU budget and a bounded feed inventory.

pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod region;
pub mod simulation;
pub mod strategy;

pub use error::{ConfigError, EnrichError};
pub use model::facility::EnrichmentFacility;
pub use simulation::config::{FacilityConfig, SimulationConfig};
