// src/simulation/config.rs

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Natural uranium U-235 weight fraction.
pub const NATURAL_ASSAY: f64 = 0.0071;

/// Stand-in for "no limit" on inventory and SWU.
pub const UNBOUNDED: f64 = 1e299;

/// When bids on the product commodity are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SocialBehavior {
    /// Bid every period.
    #[default]
    None,
    /// Bid when `period % interval == 0`.
    Every,
    /// Bid with probability `1 / interval` each period.
    Random,
}

/// Static per-simulation facility settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    pub name: String,
    pub feed_commod: String,
    /// U-235 weight fraction of the feed recipe.
    pub feed_assay: f64,
    pub product_commod: String,
    pub tails_commod: String,
    pub tails_assay: f64,
    /// Standard deviation of the period-to-period tails assay walk. 0 = constant.
    pub sigma_tails: f64,
    pub initial_feed: f64,
    pub max_feed_inventory: f64,
    pub max_enrich: f64,
    /// Rank feed offers by U-235 content.
    pub order_prefs: bool,
    pub social_behav: SocialBehavior,
    pub behav_interval: u32,
    /// HEU mass that must accrue before HEU bids are released. 0 = off.
    pub heu_ship_qty: f64,
    /// Product assay above which output counts as HEU.
    pub heu_threshold: f64,
    /// Average periods between inspections. 0 = none; negative = draw but don't record.
    pub inspect_freq: i32,
    pub n_swipes: u32,
    pub false_pos: f64,
    pub false_neg: f64,
    /// -1 seeds from the wall clock.
    pub rng_seed: i64,
    /// kg SWU per period.
    pub swu_capacity: f64,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            name: "random_enrich".to_string(),
            feed_commod: "natu".to_string(),
            feed_assay: NATURAL_ASSAY,
            product_commod: "enriched_u".to_string(),
            tails_commod: "tails".to_string(),
            tails_assay: 0.003,
            sigma_tails: 0.0,
            initial_feed: 0.0,
            max_feed_inventory: UNBOUNDED,
            max_enrich: 1.0,
            order_prefs: true,
            social_behav: SocialBehavior::None,
            behav_interval: 0,
            heu_ship_qty: 0.0,
            heu_threshold: 0.2,
            inspect_freq: 0,
            n_swipes: 10,
            false_pos: 0.0,
            false_neg: 0.0,
            rng_seed: 0,
            swu_capacity: UNBOUNDED,
        }
    }
}

impl FacilityConfig {
    /// Entry-time checks. Any failure aborts facility setup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, name) in [
            ("feed_commod", &self.feed_commod),
            ("product_commod", &self.product_commod),
            ("tails_commod", &self.tails_commod),
        ] {
            if name.is_empty() {
                return Err(ConfigError::EmptyCommodity(field));
            }
        }
        if !(self.feed_assay > 0.0 && self.feed_assay < 1.0) {
            return Err(ConfigError::FeedAssay(self.feed_assay));
        }
        if !(self.tails_assay > 0.0 && self.tails_assay < self.feed_assay) {
            return Err(ConfigError::TailsAssay {
                tails: self.tails_assay,
                feed: self.feed_assay,
            });
        }
        if !(0.0..=1.0).contains(&self.max_enrich) {
            return Err(ConfigError::MaxEnrichment(self.max_enrich));
        }
        for (field, value) in [
            ("sigma_tails", self.sigma_tails),
            ("initial_feed", self.initial_feed),
            ("max_feed_inventory", self.max_feed_inventory),
            ("swu_capacity", self.swu_capacity),
            ("heu_ship_qty", self.heu_ship_qty),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.initial_feed > self.max_feed_inventory {
            return Err(ConfigError::InitialFeed {
                initial: self.initial_feed,
                max: self.max_feed_inventory,
            });
        }
        for (field, value) in [
            ("false_pos", self.false_pos),
            ("false_neg", self.false_neg),
            ("heu_threshold", self.heu_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }
        if self.social_behav != SocialBehavior::None && self.behav_interval == 0 {
            return Err(ConfigError::BehaviorInterval {
                behavior: format!("{:?}", self.social_behav),
            });
        }
        Ok(())
    }
}

/// Settings for a scripted run of the facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub periods: usize,
    pub facility: FacilityConfig,
    /// Natural uranium offered by the supplier each period (kg).
    pub feed_offer_qty: f64,
    /// Mean and spread of the product demand per period (kg).
    pub product_demand_mean: f64,
    pub product_demand_std_dev: f64,
    pub product_assay: f64,
    /// Tails requested by the tails buyer each period (kg).
    pub tails_demand: f64,
    /// Seed for generating the counterparty schedules.
    pub scenario_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            periods: 24,
            facility: FacilityConfig {
                max_feed_inventory: 1000.0,
                swu_capacity: 100.0,
                ..FacilityConfig::default()
            },
            feed_offer_qty: 500.0,
            product_demand_mean: 10.0,
            product_demand_std_dev: 2.0,
            product_assay: 0.05,
            tails_demand: 0.0,
            scenario_seed: 7,
        }
    }
}
