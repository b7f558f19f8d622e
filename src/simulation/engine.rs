// src/simulation/engine.rs

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ConstraintKind, EnrichError};
use crate::model::facility::EnrichmentFacility;
use crate::model::material::Material;
use crate::simulation::config::SimulationConfig;
use crate::simulation::exchange::{FeedOffer, MaterialRequest, Trade};
use crate::simulation::lifecycle::Lifecycle;

/// What the scripted counterparties bring to one period.
#[derive(Debug, Clone, Default)]
pub struct PeriodMarket {
    pub offers: Vec<FeedOffer>,
    pub requests: Vec<MaterialRequest>,
}

// One row per period, written to CSV after the run
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub period: usize,
    pub bidding_active: bool,
    pub feed_inventory: f64,
    pub tails_inventory: f64,
    pub feed_received: f64,
    pub product_shipped: f64,
    pub tails_shipped: f64,
    pub swu_used: f64,
    pub tails_assay: f64,
    pub heu_present: bool,
    pub heu_stock: f64,
}

/// Drives one facility period by period against scripted counterparties.
///
/// The counterparties accept every bid in full and deliver feed offers in
/// the facility's preference order until its request is covered.
pub struct EnrichmentSimulation {
    config: SimulationConfig,
    pub facility: EnrichmentFacility,
    pub schedule: Vec<PeriodMarket>,
    pub current_period: usize,
    pub summaries: Vec<PeriodSummary>,
    pub rejected_deliveries: usize,
}

impl EnrichmentSimulation {
    pub fn new(config: SimulationConfig, schedule: Vec<PeriodMarket>) -> Result<Self, EnrichError> {
        let mut facility = EnrichmentFacility::new(config.facility.clone())?;
        facility.on_enter(0)?;
        Ok(Self {
            config,
            facility,
            schedule,
            current_period: 0,
            summaries: Vec::new(),
            rejected_deliveries: 0,
        })
    }

    pub fn run(&mut self) -> Result<(), EnrichError> {
        while self.current_period < self.config.periods {
            self.step()?;
        }
        info!(
            periods = self.config.periods,
            product = self.total_product_shipped(),
            swu = self.total_swu_used(),
            "run complete"
        );
        Ok(())
    }

    pub fn step(&mut self) -> Result<(), EnrichError> {
        let period = self.current_period;
        let market = self.schedule.get(period).cloned().unwrap_or_default();

        // =================================================================
        // PHASE 1: period start (budgets reset, participation decided)
        // =================================================================
        self.facility.on_period_start(period);

        // =================================================================
        // PHASE 2: trading
        // Feed accepted here is staged by the facility and first usable
        // next period, whatever the order of delivery and fulfilment.
        // =================================================================
        let portfolio = self.facility.build_bids(&market.requests);

        let deliveries = self.deliver_feed(&market.offers);
        let rejected = self.facility.accept_feed_trades(deliveries);
        if !rejected.is_empty() {
            warn!(period, count = rejected.len(), "feed deliveries rejected");
        }
        self.rejected_deliveries += rejected.len();

        let trades: Vec<Trade> = portfolio.bids.iter().map(Trade::from).collect();
        self.facility.fulfill_trades(&trades)?;

        // =================================================================
        // PHASE 3: period end (inspection, tails drift), record & advance
        // =================================================================
        self.facility.on_period_end(period);
        self.record_summary(period);
        if period % 5 == 0 {
            info!(
                period,
                feed = self.facility.feed_inventory(),
                tails = self.facility.tails_inventory(),
                shipped = self.facility.product_shipped,
                "progress"
            );
        }
        self.current_period += 1;
        Ok(())
    }

    /// Hands over offered feed, best preference first, until the facility's
    /// request is covered. Excluded offers are skipped.
    fn deliver_feed(&self, offers: &[FeedOffer]) -> Vec<(Trade, Material)> {
        let Some(request) = self.facility.feed_request() else {
            return Vec::new();
        };
        let mut prefs = self.facility.rank_feed_offers(offers);
        // stable: equal preferences keep offer order
        prefs.sort_by(|a, b| b.preference.total_cmp(&a.preference));

        let mut still_wanted = request.quantity;
        let mut deliveries = Vec::new();
        for pref in prefs {
            if still_wanted <= 0.0 || pref.preference < 0.0 {
                break;
            }
            let Some(offer) = offers.iter().find(|o| o.id == pref.offer_id) else {
                continue;
            };
            let mut material = offer.material;
            let delivered = material.extract(still_wanted);
            still_wanted -= delivered.quantity();
            deliveries.push((
                Trade {
                    request_id: offer.id,
                    counterparty: offer.supplier.clone(),
                    commodity: request.commodity.clone(),
                    quantity: delivered.quantity(),
                    assay: delivered.assay(),
                },
                delivered,
            ));
        }
        deliveries
    }

    fn record_summary(&mut self, period: usize) {
        let f = &self.facility;
        self.summaries.push(PeriodSummary {
            period,
            bidding_active: f.bidding_active(),
            feed_inventory: f.feed_inventory(),
            tails_inventory: f.tails_inventory(),
            feed_received: f.feed_received,
            product_shipped: f.product_shipped,
            tails_shipped: f.tails_shipped,
            swu_used: f.used(ConstraintKind::Swu),
            tails_assay: f.tails_assay(),
            heu_present: f.heu_present(),
            heu_stock: f.shipment_accrued(),
        });
    }

    pub fn total_product_shipped(&self) -> f64 {
        self.summaries.iter().map(|s| s.product_shipped).sum()
    }

    pub fn total_swu_used(&self) -> f64 {
        self.summaries.iter().map(|s| s.swu_used).sum()
    }

    /// Mean SWU utilisation across all recorded periods, in [0, 1].
    pub fn swu_utilisation(&self) -> f64 {
        if self.summaries.is_empty() || self.config.facility.swu_capacity <= 0.0 {
            return 0.0;
        }
        self.total_swu_used() / (self.config.facility.swu_capacity * self.summaries.len() as f64)
    }
}
