// src/model/facility.rs

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::error::{ConstraintKind, EnrichError};
use crate::model::assays::{self, Assays};
use crate::model::material::{Material, EPS_MASS};
use crate::model::pools::{ResourcePool, WithdrawalOrder, EPS_CAPACITY};
use crate::model::tracker::ConstraintTracker;
use crate::simulation::config::{FacilityConfig, SocialBehavior};
use crate::simulation::exchange::{
    Bid, BidPortfolio, FeedOffer, FeedPreference, FeedRequest, MaterialRequest, Trade,
};
use crate::simulation::lifecycle::Lifecycle;
use crate::simulation::records::{HistoryRecord, RecordKind};
use crate::strategy::bidding::{self, ProductTerms};
use crate::strategy::drift::TailsDrift;
use crate::strategy::implementations::policy_from_config;
use crate::strategy::inspection::Inspector;
use crate::strategy::rng::SimRng;
use crate::strategy::shipment::ShipmentAccumulator;
use crate::strategy::traits::ParticipationPolicy;

/// An enrichment facility bound by a per-period SWU budget and a finite
/// feed inventory.
///
/// Feed is withdrawn pro rata across stored lots so every enrichment sees the
/// inventory's mass-weighted assay. Tails leave oldest first.
///
/// Feed delivered during a period waits in `feed_arrivals` and joins the
/// usable stock when the next period starts, so bids sized against the usable
/// stock stay valid whatever arrives before they are fulfilled.
pub struct EnrichmentFacility {
    config: FacilityConfig,

    // Inventories
    feed: ResourcePool,
    feed_arrivals: ResourcePool,
    tails: ResourcePool,
    tracker: ConstraintTracker,

    // Behavior
    policy: Box<dyn ParticipationPolicy>,
    drift: TailsDrift,
    inspector: Inspector,
    shipment: ShipmentAccumulator,
    withheld_heu: Vec<MaterialRequest>,
    rng: SimRng,

    // Per-period state
    period: usize,
    bidding_active: bool,
    pub feed_received: f64,
    pub product_shipped: f64,
    pub tails_shipped: f64,

    heu_present: bool,
    net_heu: f64,

    history: Vec<HistoryRecord>,
}

impl EnrichmentFacility {
    /// Validates the configuration and builds an empty facility. Initial feed
    /// is loaded by [`Lifecycle::on_enter`].
    pub fn new(config: FacilityConfig) -> Result<Self, EnrichError> {
        config.validate()?;
        Ok(Self {
            feed: ResourcePool::bounded("feed", config.max_feed_inventory, WithdrawalOrder::ProRata),
            feed_arrivals: ResourcePool::unbounded("feed arrivals", WithdrawalOrder::OldestFirst),
            tails: ResourcePool::unbounded("tails", WithdrawalOrder::OldestFirst),
            tracker: ConstraintTracker::new(config.swu_capacity),
            policy: policy_from_config(&config),
            drift: TailsDrift::new(config.tails_assay, config.feed_assay, config.sigma_tails),
            inspector: Inspector::new(
                config.inspect_freq,
                config.n_swipes,
                config.false_pos,
                config.false_neg,
            ),
            shipment: ShipmentAccumulator::new(config.heu_ship_qty),
            withheld_heu: Vec::new(),
            rng: SimRng::from_config_seed(config.rng_seed),
            period: 0,
            bidding_active: false,
            feed_received: 0.0,
            product_shipped: 0.0,
            tails_shipped: 0.0,
            heu_present: false,
            net_heu: 0.0,
            history: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &FacilityConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// All feed held, including this period's arrivals.
    pub fn feed_inventory(&self) -> f64 {
        self.feed.total_quantity() + self.feed_arrivals.total_quantity()
    }

    /// Feed that can be enriched this period.
    pub fn usable_feed(&self) -> f64 {
        self.feed.total_quantity()
    }

    /// Room left under the inventory bound once arrivals are counted.
    fn feed_space(&self) -> f64 {
        (self.feed.space() - self.feed_arrivals.total_quantity()).max(0.0)
    }

    pub fn tails_inventory(&self) -> f64 {
        self.tails.total_quantity()
    }

    pub fn tails(&self) -> &ResourcePool {
        &self.tails
    }

    pub fn remaining(&self, kind: ConstraintKind) -> f64 {
        self.tracker.remaining(kind)
    }

    pub fn used(&self, kind: ConstraintKind) -> f64 {
        self.tracker.used(kind)
    }

    pub fn tails_assay(&self) -> f64 {
        self.drift.current()
    }

    /// Assay of the usable feed, or of the feed recipe when there is none.
    pub fn feed_assay(&self) -> f64 {
        if self.feed.is_empty() {
            self.config.feed_assay
        } else {
            self.feed.combined().assay()
        }
    }

    pub fn bidding_active(&self) -> bool {
        self.bidding_active
    }

    pub fn heu_present(&self) -> bool {
        self.heu_present
    }

    pub fn net_heu(&self) -> f64 {
        self.net_heu
    }

    pub fn shipment_accrued(&self) -> f64 {
        self.shipment.accrued()
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    // =====================================================================
    // Demand side
    // =====================================================================

    /// Asks for enough feed to fill the inventory. `None` when full.
    pub fn feed_request(&self) -> Option<FeedRequest> {
        let quantity = self.feed_space();
        (quantity > EPS_CAPACITY).then(|| FeedRequest {
            commodity: self.config.feed_commod.clone(),
            quantity,
            recipe_assay: self.config.feed_assay,
        })
    }

    pub fn rank_feed_offers(&self, offers: &[FeedOffer]) -> Vec<FeedPreference> {
        bidding::rank_feed_offers(offers, self.config.order_prefs)
    }

    pub fn is_valid_feed(&self, material: &Material) -> bool {
        bidding::valid_feed(material, self.tails_assay())
    }

    /// Takes delivered feed into inventory.
    ///
    /// Each delivery stands alone: invalid material or an inventory overflow
    /// rejects that delivery only. Non-uranium content goes straight to tails.
    /// Returns the rejected trades with the reason.
    pub fn accept_feed_trades(
        &mut self,
        deliveries: Vec<(Trade, Material)>,
    ) -> Vec<(Trade, EnrichError)> {
        let mut rejected = Vec::new();
        for (trade, material) in deliveries {
            if let Err(e) = self.accept_feed(&trade, material) {
                if matches!(e, EnrichError::CapacityExceeded { .. }) {
                    error!(counterparty = %trade.counterparty, error = %e, "feed delivery overflows inventory");
                } else {
                    warn!(counterparty = %trade.counterparty, error = %e, "feed delivery discarded");
                }
                rejected.push((trade, e));
            }
        }
        rejected
    }

    fn accept_feed(&mut self, trade: &Trade, material: Material) -> Result<(), EnrichError> {
        if trade.commodity != self.config.feed_commod {
            return Err(EnrichError::UnknownCommodity(trade.commodity.clone()));
        }
        if !self.is_valid_feed(&material) {
            return Err(EnrichError::InvalidFeed {
                assay: material.assay(),
                tails: self.tails_assay(),
            });
        }
        let (uranium, rest) = material.split_uranium();
        let space = self.feed_space();
        if uranium.quantity() > space + EPS_CAPACITY {
            return Err(EnrichError::CapacityExceeded {
                requested: uranium.quantity(),
                space,
            });
        }
        self.feed_arrivals.push(uranium)?;
        if !rest.is_empty() {
            debug!(mass = rest.quantity(), "non-uranium feed content sent to tails");
            self.tails.push(rest)?;
        }
        self.feed_received += uranium.quantity();
        debug!(
            counterparty = %trade.counterparty,
            qty = uranium.quantity(),
            assay = uranium.assay(),
            "feed accepted"
        );
        Ok(())
    }

    // =====================================================================
    // Supply side
    // =====================================================================

    fn product_terms(&self) -> ProductTerms {
        ProductTerms {
            feed_assay: self.feed_assay(),
            tails_assay: self.tails_assay(),
            max_enrich: self.config.max_enrich,
        }
    }

    /// Bids on product and tails requests for this period.
    ///
    /// Product bids are offered only while bidding is active and are sized so
    /// that together they fit the remaining SWU and feed. Competing requests
    /// are served largest first, ties in arrival order. Calling this again in
    /// the same period gives the same portfolio.
    pub fn build_bids(&mut self, requests: &[MaterialRequest]) -> BidPortfolio {
        let product: Vec<&MaterialRequest> = requests
            .iter()
            .filter(|r| r.commodity == self.config.product_commod)
            .collect();
        let tails: Vec<&MaterialRequest> = requests
            .iter()
            .filter(|r| r.commodity == self.config.tails_commod)
            .collect();

        let mut portfolio = BidPortfolio::default();
        self.withheld_heu.clear();

        if self.bidding_active && !product.is_empty() {
            let terms = self.product_terms();
            let (eligible, heu) = self.split_heu(product);
            let mut scratch = self.tracker.clone();
            portfolio
                .bids
                .extend(bidding::size_product_bids(&eligible, &mut scratch, &terms));
            portfolio.bids.extend(self.heu_shipment_bid(&heu));
            self.withheld_heu = heu.into_iter().cloned().collect();
        } else if !product.is_empty() {
            debug!(period = self.period, "bidding inactive, product requests ignored");
        }

        portfolio.bids.extend(bidding::size_tails_bids(
            &tails,
            self.tails.total_quantity(),
            self.tails.combined().assay(),
        ));
        portfolio
    }

    /// HEU goes out of the shipment stock rather than straight from the
    /// cascade when a shipment quantity is set and no social behavior is.
    fn ships_heu_from_stock(&self) -> bool {
        self.shipment.is_enabled() && self.config.social_behav == SocialBehavior::None
    }

    /// Separates the requests served from stock from those enriched on demand.
    fn split_heu<'a>(
        &self,
        requests: Vec<&'a MaterialRequest>,
    ) -> (Vec<&'a MaterialRequest>, Vec<&'a MaterialRequest>) {
        if !self.ships_heu_from_stock() {
            return (requests, Vec::new());
        }
        let threshold = self.config.heu_threshold;
        requests.into_iter().partition(|r| r.assay <= threshold)
    }

    /// One bid carrying the whole stock to the largest HEU request, once a
    /// full shipment has built up.
    fn heu_shipment_bid(&self, heu: &[&MaterialRequest]) -> Option<Bid> {
        let request = bidding::bid_order(heu).into_iter().next()?;
        if !self.shipment.is_ready() {
            debug!(
                accrued = self.shipment.accrued(),
                target = self.config.heu_ship_qty,
                "HEU accruing, bids withheld"
            );
            return None;
        }
        let stock = self.shipment.stock();
        info!(period = self.period, qty = stock.quantity(), "HEU shipment released");
        Some(Bid {
            request_id: request.id,
            requester: request.requester.clone(),
            commodity: request.commodity.clone(),
            quantity: stock.quantity(),
            assay: stock.assay(),
        })
    }

    /// Delivers material for every accepted outgoing trade, in order.
    ///
    /// Any failure here means the bids were sized wrongly and is fatal.
    pub fn fulfill_trades(
        &mut self,
        trades: &[Trade],
    ) -> Result<Vec<(Trade, Material)>, EnrichError> {
        let mut responses = Vec::with_capacity(trades.len());
        for trade in trades {
            let material = if trade.commodity == self.config.product_commod {
                self.enrich(trade)?
            } else if trade.commodity == self.config.tails_commod {
                self.ship_tails(trade)?
            } else {
                return Err(EnrichError::UnknownCommodity(trade.commodity.clone()));
            };
            responses.push((trade.clone(), material));
        }
        Ok(responses)
    }

    fn enrich(&mut self, trade: &Trade) -> Result<Material, EnrichError> {
        let product = if self.ships_heu_from_stock() && trade.assay > self.config.heu_threshold {
            self.ship_heu(trade)?
        } else {
            self.run_cascade(trade.quantity, trade.assay, &trade.counterparty)?
        };
        self.product_shipped += product.quantity();
        Ok(product)
    }

    fn ship_heu(&mut self, trade: &Trade) -> Result<Material, EnrichError> {
        let available = self.shipment.accrued();
        if trade.quantity > available + EPS_CAPACITY {
            return Err(EnrichError::InsufficientInventory {
                pool: "heu",
                requested: trade.quantity,
                available,
            });
        }
        let heu = self.shipment.take(trade.quantity);
        debug!(counterparty = %trade.counterparty, qty = heu.quantity(), "HEU shipped");
        Ok(heu)
    }

    /// Makes `qty` of product at `assay` from usable feed, charging SWU and
    /// feed to this period and sending the remainder to tails.
    fn run_cascade(&mut self, qty: f64, assay: f64, receiver: &str) -> Result<Material, EnrichError> {
        if assay > self.config.max_enrich {
            return Err(EnrichError::InvalidProductAssay {
                product: assay,
                tails: self.tails_assay(),
            });
        }
        let assays = Assays::new(self.feed_assay(), assay, self.tails_assay())?;
        let feed_req = assays::feed_qty(qty, &assays);
        let swu = assays::swu_required(qty, &assays);

        self.tracker.check(ConstraintKind::Swu, swu)?;
        self.tracker.check(ConstraintKind::Feed, feed_req)?;
        let available = self.feed.total_quantity();
        if feed_req > available + EPS_CAPACITY {
            return Err(EnrichError::InsufficientInventory {
                pool: self.feed.name(),
                requested: feed_req,
                available,
            });
        }
        self.tracker.reserve(ConstraintKind::Swu, swu)?;
        self.tracker.reserve(ConstraintKind::Feed, feed_req)?;

        let withdrawn = self.feed.pop(feed_req);
        let product = Material::uranium(qty, assay);
        self.tails.push(withdrawn.remainder_after(&product))?;

        if assay > self.config.heu_threshold {
            if !self.heu_present {
                info!(period = self.period, assay, "HEU produced");
            }
            self.heu_present = true;
            self.net_heu += qty;
        }

        debug!(receiver, qty, assay, feed = feed_req, swu, "enriched");
        self.record(RecordKind::NaturalUranium, receiver, feed_req);
        self.record(RecordKind::Swu, receiver, swu);
        Ok(product)
    }

    /// Enriches this period's withheld HEU requests into the shipment stock
    /// with whatever SWU and feed the period has left.
    fn accrue_heu(&mut self) {
        let withheld = std::mem::take(&mut self.withheld_heu);
        if withheld.is_empty() {
            return;
        }
        let terms = self.product_terms();
        let requests: Vec<&MaterialRequest> = withheld.iter().collect();
        for request in bidding::bid_order(&requests) {
            let Some((qty, _)) = bidding::max_product_qty(request, &self.tracker, &terms) else {
                continue;
            };
            match self.run_cascade(qty, request.assay, &request.requester) {
                Ok(heu) => self.shipment.add(heu),
                Err(e) => warn!(request = request.id, error = %e, "HEU accrual skipped"),
            }
        }
        debug!(
            period = self.period,
            accrued = self.shipment.accrued(),
            target = self.config.heu_ship_qty,
            "HEU stock"
        );
    }

    fn ship_tails(&mut self, trade: &Trade) -> Result<Material, EnrichError> {
        let available = self.tails.total_quantity();
        if trade.quantity > available + EPS_CAPACITY {
            return Err(EnrichError::InsufficientInventory {
                pool: self.tails.name(),
                requested: trade.quantity,
                available,
            });
        }
        let material = self.tails.pop(trade.quantity);
        self.tails_shipped += material.quantity();
        Ok(material)
    }

    fn record(&mut self, kind: RecordKind, receiver: &str, value: f64) {
        self.history.push(HistoryRecord::new(
            self.period,
            kind,
            self.config.name.clone(),
            receiver,
            value,
        ));
    }
}

impl Lifecycle for EnrichmentFacility {
    fn on_enter(&mut self, period: usize) -> Result<(), EnrichError> {
        self.period = period;
        if self.config.initial_feed > EPS_MASS {
            self.feed
                .push(Material::uranium(self.config.initial_feed, self.config.feed_assay))?;
        }
        info!(
            facility = %self.config.name,
            initial_feed = self.config.initial_feed,
            swu_capacity = self.config.swu_capacity,
            "entered simulation"
        );
        Ok(())
    }

    fn on_period_start(&mut self, period: usize) {
        self.period = period;
        self.feed.transfer_all(&mut self.feed_arrivals);
        self.withheld_heu.clear();
        self.tracker.reset_period(self.feed.total_quantity());
        self.feed_received = 0.0;
        self.product_shipped = 0.0;
        self.tails_shipped = 0.0;
        self.bidding_active = self.policy.is_active(period, &mut self.rng);
        debug!(period, bidding = self.bidding_active, "period start");
    }

    fn on_period_end(&mut self, period: usize) {
        self.accrue_heu();
        if let Some(fraction) = self.inspector.maybe_inspect(self.heu_present, &mut self.rng) {
            info!(period, fraction, "inspection");
            self.record(RecordKind::Inspection, "inspector", fraction);
        }
        let next_tails = self.drift.step(&mut self.rng);
        let name = self.config.name.clone();
        self.record(RecordKind::TailsAssay, &name, next_tails);
    }
}

impl fmt::Display for EnrichmentFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} enriches {} to {} (max {:.1}%) with tails {} at {:.4}; \
             SWU {:.2}/period, feed {:.2}/{:.2} kg",
            self.config.name,
            self.config.feed_commod,
            self.config.product_commod,
            self.config.max_enrich * 100.0,
            self.config.tails_commod,
            self.tails_assay(),
            self.config.swu_capacity,
            self.feed_inventory(),
            self.config.max_feed_inventory,
        )
    }
}
