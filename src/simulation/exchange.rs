// src/simulation/exchange.rs

//! Values passed between the facility and the host's trade clearing.

use serde::Serialize;

use crate::model::material::Material;

/// The facility's demand for feed this period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedRequest {
    pub commodity: String,
    pub quantity: f64,
    /// Assay of the feed recipe being asked for.
    pub recipe_assay: f64,
}

/// Feed material a supplier is willing to deliver.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedOffer {
    pub id: usize,
    pub supplier: String,
    pub material: Material,
}

/// The facility's preference for one feed offer. Negative means "never".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeedPreference {
    pub offer_id: usize,
    pub preference: f64,
}

/// Someone asking for product or tails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRequest {
    pub id: usize,
    pub requester: String,
    pub commodity: String,
    pub quantity: f64,
    /// Requested U-235 fraction. Ignored for tails.
    pub assay: f64,
}

/// What the facility offers against one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bid {
    pub request_id: usize,
    pub requester: String,
    pub commodity: String,
    pub quantity: f64,
    pub assay: f64,
}

/// Every bid for one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BidPortfolio {
    pub bids: Vec<Bid>,
}

impl BidPortfolio {
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }
}

/// A trade accepted by the host's clearing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub request_id: usize,
    pub counterparty: String,
    pub commodity: String,
    pub quantity: f64,
    pub assay: f64,
}

impl From<&Bid> for Trade {
    fn from(bid: &Bid) -> Self {
        Self {
            request_id: bid.request_id,
            counterparty: bid.requester.clone(),
            commodity: bid.commodity.clone(),
            quantity: bid.quantity,
            assay: bid.assay,
        }
    }
}
