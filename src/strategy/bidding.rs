// src/strategy/bidding.rs

//! Sizing of feed requests, product/tails bids and feed preferences.

use tracing::debug;

use crate::error::ConstraintKind;
use crate::model::assays::{self, Assays};
use crate::model::material::{Material, EPS_MASS};
use crate::model::tracker::ConstraintTracker;
use crate::simulation::exchange::{Bid, FeedOffer, FeedPreference, MaterialRequest};

/// Preference handed to offers that must never be accepted.
pub const EXCLUDED_PREFERENCE: f64 = -1.0;

/// Preference used for every offer when ranking is switched off.
pub const DEFAULT_PREFERENCE: f64 = 1.0;

/// Facility parameters the product sizing depends on.
#[derive(Debug, Clone, Copy)]
pub struct ProductTerms {
    pub feed_assay: f64,
    pub tails_assay: f64,
    pub max_enrich: f64,
}

/// A feed material is acceptable when it holds both tracked isotopes and its
/// U-235 fraction sits above the tails assay, so enrichment leaves tails.
pub fn valid_feed(material: &Material, tails_assay: f64) -> bool {
    material.u235_mass() > 0.0 && material.u238_mass() > 0.0 && material.assay() > tails_assay
}

/// Ranks feed offers by U-235 content.
///
/// The richest offer gets the highest preference (`n` for `n` offers, down to
/// 1). Equal content keeps offer order, so the earlier offer ranks higher.
/// Offers without U-235 get [`EXCLUDED_PREFERENCE`]. With ranking off every
/// offer gets [`DEFAULT_PREFERENCE`].
pub fn rank_feed_offers(offers: &[FeedOffer], order_prefs: bool) -> Vec<FeedPreference> {
    if !order_prefs {
        return offers
            .iter()
            .map(|o| FeedPreference {
                offer_id: o.id,
                preference: DEFAULT_PREFERENCE,
            })
            .collect();
    }

    let mut ranked: Vec<&FeedOffer> = offers.iter().collect();
    // stable sort: ties stay in offer order
    ranked.sort_by(|a, b| {
        b.material
            .fissile_fraction()
            .total_cmp(&a.material.fissile_fraction())
    });

    let n = ranked.len();
    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, offer)| {
            let preference = if offer.material.u235_mass() <= 0.0 {
                EXCLUDED_PREFERENCE
            } else {
                (n - rank) as f64
            };
            FeedPreference {
                offer_id: offer.id,
                preference,
            }
        })
        .collect()
}

/// Order in which competing requests draw on shared capacity: largest
/// quantity first, ties in arrival order.
pub fn bid_order<'a>(requests: &[&'a MaterialRequest]) -> Vec<&'a MaterialRequest> {
    let mut ordered = requests.to_vec();
    ordered.sort_by(|a, b| b.quantity.total_cmp(&a.quantity));
    ordered
}

/// Largest product quantity that fits the request, the remaining feed and
/// the remaining SWU. `None` if the request cannot be served at all.
pub fn max_product_qty(
    request: &MaterialRequest,
    tracker: &ConstraintTracker,
    terms: &ProductTerms,
) -> Option<(f64, Assays)> {
    if request.assay > terms.max_enrich {
        debug!(
            request = request.id,
            assay = request.assay,
            max_enrich = terms.max_enrich,
            "request above maximum enrichment, not bidding"
        );
        return None;
    }
    if terms.feed_assay <= terms.tails_assay {
        debug!(
            feed = terms.feed_assay,
            tails = terms.tails_assay,
            "feed is not richer than tails, not bidding"
        );
        return None;
    }
    let assays = match Assays::new(terms.feed_assay, request.assay, terms.tails_assay) {
        Ok(a) => a,
        Err(e) => {
            debug!(request = request.id, error = %e, "request skipped");
            return None;
        }
    };

    let feed_limited =
        assays::product_qty_from_feed(tracker.remaining(ConstraintKind::Feed), &assays);
    let swu_limited = assays::product_qty_from_swu(tracker.remaining(ConstraintKind::Swu), &assays);
    let qty = request.quantity.min(feed_limited).min(swu_limited);

    debug!(
        request = request.id,
        requested = request.quantity,
        feed_limited,
        swu_limited,
        qty,
        "sized product bid"
    );
    (qty > EPS_MASS).then_some((qty, assays))
}

/// Sizes bids on product requests against a scratch copy of the tracker, so
/// the bids of one period together never over-subscribe SWU or feed.
pub fn size_product_bids(
    requests: &[&MaterialRequest],
    scratch: &mut ConstraintTracker,
    terms: &ProductTerms,
) -> Vec<Bid> {
    let mut bids = Vec::new();
    for request in bid_order(requests) {
        let Some((qty, assays)) = max_product_qty(request, scratch, terms) else {
            continue;
        };
        let swu = assays::swu_required(qty, &assays);
        let feed = assays::feed_qty(qty, &assays);
        // sized against what remains, so these cannot fail beyond rounding
        if scratch.reserve(ConstraintKind::Swu, swu).is_err()
            || scratch.reserve(ConstraintKind::Feed, feed).is_err()
        {
            continue;
        }
        bids.push(Bid {
            request_id: request.id,
            requester: request.requester.clone(),
            commodity: request.commodity.clone(),
            quantity: qty,
            assay: request.assay,
        });
    }
    bids
}

/// Sizes bids on tails requests. Only the tails inventory limits them.
pub fn size_tails_bids(requests: &[&MaterialRequest], tails_available: f64, tails_assay: f64) -> Vec<Bid> {
    let mut left = tails_available;
    let mut bids = Vec::new();
    for request in bid_order(requests) {
        let qty = request.quantity.min(left);
        if qty <= EPS_MASS {
            continue;
        }
        left -= qty;
        bids.push(Bid {
            request_id: request.id,
            requester: request.requester.clone(),
            commodity: request.commodity.clone(),
            quantity: qty,
            assay: tails_assay,
        });
    }
    bids
}
