// src/io/scenario.rs

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::model::material::Material;
use crate::simulation::config::SimulationConfig;
use crate::simulation::engine::PeriodMarket;
use crate::simulation::exchange::{FeedOffer, MaterialRequest};

/// The same feed offer every period.
pub fn constant_feed_offers(periods: usize, supplier: &str, qty: f64, assay: f64) -> Vec<Vec<FeedOffer>> {
    (0..periods)
        .map(|_| {
            vec![FeedOffer {
                id: 0,
                supplier: supplier.to_string(),
                material: Material::uranium(qty, assay),
            }]
        })
        .collect()
}

/// One product request per period with a normally distributed quantity.
///
/// Negative draws become zero-quantity requests.
pub fn normal_product_requests<R: Rng + ?Sized>(
    periods: usize,
    commodity: &str,
    mean: f64,
    std_dev: f64,
    assay: f64,
    rng: &mut R,
) -> Vec<MaterialRequest> {
    let normal = Normal::new(mean, std_dev.max(0.0)).ok();

    (0..periods)
        .map(|period| {
            let qty = match &normal {
                Some(n) => n.sample(rng).max(0.0),
                None => mean.max(0.0),
            };
            MaterialRequest {
                id: period,
                requester: "reactor".to_string(),
                commodity: commodity.to_string(),
                quantity: qty,
                assay,
            }
        })
        .collect()
}

/// Builds the full counterparty schedule described by the run configuration.
pub fn build_schedule(config: &SimulationConfig) -> Vec<PeriodMarket> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.scenario_seed);
    let fac = &config.facility;

    let offers = constant_feed_offers(config.periods, "mine", config.feed_offer_qty, fac.feed_assay);
    let product = normal_product_requests(
        config.periods,
        &fac.product_commod,
        config.product_demand_mean,
        config.product_demand_std_dev,
        config.product_assay,
        &mut rng,
    );

    offers
        .into_iter()
        .zip(product)
        .enumerate()
        .map(|(period, (offers, product_request))| {
            let mut requests = vec![product_request];
            if config.tails_demand > 0.0 {
                requests.push(MaterialRequest {
                    id: config.periods + period,
                    requester: "deconversion".to_string(),
                    commodity: fac.tails_commod.clone(),
                    quantity: config.tails_demand,
                    assay: 0.0,
                });
            }
            PeriodMarket { offers, requests }
        })
        .collect()
}
