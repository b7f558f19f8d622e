// Integration tests: one facility driven through whole periods.

use random_enrich::error::{ConfigError, ConstraintKind, EnrichError};
use random_enrich::logging;
use random_enrich::model::facility::EnrichmentFacility;
use random_enrich::model::material::Material;
use random_enrich::simulation::config::FacilityConfig;
use random_enrich::simulation::exchange::{MaterialRequest, Trade};
use random_enrich::simulation::lifecycle::Lifecycle;
use random_enrich::simulation::records::RecordKind;

fn feed_delivery(qty: f64, assay: f64) -> (Trade, Material) {
    (
        Trade {
            request_id: 0,
            counterparty: "mine".to_string(),
            commodity: "natu".to_string(),
            quantity: qty,
            assay,
        },
        Material::uranium(qty, assay),
    )
}

fn product_request(id: usize, qty: f64, assay: f64) -> MaterialRequest {
    MaterialRequest {
        id,
        requester: format!("reactor_{id}"),
        commodity: "enriched_u".to_string(),
        quantity: qty,
        assay,
    }
}

fn accept_all(facility: &mut EnrichmentFacility, requests: &[MaterialRequest]) -> Vec<(Trade, Material)> {
    let bids = facility.build_bids(requests);
    let trades: Vec<Trade> = bids.bids.iter().map(Trade::from).collect();
    facility.fulfill_trades(&trades).unwrap()
}

#[test]
fn feed_then_product_end_to_end() {
    logging::init_test();
    let mut facility = EnrichmentFacility::new(FacilityConfig {
        initial_feed: 0.0,
        max_feed_inventory: 1000.0,
        swu_capacity: 100.0,
        tails_assay: 0.003,
        ..FacilityConfig::default()
    })
    .unwrap();
    facility.on_enter(0).unwrap();

    // Period 0: buy feed
    facility.on_period_start(0);
    let request = facility.feed_request().unwrap();
    assert!((request.quantity - 1000.0).abs() < 1e-9);
    let rejected = facility.accept_feed_trades(vec![feed_delivery(500.0, 0.0071)]);
    assert!(rejected.is_empty());
    facility.on_period_end(0);
    assert!((facility.feed_inventory() - 500.0).abs() < 1e-9);

    // Period 1: sell 10 kg of 5% product
    facility.on_period_start(1);
    let responses = accept_all(&mut facility, &[product_request(0, 10.0, 0.05)]);
    assert_eq!(responses.len(), 1);
    let product = &responses[0].1;
    assert!((product.quantity() - 10.0).abs() < 1e-9);
    assert!((product.assay() - 0.05).abs() < 1e-12);

    // 10 kg at 5% from 0.71% feed with 0.3% tails: 114.63 kg feed, 72.06 SWU
    assert!((facility.feed_inventory() - 385.366).abs() < 1e-2);
    assert!((facility.tails_inventory() - 104.634).abs() < 1e-2);
    assert!((facility.remaining(ConstraintKind::Swu) - 27.937).abs() < 1e-2);
    assert!((facility.tails().combined().assay() - 0.003).abs() < 1e-9);

    // mass is conserved
    let total = facility.feed_inventory() + facility.tails_inventory() + product.quantity();
    assert!((total - 500.0).abs() < 1e-9);

    let swu_rows: Vec<_> = facility
        .history()
        .iter()
        .filter(|r| r.kind == RecordKind::Swu)
        .collect();
    assert_eq!(swu_rows.len(), 1);
    assert_eq!(swu_rows[0].period, 1);
    assert_eq!(swu_rows[0].receiver, "reactor_0");
}

#[test]
fn feed_bought_this_period_is_not_sold_this_period() {
    let mut facility = EnrichmentFacility::new(FacilityConfig {
        max_feed_inventory: 1000.0,
        swu_capacity: 100.0,
        ..FacilityConfig::default()
    })
    .unwrap();
    facility.on_enter(0).unwrap();
    facility.on_period_start(0);
    facility.accept_feed_trades(vec![feed_delivery(500.0, 0.0071)]);
    assert!(facility.build_bids(&[product_request(0, 1.0, 0.05)]).is_empty());
}

#[test]
fn competing_trades_never_oversubscribe_a_period() {
    let mut facility = EnrichmentFacility::new(FacilityConfig {
        initial_feed: 300.0,
        max_feed_inventory: 300.0,
        swu_capacity: 150.0,
        ..FacilityConfig::default()
    })
    .unwrap();
    facility.on_enter(0).unwrap();

    for period in 0..5 {
        facility.on_period_start(period);
        let feed_at_start = facility.feed_inventory();
        let requests: Vec<MaterialRequest> = (0..6)
            .map(|i| product_request(i, 2.0 + i as f64 * 1.5, [0.03, 0.05, 0.2, 0.9][i % 4]))
            .collect();
        accept_all(&mut facility, &requests);

        assert!(facility.used(ConstraintKind::Swu) <= 150.0 + 1e-6);
        assert!(facility.used(ConstraintKind::Feed) <= feed_at_start + 1e-6);
        assert!(facility.feed_inventory() >= -1e-9);

        if let Some(refill) = facility.feed_request() {
            let rejected = facility.accept_feed_trades(vec![feed_delivery(refill.quantity, 0.0071)]);
            assert!(rejected.is_empty());
        }
        facility.on_period_end(period);
    }
}

#[test]
fn repeated_runs_allocate_identically() {
    let run = || {
        let mut facility = EnrichmentFacility::new(FacilityConfig {
            initial_feed: 200.0,
            swu_capacity: 60.0,
            ..FacilityConfig::default()
        })
        .unwrap();
        facility.on_enter(0).unwrap();
        facility.on_period_start(0);
        let requests = vec![
            product_request(0, 3.0, 0.05),
            product_request(1, 3.0, 0.04),
            product_request(2, 6.0, 0.2),
        ];
        facility.build_bids(&requests)
    };
    assert_eq!(run(), run());
}

#[test]
fn inspection_sees_heu_after_it_is_made() {
    let mut facility = EnrichmentFacility::new(FacilityConfig {
        initial_feed: 5000.0,
        inspect_freq: 1,
        n_swipes: 12,
        ..FacilityConfig::default()
    })
    .unwrap();
    facility.on_enter(0).unwrap();

    facility.on_period_start(0);
    facility.on_period_end(0);
    facility.on_period_start(1);
    accept_all(&mut facility, &[product_request(0, 1.0, 0.9)]);
    facility.on_period_end(1);

    let inspections: Vec<(usize, f64)> = facility
        .history()
        .iter()
        .filter(|r| r.kind == RecordKind::Inspection)
        .map(|r| (r.period, r.value))
        .collect();
    assert_eq!(inspections, vec![(0, 0.0), (1, 1.0)]);
}

#[test]
fn bad_configuration_aborts_setup() {
    let err = EnrichmentFacility::new(FacilityConfig {
        tails_assay: 0.01,
        ..FacilityConfig::default()
    })
    .err()
    .unwrap();
    assert!(matches!(
        err,
        EnrichError::Config(ConfigError::TailsAssay { .. })
    ));
}
