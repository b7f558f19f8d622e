use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::process::ExitCode;

use random_enrich::io::{reporting, scenario};
use random_enrich::logging;
use random_enrich::region::interact::{scales, InteractRegion};
use random_enrich::region::registry::FactorRegistry;
use random_enrich::simulation::config::SimulationConfig;
use random_enrich::simulation::engine::EnrichmentSimulation;

fn load_config() -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(SimulationConfig::default()),
    }
}

fn main() -> ExitCode {
    logging::init();
    println!("=== Enrichment Facility Simulation ===");

    // 1. SETUP CONFIGURATION
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Could not read configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 2. GENERATE COUNTERPARTY SCHEDULE
    let schedule = scenario::build_schedule(&config);
    println!(
        "Schedule generated: {} periods, {:.1} kg feed offered per period",
        config.periods, config.feed_offer_qty
    );

    // 3. INITIALIZE SIMULATION
    let mut sim = match EnrichmentSimulation::new(config.clone(), schedule) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Invalid facility setup: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("{}", sim.facility);

    // 4. RUN SIMULATION
    println!("Running simulation for {} periods...", config.periods);
    if let Err(e) = sim.run() {
        eprintln!("Simulation aborted: {}", e);
        return ExitCode::FAILURE;
    }

    // 5. EXPORT RESULTS
    let exports = [
        ("enrichment_events.csv", reporting::write_csv("enrichment_events.csv", sim.facility.history())),
        ("period_summary.csv", reporting::write_csv("period_summary.csv", &sim.summaries)),
    ];
    for (file, result) in exports {
        match result {
            Ok(_) => println!("Success! Data written to ./{}", file),
            Err(e) => eprintln!("Error writing CSV: {}", e),
        }
    }

    // 6. PRINT ANALYSIS
    println!("\n=== Facility Analysis ===");
    println!("Product shipped: {:.2} kg", sim.total_product_shipped());
    println!("SWU used: {:.2} ({:.1}% of capacity)", sim.total_swu_used(), sim.swu_utilisation() * 100.0);
    println!("Feed inventory: {:.2} kg", sim.facility.feed_inventory());
    println!("Tails inventory: {:.2} kg", sim.facility.tails_inventory());
    println!("Rejected feed deliveries: {}", sim.rejected_deliveries);
    println!("HEU produced: {:.2} kg", sim.facility.net_heu());

    // 7. REGION FACTORS
    let weights = BTreeMap::from([("Enrich".to_string(), 1.0), ("Conflict".to_string(), 1.0)]);
    let mut region = InteractRegion::new("region", FactorRegistry::global(), weights, scales::split_linear);
    region.set_relation(sim.facility.name(), "neighbor", -1);
    let defined: Vec<&str> = region
        .defined_factors()
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();
    println!("\nRegion factors in use: {:?}", defined);
    if let Some(conflict) = region.conflict_factor(sim.facility.name()) {
        println!("Conflict factor: {:.2}", conflict);
    }

    println!("\nSimulation Complete.");
    ExitCode::SUCCESS
}
