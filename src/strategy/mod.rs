pub mod bidding;
pub mod drift;
pub mod implementations;
pub mod inspection;
pub mod rng;
pub mod shipment;
pub mod traits;
