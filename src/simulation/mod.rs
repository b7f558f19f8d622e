pub mod config;
pub mod engine;
pub mod exchange;
pub mod lifecycle;
pub mod records;
