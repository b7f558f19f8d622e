// src/error.rs

use thiserror::Error;

/// Which per-period budget a reservation draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ConstraintKind {
    Swu,
    Feed,
}

/// Problems in the static facility configuration, detected at entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("feed assay {0} must lie strictly between 0 and 1")]
    FeedAssay(f64),

    #[error("tails assay {tails} must lie strictly between 0 and the feed assay {feed}")]
    TailsAssay { tails: f64, feed: f64 },

    #[error("maximum enrichment {0} must lie in [0, 1]")]
    MaxEnrichment(f64),

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("initial feed {initial} exceeds the maximum feed inventory {max}")]
    InitialFeed { initial: f64, max: f64 },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },

    #[error("behavior {behavior} needs a positive interval")]
    BehaviorInterval { behavior: String },

    #[error("commodity name for {0} is empty")]
    EmptyCommodity(&'static str),
}

/// Errors raised by the enrichment engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnrichError {
    #[error("feed assay {feed} must be above tails assay {tails}")]
    InvalidAssayConfiguration { feed: f64, tails: f64 },

    #[error("product assay {product} must lie in ({tails}, 1)")]
    InvalidProductAssay { product: f64, tails: f64 },

    #[error("pushing {requested} kg would overflow the pool ({space} kg free)")]
    CapacityExceeded { requested: f64, space: f64 },

    #[error("{kind:?} reservation of {requested} exceeds the remaining {remaining}")]
    ConstraintExceeded {
        kind: ConstraintKind,
        requested: f64,
        remaining: f64,
    },

    #[error("needed {requested} kg from the {pool} pool but only {available} kg are held")]
    InsufficientInventory {
        pool: &'static str,
        requested: f64,
        available: f64,
    },

    #[error("feed material with assay {assay} is not enrichable above tails assay {tails}")]
    InvalidFeed { assay: f64, tails: f64 },

    #[error("trade for unknown commodity '{0}'")]
    UnknownCommodity(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from exporting simulation output.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
}
