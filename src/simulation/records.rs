// src/simulation/records.rs

use serde::Serialize;

/// What a history row measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    /// Natural uranium consumed by one enrichment (kg).
    NaturalUranium,
    /// Separative work consumed by one enrichment (kg SWU).
    Swu,
    /// Fraction of positive inspection swipes.
    Inspection,
    /// Tails assay in effect for the coming period.
    TailsAssay,
    /// Scaled conflict between two parties.
    Conflict,
}

/// One append-only history row: a value exchanged between two parties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub period: usize,
    pub kind: RecordKind,
    pub sender: String,
    pub receiver: String,
    pub value: f64,
}

impl HistoryRecord {
    pub fn new(
        period: usize,
        kind: RecordKind,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            period,
            kind,
            sender: sender.into(),
            receiver: receiver.into(),
            value,
        }
    }
}
