//! Trace event and log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stepwise_contracts::execution::{RunId, StepRecord};

/// One transition in a run's hash chain.
///
/// Changing any field, including the embedded record, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Position in the run's chain, starting at 0.
    pub sequence: u64,
    pub run_id: RunId,
    pub record: StepRecord,
    /// Hash of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,
    pub this_hash: String,
}

impl TraceEvent {
    /// `prev_hash` of the first event of every run.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// Snapshot of one run's chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceLog {
    pub run_id: RunId,
    pub events: Vec<TraceEvent>,
    /// True once the run reached END and the chain was sealed.
    pub finalized: bool,
    pub exported_at: DateTime<Utc>,
    /// `this_hash` of the last event; empty when there are no events.
    pub terminal_hash: String,
}

impl TraceLog {
    /// State labels visited, starting with the first `from`.
    pub fn path(&self) -> Vec<String> {
        let mut path: Vec<String> = self
            .events
            .first()
            .map(|e| vec![e.record.from.to_string()])
            .unwrap_or_default();
        path.extend(self.events.iter().map(|e| e.record.to.to_string()));
        path
    }
}
