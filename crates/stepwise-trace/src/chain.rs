//! Hash-chain primitives.
//!
//! Hash input layout (bytes, in order):
//!   1. run_id as its hyphenated UUID string
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the step record

use sha2::{Digest, Sha256};

use stepwise_contracts::{
    error::{AgentError, AgentResult},
    execution::{RunId, StepRecord},
};

use crate::event::TraceEvent;

/// SHA-256 over one event's position, link and record, as lowercase hex.
///
/// # Errors
///
/// `TraceWriteFailed` if the record cannot be serialized.
pub fn hash_event(
    run_id: &RunId,
    sequence: u64,
    record: &StepRecord,
    prev_hash: &str,
) -> AgentResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| AgentError::TraceWriteFailed {
        reason: format!("step record is not serializable: {e}"),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(run_id.to_string().as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Check one run's chain.
///
/// Valid when sequences count up from 0, every `prev_hash` links to the
/// previous event (or `GENESIS_HASH`), every `this_hash` recomputes, and
/// all events belong to the same run. An empty chain is valid.
pub fn verify_chain(events: &[TraceEvent]) -> bool {
    let mut expected_prev = TraceEvent::GENESIS_HASH.to_string();
    let run_id = events.first().map(|e| &e.run_id);

    for (index, event) in events.iter().enumerate() {
        if Some(&event.run_id) != run_id || event.sequence != index as u64 {
            return false;
        }
        if event.prev_hash != expected_prev {
            return false;
        }
        match hash_event(&event.run_id, event.sequence, &event.record, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }
        expected_prev = event.this_hash.clone();
    }

    true
}
