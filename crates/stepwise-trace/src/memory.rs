//! In-memory `TraceWriter`.
//!
//! One writer may be attached to an agent that serves many runs; every run
//! gets its own chain, starting from the genesis hash. Finalizing a run
//! seals its chain against further writes.
//!
//! Chains are kept until removed with `take_run` or `clear`; a long-lived
//! writer should drain runs once they are exported.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use stepwise_contracts::{
    error::{AgentError, AgentResult},
    execution::{RunId, StepRecord},
};
use stepwise_core::traits::TraceWriter;

use crate::{
    chain::{hash_event, verify_chain},
    event::{TraceEvent, TraceLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct RunChain {
    pub(crate) events: Vec<TraceEvent>,
    pub(crate) finalized: bool,
}

impl RunChain {
    fn last_hash(&self) -> &str {
        self.events
            .last()
            .map_or(TraceEvent::GENESIS_HASH, |e| e.this_hash.as_str())
    }
}

#[derive(Default)]
pub(crate) struct TraceState {
    pub(crate) runs: HashMap<RunId, RunChain>,
    /// Run ids in order of first write.
    pub(crate) order: Vec<RunId>,
}

// ── Public writer ─────────────────────────────────────────────────────────────

/// Append-only, hash-chained trace held in memory.
///
/// Cloning shares the underlying state, so a clone kept by the caller sees
/// everything the agent writes.
#[derive(Clone, Default)]
pub struct InMemoryTraceWriter {
    pub(crate) state: Arc<Mutex<TraceState>>,
}

impl InMemoryTraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs seen so far, in order of first write.
    pub fn runs(&self) -> Vec<RunId> {
        self.lock().map(|s| s.order.clone()).unwrap_or_default()
    }

    /// Snapshot of one run's chain, or `None` if nothing was written for it.
    pub fn export_log(&self, run_id: &RunId) -> Option<TraceLog> {
        let state = self.lock().ok()?;
        state.runs.get(run_id).map(|chain| snapshot(run_id, chain))
    }

    /// Remove one run's chain and return it.
    ///
    /// A later write for the same run starts a new chain from genesis.
    pub fn take_run(&self, run_id: &RunId) -> Option<TraceLog> {
        let mut state = self.lock().ok()?;
        let chain = state.runs.remove(run_id)?;
        state.order.retain(|id| id != run_id);
        debug!(run_id = %run_id, event_count = chain.events.len(), "trace run drained");
        Some(snapshot(run_id, &chain))
    }

    /// Drop every chain; returns how many runs were removed.
    pub fn clear(&self) -> usize {
        match self.lock() {
            Ok(mut state) => {
                let removed = state.runs.len();
                state.runs.clear();
                state.order.clear();
                removed
            }
            Err(_) => 0,
        }
    }

    /// Pretty JSON of one run's log.
    pub fn export_json(&self, run_id: &RunId) -> AgentResult<String> {
        let log = self.export_log(run_id).ok_or_else(|| AgentError::TraceWriteFailed {
            reason: format!("no trace recorded for run {run_id}"),
        })?;
        serde_json::to_string_pretty(&log).map_err(|e| AgentError::TraceWriteFailed {
            reason: format!("failed to serialize trace: {e}"),
        })
    }

    /// Verify every run's chain.
    pub fn verify_integrity(&self) -> bool {
        match self.lock() {
            Ok(state) => state.runs.values().all(|c| verify_chain(&c.events)),
            Err(_) => false,
        }
    }

    pub fn verify_run(&self, run_id: &RunId) -> bool {
        match self.lock() {
            Ok(state) => state
                .runs
                .get(run_id)
                .is_some_and(|c| verify_chain(&c.events)),
            Err(_) => false,
        }
    }

    fn lock(&self) -> AgentResult<MutexGuard<'_, TraceState>> {
        self.state.lock().map_err(|e| AgentError::TraceWriteFailed {
            reason: format!("trace state lock poisoned: {e}"),
        })
    }
}

fn snapshot(run_id: &RunId, chain: &RunChain) -> TraceLog {
    TraceLog {
        run_id: run_id.clone(),
        events: chain.events.clone(),
        finalized: chain.finalized,
        exported_at: Utc::now(),
        terminal_hash: chain
            .events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default(),
    }
}

// ── TraceWriter impl ──────────────────────────────────────────────────────────

impl TraceWriter for InMemoryTraceWriter {
    /// Append `record` to its run's chain.
    ///
    /// Fails with `TraceWriteFailed` if the run was already finalized.
    fn write(&self, record: &StepRecord) -> AgentResult<()> {
        let mut state = self.lock()?;
        let run_id = record.run_id.clone();

        if !state.runs.contains_key(&run_id) {
            state.order.push(run_id.clone());
        }
        let chain = state.runs.entry(run_id.clone()).or_default();
        if chain.finalized {
            warn!(run_id = %run_id, step = record.step, "write to finalized trace rejected");
            return Err(AgentError::TraceWriteFailed {
                reason: format!("trace for run {run_id} is already finalized"),
            });
        }

        let sequence = chain.events.len() as u64;
        let prev_hash = chain.last_hash().to_string();
        let this_hash = hash_event(&run_id, sequence, record, &prev_hash)?;

        debug!(
            run_id = %run_id,
            sequence,
            from = %record.from,
            to = %record.to,
            "trace event appended"
        );
        chain.events.push(TraceEvent {
            sequence,
            run_id,
            record: record.clone(),
            prev_hash,
            this_hash,
        });
        Ok(())
    }

    fn finalize(&self, run_id: &RunId) -> AgentResult<()> {
        let mut state = self.lock()?;
        let chain = state
            .runs
            .get_mut(run_id)
            .ok_or_else(|| AgentError::TraceWriteFailed {
                reason: format!("cannot finalize unknown run {run_id}"),
            })?;
        chain.finalized = true;

        info!(
            run_id = %run_id,
            event_count = chain.events.len(),
            terminal_hash = %chain.last_hash(),
            "trace finalized"
        );
        Ok(())
    }
}
