//! Run identity, transition records and run outcomes.
//!
//! `StepRecord` is written once per performed transition. `RunOutcome` is
//! what a completed invocation hands back to the caller.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{memory::MemoryEntry, state::StateType};

/// Unique identifier for one top-level agent invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub uuid::Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An immutable record of one transition performed by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub run_id: RunId,
    /// 1-based index of the state execution that produced this transition.
    pub step: u32,
    pub from: StateType,
    pub to: StateType,
    /// Metadata exposed by the state that was entered (tool name, failure kind, ...).
    pub metadata: Value,
    pub timestamp: DateTime<Utc>,
}

/// The result of a run that reached END.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_id: RunId,
    /// Payload carried by the END state: a tool result or explanatory text.
    pub result: Value,
    /// The memory log exactly as appended during the run.
    pub transcript: Vec<MemoryEntry>,
    /// Every transition performed, in order.
    pub steps: Vec<StepRecord>,
}
