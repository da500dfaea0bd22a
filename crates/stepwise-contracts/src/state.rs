//! State-type labels.
//!
//! A `StateType` is the vocabulary of the transition table. Every concrete
//! state declares exactly one label as its identity. Labels are plain
//! strings so tables can be written in TOML and extended with new work
//! categories without touching this crate.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque, comparable label identifying a state's category.
///
/// The reserved labels are `START`, `ERROR` and `END`. Every other label
/// names a working category (e.g. `STEP`, `THINK`, `ACT`, `OBSERVE`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateType(Cow<'static, str>);

impl StateType {
    /// Sole initial state of every run.
    pub const START: StateType = StateType(Cow::Borrowed("START"));
    /// Transient state carrying a recoverable failure back to the model.
    pub const ERROR: StateType = StateType(Cow::Borrowed("ERROR"));
    /// Sole terminal state.
    pub const END: StateType = StateType(Cow::Borrowed("END"));
    /// Working state of the tool-calling workflow.
    pub const STEP: StateType = StateType(Cow::Borrowed("STEP"));
    /// ReAct reasoning state.
    pub const THINK: StateType = StateType(Cow::Borrowed("THINK"));
    /// ReAct tool-dispatch state.
    pub const ACT: StateType = StateType(Cow::Borrowed("ACT"));
    /// ReAct observation state.
    pub const OBSERVE: StateType = StateType(Cow::Borrowed("OBSERVE"));

    /// Build a custom label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(Cow::Owned(label.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for any label other than `START`, `ERROR` and `END`.
    pub fn is_working(&self) -> bool {
        *self != Self::START && *self != Self::ERROR && *self != Self::END
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateType {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}
