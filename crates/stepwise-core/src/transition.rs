//! The transition table: which state types may follow which.
//!
//! The table is the single source of truth for legal moves. States ask the
//! table before they return a successor; nothing else enforces ordering.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use stepwise_contracts::{
    error::{AgentError, AgentResult},
    state::StateType,
};

/// Mapping from a state type to the set of state types allowed to follow it.
///
/// Serialized as a plain map of label → list of labels, so it can be read
/// from a `[transitions]` TOML table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionTable {
    edges: BTreeMap<StateType, BTreeSet<StateType>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`TransitionTable::insert`].
    pub fn allow<I>(mut self, from: StateType, to: I) -> Self
    where
        I: IntoIterator<Item = StateType>,
    {
        self.insert(from, to);
        self
    }

    /// Declare `from` as a key (if absent) and add `to` to its successors.
    pub fn insert<I>(&mut self, from: StateType, to: I)
    where
        I: IntoIterator<Item = StateType>,
    {
        self.edges.entry(from).or_default().extend(to);
    }

    /// Successors of `from`, or `None` if `from` is not a key.
    pub fn successors(&self, from: &StateType) -> Option<&BTreeSet<StateType>> {
        self.edges.get(from)
    }

    pub fn permits(&self, from: &StateType, to: &StateType) -> bool {
        self.edges.get(from).is_some_and(|s| s.contains(to))
    }

    /// Fail with `InvalidTransition` unless `from -> to` is declared.
    ///
    /// The error lists the declared successors of `from` in sorted order.
    pub fn validate(&self, from: &StateType, to: &StateType) -> AgentResult<()> {
        if self.permits(from, to) {
            return Ok(());
        }
        let allowed: Vec<StateType> = self
            .edges
            .get(from)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default();
        warn!(from = %from, to = %to, "transition rejected by table");
        Err(AgentError::InvalidTransition {
            from: from.clone(),
            to: to.clone(),
            allowed,
        })
    }

    /// Structural checks run once when an agent is built.
    ///
    /// START and END must be keys, END must have no successors and every
    /// successor must itself be a key.
    pub fn check_well_formed(&self) -> AgentResult<()> {
        for required in [&StateType::START, &StateType::END] {
            if !self.edges.contains_key(required) {
                return Err(config_error(format!(
                    "transition table has no entry for {required}"
                )));
            }
        }
        if self.edges.get(&StateType::END).is_some_and(|s| !s.is_empty()) {
            return Err(config_error("END must not have successors".to_string()));
        }
        for (from, successors) in &self.edges {
            if let Some(missing) = successors.iter().find(|to| !self.edges.contains_key(*to)) {
                return Err(config_error(format!(
                    "successor {missing} of {from} is not declared in the transition table"
                )));
            }
        }
        Ok(())
    }

    /// Declared state types, in sorted order.
    pub fn states(&self) -> impl Iterator<Item = &StateType> {
        self.edges.keys()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn config_error(reason: String) -> AgentError {
    AgentError::ConfigError { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TransitionTable {
        TransitionTable::new()
            .allow(StateType::START, [StateType::STEP])
            .allow(StateType::STEP, [StateType::END, StateType::ERROR])
            .allow(StateType::ERROR, [StateType::STEP])
            .allow(StateType::END, [])
    }

    #[test]
    fn declared_transitions_pass() {
        let t = table();
        assert!(t.validate(&StateType::START, &StateType::STEP).is_ok());
        assert!(t.validate(&StateType::STEP, &StateType::ERROR).is_ok());
        assert!(t.validate(&StateType::ERROR, &StateType::STEP).is_ok());
        t.check_well_formed().unwrap();
    }

    #[test]
    fn undeclared_transition_lists_sorted_successors() {
        let err = table()
            .validate(&StateType::STEP, &StateType::START)
            .unwrap_err();
        match err {
            AgentError::InvalidTransition { from, to, allowed } => {
                assert_eq!(from, StateType::STEP);
                assert_eq!(to, StateType::START);
                assert_eq!(allowed, vec![StateType::END, StateType::ERROR]);
            }
            other => panic!("Expected InvalidTransition, got {other:?}"),
        }
    }

    #[test]
    fn unknown_source_has_no_successors() {
        let err = table()
            .validate(&StateType::THINK, &StateType::END)
            .unwrap_err();
        assert!(err.to_string().contains("allowed successors of THINK: []"));
    }

    #[test]
    fn missing_end_is_rejected() {
        let t = TransitionTable::new().allow(StateType::START, [StateType::STEP]);
        let err = t.check_well_formed().unwrap_err();
        assert!(matches!(err, AgentError::ConfigError { .. }));
        assert!(err.to_string().contains("END"));
    }

    #[test]
    fn undeclared_successor_is_rejected() {
        let t = TransitionTable::new()
            .allow(StateType::START, [StateType::STEP])
            .allow(StateType::END, []);
        let err = t.check_well_formed().unwrap_err();
        assert!(err.to_string().contains("successor STEP of START"));
    }

    #[test]
    fn end_with_successors_is_rejected() {
        let t = table().allow(StateType::END, [StateType::START]);
        assert!(t.check_well_formed().is_err());
    }

    #[test]
    fn deserializes_from_label_lists() {
        let t: TransitionTable = serde_json::from_str(
            r#"{"START": ["STEP"], "STEP": ["END", "ERROR"], "ERROR": ["STEP"], "END": []}"#,
        )
        .unwrap();
        assert_eq!(t, table());
    }
}
