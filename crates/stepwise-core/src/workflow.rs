//! Workflows: a transition table, a working-state factory and a prompt.

use std::fmt;
use std::sync::Arc;

use stepwise_contracts::state::StateType;

use crate::{
    prompt::PromptBuilder,
    states::{State, StateFactory, StepState, ThinkState},
    transition::TransitionTable,
};

/// Everything that distinguishes one agent protocol from another.
///
/// START and ERROR both re-enter the loop through `working`, so the label
/// of the state it builds must be a successor of START and of ERROR.
#[derive(Clone)]
pub struct Workflow {
    name: String,
    transitions: TransitionTable,
    working: StateFactory,
    prompt: PromptBuilder,
}

impl Workflow {
    pub fn new<F>(
        name: impl Into<String>,
        transitions: TransitionTable,
        working: F,
        prompt: PromptBuilder,
    ) -> Self
    where
        F: Fn() -> Box<dyn State> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            transitions,
            working: Arc::new(working),
            prompt,
        }
    }

    /// Single working state STEP: one model call, one tool call, done.
    pub fn tool_calling() -> Self {
        Self::new(
            "tool-calling",
            tool_calling_table(),
            || Box::new(StepState::new()),
            PromptBuilder::tool_calling(),
        )
    }

    /// THINK / ACT / OBSERVE loop.
    pub fn react() -> Self {
        Self::new(
            "react",
            react_table(),
            || Box::new(ThinkState::new()),
            PromptBuilder::react(),
        )
    }

    /// Replace the transition table, keeping states and prompt.
    pub fn with_transitions(mut self, transitions: TransitionTable) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn prompt(&self) -> &PromptBuilder {
        &self.prompt
    }

    pub(crate) fn working(&self) -> &StateFactory {
        &self.working
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("name", &self.name)
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

/// START→{STEP}, STEP→{END, ERROR}, ERROR→{STEP}, END→{}.
pub fn tool_calling_table() -> TransitionTable {
    TransitionTable::new()
        .allow(StateType::START, [StateType::STEP])
        .allow(StateType::STEP, [StateType::END, StateType::ERROR])
        .allow(StateType::ERROR, [StateType::STEP])
        .allow(StateType::END, [])
}

/// START→{THINK}, THINK→{THINK, ACT, END, ERROR}, ACT→{OBSERVE, ERROR},
/// OBSERVE→{THINK, ERROR}, ERROR→{THINK}, END→{}.
pub fn react_table() -> TransitionTable {
    TransitionTable::new()
        .allow(StateType::START, [StateType::THINK])
        .allow(
            StateType::THINK,
            [
                StateType::THINK,
                StateType::ACT,
                StateType::END,
                StateType::ERROR,
            ],
        )
        .allow(StateType::ACT, [StateType::OBSERVE, StateType::ERROR])
        .allow(StateType::OBSERVE, [StateType::THINK, StateType::ERROR])
        .allow(StateType::ERROR, [StateType::THINK])
        .allow(StateType::END, [])
}
