//! Error types for the stepwise runtime.
//!
//! Three layers, by propagation policy:
//!
//! - `ToolError` is what a tool raises from inside its own logic.
//! - `ToolFailure` is recovered inside the loop: a working state converts it
//!   into an ERROR state and its `Display` text becomes the corrective
//!   message written back to memory.
//! - `AgentError` escapes the loop and ends the invocation.

use serde_json::Value;
use thiserror::Error;

use crate::{memory::MemoryEntry, state::StateType};

/// Raised by a tool implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The arguments do not fit the tool's parameters.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool ran and failed.
    #[error("{0}")]
    Failed(String),
}

/// A failure a working state recovers from by re-prompting the model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolFailure {
    /// The tool or args tag region is missing or the args are not a plain object.
    #[error(
        "Could not parse a tool call from your answer: {reason}. Your answer was: {response}\n\
         Answer with exactly one tool call in this format: {expected}\n\
         The arguments must be a JSON object: keys in double quotes, strings in double quotes, \
         lists in square brackets."
    )]
    ParsingTool {
        response: String,
        reason: String,
        /// Example of the expected format, rendered with the configured tags.
        expected: String,
    },

    /// The model named a tool that is not registered.
    #[error(
        "You selected the tool '{name}', but it is not one of the available tools: [{}]. \
         Pick one of the available tools and try again.",
        .available.join(", ")
    )]
    ToolNotFound { name: String, available: Vec<String> },

    /// The tool was invoked (or validated) and raised.
    #[error(
        "The tool '{tool}' failed with arguments {args}: {reason}\n\
         Check the tool's parameters and the arguments you provided, then try again."
    )]
    ToolExecution {
        tool: String,
        args: Value,
        reason: String,
    },
}

impl ToolFailure {
    /// Stable discriminant used in step metadata and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolFailure::ParsingTool { .. } => "parsing_tool",
            ToolFailure::ToolNotFound { .. } => "tool_not_found",
            ToolFailure::ToolExecution { .. } => "tool_execution",
        }
    }
}

/// A condition that terminates an invocation.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A state attempted a transition the table does not declare.
    ///
    /// Indicates a misconfigured table; never retried.
    #[error(
        "invalid transition {from} -> {to}; allowed successors of {from}: [{}]",
        join_labels(.allowed)
    )]
    InvalidTransition {
        from: StateType,
        to: StateType,
        allowed: Vec<StateType>,
    },

    /// The run executed `max_iters` states without reaching END.
    #[error("iteration limit reached after {iterations} state executions (last state: {last_state})")]
    IterationLimitExceeded {
        iterations: u32,
        last_state: StateType,
        /// The last few transcript entries, for diagnosis.
        memory_tail: Vec<MemoryEntry>,
    },

    /// The run produced `max_retries` consecutive ERROR states.
    #[error("retry limit reached after {retries} consecutive errors (last state: {last_state})")]
    RetryLimitExceeded {
        retries: u32,
        last_state: StateType,
        memory_tail: Vec<MemoryEntry>,
    },

    /// The model backend failed to produce a response.
    #[error("model error: {reason}")]
    Model { reason: String },

    /// A configuration value or document is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The trace writer could not persist a step record.
    #[error("trace write failed: {reason}")]
    TraceWriteFailed { reason: String },
}

fn join_labels(labels: &[StateType]) -> String {
    labels
        .iter()
        .map(StateType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias used throughout the stepwise crates.
pub type AgentResult<T> = Result<T, AgentError>;
