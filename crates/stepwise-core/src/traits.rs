//! Trait seams of the stepwise runtime.
//!
//! - `Model`             — the bound LLM backend (local inference or hosted API)
//! - `Invocable`         — a named, described, callable tool
//! - `ArgumentValidator` — checks an argument mapping against a tool's declaration
//! - `TraceWriter`       — append-only sink for performed transitions
//!
//! The `State` capability lives in [`crate::states`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use stepwise_contracts::{
    error::{AgentResult, ToolError},
    execution::{RunId, StepRecord},
    memory::MemoryEntry,
    tool::{ToolSpec, ValidationReport},
};

/// Argument mapping handed to a tool: parameter name → value.
pub type Arguments = Map<String, Value>;

/// Everything a model call receives.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    /// Rendered system prompt. Kept outside the transcript.
    pub system: Option<&'a str>,
    /// The memory log, exactly as appended.
    pub messages: &'a [MemoryEntry],
    pub max_tokens: u32,
    /// Sequence at which the backend should stop generating.
    pub stop: Option<&'a str>,
}

/// Token counts reported by a backend for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// One model answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    /// `None` when the backend does not report token counts.
    pub usage: Option<Usage>,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// A language-model backend.
///
/// Implementations may block on network or local inference; the runtime
/// calls `generate` from a single thread, one call at a time. Shared
/// read-only across invocations, hence `Send + Sync`.
pub trait Model: Send + Sync {
    /// Produce the raw text response for `request`, with token usage when
    /// the backend reports it.
    ///
    /// A backend failure is fatal for the invocation and should be returned
    /// as `AgentError::Model`.
    fn generate(&self, request: &GenerateRequest<'_>) -> AgentResult<Generation>;
}

/// A tool the model may call.
///
/// Tool logic must be safe for concurrent reads when the registry is shared
/// across agents running on several threads.
pub trait Invocable: Send + Sync {
    /// Declared name, parameters and description.
    fn spec(&self) -> &ToolSpec;

    /// Run the tool. Returning `Ok` (even an error-looking string) is a
    /// successful call; returning `Err` is a tool failure.
    fn call(&self, args: &Arguments) -> Result<Value, ToolError>;

    fn name(&self) -> &str {
        &self.spec().name
    }
}

/// Checks an argument mapping before a tool is invoked.
pub trait ArgumentValidator: Send + Sync {
    /// Return a report with `passed = false` and populated failures when the
    /// arguments do not fit `spec`. Malformed declarations are reported as
    /// failures rather than errors.
    fn validate(&self, spec: &ToolSpec, args: &Arguments) -> ValidationReport;
}

/// Validator that accepts every mapping; tools check their own inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ArgumentValidator for AcceptAll {
    fn validate(&self, _spec: &ToolSpec, _args: &Arguments) -> ValidationReport {
        ValidationReport::pass()
    }
}

/// Append-only sink for the transitions of every run.
pub trait TraceWriter: Send + Sync {
    /// Append one transition record.
    fn write(&self, record: &StepRecord) -> AgentResult<()>;

    /// Mark a run as complete. Called only when the run reached END.
    fn finalize(&self, run_id: &RunId) -> AgentResult<()>;
}
