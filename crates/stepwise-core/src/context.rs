//! Per-invocation execution context.

use std::time::Instant;

use serde_json::{json, Map, Value};
use tracing::debug;

use stepwise_contracts::{
    config::AgentConfig,
    error::{AgentResult, ToolFailure},
    execution::RunId,
    memory::Role,
    state::StateType,
};

use crate::{
    memory::MemoryLog,
    parser::{ResponseParser, ToolCall},
    registry::ToolRegistry,
    states::{State, StateFactory},
    traits::{ArgumentValidator, GenerateRequest, Model},
    transition::TransitionTable,
};

/// Read-only collaborators an agent lends to each of its runs.
#[derive(Clone, Copy)]
pub(crate) struct Bindings<'a> {
    pub model: &'a dyn Model,
    pub tools: &'a ToolRegistry,
    pub validator: &'a dyn ArgumentValidator,
    pub transitions: &'a TransitionTable,
    pub config: &'a AgentConfig,
    pub system_prompt: Option<&'a str>,
    pub working: &'a StateFactory,
}

/// State shared by every state of one run.
///
/// Created fresh per invocation and discarded (or returned as transcript)
/// when the run ends. The context exclusively owns the memory log; every
/// other collaborator is borrowed from the agent.
pub struct AgentContext<'a> {
    run_id: RunId,
    memory: MemoryLog,
    bindings: Bindings<'a>,
    parser: ResponseParser,
    metadata: Map<String, Value>,
    /// Stats of the model call made by the state now executing.
    generation: Option<Value>,
    iterations: u32,
    consecutive_errors: u32,
}

impl<'a> AgentContext<'a> {
    pub(crate) fn new(run_id: RunId, bindings: Bindings<'a>) -> Self {
        Self {
            run_id,
            memory: MemoryLog::new(),
            parser: ResponseParser::from_config(bindings.config),
            bindings,
            metadata: Map::new(),
            generation: None,
            iterations: 0,
            consecutive_errors: 0,
        }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn memory(&self) -> &MemoryLog {
        &self.memory
    }

    /// Append an entry to the memory log.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.memory.append(role, content);
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.bindings.tools
    }

    pub fn config(&self) -> &AgentConfig {
        self.bindings.config
    }

    pub fn parser(&self) -> &ResponseParser {
        &self.parser
    }

    /// Caller-supplied metadata, seeded by the START state.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Map<String, Value>) {
        self.metadata = metadata;
    }

    /// State executions so far, including the one in progress.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    /// Check `from -> to` against the transition table.
    pub fn validate_transition(&self, from: &StateType, to: &StateType) -> AgentResult<()> {
        self.bindings.transitions.validate(from, to)
    }

    /// Validate `from -> next` and hand `next` back.
    pub fn advance(
        &self,
        from: &StateType,
        next: Box<dyn State>,
    ) -> AgentResult<Box<dyn State>> {
        self.validate_transition(from, next.state_type())?;
        Ok(next)
    }

    /// A fresh instance of the workflow's working state.
    pub fn enter_working_state(&self) -> Box<dyn State> {
        (self.bindings.working)()
    }

    /// Call the bound model with the current transcript.
    ///
    /// Token usage and wall time of the call are kept until the driver
    /// records the transition, where they land under `"generation"`.
    pub fn generate(&mut self) -> AgentResult<String> {
        let config = self.bindings.config;
        let request = GenerateRequest {
            system: self.bindings.system_prompt,
            messages: self.memory.render(),
            max_tokens: config.max_tokens,
            stop: config.stop_word.as_deref(),
        };
        debug!(
            run_id = %self.run_id,
            messages = request.messages.len(),
            "calling model"
        );
        let started = Instant::now();
        let generation = self.bindings.model.generate(&request)?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (input_tokens, output_tokens) = match generation.usage {
            Some(usage) => (Some(usage.input_tokens), Some(usage.output_tokens)),
            None => (None, None),
        };
        debug!(
            run_id = %self.run_id,
            input_tokens = ?input_tokens,
            output_tokens = ?output_tokens,
            elapsed_ms,
            "model answered"
        );
        self.generation = Some(json!({
            "input_tokens": input_tokens,
            "output_tokens": output_tokens,
            "generation_time_ms": elapsed_ms,
        }));
        Ok(generation.text)
    }

    /// Resolve, validate and call the tool named in `call`.
    pub fn invoke_tool(&self, call: &ToolCall) -> Result<Value, ToolFailure> {
        debug!(run_id = %self.run_id, tool = %call.name, "invoking tool");
        self.bindings
            .tools
            .invoke(&call.name, &call.args, self.bindings.validator)
    }

    /// A tool call succeeded: the consecutive-error streak is over.
    pub fn record_tool_success(&mut self) {
        self.consecutive_errors = 0;
    }

    pub(crate) fn begin_execution(&mut self) {
        self.iterations += 1;
        self.generation = None;
    }

    /// Stats of the last model call, if the current state made one.
    pub(crate) fn take_generation(&mut self) -> Option<Value> {
        self.generation.take()
    }

    /// Count one more ERROR state; returns the streak length.
    pub(crate) fn record_error(&mut self) -> u32 {
        self.consecutive_errors += 1;
        self.consecutive_errors
    }

    pub(crate) fn into_memory(self) -> MemoryLog {
        self.memory
    }
}
