//! The FSM driver.
//!
//! One call to [`Agent::run`] is one invocation:
//!
//!   START → working → { END | ERROR → working → ... }
//!
//! The driver executes states strictly in sequence, records every
//! transition, and enforces the two budgets: `max_iters` total state
//! executions and `max_retries` consecutive ERROR states.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use stepwise_contracts::{
    config::AgentConfig,
    error::{AgentError, AgentResult},
    execution::{RunId, RunOutcome, StepRecord},
    state::StateType,
};

use crate::{
    context::{AgentContext, Bindings},
    registry::ToolRegistry,
    states::{StartState, State},
    traits::{AcceptAll, ArgumentValidator, Model, TraceWriter},
    workflow::Workflow,
};

/// Transcript entries attached to budget failures.
pub const MEMORY_TAIL: usize = 4;

/// A configured agent. Reusable: every run gets a fresh context.
pub struct Agent {
    model: Arc<dyn Model>,
    tools: Arc<ToolRegistry>,
    workflow: Workflow,
    config: AgentConfig,
    validator: Arc<dyn ArgumentValidator>,
    trace: Option<Arc<dyn TraceWriter>>,
    system_prompt: String,
}

impl Agent {
    pub fn builder(model: Arc<dyn Model>) -> AgentBuilder {
        AgentBuilder::new(model)
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// The rendered system prompt sent beside every transcript.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run the state machine for `query` and return only the END payload.
    pub fn invoke(&self, query: &str) -> AgentResult<Value> {
        Ok(self.run(query)?.result)
    }

    pub fn run(&self, query: &str) -> AgentResult<RunOutcome> {
        self.run_with_metadata(query, Map::new())
    }

    /// Run the state machine, seeding the context with caller metadata.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if a state attempts an undeclared move
    /// - `IterationLimitExceeded` / `RetryLimitExceeded` when a budget runs out
    /// - `Model` if the backend fails
    /// - `TraceWriteFailed` if the attached trace writer fails
    pub fn run_with_metadata(
        &self,
        query: &str,
        metadata: Map<String, Value>,
    ) -> AgentResult<RunOutcome> {
        let run_id = RunId::new();
        let bindings = Bindings {
            model: self.model.as_ref(),
            tools: self.tools.as_ref(),
            validator: self.validator.as_ref(),
            transitions: self.workflow.transitions(),
            config: &self.config,
            system_prompt: Some(self.system_prompt.as_str()),
            working: self.workflow.working(),
        };
        let mut ctx = AgentContext::new(run_id.clone(), bindings);
        let mut state: Box<dyn State> = Box::new(StartState::new(query).with_metadata(metadata));
        let mut steps = Vec::new();

        info!(
            run_id = %run_id,
            workflow = %self.workflow.name(),
            tools = self.tools.len(),
            "agent run started"
        );

        while !state.is_terminal() {
            // ── Step 1: Iteration budget ─────────────────────────────────────
            if ctx.iterations() >= self.config.max_iters {
                warn!(
                    run_id = %run_id,
                    iterations = ctx.iterations(),
                    last_state = %state.state_type(),
                    "iteration limit reached"
                );
                return Err(AgentError::IterationLimitExceeded {
                    iterations: ctx.iterations(),
                    last_state: state.state_type().clone(),
                    memory_tail: ctx.memory().tail(MEMORY_TAIL),
                });
            }
            ctx.begin_execution();

            // ── Step 2: Execute the current state ────────────────────────────
            let from = state.state_type().clone();
            let next = match state.execute(&mut ctx) {
                Ok(next) => next,
                Err(err) => {
                    warn!(run_id = %run_id, step = ctx.iterations(), from = %from, error = %err, "run aborted");
                    return Err(err);
                }
            };
            let to = next.state_type().clone();
            debug!(run_id = %run_id, step = ctx.iterations(), from = %from, to = %to, "transition");

            // ── Step 3: Record the transition ────────────────────────────────
            let mut metadata = next.metadata();
            if let (Some(stats), Value::Object(map)) = (ctx.take_generation(), &mut metadata) {
                map.insert("generation".to_string(), stats);
            }
            let record = StepRecord {
                run_id: run_id.clone(),
                step: ctx.iterations(),
                from,
                to: to.clone(),
                metadata,
                timestamp: Utc::now(),
            };
            if let Some(trace) = &self.trace {
                trace.write(&record)?;
            }
            steps.push(record);

            // ── Step 4: Retry budget ─────────────────────────────────────────
            if to == StateType::ERROR {
                let streak = ctx.record_error();
                if let Some(max) = self.config.max_retries {
                    if streak >= max {
                        warn!(run_id = %run_id, retries = streak, "retry limit reached");
                        return Err(AgentError::RetryLimitExceeded {
                            retries: streak,
                            last_state: to,
                            memory_tail: ctx.memory().tail(MEMORY_TAIL),
                        });
                    }
                }
            } else if next.is_terminal() {
                ctx.record_tool_success();
            }

            state = next;
        }

        // ── Step 5: Terminal state reached ───────────────────────────────────
        if let Some(trace) = &self.trace {
            trace.finalize(&run_id)?;
        }
        let result = state.output().cloned().unwrap_or(Value::Null);
        info!(
            run_id = %run_id,
            iterations = ctx.iterations(),
            "agent run completed"
        );

        Ok(RunOutcome {
            run_id,
            result,
            transcript: ctx.into_memory().into_entries(),
            steps,
        })
    }
}

/// Builder for [`Agent`]. Validates the configuration in [`AgentBuilder::build`].
pub struct AgentBuilder {
    model: Arc<dyn Model>,
    tools: Arc<ToolRegistry>,
    workflow: Workflow,
    config: AgentConfig,
    validator: Arc<dyn ArgumentValidator>,
    trace: Option<Arc<dyn TraceWriter>>,
}

impl AgentBuilder {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self {
            model,
            tools: Arc::new(ToolRegistry::new()),
            workflow: Workflow::tool_calling(),
            config: AgentConfig::default(),
            validator: Arc::new(AcceptAll),
            trace: None,
        }
    }

    pub fn tools(mut self, tools: impl Into<Arc<ToolRegistry>>) -> Self {
        self.tools = tools.into();
        self
    }

    pub fn workflow(mut self, workflow: Workflow) -> Self {
        self.workflow = workflow;
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validator(mut self, validator: Arc<dyn ArgumentValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn trace(mut self, trace: Arc<dyn TraceWriter>) -> Self {
        self.trace = Some(trace);
        self
    }

    /// # Errors
    ///
    /// `ConfigError` for a malformed transition table, a zero budget, or
    /// empty or identical tag names.
    pub fn build(self) -> AgentResult<Agent> {
        self.workflow.transitions().check_well_formed()?;

        let config = &self.config;
        if config.max_iters == 0 {
            return Err(config_error("max_iters must be at least 1"));
        }
        if config.max_retries == Some(0) {
            return Err(config_error("max_retries must be at least 1 when set"));
        }
        if config.tool_tag.trim().is_empty() || config.args_tag.trim().is_empty() {
            return Err(config_error("tool_tag and args_tag must not be empty"));
        }
        if config.tool_tag == config.args_tag {
            return Err(config_error("tool_tag and args_tag must differ"));
        }

        let system_prompt = self.workflow.prompt().render(&self.tools, &self.config);
        Ok(Agent {
            model: self.model,
            tools: self.tools,
            workflow: self.workflow,
            config: self.config,
            validator: self.validator,
            trace: self.trace,
            system_prompt,
        })
    }
}

fn config_error(reason: &str) -> AgentError {
    AgentError::ConfigError {
        reason: reason.to_string(),
    }
}
