//! Working states of the ReAct workflow: THINK, ACT and OBSERVE.
//!
//! THINK routes on the prefix of the model's answer. ACT dispatches the
//! tool call found in that answer. OBSERVE writes the tool's result back
//! and returns to THINK.

use serde_json::{json, Value};
use tracing::debug;

use stepwise_contracts::{
    config::NONE_SENTINEL,
    error::{AgentResult, ToolFailure},
    memory::Role,
    state::StateType,
};

use super::{recover, EndState, State};
use crate::{context::AgentContext, parser::ParsedResponse};

pub const THINK_PREFIX: &str = "Think:";
pub const ACT_PREFIX: &str = "Act:";
pub const END_PREFIX: &str = "End:";
pub const OBSERVE_PREFIX: &str = "Observe:";

/// Asks the model for its next move.
#[derive(Debug, Clone)]
pub struct ThinkState {
    state_type: StateType,
}

impl ThinkState {
    pub fn new() -> Self {
        Self {
            state_type: StateType::THINK,
        }
    }
}

impl Default for ThinkState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for ThinkState {
    fn state_type(&self) -> &StateType {
        &self.state_type
    }

    fn execute(&self, ctx: &mut AgentContext<'_>) -> AgentResult<Box<dyn State>> {
        let response = ctx.generate()?;
        ctx.append(Role::Assistant, response.clone());

        let text = ctx.parser().truncate(&response).trim_start();
        if text.starts_with(THINK_PREFIX) {
            ctx.advance(&self.state_type, Box::new(ThinkState::new()))
        } else if text.starts_with(ACT_PREFIX) {
            ctx.advance(&self.state_type, Box::new(ActState::new()))
        } else if let Some(answer) = text.strip_prefix(END_PREFIX) {
            let end = EndState::new(Value::String(answer.trim().to_string()));
            ctx.advance(&self.state_type, Box::new(end))
        } else {
            let failure = ToolFailure::ParsingTool {
                response: response.clone(),
                reason: format!(
                    "the answer must start with '{THINK_PREFIX}', '{ACT_PREFIX}' or '{END_PREFIX}'"
                ),
                expected: format!("{ACT_PREFIX} {}", ctx.parser().expected_format()),
            };
            recover(ctx, &self.state_type, failure)
        }
    }
}

/// Dispatches the tool call in the model's last answer.
#[derive(Debug, Clone)]
pub struct ActState {
    state_type: StateType,
}

impl ActState {
    pub fn new() -> Self {
        Self {
            state_type: StateType::ACT,
        }
    }
}

impl Default for ActState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for ActState {
    fn state_type(&self) -> &StateType {
        &self.state_type
    }

    fn execute(&self, ctx: &mut AgentContext<'_>) -> AgentResult<Box<dyn State>> {
        let answer = ctx
            .memory()
            .last_by(Role::Assistant)
            .map(|e| e.content.clone())
            .unwrap_or_default();
        let body = answer.trim_start();
        let body = body.strip_prefix(ACT_PREFIX).unwrap_or(body);

        let call = match ctx.parser().parse(body) {
            Ok(ParsedResponse::Call(call)) => call,
            Ok(ParsedResponse::Decline { .. }) => {
                let failure = ToolFailure::ParsingTool {
                    response: answer.clone(),
                    reason: format!(
                        "'{NONE_SENTINEL}' is not a tool; answer '{END_PREFIX}' to finish without one"
                    ),
                    expected: format!("{ACT_PREFIX} {}", ctx.parser().expected_format()),
                };
                return recover(ctx, &self.state_type, failure);
            }
            Err(failure) => return recover(ctx, &self.state_type, failure),
        };

        match ctx.invoke_tool(&call) {
            Ok(result) => {
                let observe = ObserveState::new(call.name, result);
                let next = ctx.advance(&self.state_type, Box::new(observe))?;
                ctx.record_tool_success();
                Ok(next)
            }
            Err(failure) => recover(ctx, &self.state_type, failure),
        }
    }
}

/// Writes a tool result back to memory.
#[derive(Debug, Clone)]
pub struct ObserveState {
    state_type: StateType,
    tool: String,
    observation: Value,
}

impl ObserveState {
    pub fn new(tool: impl Into<String>, observation: Value) -> Self {
        Self {
            state_type: StateType::OBSERVE,
            tool: tool.into(),
            observation,
        }
    }

    pub fn observation(&self) -> &Value {
        &self.observation
    }
}

impl State for ObserveState {
    fn state_type(&self) -> &StateType {
        &self.state_type
    }

    fn execute(&self, ctx: &mut AgentContext<'_>) -> AgentResult<Box<dyn State>> {
        let next = ctx.advance(&self.state_type, Box::new(ThinkState::new()))?;
        let rendered = match &self.observation {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        debug!(run_id = %ctx.run_id(), tool = %self.tool, "observation recorded");
        ctx.append(Role::Assistant, format!("{OBSERVE_PREFIX} {rendered}"));
        Ok(next)
    }

    fn metadata(&self) -> Value {
        json!({ "tool": self.tool, "observation": self.observation })
    }
}
