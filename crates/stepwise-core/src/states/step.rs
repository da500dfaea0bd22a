use serde_json::{Map, Value};
use tracing::debug;

use stepwise_contracts::{
    config::NONE_SENTINEL, error::AgentResult, memory::Role, state::StateType,
};

use super::{recover, EndState, State};
use crate::{context::AgentContext, parser::ParsedResponse};

/// The tool-calling working state.
///
/// One execution is one model call followed by at most one tool call.
/// Success and the `None` sentinel end the run; every recoverable failure
/// goes to ERROR.
#[derive(Debug, Clone)]
pub struct StepState {
    state_type: StateType,
}

impl StepState {
    pub fn new() -> Self {
        Self::labelled(StateType::STEP)
    }

    /// A step state known by a custom label in the transition table.
    pub fn labelled(state_type: StateType) -> Self {
        Self { state_type }
    }
}

impl Default for StepState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for StepState {
    fn state_type(&self) -> &StateType {
        &self.state_type
    }

    fn execute(&self, ctx: &mut AgentContext<'_>) -> AgentResult<Box<dyn State>> {
        let response = ctx.generate()?;
        ctx.append(Role::Assistant, response.clone());

        let call = match ctx.parser().parse(&response) {
            Ok(ParsedResponse::Call(call)) => call,
            Ok(ParsedResponse::Decline { explanation }) => {
                debug!(run_id = %ctx.run_id(), tool = NONE_SENTINEL, "model declined the task");
                let mut meta = Map::new();
                meta.insert("tool".to_string(), Value::from(NONE_SENTINEL));
                let end = EndState::new(Value::String(explanation)).with_metadata(meta);
                return ctx.advance(&self.state_type, Box::new(end));
            }
            Err(failure) => return recover(ctx, &self.state_type, failure),
        };

        match ctx.invoke_tool(&call) {
            Ok(result) => {
                let mut meta = Map::new();
                meta.insert("tool".to_string(), Value::String(call.name));
                meta.insert("args".to_string(), Value::Object(call.args));
                let end = EndState::new(result).with_metadata(meta);
                let next = ctx.advance(&self.state_type, Box::new(end))?;
                ctx.record_tool_success();
                Ok(next)
            }
            Err(failure) => recover(ctx, &self.state_type, failure),
        }
    }
}
