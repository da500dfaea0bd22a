use serde_json::{json, Value};
use tracing::warn;

use stepwise_contracts::{
    error::{AgentResult, ToolFailure},
    memory::Role,
    state::StateType,
};

use super::State;
use crate::context::AgentContext;

/// Carries a recoverable failure back to the model.
///
/// Appends `Error: <corrective message>` as an assistant entry and
/// re-enters the working state. Retries are bounded by the driver.
#[derive(Debug, Clone)]
pub struct ErrorState {
    state_type: StateType,
    failure: ToolFailure,
}

impl ErrorState {
    pub fn new(failure: ToolFailure) -> Self {
        Self {
            state_type: StateType::ERROR,
            failure,
        }
    }

    pub fn failure(&self) -> &ToolFailure {
        &self.failure
    }
}

impl State for ErrorState {
    fn state_type(&self) -> &StateType {
        &self.state_type
    }

    fn execute(&self, ctx: &mut AgentContext<'_>) -> AgentResult<Box<dyn State>> {
        let next = ctx.advance(&self.state_type, ctx.enter_working_state())?;
        ctx.append(Role::Assistant, format!("Error: {}", self.failure));
        Ok(next)
    }

    fn metadata(&self) -> Value {
        let mut meta = json!({
            "error_kind": self.failure.kind(),
            "error": self.failure.to_string(),
        });
        match &self.failure {
            ToolFailure::ToolNotFound { name, .. } => meta["tool"] = json!(name),
            ToolFailure::ToolExecution { tool, args, .. } => {
                meta["tool"] = json!(tool);
                meta["args"] = args.clone();
            }
            ToolFailure::ParsingTool { .. } => {}
        }
        meta
    }
}

/// Route a recoverable failure from `from` into an ERROR state.
pub fn recover(
    ctx: &AgentContext<'_>,
    from: &StateType,
    failure: ToolFailure,
) -> AgentResult<Box<dyn State>> {
    warn!(
        run_id = %ctx.run_id(),
        from = %from,
        kind = failure.kind(),
        "recoverable failure, re-prompting model"
    );
    ctx.advance(from, Box::new(ErrorState::new(failure)))
}
