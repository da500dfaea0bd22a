use serde_json::{Map, Value};
use tracing::debug;

use stepwise_contracts::{error::AgentResult, memory::Role, state::StateType};

use super::State;
use crate::context::AgentContext;

/// Seeds memory with the user query and enters the working state.
///
/// Never calls the model. An empty query is allowed.
#[derive(Debug, Clone)]
pub struct StartState {
    state_type: StateType,
    message: String,
    metadata: Map<String, Value>,
}

impl StartState {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            state_type: StateType::START,
            message: message.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl State for StartState {
    fn state_type(&self) -> &StateType {
        &self.state_type
    }

    fn execute(&self, ctx: &mut AgentContext<'_>) -> AgentResult<Box<dyn State>> {
        let next = ctx.advance(&self.state_type, ctx.enter_working_state())?;
        ctx.set_metadata(self.metadata.clone());
        ctx.append(Role::User, self.message.clone());
        debug!(run_id = %ctx.run_id(), to = %next.state_type(), "run seeded");
        Ok(next)
    }

    /// Caller metadata plus the query.
    fn metadata(&self) -> Value {
        let mut meta = self.metadata.clone();
        meta.insert("query".to_string(), Value::String(self.message.clone()));
        Value::Object(meta)
    }
}
