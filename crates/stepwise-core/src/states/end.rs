use serde_json::{Map, Value};

use stepwise_contracts::{error::AgentResult, state::StateType};

use super::State;
use crate::context::AgentContext;

/// Terminal state carrying the run's result.
#[derive(Debug, Clone)]
pub struct EndState {
    state_type: StateType,
    result: Value,
    metadata: Map<String, Value>,
}

impl EndState {
    pub fn new(result: Value) -> Self {
        Self {
            state_type: StateType::END,
            result,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn result(&self) -> &Value {
        &self.result
    }
}

impl State for EndState {
    fn state_type(&self) -> &StateType {
        &self.state_type
    }

    /// The driver stops at END; executing it again is a no-op.
    fn execute(&self, _ctx: &mut AgentContext<'_>) -> AgentResult<Box<dyn State>> {
        Ok(Box::new(self.clone()))
    }

    fn metadata(&self) -> Value {
        let mut meta = self.metadata.clone();
        meta.insert("result".to_string(), self.result.clone());
        Value::Object(meta)
    }

    fn is_terminal(&self) -> bool {
        true
    }

    fn output(&self) -> Option<&Value> {
        Some(&self.result)
    }
}
