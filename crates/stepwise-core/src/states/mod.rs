//! State variants of the agent state machine.
//!
//! Every state is immutable data plus one behaviour, `execute`, which
//! borrows the run's context and yields the next state. A state validates
//! its outgoing transition against the table before returning it.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use stepwise_contracts::{error::AgentResult, state::StateType};

use crate::context::AgentContext;

mod end;
mod error;
mod react;
mod start;
mod step;

pub use end::EndState;
pub use error::{recover, ErrorState};
pub use react::{ActState, ObserveState, ThinkState};
pub use start::StartState;
pub use step::StepState;

/// One node of the agent state machine.
pub trait State: Send + fmt::Debug {
    /// The label this state is known by in the transition table.
    fn state_type(&self) -> &StateType;

    /// Do this state's work and return its successor.
    ///
    /// # Errors
    ///
    /// Only fatal conditions: `InvalidTransition` or a model failure.
    /// Recoverable tool failures are returned as an ERROR successor.
    fn execute(&self, ctx: &mut AgentContext<'_>) -> AgentResult<Box<dyn State>>;

    /// Free-form metadata recorded in the step trace when this state is entered.
    fn metadata(&self) -> Value {
        Value::Object(Map::new())
    }

    fn is_terminal(&self) -> bool {
        false
    }

    /// Payload of a terminal state.
    fn output(&self) -> Option<&Value> {
        None
    }
}

/// Builds a fresh working state. Used by START and ERROR to enter the loop.
pub type StateFactory = Arc<dyn Fn() -> Box<dyn State> + Send + Sync>;
