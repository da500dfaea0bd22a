//! Scenario: a single successful tool call.
//!
//!   START -> STEP -> END, result 12, two transcript entries.

use stepwise_contracts::{error::AgentResult, execution::RunOutcome};

use super::{print_outcome, Session, TOOL_CALLING_SETTINGS};
use crate::tools::arithmetic_registry;

pub const QUERY: &str = "What is 3 multiplied by 4?";

pub fn session() -> AgentResult<Session> {
    Session::new(
        TOOL_CALLING_SETTINGS,
        arithmetic_registry()?,
        [r#"<tool>multiply</tool> <args>{"a": 3, "b": 4}</args>"#],
    )
}

pub fn execute() -> AgentResult<(Session, RunOutcome)> {
    let session = session()?;
    let outcome = session.agent.run(QUERY)?;
    Ok((session, outcome))
}

pub fn run_scenario() -> AgentResult<()> {
    println!("=== Scenario: multiply ===");
    println!("  Query: {QUERY}");
    let (session, outcome) = execute()?;
    print_outcome(&outcome, &session.trace);
    println!();
    Ok(())
}
