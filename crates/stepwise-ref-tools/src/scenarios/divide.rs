//! Scenario: a tool that returns an error value.
//!
//! `divide(10, 0)` returns the string "Error: division by zero". That is a
//! successful call: the run ends in END with the string as its result.

use stepwise_contracts::{error::AgentResult, execution::RunOutcome};

use super::{print_outcome, Session, TOOL_CALLING_SETTINGS};
use crate::tools::arithmetic_registry;

pub const QUERY: &str = "What is 10 divided by 0?";

pub fn execute() -> AgentResult<(Session, RunOutcome)> {
    let session = Session::new(
        TOOL_CALLING_SETTINGS,
        arithmetic_registry()?,
        [r#"<tool>divide</tool> <args>{"a": 10, "b": 0}</args>"#],
    )?;
    let outcome = session.agent.run(QUERY)?;
    Ok((session, outcome))
}

pub fn run_scenario() -> AgentResult<()> {
    println!("=== Scenario: divide by zero ===");
    println!("  Query: {QUERY}");
    let (session, outcome) = execute()?;
    print_outcome(&outcome, &session.trace);
    println!();
    Ok(())
}
