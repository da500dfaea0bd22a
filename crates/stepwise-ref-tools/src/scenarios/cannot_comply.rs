//! Scenario: the model declines with the `None` sentinel.
//!
//! No tool is invoked; the explanation after the args region is the result.

use stepwise_contracts::{error::AgentResult, execution::RunOutcome};

use super::{print_outcome, Session, TOOL_CALLING_SETTINGS};
use crate::tools::arithmetic_registry;

pub const QUERY: &str = "What is the current price of gold?";

pub const EXPLANATION: &str =
    "I only have arithmetic tools; none of them can look up market prices.";

pub fn execute() -> AgentResult<(Session, RunOutcome)> {
    let session = Session::new(
        TOOL_CALLING_SETTINGS,
        arithmetic_registry()?,
        [format!("<tool>None</tool> <args>{{}}</args> {EXPLANATION}")],
    )?;
    let outcome = session.agent.run(QUERY)?;
    Ok((session, outcome))
}

pub fn run_scenario() -> AgentResult<()> {
    println!("=== Scenario: cannot comply ===");
    println!("  Query: {QUERY}");
    let (session, outcome) = execute()?;
    print_outcome(&outcome, &session.trace);
    println!();
    Ok(())
}
