//! Scenario: recovery from an unknown tool and from bad arguments.
//!
//! The model first names a tool that does not exist, then passes a string
//! where a number is declared, then gets it right. Each failure becomes a
//! corrective message before the next model call.

use stepwise_contracts::{error::AgentResult, execution::RunOutcome};

use super::{print_outcome, Session, TOOL_CALLING_SETTINGS};
use crate::tools::arithmetic_registry;

pub const QUERY: &str = "What is 7 minus 2?";

pub const RESPONSES: [&str; 3] = [
    r#"<tool>subtract</tool> <args>{"a": 7, "b": 2}</args>"#,
    r#"<tool>add</tool> <args>{"a": 7, "b": "minus two"}</args>"#,
    r#"<tool>add</tool> <args>{"a": 7, "b": -2}</args>"#,
];

pub fn execute() -> AgentResult<(Session, RunOutcome)> {
    let session = Session::new(TOOL_CALLING_SETTINGS, arithmetic_registry()?, RESPONSES)?;
    let outcome = session.agent.run(QUERY)?;
    Ok((session, outcome))
}

pub fn run_scenario() -> AgentResult<()> {
    println!("=== Scenario: unknown tool, then invalid arguments ===");
    println!("  Query: {QUERY}");
    let (session, outcome) = execute()?;
    print_outcome(&outcome, &session.trace);
    println!();
    Ok(())
}
