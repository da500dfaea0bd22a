//! Scenario: the ReAct workflow over the geography tools.
//!
//! THINK -> ACT -> OBSERVE twice, with one malformed answer recovered
//! through ERROR, then END. Model output is cut at the `PAUSE` stop word.

use stepwise_contracts::{error::AgentResult, execution::RunOutcome};

use super::{print_outcome, Session, REACT_SETTINGS};
use crate::tools::geography_registry;

pub const QUERY: &str = "How's the weather in France? What about next day?";

pub const RESPONSES: [&str; 7] = [
    "Think: I need today's weather and tomorrow's forecast for France. PAUSE",
    r#"Act: <tool>get_weather</tool> <args>{"country": "France"}</args> PAUSE"#,
    "Now the forecast.",
    "Think: I have today's temperature, now I need the forecast. PAUSE",
    r#"Act: <tool>get_next_day_prediction</tool> <args>{"country": "France"}</args> PAUSE"#,
    "Think: I have both values. PAUSE",
    "End: It is 20 degrees in France today and 21 degrees tomorrow. PAUSE ignored",
];

pub fn execute() -> AgentResult<(Session, RunOutcome)> {
    let session = Session::new(REACT_SETTINGS, geography_registry()?, RESPONSES)?;
    let outcome = session.agent.run(QUERY)?;
    Ok((session, outcome))
}

pub fn run_scenario() -> AgentResult<()> {
    println!("=== Scenario: ReAct weather ===");
    println!("  Query: {QUERY}");
    let (session, outcome) = execute()?;
    print_outcome(&outcome, &session.trace);
    println!();
    Ok(())
}
