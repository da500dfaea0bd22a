//! Scenario: a model that never produces a parseable answer.
//!
//! Every answer lacks the tag regions, so every working step goes to ERROR.
//! The run fails with `RetryLimitExceeded` after `max_retries` consecutive
//! errors; the trace is left unfinalized.

use stepwise_contracts::error::{AgentError, AgentResult};

use super::{print_failure, Session, TOOL_CALLING_SETTINGS};
use crate::tools::arithmetic_registry;

pub const QUERY: &str = "What is 6 multiplied by 7?";

pub fn session() -> AgentResult<Session> {
    Session::new(
        TOOL_CALLING_SETTINGS,
        arithmetic_registry()?,
        ["The answer is obviously 42."],
    )
}

/// Run the query; returns the failure the run ended with.
///
/// # Errors
///
/// Propagates setup failures, and reports an unexpected success as
/// `ConfigError`.
pub fn execute() -> AgentResult<(Session, AgentError)> {
    let session = session()?;
    match session.agent.run(QUERY) {
        Ok(outcome) => Err(AgentError::ConfigError {
            reason: format!("expected the run to fail, it returned {}", outcome.result),
        }),
        Err(err) => Ok((session, err)),
    }
}

pub fn run_scenario() -> AgentResult<()> {
    println!("=== Scenario: retry limit ===");
    println!("  Query: {QUERY}");
    let (session, err) = execute()?;
    print_failure(&err);
    println!("  Model calls: {}", session.model.calls());
    println!();
    match err {
        AgentError::RetryLimitExceeded { .. } => Ok(()),
        other => Err(other),
    }
}
