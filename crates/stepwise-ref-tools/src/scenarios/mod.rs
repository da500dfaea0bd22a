//! End-to-end scenarios.
//!
//! Each scenario wires a real agent (settings from TOML, schema argument
//! validation, hash-chained trace) to a `ScriptedModel` replaying canned
//! responses, runs one query, and prints the transcript and trace.
//! `execute()` returns the raw run result; `run_scenario()` prints it.

use std::sync::Arc;

use stepwise_config::AgentSettings;
use stepwise_contracts::{
    error::{AgentError, AgentResult},
    execution::RunOutcome,
};
use stepwise_core::{Agent, ScriptedModel, ToolRegistry};
use stepwise_trace::InMemoryTraceWriter;
use stepwise_verify::SchemaValidator;
use tracing::debug;

pub mod cannot_comply;
pub mod divide;
pub mod multiply;
pub mod react_weather;
pub mod retry_limit;
pub mod unknown_tool;

pub(crate) const TOOL_CALLING_SETTINGS: &str = include_str!("../../config/tool-calling.toml");
pub(crate) const REACT_SETTINGS: &str = include_str!("../../config/react.toml");

/// An agent plus handles to its scripted model and trace.
pub struct Session {
    pub agent: Agent,
    pub model: Arc<ScriptedModel>,
    pub trace: InMemoryTraceWriter,
}

impl Session {
    /// Build an agent from a settings document, a tool set and a script.
    pub fn new<I, S>(settings: &str, tools: ToolRegistry, responses: I) -> AgentResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let settings = AgentSettings::from_toml_str(settings)?;
        let model = Arc::new(ScriptedModel::new(responses));
        let trace = InMemoryTraceWriter::new();
        let agent = settings
            .apply(Agent::builder(model.clone()))
            .tools(tools)
            .validator(Arc::new(SchemaValidator::new()))
            .trace(Arc::new(trace.clone()))
            .build()?;
        debug!(
            workflow = %agent.workflow().name(),
            tools = agent.tools().len(),
            "scenario session ready"
        );
        Ok(Self {
            agent,
            model,
            trace,
        })
    }
}

/// Print a completed run: transcript, path and trace integrity.
pub fn print_outcome(outcome: &RunOutcome, trace: &InMemoryTraceWriter) {
    println!("  Transcript:");
    for entry in &outcome.transcript {
        println!("    [{:<9}] {}", entry.role.as_str(), first_line(&entry.content));
    }
    let path: Vec<String> = std::iter::once("START".to_string())
        .chain(outcome.steps.iter().map(|s| s.to.to_string()))
        .collect();
    println!("  Path:    {}", path.join(" -> "));
    println!("  Result:  {}", outcome.result);
    let tokens = |key: &str| -> u64 {
        outcome
            .steps
            .iter()
            .filter_map(|s| s.metadata.get("generation")?.get(key)?.as_u64())
            .sum()
    };
    println!(
        "  Tokens:  {} in / {} out",
        tokens("input_tokens"),
        tokens("output_tokens")
    );
    println!(
        "  Trace:   {} ({} event(s))",
        if trace.verify_run(&outcome.run_id) { "VERIFIED" } else { "FAILED" },
        outcome.steps.len()
    );
}

/// Print a run that ended with a surfaced failure.
pub fn print_failure(err: &AgentError) {
    println!("  Run failed: {err}");
    let tail = match err {
        AgentError::RetryLimitExceeded { memory_tail, .. }
        | AgentError::IterationLimitExceeded { memory_tail, .. } => memory_tail.as_slice(),
        _ => &[],
    };
    if !tail.is_empty() {
        println!("  Last transcript entries:");
        for entry in tail {
            println!("    [{:<9}] {}", entry.role.as_str(), first_line(&entry.content));
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
