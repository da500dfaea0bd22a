//! stepwise demo CLI
//!
//! Runs the bundled scenarios, or replays a scripted model session from TOML
//! against the reference tools.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- multiply
//!   cargo run -p demo -- react
//!   cargo run -p demo -- script --responses session.toml --settings agent.toml

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stepwise_config::{AgentSettings, Script};
use stepwise_contracts::error::{AgentError, AgentResult};
use stepwise_core::{Agent, ToolRegistry};
use stepwise_ref_tools::scenarios::{
    self, cannot_comply, divide, multiply, react_weather, retry_limit, unknown_tool,
};
use stepwise_ref_tools::tools;
use stepwise_trace::InMemoryTraceWriter;
use stepwise_verify::SchemaValidator;

// ── CLI definition ────────────────────────────────────────────────────────────

/// stepwise: a finite-state-machine runtime for tool-calling LLM agents.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "stepwise agent runtime demo",
    long_about = "Runs stepwise scenarios showing tool dispatch, error recovery,\n\
                  retry and iteration limits, the ReAct workflow, and trace integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// One successful tool call: 3 x 4.
    Multiply,
    /// A tool that returns an error string: 10 / 0.
    Divide,
    /// Recovery from an unknown tool and invalid arguments.
    UnknownTool,
    /// The model declines with the None sentinel.
    CannotComply,
    /// An unparseable model exhausts the retry budget.
    RetryLimit,
    /// The ReAct workflow over the weather tools.
    React,
    /// Replay a scripted session from a TOML file.
    Script {
        /// TOML file with `responses = [...]` and an optional `query`.
        #[arg(long)]
        responses: PathBuf,
        /// Agent settings TOML; defaults to the tool-calling workflow.
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Query to run; overrides the one in the script file.
        #[arg(long)]
        query: Option<String>,
        /// Tool set offered to the model.
        #[arg(long, value_enum, default_value_t = ToolSet::All)]
        tools: ToolSet,
        /// Print the rendered system prompt before running.
        #[arg(long)]
        show_prompt: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ToolSet {
    Arithmetic,
    Geography,
    All,
}

impl ToolSet {
    fn registry(self) -> AgentResult<ToolRegistry> {
        match self {
            ToolSet::Arithmetic => tools::arithmetic_registry(),
            ToolSet::Geography => tools::geography_registry(),
            ToolSet::All => tools::full_registry(),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug shows every transition.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Multiply => multiply::run_scenario(),
        Command::Divide => divide::run_scenario(),
        Command::UnknownTool => unknown_tool::run_scenario(),
        Command::CannotComply => cannot_comply::run_scenario(),
        Command::RetryLimit => retry_limit::run_scenario(),
        Command::React => react_weather::run_scenario(),
        Command::Script {
            responses,
            settings,
            query,
            tools,
            show_prompt,
        } => run_script(&responses, settings.as_deref(), query, tools, show_prompt),
    };

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> AgentResult<()> {
    multiply::run_scenario()?;
    divide::run_scenario()?;
    unknown_tool::run_scenario()?;
    cannot_comply::run_scenario()?;
    retry_limit::run_scenario()?;
    react_weather::run_scenario()?;
    Ok(())
}

fn run_script(
    responses: &std::path::Path,
    settings: Option<&std::path::Path>,
    query: Option<String>,
    tool_set: ToolSet,
    show_prompt: bool,
) -> AgentResult<()> {
    let script = Script::from_file(responses)?;
    let settings = match settings {
        Some(path) => AgentSettings::from_file(path)?,
        None => AgentSettings::default(),
    };
    let query = query
        .or_else(|| script.query().map(str::to_string))
        .ok_or_else(|| AgentError::ConfigError {
            reason: "no query given on the command line or in the script file".to_string(),
        })?;

    let trace = InMemoryTraceWriter::new();
    let agent = settings
        .apply(Agent::builder(Arc::new(script.into_model())))
        .tools(tool_set.registry()?)
        .validator(Arc::new(SchemaValidator::new()))
        .trace(Arc::new(trace.clone()))
        .build()?;
    info!(workflow = %agent.workflow().name(), "scripted session loaded");

    println!("=== Scripted session ({}) ===", agent.workflow().name());
    if show_prompt {
        println!("  System prompt:");
        for line in agent.system_prompt().lines() {
            println!("    {line}");
        }
    }
    println!("  Query: {query}");
    match agent.run(&query) {
        Ok(outcome) => {
            scenarios::print_outcome(&outcome, &trace);
            println!();
            Ok(())
        }
        Err(err) => {
            scenarios::print_failure(&err);
            println!();
            Err(err)
        }
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("stepwise: FSM runtime for tool-calling agents");
    println!("=============================================");
    println!();
    println!("Per state execution:");
    println!("  [1] Iteration budget checked (max_iters)");
    println!("  [2] State executes: model call, parse, validate args, invoke tool");
    println!("  [3] Transition checked against the workflow's table");
    println!("  [4] Step record appended to the SHA-256 trace chain");
    println!("  [5] Consecutive ERROR states counted against max_retries");
    println!();
}
