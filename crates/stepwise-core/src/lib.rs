//! # stepwise-core
//!
//! The finite-state-machine runtime for tool-using LLM agents.
//!
//! This crate provides:
//! - The trait seams (`Model`, `Invocable`, `ArgumentValidator`, `TraceWriter`, `State`)
//! - The memory log, transition table, tool registry and response parser
//! - The built-in states and workflows (tool-calling and ReAct)
//! - The `Agent` driver that runs a workflow to END under iteration and retry budgets
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stepwise_core::{Agent, ScriptedModel, ToolRegistry};
//!
//! let agent = Agent::builder(Arc::new(ScriptedModel::always("...")))
//!     .tools(ToolRegistry::new())
//!     .build()?;
//! let answer = agent.invoke("What is 3 multiplied by 4?")?;
//! ```

pub mod agent;
pub mod context;
pub mod memory;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod registry;
pub mod states;
pub mod traits;
pub mod transition;
pub mod workflow;

pub use agent::{Agent, AgentBuilder};
pub use context::AgentContext;
pub use memory::MemoryLog;
pub use model::ScriptedModel;
pub use parser::{ParsedResponse, ResponseParser, ToolCall};
pub use prompt::PromptBuilder;
pub use registry::{FnTool, ToolRegistry};
pub use traits::{
    AcceptAll, ArgumentValidator, Arguments, GenerateRequest, Generation, Invocable, Model,
    TraceWriter, Usage,
};
pub use transition::TransitionTable;
pub use workflow::Workflow;
