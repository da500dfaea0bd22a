//! Document types deserialized from TOML.
//!
//! Every section is optional; an empty document yields the tool-calling
//! workflow with default budgets.

use serde::{Deserialize, Serialize};

use stepwise_contracts::config::AgentConfig;
use stepwise_core::{transition::TransitionTable, Workflow};

/// Which built-in workflow an agent runs.
///
/// Expressed in TOML as a kebab-case string:
/// ```toml
/// workflow = "tool-calling"
/// workflow = "react"
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowKind {
    #[default]
    ToolCalling,
    React,
}

impl WorkflowKind {
    /// The built-in workflow with its default table and prompt.
    pub fn workflow(self) -> Workflow {
        match self {
            WorkflowKind::ToolCalling => Workflow::tool_calling(),
            WorkflowKind::React => Workflow::react(),
        }
    }
}

/// Replacement system prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSection {
    /// Template text; `{tools}`, `{tool_tag}`, `{args_tag}` and `{none}` are substituted.
    pub template: String,
}

/// The top-level agent settings document.
///
/// Example:
/// ```toml
/// workflow = "react"
///
/// [agent]
/// stop_word = "PAUSE"
/// max_iters = 10
/// max_retries = 0        # 0 disables the retry bound
///
/// [transitions]
/// START = ["THINK"]
/// THINK = ["THINK", "ACT", "END", "ERROR"]
/// ACT = ["OBSERVE", "ERROR"]
/// OBSERVE = ["THINK", "ERROR"]
/// ERROR = ["THINK"]
/// END = []
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsDocument {
    #[serde(default)]
    pub workflow: WorkflowKind,

    #[serde(default)]
    pub agent: AgentConfig,

    /// Overrides the workflow's default table when present.
    #[serde(default)]
    pub transitions: Option<TransitionTable>,

    #[serde(default)]
    pub prompt: Option<PromptSection>,
}

/// A recorded or hand-written model session, replayed by `ScriptedModel`.
///
/// ```toml
/// query = "What is 3 multiplied by 4?"
/// responses = ['<tool>multiply</tool> <args>{"a": 3, "b": 4}</args>']
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptDocument {
    /// Default query when none is given on the command line.
    #[serde(default)]
    pub query: Option<String>,

    pub responses: Vec<String>,
}
