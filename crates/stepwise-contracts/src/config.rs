//! Scalar agent configuration.

use serde::{Deserialize, Serialize};

/// Default tag wrapping the tool name in model output.
pub const DEFAULT_TOOL_TAG: &str = "tool";
/// Default tag wrapping the argument object in model output.
pub const DEFAULT_ARGS_TAG: &str = "args";
/// Literal tool name the model uses to declare it cannot comply.
pub const NONE_SENTINEL: &str = "None";

/// Budgets and protocol settings for one agent.
///
/// Every field has a default so partial TOML documents deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Substring at which model output is truncated, also passed to the model.
    pub stop_word: Option<String>,
    /// Generation budget forwarded on every model call.
    pub max_tokens: u32,
    /// Upper bound on total state executions per invocation.
    pub max_iters: u32,
    /// Upper bound on consecutive ERROR states. `None` disables the bound.
    pub max_retries: Option<u32>,
    pub tool_tag: String,
    pub args_tag: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            stop_word: None,
            max_tokens: 1024,
            max_iters: 20,
            max_retries: Some(3),
            tool_tag: DEFAULT_TOOL_TAG.to_string(),
            args_tag: DEFAULT_ARGS_TAG.to_string(),
        }
    }
}
