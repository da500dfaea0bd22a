//! Loading of agent settings and scripted sessions.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use stepwise_contracts::{
    config::AgentConfig,
    error::{AgentError, AgentResult},
};
use stepwise_core::{AgentBuilder, PromptBuilder, ScriptedModel, Workflow};

use crate::schema::{ScriptDocument, SettingsDocument, WorkflowKind};

/// Agent settings loaded from a TOML document.
///
/// Construct via `from_toml_str` or `from_file`, then apply to an
/// [`AgentBuilder`].
///
/// ```rust,ignore
/// use stepwise_config::AgentSettings;
///
/// let settings = AgentSettings::from_file(Path::new("agent.toml"))?;
/// let agent = settings.apply(Agent::builder(model)).tools(tools).build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct AgentSettings {
    document: SettingsDocument,
}

impl AgentSettings {
    /// Parse `s` as TOML.
    ///
    /// Returns `AgentError::ConfigError` if the TOML is malformed, does not
    /// match [`SettingsDocument`], or declares a malformed transition table.
    /// `max_retries = 0` is read as "no retry bound".
    pub fn from_toml_str(s: &str) -> AgentResult<Self> {
        let mut document: SettingsDocument = parse("agent settings", s)?;
        if document.agent.max_retries == Some(0) {
            document.agent.max_retries = None;
        }
        if let Some(table) = &document.transitions {
            table.check_well_formed()?;
        }
        debug!(
            workflow = ?document.workflow,
            custom_table = document.transitions.is_some(),
            "agent settings loaded"
        );
        Ok(Self { document })
    }

    /// Read the file at `path` and parse it with [`AgentSettings::from_toml_str`].
    pub fn from_file(path: &Path) -> AgentResult<Self> {
        Self::from_toml_str(&read(path, "settings")?)
    }

    pub fn workflow_kind(&self) -> WorkflowKind {
        self.document.workflow
    }

    pub fn config(&self) -> &AgentConfig {
        &self.document.agent
    }

    pub fn document(&self) -> &SettingsDocument {
        &self.document
    }

    /// The selected workflow with any table or prompt override applied.
    pub fn workflow(&self) -> Workflow {
        let mut workflow = self.document.workflow.workflow();
        if let Some(table) = &self.document.transitions {
            workflow = workflow.with_transitions(table.clone());
        }
        if let Some(prompt) = &self.document.prompt {
            workflow = workflow.with_prompt(PromptBuilder::new(prompt.template.clone()));
        }
        workflow
    }

    /// Set the builder's workflow and configuration from these settings.
    pub fn apply(&self, builder: AgentBuilder) -> AgentBuilder {
        builder.workflow(self.workflow()).config(self.config().clone())
    }
}

/// A scripted model session loaded from TOML.
#[derive(Debug, Clone)]
pub struct Script {
    document: ScriptDocument,
}

impl Script {
    /// Returns `ConfigError` if the TOML is malformed or has no responses.
    pub fn from_toml_str(s: &str) -> AgentResult<Self> {
        let document: ScriptDocument = parse("script", s)?;
        if document.responses.is_empty() {
            return Err(AgentError::ConfigError {
                reason: "script must contain at least one response".to_string(),
            });
        }
        Ok(Self { document })
    }

    pub fn from_file(path: &Path) -> AgentResult<Self> {
        Self::from_toml_str(&read(path, "script")?)
    }

    pub fn query(&self) -> Option<&str> {
        self.document.query.as_deref()
    }

    pub fn responses(&self) -> &[String] {
        &self.document.responses
    }

    pub fn into_model(self) -> ScriptedModel {
        ScriptedModel::new(self.document.responses)
    }
}

fn parse<T: DeserializeOwned>(what: &str, s: &str) -> AgentResult<T> {
    toml::from_str(s).map_err(|e| {
        warn!(document = what, error = %e, "rejected TOML document");
        AgentError::ConfigError {
            reason: format!("failed to parse {what} TOML: {e}"),
        }
    })
}

fn read(path: &Path, what: &str) -> AgentResult<String> {
    std::fs::read_to_string(path).map_err(|e| AgentError::ConfigError {
        reason: format!("failed to read {what} file '{}': {}", path.display(), e),
    })
}
