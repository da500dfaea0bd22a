//! # stepwise-config
//!
//! TOML configuration for stepwise agents.
//!
//! ## Overview
//!
//! [`AgentSettings`] reads a document selecting the workflow, the scalar
//! [`AgentConfig`](stepwise_contracts::config::AgentConfig), and optionally a
//! replacement transition table and prompt template. [`Script`] reads a list
//! of canned model responses for replay through `ScriptedModel`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use stepwise_config::AgentSettings;
//!
//! let settings = AgentSettings::from_file(Path::new("agent.toml"))?;
//! let agent = settings.apply(Agent::builder(model)).tools(tools).build()?;
//! ```
//!
//! Malformed documents and malformed transition tables are rejected with
//! `AgentError::ConfigError` at load time, before any agent is built.

pub mod schema;
pub mod settings;

pub use schema::{PromptSection, ScriptDocument, SettingsDocument, WorkflowKind};
pub use settings::{AgentSettings, Script};

// ── Tests ─────────────────────────────────────────────────────────────────────
