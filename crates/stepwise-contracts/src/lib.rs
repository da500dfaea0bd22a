//! # stepwise-contracts
//!
//! Shared types, configuration, and error contracts for the stepwise agent
//! runtime.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod config;
pub mod error;
pub mod execution;
pub mod memory;
pub mod state;
pub mod tool;

#[cfg(test)]
mod tests {
    use super::*;
    use config::AgentConfig;
    use error::{AgentError, ToolFailure};
    use execution::RunId;
    use memory::{MemoryEntry, Role};
    use serde_json::json;
    use state::StateType;
    use tool::{ParamKind, ParamSpec, ToolSpec, ValidationFailure, ValidationReport};

    // ── StateType ────────────────────────────────────────────────────────────

    #[test]
    fn state_type_reserved_labels_are_not_working() {
        assert!(!StateType::START.is_working());
        assert!(!StateType::ERROR.is_working());
        assert!(!StateType::END.is_working());
        assert!(StateType::STEP.is_working());
        assert!(StateType::new("PLAN").is_working());
    }

    #[test]
    fn state_type_owned_and_borrowed_compare_equal() {
        assert_eq!(StateType::new("END"), StateType::END);
        assert_eq!(StateType::from("THINK"), StateType::THINK);
        assert_eq!(StateType::ACT.to_string(), "ACT");
    }

    #[test]
    fn state_type_serializes_as_plain_string() {
        let json = serde_json::to_string(&StateType::OBSERVE).unwrap();
        assert_eq!(json, "\"OBSERVE\"");
        let decoded: StateType = serde_json::from_str("\"STEP\"").unwrap();
        assert_eq!(decoded, StateType::STEP);
    }

    // ── Memory entries ───────────────────────────────────────────────────────

    #[test]
    fn memory_entry_role_serializes_lowercase() {
        let entry = MemoryEntry::assistant("<tool>multiply</tool>");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(Role::User.to_string(), "user");
    }

    // ── Tool specs ───────────────────────────────────────────────────────────

    #[test]
    fn tool_spec_signature_marks_optional_params() {
        let spec = ToolSpec::new("search", "Search the index")
            .param(ParamSpec::required("query", ParamKind::String))
            .param(ParamSpec::optional("limit", ParamKind::Integer));
        assert_eq!(spec.signature(), "search(query: string, limit?: integer)");
    }

    #[test]
    fn param_spec_required_defaults_to_true() {
        let spec: ParamSpec = serde_json::from_value(json!({ "name": "a", "kind": "number" })).unwrap();
        assert!(spec.required);
        assert_eq!(spec.kind, ParamKind::Number);
    }

    #[test]
    fn validation_report_summary_joins_failures() {
        let report = ValidationReport::from_failures(vec![
            ValidationFailure { parameter: Some("a".to_string()), message: "missing".to_string() },
            ValidationFailure { parameter: None, message: "unexpected key 'c'".to_string() },
        ]);
        assert!(!report.passed);
        assert_eq!(report.summary(), "[a] missing; unexpected key 'c'");
        assert!(ValidationReport::from_failures(vec![]).passed);
    }

    // ── Config ───────────────────────────────────────────────────────────────

    #[test]
    fn agent_config_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.stop_word, None);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.max_iters, 20);
        assert_eq!(config.max_retries, Some(3));
        assert_eq!(config.tool_tag, "tool");
        assert_eq!(config.args_tag, "args");
    }

    #[test]
    fn agent_config_partial_document_keeps_defaults() {
        let config: AgentConfig =
            serde_json::from_value(json!({ "stop_word": "PAUSE", "max_iters": 5 })).unwrap();
        assert_eq!(config.stop_word.as_deref(), Some("PAUSE"));
        assert_eq!(config.max_iters, 5);
        assert_eq!(config.max_tokens, 1024);
    }

    // ── RunId ────────────────────────────────────────────────────────────────

    #[test]
    fn run_id_new_produces_unique_values() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| RunId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn tool_not_found_lists_available_tools() {
        let failure = ToolFailure::ToolNotFound {
            name: "sqrt".to_string(),
            available: vec!["divide".to_string(), "multiply".to_string()],
        };
        let msg = failure.to_string();
        assert!(msg.contains("'sqrt'"));
        assert!(msg.contains("[divide, multiply]"));
        assert_eq!(failure.kind(), "tool_not_found");
    }

    #[test]
    fn tool_execution_includes_args_and_reason() {
        let failure = ToolFailure::ToolExecution {
            tool: "divide".to_string(),
            args: json!({ "a": 1 }),
            reason: "missing b".to_string(),
        };
        let msg = failure.to_string();
        assert!(msg.contains("divide"));
        assert!(msg.contains(r#"{"a":1}"#));
        assert!(msg.contains("missing b"));
    }

    #[test]
    fn parsing_tool_echoes_response_and_expected_format() {
        let failure = ToolFailure::ParsingTool {
            response: "multiply(3, 4)".to_string(),
            reason: "missing <tool> tag".to_string(),
            expected: "<tool>NAME</tool> <args>{...}</args>".to_string(),
        };
        let msg = failure.to_string();
        assert!(msg.contains("multiply(3, 4)"));
        assert!(msg.contains("<tool>NAME</tool>"));
    }

    #[test]
    fn invalid_transition_lists_allowed_successors() {
        let err = AgentError::InvalidTransition {
            from: StateType::ERROR,
            to: StateType::END,
            allowed: vec![StateType::STEP],
        };
        let msg = err.to_string();
        assert!(msg.contains("ERROR -> END"));
        assert!(msg.contains("[STEP]"));
    }

    #[test]
    fn limit_errors_name_last_state() {
        let err = AgentError::RetryLimitExceeded {
            retries: 3,
            last_state: StateType::ERROR,
            memory_tail: vec![],
        };
        assert!(err.to_string().contains("3 consecutive errors"));

        let err = AgentError::IterationLimitExceeded {
            iterations: 20,
            last_state: StateType::STEP,
            memory_tail: vec![],
        };
        assert!(err.to_string().contains("20 state executions"));
        assert!(err.to_string().contains("STEP"));
    }
}
