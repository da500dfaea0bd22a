//! Schema-based argument validator.
//!
//! `SchemaValidator` implements `ArgumentValidator` from `stepwise-core`.
//! Validation runs in two phases:
//!
//! 1. **Structural**: the argument mapping is validated against the tool's
//!    JSON Schema, either compiled from its `ToolSpec` or registered
//!    explicitly with `register_schema`.
//! 2. **Semantic**: checks registered per tool with `register_check` run in
//!    registration order.
//!
//! All failures are collected before returning so the model sees the full
//! set in one corrective message.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use stepwise_contracts::tool::{ToolSpec, ValidationFailure, ValidationReport};
use stepwise_core::traits::{ArgumentValidator, Arguments};

use crate::schema::schema_for;

/// A caller-supplied argument check.
///
/// Returns `Some(message)` when the arguments are unacceptable.
pub type ArgumentCheckFn = Box<dyn Fn(&Arguments) -> Option<String> + Send + Sync>;

/// Validates tool arguments with JSON Schema plus optional per-tool checks.
#[derive(Default)]
pub struct SchemaValidator {
    schemas: HashMap<String, Value>,
    checks: HashMap<String, Vec<ArgumentCheckFn>>,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `schema` instead of the one compiled from the tool's declaration.
    pub fn register_schema(&mut self, tool: impl Into<String>, schema: Value) {
        self.schemas.insert(tool.into(), schema);
    }

    /// Add a semantic check for `tool`.
    pub fn register_check(&mut self, tool: impl Into<String>, check: ArgumentCheckFn) {
        self.checks.entry(tool.into()).or_default().push(check);
    }

    /// The schema `validate` uses for `spec`.
    pub fn schema(&self, spec: &ToolSpec) -> Value {
        self.schemas
            .get(&spec.name)
            .cloned()
            .unwrap_or_else(|| schema_for(spec))
    }
}

impl ArgumentValidator for SchemaValidator {
    fn validate(&self, spec: &ToolSpec, args: &Arguments) -> ValidationReport {
        let mut failures = Vec::new();
        let instance = Value::Object(args.clone());

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        let schema = self.schema(spec);
        match jsonschema::validator_for(&schema) {
            Ok(validator) => {
                for error in validator.iter_errors(&instance) {
                    let path = error.instance_path.to_string();
                    let parameter = path
                        .trim_start_matches('/')
                        .split('/')
                        .next()
                        .filter(|s| !s.is_empty())
                        .map(str::to_string);
                    warn!(tool = %spec.name, path = %path, error = %error, "argument schema violation");
                    failures.push(ValidationFailure {
                        parameter,
                        message: error.to_string(),
                    });
                }
            }
            Err(e) => {
                warn!(tool = %spec.name, error = %e, "invalid argument schema");
                failures.push(ValidationFailure {
                    parameter: None,
                    message: format!("invalid JSON Schema for tool '{}': {e}", spec.name),
                });
            }
        }

        // ── Phase 2: Registered checks ───────────────────────────────────────
        for check in self.checks.get(&spec.name).into_iter().flatten() {
            if let Some(message) = check(args) {
                warn!(tool = %spec.name, %message, "argument check failed");
                failures.push(ValidationFailure {
                    parameter: None,
                    message,
                });
            }
        }

        debug!(
            tool = %spec.name,
            failure_count = failures.len(),
            "argument validation complete"
        );
        ValidationReport::from_failures(failures)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use stepwise_contracts::tool::{ParamKind, ParamSpec, ToolSpec};
    use stepwise_core::traits::{ArgumentValidator, Arguments};

    use super::SchemaValidator;

    fn divide() -> ToolSpec {
        ToolSpec::new("divide", "Divide a by b.")
            .param(ParamSpec::required("a", ParamKind::Number))
            .param(ParamSpec::required("b", ParamKind::Number))
            .param(ParamSpec::optional("precision", ParamKind::Integer))
    }

    fn args(value: serde_json::Value) -> Arguments {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_arguments_pass() {
        let report = SchemaValidator::new().validate(&divide(), &args(json!({"a": 10, "b": 2.5})));
        assert!(report.passed, "unexpected failures: {:?}", report.failures);
    }

    #[test]
    fn test_optional_parameter_accepted() {
        let report = SchemaValidator::new()
            .validate(&divide(), &args(json!({"a": 1, "b": 3, "precision": 2})));
        assert!(report.passed);
    }

    #[test]
    fn test_missing_required_parameter() {
        let report = SchemaValidator::new().validate(&divide(), &args(json!({"a": 10})));
        assert!(!report.passed);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("\"b\""));
    }

    #[test]
    fn test_wrong_type_names_parameter() {
        let report =
            SchemaValidator::new().validate(&divide(), &args(json!({"a": "ten", "b": 2})));
        assert!(!report.passed);
        assert_eq!(report.failures[0].parameter.as_deref(), Some("a"));
        assert!(report.summary().starts_with("[a] "));
    }

    #[test]
    fn test_integer_kind_rejects_fraction() {
        let report = SchemaValidator::new()
            .validate(&divide(), &args(json!({"a": 1, "b": 3, "precision": 1.5})));
        assert!(!report.passed);
        assert_eq!(report.failures[0].parameter.as_deref(), Some("precision"));
    }

    #[test]
    fn test_undeclared_parameter_rejected() {
        let report = SchemaValidator::new()
            .validate(&divide(), &args(json!({"a": 1, "b": 2, "c": 3})));
        assert!(!report.passed);
    }

    #[test]
    fn test_all_failures_collected() {
        let report =
            SchemaValidator::new().validate(&divide(), &args(json!({"a": "x", "extra": true})));
        // wrong type for a, missing b, undeclared extra
        assert_eq!(report.failures.len(), 3, "failures: {:?}", report.failures);
    }

    #[test]
    fn test_any_kind_accepts_everything() {
        let spec = ToolSpec::new("echo", "").param(ParamSpec::required("value", ParamKind::Any));
        let validator = SchemaValidator::new();
        for value in [json!(1), json!("s"), json!([1]), json!({"k": null}), json!(null)] {
            assert!(validator.validate(&spec, &args(json!({ "value": value }))).passed);
        }
    }

    #[test]
    fn test_registered_check_runs_after_schema() {
        let mut validator = SchemaValidator::new();
        validator.register_check(
            "divide",
            Box::new(|args: &Arguments| match args.get("b").and_then(|b| b.as_f64()) {
                Some(b) if b == 0.0 => Some("b must not be zero".to_string()),
                _ => None,
            }),
        );

        assert!(validator.validate(&divide(), &args(json!({"a": 1, "b": 2}))).passed);
        let report = validator.validate(&divide(), &args(json!({"a": 1, "b": 0})));
        assert!(!report.passed);
        assert_eq!(report.summary(), "b must not be zero");
    }

    #[test]
    fn test_registered_schema_overrides_declaration() {
        let mut validator = SchemaValidator::new();
        validator.register_schema(
            "divide",
            json!({
                "type": "object",
                "properties": { "b": { "type": "number", "exclusiveMinimum": 0 } },
                "required": ["a", "b"]
            }),
        );

        assert!(validator.validate(&divide(), &args(json!({"a": 1, "b": 2, "c": 3}))).passed);
        assert!(!validator.validate(&divide(), &args(json!({"a": 1, "b": -2}))).passed);
    }

    #[test]
    fn test_invalid_schema_is_a_failure() {
        let mut validator = SchemaValidator::new();
        validator.register_schema("divide", json!({ "type": "not-a-type" }));
        let report = validator.validate(&divide(), &args(json!({"a": 1, "b": 2})));
        assert!(!report.passed);
        assert!(report.failures[0].message.contains("invalid JSON Schema"));
    }
}
