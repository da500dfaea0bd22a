//! # stepwise-verify
//!
//! Argument validation for stepwise tools.
//!
//! This crate provides [`engine::SchemaValidator`], which implements the
//! [`stepwise_core::traits::ArgumentValidator`] trait. Arguments are checked
//! before a tool is invoked:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate,
//!    against a schema compiled from the tool's declared parameters.
//! 2. **Semantic**: per-tool checks registered by the host application.
//!
//! A failed report becomes a `ToolExecution` failure that the model sees as
//! a corrective message; the tool itself is never called.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stepwise_verify::SchemaValidator;
//!
//! let mut validator = SchemaValidator::new();
//! validator.register_check("divide", Box::new(|args| {
//!     (args.get("b").and_then(|b| b.as_f64()) == Some(0.0))
//!         .then(|| "b must not be zero".to_string())
//! }));
//! let agent = Agent::builder(model).validator(Arc::new(validator)).build()?;
//! ```

pub mod engine;
pub mod schema;

pub use engine::{ArgumentCheckFn, SchemaValidator};
pub use schema::schema_for;

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stepwise_contracts::tool::{ParamKind, ParamSpec, ToolSpec};

    use super::schema_for;

    #[test]
    fn test_schema_shape() {
        let spec = ToolSpec::new("get_weather", "")
            .param(ParamSpec::required("city", ParamKind::String))
            .param(ParamSpec::optional("days", ParamKind::Integer))
            .param(ParamSpec::optional("extra", ParamKind::Any));

        assert_eq!(
            schema_for(&spec),
            json!({
                "type": "object",
                "properties": {
                    "city": { "type": "string" },
                    "days": { "type": "integer" },
                    "extra": {}
                },
                "required": ["city"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_no_parameters() {
        let schema = schema_for(&ToolSpec::new("ping", ""));
        assert_eq!(schema["properties"], json!({}));
        assert_eq!(schema["required"], json!([]));
    }
}
