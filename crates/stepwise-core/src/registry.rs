//! The tool registry and the closure-backed tool adapter.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use stepwise_contracts::{
    error::{AgentError, AgentResult, ToolError, ToolFailure},
    tool::ToolSpec,
};

use crate::traits::{ArgumentValidator, Arguments, Invocable};

/// Name → tool mapping shared by every run of an agent.
///
/// Registration happens before the first invocation; afterwards the
/// registry is only read and may be shared across threads behind an `Arc`.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Invocable>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its declared name.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the name is empty or already taken.
    pub fn register<T: Invocable + 'static>(&mut self, tool: T) -> AgentResult<()> {
        self.register_shared(Arc::new(tool))
    }

    pub fn register_shared(&mut self, tool: Arc<dyn Invocable>) -> AgentResult<()> {
        let name = tool.name().to_string();
        if name.trim().is_empty() {
            return Err(AgentError::ConfigError {
                reason: "tool name must not be empty".to_string(),
            });
        }
        if self.tools.contains_key(&name) {
            return Err(AgentError::ConfigError {
                reason: format!("tool '{name}' is already registered"),
            });
        }
        debug!(tool = %name, "tool registered");
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Invocable>> {
        self.tools.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn specs(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.values().map(|t| t.spec())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up, validate and call a tool.
    ///
    /// Every failure is reported as a recoverable [`ToolFailure`]: unknown
    /// names, rejected arguments, errors returned by the tool and panics
    /// raised inside it.
    pub fn invoke(
        &self,
        name: &str,
        args: &Arguments,
        validator: &dyn ArgumentValidator,
    ) -> Result<Value, ToolFailure> {
        let tool = self.get(name).ok_or_else(|| ToolFailure::ToolNotFound {
            name: name.to_string(),
            available: self.names(),
        })?;

        let report = validator.validate(tool.spec(), args);
        if !report.passed {
            warn!(tool = %name, failures = report.failures.len(), "arguments rejected");
            return Err(execution_failure(
                name,
                args,
                format!("argument validation failed: {}", report.summary()),
            ));
        }

        match panic::catch_unwind(AssertUnwindSafe(|| tool.call(args))) {
            Ok(Ok(value)) => {
                debug!(tool = %name, "tool returned");
                Ok(value)
            }
            Ok(Err(err)) => {
                warn!(tool = %name, error = %err, "tool failed");
                Err(execution_failure(name, args, err.to_string()))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(tool = %name, panic = %message, "tool panicked");
                Err(execution_failure(name, args, format!("tool panicked: {message}")))
            }
        }
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn execution_failure(tool: &str, args: &Arguments, reason: String) -> ToolFailure {
    ToolFailure::ToolExecution {
        tool: tool.to_string(),
        args: Value::Object(args.clone()),
        reason,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

type ToolFn = dyn Fn(&Arguments) -> Result<Value, ToolError> + Send + Sync;

/// A tool backed by a closure.
pub struct FnTool {
    spec: ToolSpec,
    func: Box<ToolFn>,
}

impl FnTool {
    /// Wrap a closure that receives the raw argument mapping.
    pub fn new<F>(spec: ToolSpec, func: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        Self {
            spec,
            func: Box::new(func),
        }
    }

    /// Wrap a closure over a typed argument struct.
    ///
    /// The mapping is deserialized into `A` first; a mismatch becomes
    /// `ToolError::InvalidArguments` and so a `ToolExecution` failure.
    pub fn typed<A, F>(spec: ToolSpec, func: F) -> Self
    where
        A: DeserializeOwned,
        F: Fn(A) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        Self::new(spec, move |args| {
            let parsed: A = serde_json::from_value(Value::Object(args.clone()))
                .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
            func(parsed)
        })
    }
}

impl Invocable for FnTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn call(&self, args: &Arguments) -> Result<Value, ToolError> {
        (self.func)(args)
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool").field("spec", &self.spec).finish()
    }
}
