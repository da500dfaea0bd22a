//! Reference tools.
//!
//! Arithmetic tools keep integer results integral: `multiply(3, 4)` is `12`,
//! not `12.0`. Lookup tools raise `ToolError::Failed` for unknown keys, which
//! the runtime turns into a corrective message for the model.

use serde::Deserialize;
use serde_json::{json, Number, Value};

use stepwise_contracts::{
    error::{AgentResult, ToolError},
    tool::{ParamKind, ParamSpec, ToolSpec},
};
use stepwise_core::{FnTool, ToolRegistry};

use crate::mock_data;

/// Error string `divide` returns (not raises) for a zero divisor.
pub const DIVISION_BY_ZERO: &str = "Error: division by zero";

#[derive(Debug, Deserialize)]
struct Operands {
    a: Number,
    b: Number,
}

impl Operands {
    fn integers(&self) -> Option<(i64, i64)> {
        Some((self.a.as_i64()?, self.b.as_i64()?))
    }

    fn floats(&self) -> Result<(f64, f64), ToolError> {
        match (self.a.as_f64(), self.b.as_f64()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(ToolError::InvalidArguments(
                "operands must be finite numbers".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(alias = "city")]
    country: String,
}

#[derive(Debug, Deserialize)]
struct Country {
    country: String,
}

#[derive(Debug, Deserialize)]
struct City {
    city: String,
}

fn operands_spec(name: &str, description: &str, kind: ParamKind) -> ToolSpec {
    ToolSpec::new(name, description)
        .param(ParamSpec::required("a", kind))
        .param(ParamSpec::required("b", kind))
}

fn float(value: f64) -> Result<Value, ToolError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| ToolError::Failed(format!("result {value} is not a finite number")))
}

pub fn multiply() -> FnTool {
    FnTool::typed(
        operands_spec("multiply", "Multiply a by b and return the product.", ParamKind::Number),
        |ops: Operands| match ops.integers() {
            Some((a, b)) => a
                .checked_mul(b)
                .map(|p| json!(p))
                .ok_or_else(|| ToolError::Failed("integer overflow".to_string())),
            None => {
                let (a, b) = ops.floats()?;
                float(a * b)
            }
        },
    )
}

pub fn add() -> FnTool {
    FnTool::typed(
        operands_spec("add", "Add a and b and return the sum.", ParamKind::Number),
        |ops: Operands| match ops.integers() {
            Some((a, b)) => a
                .checked_add(b)
                .map(|s| json!(s))
                .ok_or_else(|| ToolError::Failed("integer overflow".to_string())),
            None => {
                let (a, b) = ops.floats()?;
                float(a + b)
            }
        },
    )
}

/// Returns the error string [`DIVISION_BY_ZERO`] for `b == 0`.
pub fn divide() -> FnTool {
    FnTool::typed(
        operands_spec("divide", "Divide a by b and return the quotient.", ParamKind::Number),
        |ops: Operands| {
            let (a, b) = ops.floats()?;
            if b == 0.0 {
                return Ok(json!(DIVISION_BY_ZERO));
            }
            match ops.integers() {
                Some((a, b)) if a.checked_rem(b) == Some(0) => Ok(json!(a / b)),
                _ => float(a / b),
            }
        },
    )
}

pub fn get_weather() -> FnTool {
    FnTool::typed(
        ToolSpec::new(
            "get_weather",
            "Return the current temperature in degrees Celsius for a country or city.",
        )
        .param(ParamSpec::required("country", ParamKind::String)),
        |place: Place| {
            mock_data::weather(&place.country)
                .map(|t| json!(t))
                .ok_or_else(|| ToolError::Failed(format!("no weather data for '{}'", place.country)))
        },
    )
}

pub fn get_next_day_prediction() -> FnTool {
    FnTool::typed(
        ToolSpec::new(
            "get_next_day_prediction",
            "Return tomorrow's forecast temperature in degrees Celsius for a country or city.",
        )
        .param(ParamSpec::required("country", ParamKind::String)),
        |place: Place| {
            mock_data::next_day_prediction(&place.country)
                .map(|t| json!(t))
                .ok_or_else(|| ToolError::Failed(format!("no forecast for '{}'", place.country)))
        },
    )
}

pub fn get_capital() -> FnTool {
    FnTool::typed(
        ToolSpec::new("get_capital", "Return the capital city of a country.")
            .param(ParamSpec::required("country", ParamKind::String)),
        |c: Country| {
            mock_data::capital(&c.country)
                .map(|name| json!(name))
                .ok_or_else(|| ToolError::Failed(format!("unknown country '{}'", c.country)))
        },
    )
}

pub fn get_population() -> FnTool {
    FnTool::typed(
        ToolSpec::new("get_population", "Return the population of a city.")
            .param(ParamSpec::required("city", ParamKind::String)),
        |c: City| {
            mock_data::population(&c.city)
                .map(|p| json!(p))
                .ok_or_else(|| ToolError::Failed(format!("unknown city '{}'", c.city)))
        },
    )
}

/// `multiply`, `divide` and `add`.
pub fn arithmetic_registry() -> AgentResult<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(multiply())?;
    registry.register(divide())?;
    registry.register(add())?;
    Ok(registry)
}

/// The weather, capital and population lookups.
pub fn geography_registry() -> AgentResult<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(get_weather())?;
    registry.register(get_next_day_prediction())?;
    registry.register(get_capital())?;
    registry.register(get_population())?;
    Ok(registry)
}

/// Every reference tool.
pub fn full_registry() -> AgentResult<ToolRegistry> {
    let mut registry = arithmetic_registry()?;
    for tool in [get_weather(), get_next_day_prediction(), get_capital(), get_population()] {
        registry.register(tool)?;
    }
    Ok(registry)
}
