//! # stepwise-ref-tools
//!
//! Reference tools and runnable scenarios for the stepwise agent runtime.
//!
//! Tools:
//!
//! - **Arithmetic**: `multiply`, `add`, `divide`. Integer inputs give
//!   integer results; `divide` returns an error string for a zero divisor.
//! - **Geography**: `get_weather`, `get_next_day_prediction`, `get_capital`,
//!   `get_population`, backed by fictional tables in [`mock_data`].
//!
//! Scenarios replay scripted model answers, so every run is deterministic
//! and nothing calls an external service:
//!
//! 1. **multiply**: one tool call, START -> STEP -> END.
//! 2. **divide**: a tool returning an error value still ends the run.
//! 3. **unknown_tool**: recovery from an unknown tool and bad arguments.
//! 4. **cannot_comply**: the `None` sentinel ends the run with an explanation.
//! 5. **retry_limit**: an unparseable model exhausts `max_retries`.
//! 6. **react_weather**: the ReAct workflow over two lookups.

pub mod mock_data;
pub mod scenarios;
pub mod tools;

// ── Tests ─────────────────────────────────────────────────────────────────────
