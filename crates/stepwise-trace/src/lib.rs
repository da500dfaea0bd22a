//! # stepwise-trace
//!
//! Append-only, SHA-256 hash-chained record of every transition an agent
//! performs.
//!
//! ## Overview
//!
//! Each `StepRecord` the driver produces is wrapped in a `TraceEvent` that
//! links to the previous event of the same run via its SHA-256 hash.
//! Modifying any stored event breaks the chain and is detected by
//! `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stepwise_trace::InMemoryTraceWriter;
//!
//! let trace = InMemoryTraceWriter::new();
//! let agent = Agent::builder(model).trace(Arc::new(trace.clone())).build()?;
//! let outcome = agent.run("What is 3 multiplied by 4?")?;
//!
//! assert!(trace.verify_run(&outcome.run_id));
//! let log = trace.export_log(&outcome.run_id);
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_event, verify_chain};
pub use event::{TraceEvent, TraceLog};
pub use memory::InMemoryTraceWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────
