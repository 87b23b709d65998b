#![forbid(unsafe_code)]

//! Runtime: the reactive input-to-table pipeline.
//!
//! # Role in gugu
//! `gugu-runtime` sits between an input source (a text field, a line reader,
//! a test) and a display. It holds the latest raw input, recomputes the table
//! through `gugu-core` on every change, and pushes the result or an error to
//! a [`TableSink`].
//!
//! # Primary responsibilities
//! - **reactive**: [`ValueHolder`], the replay-latest input slot.
//! - **sink**: the [`TableSink`] boundary and stock sinks.
//! - **pipeline**: [`Pipeline`], the orchestrator and its state machine.
//! - **config**: [`PipelineConfig`], builders and environment overrides.
//! - **logging**: optional `tracing-subscriber` bootstrap.
//!
//! # Concurrency
//! Everything is single-threaded (`Rc`/`Cell`/`RefCell`). Events are handled
//! synchronously in the order they are delivered.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod reactive;
pub mod sink;

pub use config::{ConfigError, ConfigParse, EmptyInputPolicy, PipelineConfig};
pub use pipeline::{Pipeline, PipelineState, PipelineStats};
pub use reactive::{Subscription, ValueHolder};
pub use sink::{ErrorSignal, FnSink, RecordingSink, SinkEvent, TableSink, TracingSink};
