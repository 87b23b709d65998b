#![forbid(unsafe_code)]

//! Input-to-table orchestration.
//!
//! A [`Pipeline`] owns the input [`ValueHolder`], the [`TableSink`], and a
//! single slot for the computation chain that reflects the current input.
//!
//! # State Machine
//!
//! ```text
//!            on_input_changed(raw)
//!   Idle ───────────────────────────▶ Validating
//!    ▲                                  │    │
//!    │            parse ok ─────────────┘    └──────── parse failed
//!    │               ▼                                      ▼
//!    └──────── Emitting(Table) ◀─ ─ ─ ─ ─ ─ ─ ─ ─ ─ Failed(ErrorSignal)
//!                 (sink.on_table_ready)           (sink.on_error)
//! ```
//!
//! Both terminal states return to `Idle` before `on_input_changed` returns.
//!
//! # Ordering
//!
//! Processing is synchronous: each event runs to completion before the
//! caller regains control, so events are handled strictly in delivery order.
//! On every event the previous chain is dropped *before* the new value is
//! written, then a fresh chain subscribes and receives the value through the
//! holder's replay. At most one chain is ever attached, and the sink only
//! sees results for the most recent input.

use std::cell::Cell;
use std::rc::Rc;

use gugu_core::{Base, BaseError, Table, parse_base_with_limit};
use tracing::{debug, debug_span, trace};

use crate::config::{EmptyInputPolicy, PipelineConfig};
use crate::reactive::{Subscription, ValueHolder};
use crate::sink::{ErrorSignal, TableSink};

/// Where the pipeline is in handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Validating,
    Emitting,
    Failed,
}

impl PipelineState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Emitting => "emitting",
            Self::Failed => "failed",
        }
    }
}

/// Delivery counters since the pipeline was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Chain runs (input events plus `start`).
    pub events: u64,
    /// Tables delivered to `on_table_ready`.
    pub tables: u64,
    /// Signals delivered to `on_error`.
    pub errors: u64,
    /// Partial accumulations delivered to `on_partial`.
    pub partials: u64,
}

#[derive(Debug, Default)]
struct Shared {
    state: Cell<PipelineState>,
    stats: Cell<PipelineStats>,
}

impl Shared {
    fn transition(&self, next: PipelineState) {
        let prev = self.state.replace(next);
        trace!(from = prev.as_str(), to = next.as_str(), "pipeline state");
    }

    fn bump(&self, f: impl FnOnce(&mut PipelineStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

/// One computation chain: validate, expand rows, format, fold, deliver.
struct Chain {
    max_base: u64,
    empty_input: EmptyInputPolicy,
    emit_partials: bool,
    sink: Rc<dyn TableSink>,
    shared: Rc<Shared>,
}

impl Chain {
    fn run(&self, raw: &str) {
        self.shared.bump(|s| s.events += 1);
        self.shared.transition(PipelineState::Validating);

        match self.resolve(raw) {
            Ok(base) => {
                self.shared.transition(PipelineState::Emitting);
                self.emit(base);
            }
            Err(err) => {
                self.shared.transition(PipelineState::Failed);
                debug!(kind = err.kind(), "input rejected");
                self.sink.on_error(&ErrorSignal::new(raw, err));
                self.shared.bump(|s| s.errors += 1);
            }
        }

        self.shared.transition(PipelineState::Idle);
    }

    fn resolve(&self, raw: &str) -> Result<Base, BaseError> {
        if raw.is_empty() && self.empty_input == EmptyInputPolicy::ZeroTable {
            return Ok(Base::ZERO);
        }
        parse_base_with_limit(raw, self.max_base)
    }

    fn emit(&self, base: Base) {
        if self.emit_partials {
            for partial in Table::partials(base) {
                self.sink.on_partial(&partial);
                self.shared.bump(|s| s.partials += 1);
            }
        }
        let table = Table::for_base(base);
        debug!(base = base.get(), "table ready");
        self.sink.on_table_ready(&table);
        self.shared.bump(|s| s.tables += 1);
    }
}

/// Reactive input-to-table pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    holder: ValueHolder<String>,
    sink: Rc<dyn TableSink>,
    shared: Rc<Shared>,
    /// The one chain reflecting the current input, if attached.
    active: Option<Subscription>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("input", &self.holder)
            .field("state", &self.shared.state.get())
            .field("attached", &self.active.is_some())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline. Nothing is delivered until the first event or
    /// [`start`](Self::start).
    pub fn new(config: PipelineConfig, sink: impl TableSink + 'static) -> Self {
        let holder = ValueHolder::new(config.initial_value.clone());
        Self {
            config,
            holder,
            sink: Rc::new(sink),
            shared: Rc::new(Shared::default()),
            active: None,
        }
    }

    /// Create a pipeline with the default configuration.
    pub fn with_sink(sink: impl TableSink + 'static) -> Self {
        Self::new(PipelineConfig::default(), sink)
    }

    /// Attach a chain to the current value without writing new input.
    ///
    /// With the default configuration this delivers the table for `"0"`.
    /// Any previously attached chain is released first.
    pub fn start(&mut self) {
        let _span = debug_span!("pipeline.start").entered();
        self.active = None;
        self.attach();
    }

    /// Handle a changed input string.
    pub fn on_input_changed(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        let _span = debug_span!("pipeline.event", version = self.holder.version() + 1).entered();
        debug!(input = %raw, "input changed");

        // Release the stale chain before the write so it never observes it.
        self.active = None;
        self.holder.set(raw);
        self.attach();
    }

    /// Release the active chain. A later event attaches a new one.
    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            debug!("pipeline stopped");
        }
    }

    fn attach(&mut self) {
        let chain = Chain {
            max_base: self.config.effective_max_base(),
            empty_input: self.config.empty_input,
            emit_partials: self.config.emit_partials,
            sink: Rc::clone(&self.sink),
            shared: Rc::clone(&self.shared),
        };
        self.active = Some(self.holder.subscribe(move |raw: &String| chain.run(raw)));
    }

    /// Whether a chain is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.shared.state.get()
    }

    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        self.shared.stats.get()
    }

    /// The latest raw input.
    #[must_use]
    pub fn current_input(&self) -> String {
        self.holder.get()
    }

    /// Handle to the input holder, for observers of the raw text.
    #[must_use]
    pub fn input(&self) -> ValueHolder<String> {
        self.holder.clone()
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
