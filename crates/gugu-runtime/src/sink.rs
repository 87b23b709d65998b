#![forbid(unsafe_code)]

//! Display sinks for pipeline output.
//!
//! A [`TableSink`] is the boundary to whatever shows the result. It has two
//! channels: finished tables and [`ErrorSignal`]s. A third, optional channel
//! carries the partial accumulations when the pipeline is configured to emit
//! them.
//!
//! Stock implementations:
//!
//! - [`RecordingSink`]: keeps every delivery in order. Used by tests and by
//!   embedders that poll instead of reacting.
//! - [`TracingSink`]: logs deliveries through `tracing`.
//! - [`FnSink`]: adapts a pair of closures.

use core::fmt;
use std::cell::RefCell;

use gugu_core::{BaseError, Table};

/// Failure delivered on the error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSignal {
    input: String,
    error: BaseError,
}

impl ErrorSignal {
    #[must_use]
    pub fn new(input: impl Into<String>, error: BaseError) -> Self {
        Self {
            input: input.into(),
            error,
        }
    }

    /// The raw input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn error(&self) -> &BaseError {
        &self.error
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl fmt::Display for ErrorSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for ErrorSignal {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Receiver of pipeline output.
///
/// Methods take `&self`: sinks are shared with the active computation chain
/// and use interior mutability where they keep state.
pub trait TableSink {
    /// A complete nine-line table is ready for display.
    fn on_table_ready(&self, table: &Table);

    /// The latest input could not be turned into a table.
    fn on_error(&self, error: &ErrorSignal);

    /// A partial accumulation on the way to the next table.
    ///
    /// Only called when partial emission is enabled.
    fn on_partial(&self, _partial: &str) {}
}

impl<S: TableSink + ?Sized> TableSink for std::rc::Rc<S> {
    fn on_table_ready(&self, table: &Table) {
        (**self).on_table_ready(table);
    }

    fn on_error(&self, error: &ErrorSignal) {
        (**self).on_error(error);
    }

    fn on_partial(&self, partial: &str) {
        (**self).on_partial(partial);
    }
}

/// One delivery observed by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Table(String),
    Error(String),
    Partial(String),
}

impl SinkEvent {
    /// The table text, if this is a table delivery.
    #[must_use]
    pub fn as_table(&self) -> Option<&str> {
        match self {
            Self::Table(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Sink that records every delivery in call order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<SinkEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all deliveries so far.
    #[must_use]
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return all deliveries so far.
    pub fn take(&self) -> Vec<SinkEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Table texts only, in delivery order.
    #[must_use]
    pub fn tables(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(SinkEvent::as_table)
            .map(str::to_owned)
            .collect()
    }

    /// Error messages only, in delivery order.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent table or error delivery, ignoring partials.
    #[must_use]
    pub fn last_terminal(&self) -> Option<SinkEvent> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|event| !matches!(event, SinkEvent::Partial(_)))
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl TableSink for RecordingSink {
    fn on_table_ready(&self, table: &Table) {
        self.events
            .borrow_mut()
            .push(SinkEvent::Table(table.as_str().to_owned()));
    }

    fn on_error(&self, error: &ErrorSignal) {
        self.events
            .borrow_mut()
            .push(SinkEvent::Error(error.message()));
    }

    fn on_partial(&self, partial: &str) {
        self.events
            .borrow_mut()
            .push(SinkEvent::Partial(partial.to_owned()));
    }
}

/// Sink that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TableSink for TracingSink {
    fn on_table_ready(&self, table: &Table) {
        tracing::info!(base = table.base().get(), lines = table.line_count(), "table ready");
        tracing::debug!(table = %table.as_str().trim_end(), "table text");
    }

    fn on_error(&self, error: &ErrorSignal) {
        tracing::warn!(
            input = error.input(),
            kind = error.error().kind(),
            "input rejected: {error}"
        );
    }

    fn on_partial(&self, partial: &str) {
        tracing::trace!(bytes = partial.len(), "partial table");
    }
}

/// Sink built from a pair of closures.
pub struct FnSink<T, E>
where
    T: Fn(&Table),
    E: Fn(&ErrorSignal),
{
    on_table: T,
    on_error: E,
}

impl<T, E> FnSink<T, E>
where
    T: Fn(&Table),
    E: Fn(&ErrorSignal),
{
    #[must_use]
    pub fn new(on_table: T, on_error: E) -> Self {
        Self { on_table, on_error }
    }
}

impl<T, E> fmt::Debug for FnSink<T, E>
where
    T: Fn(&Table),
    E: Fn(&ErrorSignal),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}

impl<T, E> TableSink for FnSink<T, E>
where
    T: Fn(&Table),
    E: Fn(&ErrorSignal),
{
    fn on_table_ready(&self, table: &Table) {
        (self.on_table)(table);
    }

    fn on_error(&self, error: &ErrorSignal) {
        (self.on_error)(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gugu_core::{Base, parse_base};
    use std::cell::Cell;
    use std::rc::Rc;

    fn table(raw: &str) -> Table {
        Table::for_base(parse_base(raw).unwrap())
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.on_table_ready(&table("1"));
        sink.on_error(&ErrorSignal::new("x", BaseError::NotANumber { input: "x".into() }));
        sink.on_partial("1X1=1\n");

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert!(events[0].as_table().is_some());
        assert!(events[1].is_error());
        assert_eq!(events[2], SinkEvent::Partial("1X1=1\n".into()));
        assert!(sink.last_terminal().is_some_and(|e| e.is_error()));
    }

    #[test]
    fn recording_sink_take_drains() {
        let sink = RecordingSink::new();
        sink.on_table_ready(&table("2"));
        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn error_signal_message_and_source() {
        let signal = ErrorSignal::new("", BaseError::Empty);
        assert_eq!(signal.message(), "input is empty");
        assert_eq!(signal.input(), "");
        assert!(std::error::Error::source(&signal).is_some());
    }

    #[test]
    fn fn_sink_routes_channels() {
        let tables = Rc::new(Cell::new(0u32));
        let errors = Rc::new(Cell::new(0u32));
        let (t, e) = (Rc::clone(&tables), Rc::clone(&errors));
        let sink = FnSink::new(
            move |_: &Table| t.set(t.get() + 1),
            move |_: &ErrorSignal| e.set(e.get() + 1),
        );

        sink.on_table_ready(&Table::for_base(Base::ZERO));
        sink.on_error(&ErrorSignal::new("-1", BaseError::Negative { input: "-1".into() }));
        sink.on_partial("ignored");
        assert_eq!((tables.get(), errors.get()), (1, 1));
    }

    #[test]
    fn rc_sink_forwards() {
        let sink = Rc::new(RecordingSink::new());
        let shared: Rc<RecordingSink> = Rc::clone(&sink);
        shared.on_table_ready(&table("4"));
        assert_eq!(sink.tables().len(), 1);
    }
}
