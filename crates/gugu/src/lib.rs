#![forbid(unsafe_code)]

//! gugu: a reactive multiplication-table pipeline.
//!
//! Feed raw input text into a [`Pipeline`]; each change is parsed, expanded
//! into nine formatted rows, folded into one [`Table`], and pushed to a
//! [`TableSink`].
//!
//! ```
//! use std::rc::Rc;
//! use gugu::prelude::*;
//!
//! let sink = Rc::new(RecordingSink::new());
//! let mut pipeline = Pipeline::with_sink(Rc::clone(&sink));
//!
//! pipeline.on_input_changed("3");
//! assert_eq!(sink.tables()[0].lines().last(), Some("3X9=27"));
//!
//! pipeline.on_input_changed("abc");
//! assert!(sink.last_terminal().is_some_and(|e| e.is_error()));
//! ```

pub use gugu_core::{Base, BaseError, Table, parse_base};
pub use gugu_runtime::{
    EmptyInputPolicy, ErrorSignal, Pipeline, PipelineConfig, PipelineState, RecordingSink,
    TableSink, ValueHolder,
};

pub mod prelude {
    //! Common imports.
    pub use gugu_core::{Base, BaseError, Table, parse_base};
    pub use gugu_runtime::{
        EmptyInputPolicy, ErrorSignal, FnSink, Pipeline, PipelineConfig, PipelineState,
        RecordingSink, SinkEvent, TableSink, TracingSink, ValueHolder,
    };
}
