#![forbid(unsafe_code)]

//! Core: the pure multiplication-table kernel.
//!
//! # Role in gugu
//! `gugu-core` turns one validated number into its nine-line table. It has no
//! shared state and performs no I/O; every function here is deterministic.
//!
//! # Primary responsibilities
//! - **Base**: parsing raw input text into a bounded, non-negative integer.
//! - **Rows**: the fixed `1..=9` row sequence.
//! - **Line**: formatting `(base, row)` into `"{base}X{row}={product}\n"`.
//! - **Table**: folding lines into the final text, plus the prefix scan.
//!
//! # How it fits in the system
//! `gugu-runtime` owns the mutable input slot and the sink. On each input
//! change it calls [`parse_base`] and, on success, [`Table::for_base`].

pub mod base;
pub mod line;
pub mod rows;
pub mod table;

pub use base::{Base, BaseError, MAX_BASE, parse_base, parse_base_with_limit};
pub use line::{LINE_SEPARATOR, Line, format_line};
pub use rows::{FIRST_ROW, LAST_ROW, ROW_COUNT, Rows, produce_rows};
pub use table::{Scan, Table, fold_lines, scan_lines};
