#![forbid(unsafe_code)]

//! Row formatting: `(base, row)` to one line of table text.

use core::fmt;
use std::fmt::Write as _;

use crate::base::Base;
use crate::rows::{FIRST_ROW, LAST_ROW};

/// Separator appended to every line.
pub const LINE_SEPARATOR: char = '\n';

/// One formatted table line, `"{base}X{row}={product}\n"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    text: String,
    row: u8,
    product: u64,
}

impl Line {
    /// Full line text including the trailing separator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn row(&self) -> u8 {
        self.row
    }

    #[must_use]
    pub const fn product(&self) -> u64 {
        self.product
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl AsRef<str> for Line {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Format a single table line.
///
/// `row` must lie in `1..=9`. Every [`Base`] is bounded so that
/// `base * 9` fits in a `u64`, which makes the product infallible.
#[must_use]
pub fn format_line(base: Base, row: u8) -> Line {
    debug_assert!(
        (FIRST_ROW..=LAST_ROW).contains(&row),
        "row {row} outside {FIRST_ROW}..={LAST_ROW}"
    );
    let product = base.get().checked_mul(u64::from(row));
    debug_assert!(product.is_some(), "{base}X{row} overflows u64");
    let product = product.unwrap_or(u64::MAX);

    let mut text = String::with_capacity(32);
    // Writing into a String cannot fail.
    let _ = write!(text, "{base}X{row}={product}{LINE_SEPARATOR}");
    Line { text, row, product }
}
