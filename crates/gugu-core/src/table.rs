#![forbid(unsafe_code)]

//! Line accumulation and the [`Table`] type.
//!
//! Accumulation is string concatenation, never numeric summation: lines are
//! appended left to right onto an empty seed, in the order they arrive.
//!
//! # Invariants
//!
//! 1. A [`Table`] always holds exactly [`ROW_COUNT`] lines.
//! 2. Lines appear in ascending row order, never reordered or deduplicated.
//! 3. The last item of [`scan_lines`] equals [`fold_lines`] over the same input.

use core::fmt;

use crate::base::Base;
use crate::line::{Line, format_line};
use crate::rows::{ROW_COUNT, produce_rows};

/// Concatenate lines left to right, seeded with an empty string.
#[must_use]
pub fn fold_lines<I>(lines: I) -> String
where
    I: IntoIterator<Item = Line>,
{
    lines.into_iter().fold(String::new(), |mut acc, line| {
        acc.push_str(line.as_str());
        acc
    })
}

/// Prefix-concatenation scan: yields each partial accumulation in order.
#[must_use]
pub fn scan_lines<I>(lines: I) -> Scan<I::IntoIter>
where
    I: IntoIterator<Item = Line>,
{
    Scan {
        lines: lines.into_iter(),
        acc: String::new(),
    }
}

/// Iterator returned by [`scan_lines`].
#[derive(Debug, Clone)]
pub struct Scan<I> {
    lines: I,
    acc: String,
}

impl<I> Iterator for Scan<I>
where
    I: Iterator<Item = Line>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let line = self.lines.next()?;
        self.acc.push_str(line.as_str());
        Some(self.acc.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lines.size_hint()
    }
}

/// The full multiplication table for one base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    base: Base,
    text: String,
}

impl Table {
    /// Build the table for `base`: rows, formatted lines, folded text.
    #[must_use]
    pub fn for_base(base: Base) -> Self {
        let text = fold_lines(produce_rows().map(|row| format_line(base, row)));
        Self { base, text }
    }

    /// Every partial accumulation on the way to [`Table::for_base`].
    pub fn partials(base: Base) -> impl Iterator<Item = String> {
        scan_lines(produce_rows().map(move |row| format_line(base, row)))
    }

    #[must_use]
    pub const fn base(&self) -> Base {
        self.base
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Iterate the lines without their trailing separators.
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    #[must_use]
    pub const fn line_count(&self) -> usize {
        ROW_COUNT
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl AsRef<str> for Table {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
