#![forbid(unsafe_code)]

//! The fixed row sequence of every table.

use std::iter::FusedIterator;
use std::ops::RangeInclusive;

/// First multiplicand of a table.
pub const FIRST_ROW: u8 = 1;
/// Last multiplicand of a table.
pub const LAST_ROW: u8 = 9;
/// Number of rows (and therefore lines) in every table.
pub const ROW_COUNT: usize = (LAST_ROW - FIRST_ROW + 1) as usize;

/// Produce a fresh `1..=9` row sequence.
///
/// Each call returns an independent iterator; nothing is shared between
/// invocations.
#[must_use]
pub fn produce_rows() -> Rows {
    Rows {
        range: FIRST_ROW..=LAST_ROW,
    }
}

/// Ascending iterator over the rows of a table.
#[derive(Debug, Clone)]
pub struct Rows {
    range: RangeInclusive<u8>,
}

impl Iterator for Rows {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        self.range.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for Rows {
    #[inline]
    fn next_back(&mut self) -> Option<u8> {
        self.range.next_back()
    }
}

impl ExactSizeIterator for Rows {}

impl FusedIterator for Rows {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_one_through_nine() {
        let rows: Vec<u8> = produce_rows().collect();
        assert_eq!(rows, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn every_call_is_fresh() {
        let mut first = produce_rows();
        first.next();
        first.next();
        assert_eq!(first.len(), ROW_COUNT - 2);
        assert_eq!(produce_rows().len(), ROW_COUNT);
    }

    #[test]
    fn fused_after_exhaustion() {
        let mut rows = produce_rows();
        for _ in 0..ROW_COUNT {
            assert!(rows.next().is_some());
        }
        assert_eq!(rows.next(), None);
        assert_eq!(rows.next(), None);
    }

    #[test]
    fn reverse_iteration() {
        assert_eq!(produce_rows().next_back(), Some(LAST_ROW));
    }
}
