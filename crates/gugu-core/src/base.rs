#![forbid(unsafe_code)]

//! Parsing raw input text into a table [`Base`].
//!
//! The input field delivers arbitrary text. Only non-negative integers in
//! `0..=MAX_BASE` are accepted; everything else resolves into a [`BaseError`]
//! that the runtime routes to the sink's error channel.
//!
//! # Supported range
//!
//! `MAX_BASE` is `u64::MAX / 9`, the largest value whose product with the
//! last row still fits in a `u64`. Values above it are rejected up front as
//! [`BaseError::OutOfRange`] instead of wrapping during formatting.
//!
//! # Accepted syntax
//!
//! | Input     | Result                        |
//! |-----------|-------------------------------|
//! | `"3"`     | `Base(3)`                     |
//! | `"007"`   | `Base(7)`                     |
//! | `"+4"`    | `Base(4)`                     |
//! | `""`      | `Err(Empty)`                  |
//! | `"-5"`    | `Err(Negative)`               |
//! | `" 3"`    | `Err(NotANumber)`             |
//! | `"abc"`   | `Err(NotANumber)`             |

use core::fmt;
use std::num::IntErrorKind;

use crate::rows::LAST_ROW;

/// Largest base whose full table can be computed without overflow.
pub const MAX_BASE: u64 = u64::MAX / LAST_ROW as u64;

/// A validated, non-negative table base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Base(u64);

impl Base {
    /// The base used when the input field has never been edited.
    pub const ZERO: Base = Base(0);

    /// Wrap a value, returning `None` when it exceeds [`MAX_BASE`].
    #[must_use]
    pub const fn new(value: u64) -> Option<Self> {
        if value <= MAX_BASE {
            Some(Self(value))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for Base {
    type Error = BaseError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Base::new(value).ok_or_else(|| BaseError::OutOfRange {
            input: value.to_string(),
            max: MAX_BASE,
        })
    }
}

/// Why an input string could not become a [`Base`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseError {
    /// The input field is empty.
    Empty,
    /// The input is a negative integer.
    Negative { input: String },
    /// The input is not an integer at all.
    NotANumber { input: String },
    /// The input is an integer above the supported range.
    OutOfRange { input: String, max: u64 },
}

impl BaseError {
    /// The raw text that was rejected (empty for [`BaseError::Empty`]).
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Negative { input }
            | Self::NotANumber { input }
            | Self::OutOfRange { input, .. } => input,
        }
    }

    /// Short, stable identifier for logs and diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Negative { .. } => "negative",
            Self::NotANumber { .. } => "not_a_number",
            Self::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl fmt::Display for BaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "input is empty"),
            Self::Negative { input } => write!(f, "negative base not allowed: {input:?}"),
            Self::NotANumber { input } => write!(f, "not a number: {input:?}"),
            Self::OutOfRange { input, max } => {
                write!(f, "base {input} is out of range (max {max})")
            }
        }
    }
}

impl std::error::Error for BaseError {}

/// Parse raw input into a [`Base`] within the full supported range.
pub fn parse_base(raw: &str) -> Result<Base, BaseError> {
    parse_base_with_limit(raw, MAX_BASE)
}

/// Parse raw input into a [`Base`] no larger than `limit`.
///
/// `limit` is clamped to [`MAX_BASE`]; a caller cannot widen the range past
/// what the formatter can compute.
pub fn parse_base_with_limit(raw: &str, limit: u64) -> Result<Base, BaseError> {
    let limit = limit.min(MAX_BASE);
    match raw.parse::<u64>() {
        Ok(value) if value <= limit => Ok(Base(value)),
        Ok(_) => Err(BaseError::OutOfRange {
            input: raw.to_owned(),
            max: limit,
        }),
        Err(err) => Err(classify(raw, err.kind(), limit)),
    }
}

fn classify(raw: &str, kind: &IntErrorKind, limit: u64) -> BaseError {
    match kind {
        IntErrorKind::Empty => BaseError::Empty,
        IntErrorKind::PosOverflow => BaseError::OutOfRange {
            input: raw.to_owned(),
            max: limit,
        },
        _ if looks_negative(raw) => BaseError::Negative {
            input: raw.to_owned(),
        },
        _ => BaseError::NotANumber {
            input: raw.to_owned(),
        },
    }
}

fn looks_negative(raw: &str) -> bool {
    raw.strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
