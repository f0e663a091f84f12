//! Validation failures raised by value-object and entity factories.
//!
//! # Invariants
//! - Every variant names the offending field so callers can surface it.
//! - Validation happens at construction time only; it is never deferred.

use crate::serializer::truncate_to_millis;
use chrono::{DateTime, Datelike, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Years representable in the four-digit wire date format.
pub const MIN_DATE_YEAR: i64 = 0;
pub const MAX_DATE_YEAR: i64 = 9999;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Rule violation detected while constructing a domain value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text is empty after trimming.
    Empty { field: &'static str },
    /// Text exceeds the field's character cap.
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Numeric value outside the accepted inclusive range.
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },
    /// Numeric value with a fractional part where an integer is required.
    NonInteger { field: &'static str, value: String },
    /// Input does not match the field's expected shape.
    InvalidFormat { field: &'static str, value: String },
    /// A null sentinel identifier was passed where a real one is required.
    NullIdentifier { field: &'static str },
    /// Status change not allowed from the current state.
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} cannot be empty"),
            Self::TooLong { field, max, actual } => write!(
                f,
                "{field} must be at most {max} characters, got {actual}"
            ),
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(f, "{field} must be between {min} and {max}, got {actual}"),
            Self::NonInteger { field, value } => {
                write!(f, "{field} must be an integer, got {value}")
            }
            Self::InvalidFormat { field, value } => {
                write!(f, "{field} has an invalid format: `{value}`")
            }
            Self::NullIdentifier { field } => write!(f, "{field} cannot be the null identifier"),
            Self::InvalidTransition { from, to } => {
                write!(f, "check-in cannot move from `{from}` to `{to}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `raw` and enforces the non-empty + max-length rule.
///
/// Length is counted in characters, not bytes.
pub(crate) fn bounded_text(
    raw: &str,
    field: &'static str,
    max: usize,
) -> ValidationResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let actual = trimmed.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(trimmed.to_string())
}

/// Truncates `value` to milliseconds and rejects years the wire format
/// cannot carry.
pub(crate) fn storable_date(
    value: DateTime<Utc>,
    field: &'static str,
) -> ValidationResult<DateTime<Utc>> {
    let year = i64::from(value.year());
    if !(MIN_DATE_YEAR..=MAX_DATE_YEAR).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field,
            min: MIN_DATE_YEAR,
            max: MAX_DATE_YEAR,
            actual: year,
        });
    }
    Ok(truncate_to_millis(value))
}
