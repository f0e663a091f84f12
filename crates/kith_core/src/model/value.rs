//! Validated scalar value objects.
//!
//! # Responsibility
//! - Normalize and validate raw user input into immutable values.
//! - Provide the frequency type that drives check-in scheduling.
//!
//! # Invariants
//! - Values are only reachable through validating constructors (fields are
//!   private and wire decoding routes through the same constructors).
//! - `CheckInFrequency::null()` carries value 0, which `new` always rejects.

use super::validation::{
    bounded_text, storable_date, ValidationError, ValidationResult, MAX_DATE_YEAR, MIN_DATE_YEAR,
};
use chrono::{DateTime, Datelike, Duration, Months, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CATEGORY_NAME_MAX_CHARS: usize = 50;
pub const CONTACT_NAME_MAX_CHARS: usize = 100;
pub const LOCATION_MAX_CHARS: usize = 200;
pub const RELATIONSHIP_CONTEXT_MAX_CHARS: usize = 500;
pub const NOTES_MAX_CHARS: usize = 2000;
pub const DATE_LABEL_MAX_CHARS: usize = 50;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const PHONE_MIN_DIGITS: usize = 7;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const FREQUENCY_MIN: i64 = 1;
pub const FREQUENCY_MAX: i64 = 365;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

macro_rules! bounded_text_value {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: &str) -> ValidationResult<Self> {
                bounded_text(raw, $field, $max).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

bounded_text_value!(
    /// Category display name, 1..=50 characters after trimming.
    CategoryName,
    "category name",
    CATEGORY_NAME_MAX_CHARS
);
bounded_text_value!(
    /// Contact display name, 1..=100 characters after trimming.
    ContactName,
    "contact name",
    CONTACT_NAME_MAX_CHARS
);
bounded_text_value!(Location, "location", LOCATION_MAX_CHARS);
bounded_text_value!(
    /// Free text describing how the user knows the contact.
    RelationshipContext,
    "relationship context",
    RELATIONSHIP_CONTEXT_MAX_CHARS
);
bounded_text_value!(Notes, "notes", NOTES_MAX_CHARS);
bounded_text_value!(DateLabel, "date label", DATE_LABEL_MAX_CHARS);

impl CategoryName {
    /// Name carried by the null category.
    pub(crate) fn uncategorized() -> Self {
        Self("Uncategorized".to_string())
    }
}

impl ContactName {
    pub(crate) fn unknown() -> Self {
        Self("Unknown Contact".to_string())
    }
}

/// Phone number normalized to an optional leading `+` followed by digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Strips separators (space, `-`, `.`, `(`, `)`) and validates digits.
    pub fn new(raw: &str) -> ValidationResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "phone" });
        }

        let (prefix, rest) = match trimmed.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", trimmed),
        };
        let mut digits = String::with_capacity(rest.len());
        for ch in rest.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => {
                    return Err(ValidationError::InvalidFormat {
                        field: "phone",
                        value: trimmed.to_string(),
                    });
                }
            }
        }

        if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()) {
            return Err(ValidationError::InvalidFormat {
                field: "phone",
                value: trimmed.to_string(),
            });
        }

        Ok(Self(format!("{prefix}{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Phone {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

/// Lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(raw: &str) -> ValidationResult<Self> {
        // Lower-casing can add characters, so the cap applies afterwards.
        let normalized = bounded_text(&raw.to_lowercase(), "email", EMAIL_MAX_CHARS)?;
        if !EMAIL_RE.is_match(&normalized) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                value: normalized,
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Unit of a check-in frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyUnit {
    Days,
    Weeks,
    Months,
}

impl FrequencyUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
        }
    }
}

/// How often the user wants to check in with contacts of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFrequency")]
pub struct CheckInFrequency {
    value: u16,
    unit: FrequencyUnit,
}

#[derive(Deserialize)]
struct RawFrequency {
    value: f64,
    unit: FrequencyUnit,
}

impl TryFrom<RawFrequency> for CheckInFrequency {
    type Error = ValidationError;

    fn try_from(raw: RawFrequency) -> Result<Self, Self::Error> {
        Self::from_number(raw.value, raw.unit)
    }
}

impl CheckInFrequency {
    /// # Errors
    /// - `OutOfRange` unless `1 <= value <= 365`.
    pub fn new(value: i64, unit: FrequencyUnit) -> ValidationResult<Self> {
        if !(FREQUENCY_MIN..=FREQUENCY_MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: "frequency",
                min: FREQUENCY_MIN,
                max: FREQUENCY_MAX,
                actual: value,
            });
        }
        let value = u16::try_from(value).map_err(|_| ValidationError::OutOfRange {
            field: "frequency",
            min: FREQUENCY_MIN,
            max: FREQUENCY_MAX,
            actual: value,
        })?;
        Ok(Self { value, unit })
    }

    /// Builds a frequency from an untyped number, rejecting fractions.
    pub fn from_number(value: f64, unit: FrequencyUnit) -> ValidationResult<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ValidationError::NonInteger {
                field: "frequency",
                value: value.to_string(),
            });
        }
        // Saturating cast keeps huge inputs out of range instead of wrapping.
        Self::new(value as i64, unit)
    }

    /// Frequency of the null category.
    pub const fn null() -> Self {
        Self {
            value: 0,
            unit: FrequencyUnit::Days,
        }
    }

    pub fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    /// Returns the next due instant after `from`.
    ///
    /// Month arithmetic clamps to the last day of the target month. Returns
    /// `from` unchanged for the null frequency.
    ///
    /// # Errors
    /// - `OutOfRange` when the result falls outside years 0..=9999.
    pub fn next_after(&self, from: DateTime<Utc>) -> ValidationResult<DateTime<Utc>> {
        let value = u32::from(self.value);
        let next = match self.unit {
            FrequencyUnit::Days => from.checked_add_signed(Duration::days(i64::from(value))),
            FrequencyUnit::Weeks => from.checked_add_signed(Duration::weeks(i64::from(value))),
            FrequencyUnit::Months => from.checked_add_months(Months::new(value)),
        };
        match next {
            Some(next) => storable_date(next, "next check-in date"),
            None => Err(ValidationError::OutOfRange {
                field: "next check-in date",
                min: MIN_DATE_YEAR,
                max: MAX_DATE_YEAR,
                actual: i64::from(from.year()),
            }),
        }
    }
}
