//! Aggregate identifiers.
//!
//! # Responsibility
//! - Give each aggregate its own identifier type so ids cannot be mixed up.
//! - Validate identifiers that arrive as external strings.
//!
//! # Invariants
//! - The nil UUID is reserved for null sentinels; `parse` never returns it.
//! - Wire form is the lowercase hyphenated UUID string.

use super::validation::{ValidationError, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static UUID_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid uuid shape regex")
});

fn parse_uuid_shape(raw: &str, field: &'static str) -> ValidationResult<Uuid> {
    let trimmed = raw.trim();
    if !UUID_SHAPE_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat {
            field,
            value: trimmed.to_string(),
        });
    }
    Uuid::parse_str(trimmed).map_err(|_| ValidationError::InvalidFormat {
        field,
        value: trimmed.to_string(),
    })
}

macro_rules! aggregate_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parses an externally supplied identifier.
            ///
            /// # Errors
            /// - `InvalidFormat` when the input is not a hyphenated UUID.
            /// - `NullIdentifier` for the nil UUID.
            pub fn parse(raw: &str) -> ValidationResult<Self> {
                let uuid = parse_uuid_shape(raw, $field)?;
                if uuid.is_nil() {
                    return Err(ValidationError::NullIdentifier { field: $field });
                }
                Ok(Self(uuid))
            }

            /// Null sentinel id.
            pub const fn null() -> Self {
                Self(Uuid::nil())
            }

            pub fn is_null(&self) -> bool {
                self.0.is_nil()
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        // Wire decoding accepts the null id: unassigned references are
        // persisted that way.
        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                parse_uuid_shape(&value, $field).map(Self)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }
    };
}

aggregate_id!(
    /// Stable identifier of a contact.
    ContactId,
    "contact id"
);
aggregate_id!(
    /// Stable identifier of a category.
    CategoryId,
    "category id"
);
aggregate_id!(
    /// Stable identifier of a scheduled check-in.
    CheckInId,
    "check-in id"
);
