//! Category aggregate.
//!
//! # Invariants
//! - A real category never carries the null id or the null frequency.
//! - `Category::null()` is a process-wide `'static` instance.

use super::ids::CategoryId;
use super::validation::{ValidationError, ValidationResult};
use super::value::{CategoryName, CheckInFrequency};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static NULL_CATEGORY: Lazy<Category> = Lazy::new(|| Category {
    id: CategoryId::null(),
    name: CategoryName::uncategorized(),
    frequency: CheckInFrequency::null(),
});

/// Unvalidated field set used to create or rebuild a category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryDraft {
    pub id: CategoryId,
    pub name: CategoryName,
    pub frequency: CheckInFrequency,
}

/// Grouping of contacts sharing a check-in cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CategoryDraft")]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
    frequency: CheckInFrequency,
}

impl Category {
    /// Validates the draft and builds the category.
    ///
    /// # Errors
    /// - `NullIdentifier` when `draft.id` is the null id.
    /// - `OutOfRange` when `draft.frequency` is the null frequency.
    pub fn create(draft: CategoryDraft) -> ValidationResult<Self> {
        if draft.id.is_null() {
            return Err(ValidationError::NullIdentifier {
                field: "category id",
            });
        }
        if draft.frequency.is_null() {
            return Err(ValidationError::OutOfRange {
                field: "frequency",
                min: super::value::FREQUENCY_MIN,
                max: super::value::FREQUENCY_MAX,
                actual: 0,
            });
        }
        Ok(Self {
            id: draft.id,
            name: draft.name,
            frequency: draft.frequency,
        })
    }

    /// Creates a category with a freshly generated id.
    pub fn new(name: CategoryName, frequency: CheckInFrequency) -> ValidationResult<Self> {
        Self::create(CategoryDraft {
            id: CategoryId::generate(),
            name,
            frequency,
        })
    }

    pub fn null() -> &'static Category {
        &NULL_CATEGORY
    }

    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &CategoryName {
        &self.name
    }

    pub fn frequency(&self) -> CheckInFrequency {
        self.frequency
    }

    /// Copies every field into a draft.
    pub fn to_draft(&self) -> CategoryDraft {
        CategoryDraft {
            id: self.id,
            name: self.name.clone(),
            frequency: self.frequency,
        }
    }

    /// Applies `change` to a copy of this category and re-validates it.
    pub fn rebuild(&self, change: impl FnOnce(&mut CategoryDraft)) -> ValidationResult<Self> {
        let mut draft = self.to_draft();
        change(&mut draft);
        Self::create(draft)
    }

    pub fn rename(&self, name: CategoryName) -> ValidationResult<Self> {
        self.rebuild(|draft| draft.name = name)
    }

    pub fn with_frequency(&self, frequency: CheckInFrequency) -> ValidationResult<Self> {
        self.rebuild(|draft| draft.frequency = frequency)
    }
}

impl TryFrom<CategoryDraft> for Category {
    type Error = ValidationError;

    fn try_from(draft: CategoryDraft) -> Result<Self, Self::Error> {
        Self::create(draft)
    }
}
