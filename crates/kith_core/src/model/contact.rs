//! Contact aggregate and its important dates.
//!
//! # Responsibility
//! - Hold the person-level record the user keeps in touch with.
//! - Carry optional fields as `Option<T>`; absent fields serialize as `null`.
//!
//! # Invariants
//! - A real contact never carries the null id.
//! - `category_id` is the null category id until a category is assigned.
//! - Important dates are stored at millisecond precision.

use super::ids::{CategoryId, ContactId};
use super::validation::{storable_date, ValidationError, ValidationResult};
use super::value::{ContactName, DateLabel, Email, Location, Phone, RelationshipContext};
use crate::collection::{EntityCollection, ImportantDateCollection};
use crate::serializer::iso_millis;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static NULL_CONTACT: Lazy<Contact> = Lazy::new(|| Contact {
    id: ContactId::null(),
    name: ContactName::unknown(),
    phone: None,
    email: None,
    location: None,
    relationship_context: None,
    important_dates: ImportantDateCollection::empty(),
    category_id: CategoryId::null(),
});

/// Labelled date worth remembering (birthday, anniversary, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantDate {
    label: DateLabel,
    #[serde(with = "iso_millis")]
    date: DateTime<Utc>,
}

impl ImportantDate {
    /// # Errors
    /// - `OutOfRange` when the year falls outside 0..=9999.
    pub fn new(label: DateLabel, date: DateTime<Utc>) -> ValidationResult<Self> {
        Ok(Self {
            label,
            date: storable_date(date, "important date")?,
        })
    }

    pub fn label(&self) -> &DateLabel {
        &self.label
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Field set used to create or rebuild a contact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub id: ContactId,
    pub name: ContactName,
    #[serde(default)]
    pub phone: Option<Phone>,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub relationship_context: Option<RelationshipContext>,
    #[serde(default)]
    pub important_dates: ImportantDateCollection,
    #[serde(default = "CategoryId::null")]
    pub category_id: CategoryId,
}

impl ContactDraft {
    /// Draft with a fresh id, no optional fields and no category.
    pub fn named(name: ContactName) -> Self {
        Self {
            id: ContactId::generate(),
            name,
            phone: None,
            email: None,
            location: None,
            relationship_context: None,
            important_dates: ImportantDateCollection::empty(),
            category_id: CategoryId::null(),
        }
    }
}

/// A person the user keeps in touch with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ContactDraft")]
pub struct Contact {
    id: ContactId,
    name: ContactName,
    phone: Option<Phone>,
    email: Option<Email>,
    location: Option<Location>,
    relationship_context: Option<RelationshipContext>,
    important_dates: ImportantDateCollection,
    category_id: CategoryId,
}

impl Contact {
    /// # Errors
    /// - `NullIdentifier` when `draft.id` is the null id.
    /// - `OutOfRange` for an important date outside years 0..=9999.
    pub fn create(draft: ContactDraft) -> ValidationResult<Self> {
        if draft.id.is_null() {
            return Err(ValidationError::NullIdentifier {
                field: "contact id",
            });
        }
        let important_dates = draft
            .important_dates
            .into_iter()
            .map(|entry| ImportantDate::new(entry.label, entry.date))
            .collect::<ValidationResult<ImportantDateCollection>>()?;
        Ok(Self {
            id: draft.id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            location: draft.location,
            relationship_context: draft.relationship_context,
            important_dates,
            category_id: draft.category_id,
        })
    }

    /// Creates an uncategorized contact with only a name.
    pub fn new(name: ContactName) -> ValidationResult<Self> {
        Self::create(ContactDraft::named(name))
    }

    pub fn null() -> &'static Contact {
        &NULL_CONTACT
    }

    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    pub fn id(&self) -> ContactId {
        self.id
    }

    pub fn name(&self) -> &ContactName {
        &self.name
    }

    pub fn phone(&self) -> Option<&Phone> {
        self.phone.as_ref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn relationship_context(&self) -> Option<&RelationshipContext> {
        self.relationship_context.as_ref()
    }

    pub fn important_dates(&self) -> &ImportantDateCollection {
        &self.important_dates
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn has_category(&self) -> bool {
        !self.category_id.is_null()
    }

    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            id: self.id,
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            location: self.location.clone(),
            relationship_context: self.relationship_context.clone(),
            important_dates: self.important_dates.clone(),
            category_id: self.category_id,
        }
    }

    /// Applies `change` to a copy of this contact and re-validates it.
    pub fn rebuild(&self, change: impl FnOnce(&mut ContactDraft)) -> ValidationResult<Self> {
        let mut draft = self.to_draft();
        change(&mut draft);
        Self::create(draft)
    }

    pub fn rename(&self, name: ContactName) -> ValidationResult<Self> {
        self.rebuild(|draft| draft.name = name)
    }

    /// Passing `CategoryId::null()` clears the assignment.
    pub fn assign_category(&self, category_id: CategoryId) -> ValidationResult<Self> {
        self.rebuild(|draft| draft.category_id = category_id)
    }

    pub fn add_important_date(&self, entry: ImportantDate) -> ValidationResult<Self> {
        self.rebuild(|draft| {
            let mut dates = draft.important_dates.to_vec();
            dates.push(entry);
            draft.important_dates = ImportantDateCollection::new(dates);
        })
    }
}

impl TryFrom<ContactDraft> for Contact {
    type Error = ValidationError;

    fn try_from(draft: ContactDraft) -> Result<Self, Self::Error> {
        Self::create(draft)
    }
}
