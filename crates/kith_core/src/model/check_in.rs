//! Check-in aggregate.
//!
//! # Invariants
//! - A real check-in never carries the null id or the null contact id.
//! - New check-ins start as `Scheduled`.
//! - `complete`/`skip` only apply to scheduled check-ins; completed
//!   check-ins are final.

use super::ids::{CheckInId, ContactId};
use super::validation::{storable_date, ValidationError, ValidationResult};
use super::value::Notes;
use crate::serializer::iso_millis;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static NULL_CHECK_IN: Lazy<CheckIn> = Lazy::new(|| CheckIn {
    id: CheckInId::null(),
    contact_id: ContactId::null(),
    scheduled_date: DateTime::<Utc>::default(),
    status: CheckInStatus::Scheduled,
    notes: None,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInStatus {
    Scheduled,
    Completed,
    Skipped,
}

impl CheckInStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInDraft {
    pub id: CheckInId,
    pub contact_id: ContactId,
    #[serde(with = "iso_millis")]
    pub scheduled_date: DateTime<Utc>,
    pub status: CheckInStatus,
    #[serde(default)]
    pub notes: Option<Notes>,
}

/// Planned touchpoint with one contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CheckInDraft")]
pub struct CheckIn {
    id: CheckInId,
    contact_id: ContactId,
    #[serde(with = "iso_millis")]
    scheduled_date: DateTime<Utc>,
    status: CheckInStatus,
    notes: Option<Notes>,
}

impl CheckIn {
    /// # Errors
    /// - `NullIdentifier` for a null check-in id or contact id.
    /// - `OutOfRange` when the scheduled year falls outside 0..=9999.
    pub fn create(draft: CheckInDraft) -> ValidationResult<Self> {
        if draft.id.is_null() {
            return Err(ValidationError::NullIdentifier {
                field: "check-in id",
            });
        }
        if draft.contact_id.is_null() {
            return Err(ValidationError::NullIdentifier {
                field: "contact id",
            });
        }
        Ok(Self {
            id: draft.id,
            contact_id: draft.contact_id,
            scheduled_date: storable_date(draft.scheduled_date, "scheduled date")?,
            status: draft.status,
            notes: draft.notes,
        })
    }

    /// Schedules a new check-in with a generated id.
    pub fn schedule(contact_id: ContactId, date: DateTime<Utc>) -> ValidationResult<Self> {
        Self::create(CheckInDraft {
            id: CheckInId::generate(),
            contact_id,
            scheduled_date: date,
            status: CheckInStatus::Scheduled,
            notes: None,
        })
    }

    pub fn null() -> &'static CheckIn {
        &NULL_CHECK_IN
    }

    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    pub fn id(&self) -> CheckInId {
        self.id
    }

    pub fn contact_id(&self) -> ContactId {
        self.contact_id
    }

    pub fn scheduled_date(&self) -> DateTime<Utc> {
        self.scheduled_date
    }

    pub fn status(&self) -> CheckInStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&Notes> {
        self.notes.as_ref()
    }

    pub fn to_draft(&self) -> CheckInDraft {
        CheckInDraft {
            id: self.id,
            contact_id: self.contact_id,
            scheduled_date: self.scheduled_date,
            status: self.status,
            notes: self.notes.clone(),
        }
    }

    pub fn rebuild(&self, change: impl FnOnce(&mut CheckInDraft)) -> ValidationResult<Self> {
        let mut draft = self.to_draft();
        change(&mut draft);
        Self::create(draft)
    }

    /// Marks the check-in completed. Existing notes are kept when `notes`
    /// is `None`.
    pub fn complete(&self, notes: Option<Notes>) -> ValidationResult<Self> {
        self.ensure_scheduled(CheckInStatus::Completed)?;
        self.rebuild(|draft| {
            draft.status = CheckInStatus::Completed;
            if notes.is_some() {
                draft.notes = notes;
            }
        })
    }

    pub fn skip(&self) -> ValidationResult<Self> {
        self.ensure_scheduled(CheckInStatus::Skipped)?;
        self.rebuild(|draft| draft.status = CheckInStatus::Skipped)
    }

    /// Moves a scheduled or skipped check-in to `date` as scheduled.
    pub fn reschedule(&self, date: DateTime<Utc>) -> ValidationResult<Self> {
        if self.status == CheckInStatus::Completed {
            return Err(ValidationError::InvalidTransition {
                from: self.status.as_str(),
                to: CheckInStatus::Scheduled.as_str(),
            });
        }
        self.rebuild(|draft| {
            draft.scheduled_date = date;
            draft.status = CheckInStatus::Scheduled;
        })
    }

    fn ensure_scheduled(&self, target: CheckInStatus) -> ValidationResult<()> {
        if self.status != CheckInStatus::Scheduled {
            return Err(ValidationError::InvalidTransition {
                from: self.status.as_str(),
                to: target.as_str(),
            });
        }
        Ok(())
    }
}

impl TryFrom<CheckInDraft> for CheckIn {
    type Error = ValidationError;

    fn try_from(draft: CheckInDraft) -> Result<Self, Self::Error> {
        Self::create(draft)
    }
}
