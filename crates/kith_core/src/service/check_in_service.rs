//! Check-in scheduling service.
//!
//! # Invariants
//! - Check-ins are only scheduled for contacts that exist.
//! - `schedule_next` derives the date from the contact's category frequency.

use super::{ServiceError, ServiceResult};
use crate::collection::CheckInCollection;
use crate::model::check_in::CheckIn;
use crate::model::ids::{CheckInId, ContactId};
use crate::model::value::Notes;
use crate::repo::{CategoryRepository, CheckInRepository, ContactRepository, EntityKind};
use chrono::{DateTime, Utc};
use log::info;

pub struct CheckInService<H, C, K>
where
    H: CheckInRepository,
    C: ContactRepository,
    K: CategoryRepository,
{
    check_ins: H,
    contacts: C,
    categories: K,
}

impl<H, C, K> CheckInService<H, C, K>
where
    H: CheckInRepository,
    C: ContactRepository,
    K: CategoryRepository,
{
    pub fn new(check_ins: H, contacts: C, categories: K) -> Self {
        Self {
            check_ins,
            contacts,
            categories,
        }
    }

    /// # Errors
    /// - `NotFound` when the contact does not exist.
    pub fn schedule_check_in(
        &self,
        contact_id: ContactId,
        date: DateTime<Utc>,
    ) -> ServiceResult<CheckIn> {
        if self.contacts.find_by_id(contact_id)?.is_none() {
            return Err(ServiceError::not_found(EntityKind::Contact, contact_id));
        }
        let check_in = CheckIn::schedule(contact_id, date)?;
        self.check_ins.save(&check_in)?;
        info!(
            "event=check_in_schedule module=service status=ok id={} contact_id={}",
            check_in.id(),
            contact_id
        );
        Ok(check_in)
    }

    /// Schedules the next check-in one category interval after `after`.
    ///
    /// # Errors
    /// - `NotFound` for a missing contact, an uncategorized contact, or a
    ///   category id that no longer resolves.
    /// - `Validation` when the next date falls past year 9999.
    pub fn schedule_next(
        &self,
        contact_id: ContactId,
        after: DateTime<Utc>,
    ) -> ServiceResult<CheckIn> {
        let contact = self
            .contacts
            .find_by_id(contact_id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Contact, contact_id))?;
        let category = self
            .categories
            .find_by_id(contact.category_id())?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Category, contact.category_id()))?;

        let due = category.frequency().next_after(after)?;
        self.schedule_check_in(contact_id, due)
    }

    pub fn get_check_in(&self, id: CheckInId) -> ServiceResult<CheckIn> {
        self.check_ins
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::CheckIn, id))
    }

    pub fn complete_check_in(&self, id: CheckInId, notes: Option<&str>) -> ServiceResult<CheckIn> {
        let notes = match notes.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Some(Notes::new(value)?),
            None => None,
        };
        let completed = self.get_check_in(id)?.complete(notes)?;
        self.check_ins.save(&completed)?;
        info!("event=check_in_complete module=service status=ok id={id}");
        Ok(completed)
    }

    pub fn skip_check_in(&self, id: CheckInId) -> ServiceResult<CheckIn> {
        let skipped = self.get_check_in(id)?.skip()?;
        self.check_ins.save(&skipped)?;
        Ok(skipped)
    }

    pub fn reschedule_check_in(
        &self,
        id: CheckInId,
        date: DateTime<Utc>,
    ) -> ServiceResult<CheckIn> {
        let moved = self.get_check_in(id)?.reschedule(date)?;
        self.check_ins.save(&moved)?;
        Ok(moved)
    }

    pub fn list_for_contact(&self, contact_id: ContactId) -> ServiceResult<CheckInCollection> {
        Ok(self.check_ins.find_all()?.for_contact(contact_id))
    }

    /// Scheduled check-ins due before `cutoff`.
    pub fn due_before(&self, cutoff: DateTime<Utc>) -> ServiceResult<CheckInCollection> {
        Ok(self.check_ins.find_all()?.due_before(cutoff))
    }
}
