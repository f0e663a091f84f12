//! Contact use-case service.

use super::{ServiceError, ServiceResult};
use crate::collection::{ContactCollection, EntityCollection};
use crate::model::contact::{Contact, ContactDraft, ImportantDate};
use crate::model::ids::{CategoryId, ContactId};
use crate::model::validation::ValidationError;
use crate::model::value::{ContactName, DateLabel, Email, Location, Phone, RelationshipContext};
use crate::repo::{CategoryRepository, ContactRepository, EntityKind};
use chrono::{DateTime, Utc};
use log::info;

/// Raw contact fields as entered by a user. Blank optional fields are
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub relationship_context: Option<String>,
    pub category_id: Option<CategoryId>,
}

fn optional<T>(
    raw: Option<&str>,
    build: impl FnOnce(&str) -> Result<T, ValidationError>,
) -> ServiceResult<Option<T>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(Some(build(value)?)),
        None => Ok(None),
    }
}

pub struct ContactService<R: ContactRepository, K: CategoryRepository> {
    contacts: R,
    categories: K,
}

impl<R: ContactRepository, K: CategoryRepository> ContactService<R, K> {
    pub fn new(contacts: R, categories: K) -> Self {
        Self {
            contacts,
            categories,
        }
    }

    /// # Errors
    /// - `Validation` for any malformed field.
    /// - `NotFound` when `input.category_id` names a missing category.
    pub fn create_contact(&self, input: &ContactInput) -> ServiceResult<Contact> {
        let category_id = match input.category_id {
            Some(id) => self.ensure_category(id)?,
            None => CategoryId::null(),
        };
        let mut draft = ContactDraft::named(ContactName::new(&input.name)?);
        draft.phone = optional(input.phone.as_deref(), Phone::new)?;
        draft.email = optional(input.email.as_deref(), Email::new)?;
        draft.location = optional(input.location.as_deref(), Location::new)?;
        draft.relationship_context =
            optional(input.relationship_context.as_deref(), RelationshipContext::new)?;
        draft.category_id = category_id;

        let contact = Contact::create(draft)?;
        self.contacts.save(&contact)?;
        info!(
            "event=contact_create module=service status=ok id={}",
            contact.id()
        );
        Ok(contact)
    }

    pub fn get_contact(&self, id: ContactId) -> ServiceResult<Contact> {
        self.contacts
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Contact, id))
    }

    pub fn rename_contact(&self, id: ContactId, name: &str) -> ServiceResult<Contact> {
        let renamed = self.get_contact(id)?.rename(ContactName::new(name)?)?;
        self.contacts.save(&renamed)?;
        Ok(renamed)
    }

    /// Assigns `category_id`; the null id clears the assignment.
    pub fn assign_category(
        &self,
        id: ContactId,
        category_id: CategoryId,
    ) -> ServiceResult<Contact> {
        let category_id = self.ensure_category(category_id)?;
        let updated = self.get_contact(id)?.assign_category(category_id)?;
        self.contacts.save(&updated)?;
        Ok(updated)
    }

    pub fn add_important_date(
        &self,
        id: ContactId,
        label: &str,
        date: DateTime<Utc>,
    ) -> ServiceResult<Contact> {
        let entry = ImportantDate::new(DateLabel::new(label)?, date)?;
        let updated = self.get_contact(id)?.add_important_date(entry)?;
        self.contacts.save(&updated)?;
        Ok(updated)
    }

    pub fn list_contacts(&self) -> ServiceResult<ContactCollection> {
        Ok(self.contacts.find_all()?)
    }

    pub fn contacts_in_category(&self, category_id: CategoryId) -> ServiceResult<ContactCollection> {
        Ok(self.contacts.find_all()?.in_category(category_id))
    }

    pub fn delete_contact(&self, id: ContactId) -> ServiceResult<()> {
        self.contacts.delete(id)?;
        info!("event=contact_delete module=service status=ok id={id}");
        Ok(())
    }

    pub fn count(&self) -> ServiceResult<usize> {
        Ok(self.contacts.find_all()?.size())
    }

    fn ensure_category(&self, category_id: CategoryId) -> ServiceResult<CategoryId> {
        if category_id.is_null() || self.categories.find_by_id(category_id)?.is_some() {
            return Ok(category_id);
        }
        Err(ServiceError::not_found(EntityKind::Category, category_id))
    }
}
