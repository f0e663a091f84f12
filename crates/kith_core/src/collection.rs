//! Immutable ordered collections over domain entities.
//!
//! # Responsibility
//! - Provide one read-only container contract shared by every aggregate.
//! - Keep `filter` subtype-preserving: filtering a `ContactCollection`
//!   yields a `ContactCollection`, not the generic base.
//!
//! # Invariants
//! - Construction takes ownership of (or clones) the input, so the caller
//!   cannot mutate a collection after handing items over.
//! - No API hands out `&mut` access to stored items.
//! - Insertion order is preserved by every operation.

use crate::model::category::Category;
use crate::model::check_in::{CheckIn, CheckInStatus};
use crate::model::contact::{Contact, ImportantDate};
use crate::model::ids::{CategoryId, ContactId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only ordered container.
///
/// Implementors provide `from_items`, which `filter` uses to rebuild the
/// concrete collection type.
pub trait EntityCollection: Sized {
    type Item: Clone;

    /// Builds a collection of the implementing type from owned items.
    fn from_items(items: Vec<Self::Item>) -> Self;

    /// Read-only view of the items in order.
    fn items(&self) -> &[Self::Item];

    fn size(&self) -> usize {
        self.items().len()
    }

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    fn iter(&self) -> std::slice::Iter<'_, Self::Item> {
        self.items().iter()
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&Self::Item),
    {
        self.items().iter().for_each(f);
    }

    /// First item matching `predicate`, or `None`.
    fn find<P>(&self, mut predicate: P) -> Option<&Self::Item>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.items().iter().find(|item| predicate(item))
    }

    fn some<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.items().iter().any(|item| predicate(item))
    }

    fn every<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.items().iter().all(|item| predicate(item))
    }

    /// Transforms every item into a plain vector.
    fn map<U, F>(&self, f: F) -> Vec<U>
    where
        F: FnMut(&Self::Item) -> U,
    {
        self.items().iter().map(f).collect()
    }

    /// Keeps matching items in a new collection of the same concrete type.
    fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Self::from_items(
            self.items()
                .iter()
                .filter(|item| predicate(item))
                .cloned()
                .collect(),
        )
    }

    fn to_vec(&self) -> Vec<Self::Item> {
        self.items().to_vec()
    }
}

macro_rules! collection_type {
    ($(#[$meta:meta])* $name:ident $(<$param:ident>)?, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name $(<$param>)? {
            items: Vec<$item>,
        }

        impl $(<$param: Clone>)? $name $(<$param>)? {
            pub fn new(items: impl IntoIterator<Item = $item>) -> Self {
                Self {
                    items: items.into_iter().collect(),
                }
            }

            /// Clones `items`; later changes to the slice owner are not seen.
            pub fn from_slice(items: &[$item]) -> Self {
                Self {
                    items: items.to_vec(),
                }
            }

            pub fn empty() -> Self {
                Self { items: Vec::new() }
            }
        }

        impl $(<$param: Clone>)? Default for $name $(<$param>)? {
            fn default() -> Self {
                Self::empty()
            }
        }

        impl $(<$param: Clone>)? EntityCollection for $name $(<$param>)? {
            type Item = $item;

            fn from_items(items: Vec<$item>) -> Self {
                Self { items }
            }

            fn items(&self) -> &[$item] {
                &self.items
            }
        }

        impl $(<$param: Clone>)? FromIterator<$item> for $name $(<$param>)? {
            fn from_iter<I: IntoIterator<Item = $item>>(iter: I) -> Self {
                Self::new(iter)
            }
        }

        impl<'a $(, $param: Clone)?> IntoIterator for &'a $name $(<$param>)? {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.iter()
            }
        }

        impl $(<$param: Clone>)? IntoIterator for $name $(<$param>)? {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.into_iter()
            }
        }
    };
}

collection_type!(
    /// Generic ordered collection with no domain-specific behavior.
    Collection<T>,
    T
);
collection_type!(ContactCollection, Contact);
collection_type!(CategoryCollection, Category);
collection_type!(CheckInCollection, CheckIn);
collection_type!(
    /// Important dates attached to a contact.
    ImportantDateCollection,
    ImportantDate
);

impl ContactCollection {
    pub fn in_category(&self, category_id: CategoryId) -> Self {
        self.filter(|contact| contact.category_id() == category_id)
    }

    /// Case-insensitive exact name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Contact> {
        let needle = name.trim().to_lowercase();
        self.find(|contact| contact.name().as_str().to_lowercase() == needle)
    }
}

impl CategoryCollection {
    /// Case-insensitive exact name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        let needle = name.trim().to_lowercase();
        self.find(|category| category.name().as_str().to_lowercase() == needle)
    }
}

impl CheckInCollection {
    pub fn with_status(&self, status: CheckInStatus) -> Self {
        self.filter(|check_in| check_in.status() == status)
    }

    pub fn for_contact(&self, contact_id: ContactId) -> Self {
        self.filter(|check_in| check_in.contact_id() == contact_id)
    }

    /// Scheduled check-ins due strictly before `cutoff`.
    pub fn due_before(&self, cutoff: DateTime<Utc>) -> Self {
        self.filter(|check_in| {
            check_in.status() == CheckInStatus::Scheduled && check_in.scheduled_date() < cutoff
        })
    }
}

impl ImportantDateCollection {
    /// Dates on or after `from`, in stored order.
    pub fn upcoming_after(&self, from: DateTime<Utc>) -> Self {
        self.filter(|entry| entry.date() >= from)
    }
}
