//! In-memory repository double.
//!
//! Entities are kept in a map keyed by the id string plus an insertion-order
//! list, so `find_all` keeps the order in which ids were first saved.

use super::{Aggregate, RepoResult, Repository};
use crate::collection::EntityCollection;
use crate::model::category::Category;
use crate::model::check_in::CheckIn;
use crate::model::contact::Contact;
use std::cell::RefCell;
use std::collections::HashMap;

pub type InMemoryContactRepository = InMemoryRepository<Contact>;
pub type InMemoryCategoryRepository = InMemoryRepository<Category>;
pub type InMemoryCheckInRepository = InMemoryRepository<CheckIn>;

#[derive(Debug)]
struct Entries<E> {
    by_key: HashMap<String, E>,
    order: Vec<String>,
}

/// Repository holding entities in process memory.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    entries: RefCell<Entries<E>>,
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Entries {
                by_key: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl<E: Aggregate> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every stored entity. Test helper; not part of the port.
    pub fn clear(&self) {
        let mut entries = self.entries.borrow_mut();
        entries.by_key.clear();
        entries.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Aggregate> Repository<E> for InMemoryRepository<E> {
    fn save(&self, entity: &E) -> RepoResult<()> {
        let key = entity.aggregate_id().to_string();
        let mut entries = self.entries.borrow_mut();
        if entries.by_key.insert(key.clone(), entity.clone()).is_none() {
            entries.order.push(key);
        }
        Ok(())
    }

    fn find_by_id(&self, id: E::Id) -> RepoResult<Option<E>> {
        Ok(self.entries.borrow().by_key.get(&id.to_string()).cloned())
    }

    fn find_all(&self) -> RepoResult<E::Collection> {
        let entries = self.entries.borrow();
        let items = entries
            .order
            .iter()
            .filter_map(|key| entries.by_key.get(key).cloned())
            .collect();
        Ok(E::Collection::from_items(items))
    }

    fn delete(&self, id: E::Id) -> RepoResult<()> {
        let key = id.to_string();
        let mut entries = self.entries.borrow_mut();
        if entries.by_key.remove(&key).is_some() {
            entries.order.retain(|existing| existing != &key);
        }
        Ok(())
    }
}
