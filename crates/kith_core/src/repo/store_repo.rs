//! Repository persisting each aggregate as one JSON list in a storage slot.
//!
//! # Invariants
//! - Every read loads the whole slot and every write rewrites it, so each
//!   operation is O(n) in the number of stored entities.
//! - There is no transaction or conflict detection: overlapping writers
//!   race on read-modify-write and the last write wins.
//! - A missing slot reads as an empty list.

use super::{Aggregate, RepoResult, Repository};
use crate::collection::EntityCollection;
use crate::model::category::Category;
use crate::model::check_in::CheckIn;
use crate::model::contact::Contact;
use crate::serializer;
use crate::storage::KeyValueStore;
use log::debug;
use std::marker::PhantomData;

pub type StoreContactRepository<'s, S> = StoreRepository<'s, Contact, S>;
pub type StoreCategoryRepository<'s, S> = StoreRepository<'s, Category, S>;
pub type StoreCheckInRepository<'s, S> = StoreRepository<'s, CheckIn, S>;

pub struct StoreRepository<'s, E, S: ?Sized> {
    store: &'s S,
    key: &'static str,
    _entity: PhantomData<fn() -> E>,
}

impl<'s, E: Aggregate, S: KeyValueStore + ?Sized> StoreRepository<'s, E, S> {
    /// Uses the aggregate's default slot (`contacts`, `categories`, `checkIns`).
    pub fn new(store: &'s S) -> Self {
        Self::with_key(store, E::KIND.storage_key())
    }

    pub fn with_key(store: &'s S, key: &'static str) -> Self {
        Self {
            store,
            key,
            _entity: PhantomData,
        }
    }

    pub fn storage_key(&self) -> &'static str {
        self.key
    }

    fn load_all(&self) -> RepoResult<Vec<E>> {
        match self.store.get_item(self.key)? {
            Some(json) => Ok(serializer::deserialize::<Vec<E>>(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_all(&self, entities: &[E]) -> RepoResult<()> {
        let json = serializer::serialize(entities)?;
        self.store.set_item(self.key, &json)?;
        debug!(
            "event=repo_write module=repo status=ok kind={} count={}",
            E::KIND,
            entities.len()
        );
        Ok(())
    }
}

impl<E: Aggregate, S: KeyValueStore + ?Sized> Repository<E> for StoreRepository<'_, E, S> {
    fn save(&self, entity: &E) -> RepoResult<()> {
        let id = entity.aggregate_id();
        let mut entities = self.load_all()?;
        entities.retain(|existing| existing.aggregate_id() != id);
        entities.push(entity.clone());
        self.write_all(&entities)
    }

    fn find_by_id(&self, id: E::Id) -> RepoResult<Option<E>> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|entity| entity.aggregate_id() == id))
    }

    fn find_all(&self) -> RepoResult<E::Collection> {
        Ok(E::Collection::from_items(self.load_all()?))
    }

    fn delete(&self, id: E::Id) -> RepoResult<()> {
        let mut entities = self.load_all()?;
        let before = entities.len();
        entities.retain(|entity| entity.aggregate_id() != id);
        if entities.len() == before {
            return Ok(());
        }
        self.write_all(&entities)
    }
}
