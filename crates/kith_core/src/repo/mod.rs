//! Repository ports and their implementations.
//!
//! # Responsibility
//! - Define one generic port (`Repository<E>`) shared by every aggregate.
//! - Provide an in-memory double and a key-value-store-backed repository.
//!
//! # Invariants
//! - `save` is an upsert keyed by the aggregate id.
//! - `delete` is idempotent; unknown ids are not an error.
//! - `find_all` returns a snapshot collection, never a live view.

use crate::collection::{
    CategoryCollection, CheckInCollection, ContactCollection, EntityCollection,
};
use crate::model::category::Category;
use crate::model::check_in::CheckIn;
use crate::model::contact::Contact;
use crate::model::ids::{CategoryId, CheckInId, ContactId};
use crate::serializer::SerializerError;
use crate::storage::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_repo;
pub mod store_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// Storage port failure, including quota rejections.
    Storage(StorageError),
    /// Persisted slot content could not be encoded or decoded.
    Serialization(SerializerError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid persisted data: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<SerializerError> for RepoError {
    fn from(value: SerializerError) -> Self {
        Self::Serialization(value)
    }
}

/// Aggregate kinds, also naming their storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Contact,
    Category,
    CheckIn,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Category => "category",
            Self::CheckIn => "check_in",
        }
    }

    /// Key of the slot holding the full list of this aggregate.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Contact => "contacts",
            Self::Category => "categories",
            Self::CheckIn => "checkIns",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binds an entity to its identifier and collection types.
pub trait Aggregate: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Display;
    type Collection: EntityCollection<Item = Self>;

    const KIND: EntityKind;

    fn aggregate_id(&self) -> Self::Id;
}

impl Aggregate for Contact {
    type Id = ContactId;
    type Collection = ContactCollection;

    const KIND: EntityKind = EntityKind::Contact;

    fn aggregate_id(&self) -> ContactId {
        self.id()
    }
}

impl Aggregate for Category {
    type Id = CategoryId;
    type Collection = CategoryCollection;

    const KIND: EntityKind = EntityKind::Category;

    fn aggregate_id(&self) -> CategoryId {
        self.id()
    }
}

impl Aggregate for CheckIn {
    type Id = CheckInId;
    type Collection = CheckInCollection;

    const KIND: EntityKind = EntityKind::CheckIn;

    fn aggregate_id(&self) -> CheckInId {
        self.id()
    }
}

/// Persistence port for one aggregate type.
pub trait Repository<E: Aggregate> {
    /// Inserts `entity`, replacing any stored entity with the same id.
    fn save(&self, entity: &E) -> RepoResult<()>;
    fn find_by_id(&self, id: E::Id) -> RepoResult<Option<E>>;
    fn find_all(&self) -> RepoResult<E::Collection>;
    /// Removes the entity if present.
    fn delete(&self, id: E::Id) -> RepoResult<()>;
}

impl<E: Aggregate, R: Repository<E> + ?Sized> Repository<E> for &R {
    fn save(&self, entity: &E) -> RepoResult<()> {
        (**self).save(entity)
    }

    fn find_by_id(&self, id: E::Id) -> RepoResult<Option<E>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> RepoResult<E::Collection> {
        (**self).find_all()
    }

    fn delete(&self, id: E::Id) -> RepoResult<()> {
        (**self).delete(id)
    }
}

pub trait ContactRepository: Repository<Contact> {}
impl<T: Repository<Contact> + ?Sized> ContactRepository for T {}

pub trait CategoryRepository: Repository<Category> {}
impl<T: Repository<Category> + ?Sized> CategoryRepository for T {}

pub trait CheckInRepository: Repository<CheckIn> {}
impl<T: Repository<CheckIn> + ?Sized> CheckInRepository for T {}
