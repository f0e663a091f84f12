//! Core domain logic for Kith, a personal relationship tracker.
//! This crate is the single source of truth for business invariants.

pub mod collection;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod serializer;
pub mod service;
pub mod storage;

pub use collection::{
    CategoryCollection, CheckInCollection, Collection, ContactCollection, EntityCollection,
    ImportantDateCollection,
};
pub use config::{ConfigError, KithConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::category::{Category, CategoryDraft};
pub use model::check_in::{CheckIn, CheckInDraft, CheckInStatus};
pub use model::contact::{Contact, ContactDraft, ImportantDate};
pub use model::ids::{CategoryId, CheckInId, ContactId};
pub use model::validation::ValidationError;
pub use model::value::{
    CategoryName, CheckInFrequency, ContactName, DateLabel, Email, FrequencyUnit, Location, Notes,
    Phone, RelationshipContext,
};
pub use repo::memory_repo::{
    InMemoryCategoryRepository, InMemoryCheckInRepository, InMemoryContactRepository,
    InMemoryRepository,
};
pub use repo::store_repo::{
    StoreCategoryRepository, StoreCheckInRepository, StoreContactRepository, StoreRepository,
};
pub use repo::{
    Aggregate, CategoryRepository, CheckInRepository, ContactRepository, EntityKind, RepoError,
    RepoResult, Repository,
};
pub use serializer::{RevivedValue, SerializerError};
pub use service::backup_service::{
    BackupService, ExportError, ImportError, ImportSource, ImportSummary, Snapshot,
    SNAPSHOT_VERSION,
};
pub use service::category_service::CategoryService;
pub use service::check_in_service::CheckInService;
pub use service::contact_service::{ContactInput, ContactService};
pub use service::{ServiceError, ServiceResult};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError, StorageResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
