//! Use-case services over the repository ports.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Turn absent lookups into `ServiceError::NotFound` where the use case
//!   requires the entity to exist.
//! - Assemble and restore full-dataset backups.
//!
//! # Invariants
//! - Services never bypass entity factories or repository contracts.
//! - Services remain storage-agnostic.

use crate::model::validation::ValidationError;
use crate::repo::{EntityKind, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod backup_service;
pub mod category_service;
pub mod check_in_service;
pub mod contact_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Required entity is absent from its repository.
    NotFound { kind: EntityKind, id: String },
    /// Input rejected by a value-object or entity factory.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    pub(crate) fn not_found(kind: EntityKind, id: impl Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
