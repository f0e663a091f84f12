//! Full-dataset backup and restore.
//!
//! # Responsibility
//! - Assemble snapshots of every aggregate for export.
//! - Validate and restore snapshots through the repository ports.
//!
//! # Invariants
//! - Import rejects malformed payloads before the first repository write.
//! - Import writes contacts, then categories, then check-ins, one `save` at
//!   a time. There is no rollback: a failed write leaves earlier writes in
//!   place and reports how many entities were written.

use crate::collection::EntityCollection;
use crate::model::category::Category;
use crate::model::check_in::CheckIn;
use crate::model::contact::Contact;
use crate::repo::{CategoryRepository, CheckInRepository, ContactRepository, RepoError};
use crate::serializer::{self, iso_millis, truncate_to_millis, SerializerError};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema tag written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    String,
    Array,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array => "array",
        }
    }
}

const REQUIRED_FIELDS: &[(&str, FieldType)] = &[
    ("version", FieldType::String),
    ("contacts", FieldType::Array),
    ("categories", FieldType::Array),
    ("checkIns", FieldType::Array),
];

/// Complete exported state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    #[serde(with = "iso_millis")]
    pub exported_at: DateTime<Utc>,
    pub contacts: Vec<Contact>,
    pub categories: Vec<Category>,
    pub check_ins: Vec<CheckIn>,
}

/// Import payload: raw JSON text or an already parsed value.
#[derive(Debug, Clone)]
pub enum ImportSource<'a> {
    Raw(&'a str),
    Parsed(Value),
}

/// Number of entities written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub contacts: usize,
    pub categories: usize,
    pub check_ins: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.contacts + self.categories + self.check_ins
    }
}

#[derive(Debug)]
pub enum ImportError {
    /// Raw payload is not valid JSON.
    InvalidJson(String),
    /// Payload is valid JSON but not an object.
    NotAnObject { found: &'static str },
    /// Required top-level field is absent.
    MissingField(&'static str),
    /// Required top-level field has the wrong JSON type.
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
    },
    /// An entity inside one of the arrays failed to decode or validate.
    InvalidEntity { field: &'static str, message: String },
    /// A repository write failed after `written` entities were stored.
    WriteFailed {
        written: ImportSummary,
        source: RepoError,
    },
}

impl ImportError {
    /// True when the failure happened before anything was written, so the
    /// import can be retried without duplicating data.
    pub fn nothing_imported(&self) -> bool {
        match self {
            Self::WriteFailed { written, .. } => written.total() == 0,
            _ => true,
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(message) => write!(f, "invalid JSON: {message}"),
            Self::NotAnObject { found } => {
                write!(f, "invalid backup: expected an object, got {found}")
            }
            Self::MissingField(field) => {
                write!(f, "invalid backup: missing required field `{field}`")
            }
            Self::InvalidFieldType { field, expected } => {
                write!(f, "invalid backup: field `{field}` must be a {expected}")
            }
            Self::InvalidEntity { field, message } => {
                write!(f, "invalid backup: bad entry in `{field}`: {message}")
            }
            Self::WriteFailed { written, source } => write!(
                f,
                "import stopped after writing {} entities: {source}",
                written.total()
            ),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WriteFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    Repo(RepoError),
    Encode(SerializerError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "export failed: {err}"),
            Self::Encode(err) => write!(f, "export failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for ExportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<SerializerError> for ExportError {
    fn from(value: SerializerError) -> Self {
        Self::Encode(value)
    }
}

struct DecodedSnapshot {
    contacts: Vec<Contact>,
    categories: Vec<Category>,
    check_ins: Vec<CheckIn>,
}

pub struct BackupService<C, K, H>
where
    C: ContactRepository,
    K: CategoryRepository,
    H: CheckInRepository,
{
    contacts: C,
    categories: K,
    check_ins: H,
}

impl<C, K, H> BackupService<C, K, H>
where
    C: ContactRepository,
    K: CategoryRepository,
    H: CheckInRepository,
{
    pub fn new(contacts: C, categories: K, check_ins: H) -> Self {
        Self {
            contacts,
            categories,
            check_ins,
        }
    }

    /// Snapshot of every repository, stamped with the current time.
    pub fn export_data(&self) -> Result<Snapshot, ExportError> {
        self.export_data_at(Utc::now())
    }

    pub fn export_data_at(&self, exported_at: DateTime<Utc>) -> Result<Snapshot, ExportError> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at: truncate_to_millis(exported_at),
            contacts: self.contacts.find_all()?.to_vec(),
            categories: self.categories.find_all()?.to_vec(),
            check_ins: self.check_ins.find_all()?.to_vec(),
        };
        info!(
            "event=backup_export module=backup status=ok contacts={} categories={} check_ins={}",
            snapshot.contacts.len(),
            snapshot.categories.len(),
            snapshot.check_ins.len()
        );
        Ok(snapshot)
    }

    /// Pretty-printed JSON backup of the current dataset.
    pub fn create_backup(&self) -> Result<String, ExportError> {
        Ok(serializer::serialize_pretty(&self.export_data()?)?)
    }

    pub fn import_from_str(&self, raw: &str) -> Result<ImportSummary, ImportError> {
        self.import_data(ImportSource::Raw(raw))
    }

    pub fn import_value(&self, value: Value) -> Result<ImportSummary, ImportError> {
        self.import_data(ImportSource::Parsed(value))
    }

    /// Validates the payload, then saves every entity it carries.
    ///
    /// # Errors
    /// - `InvalidJson`, `NotAnObject`, `MissingField`, `InvalidFieldType`,
    ///   `InvalidEntity`: raised before any write.
    /// - `WriteFailed`: a repository write failed; earlier writes remain.
    pub fn import_data(&self, source: ImportSource<'_>) -> Result<ImportSummary, ImportError> {
        let kind = match source {
            ImportSource::Raw(_) => "raw",
            ImportSource::Parsed(_) => "parsed",
        };
        log_import(kind, || {
            decode_source(source).and_then(|decoded| self.write_snapshot(&decoded))
        })
    }

    /// Restores an already typed snapshot.
    pub fn import_snapshot(&self, snapshot: &Snapshot) -> Result<ImportSummary, ImportError> {
        log_import("snapshot", || {
            self.write_snapshot(&DecodedSnapshot {
                contacts: snapshot.contacts.clone(),
                categories: snapshot.categories.clone(),
                check_ins: snapshot.check_ins.clone(),
            })
        })
    }

    fn write_snapshot(&self, decoded: &DecodedSnapshot) -> Result<ImportSummary, ImportError> {
        let mut written = ImportSummary::default();

        for contact in &decoded.contacts {
            self.contacts
                .save(contact)
                .map_err(|source| ImportError::WriteFailed { written, source })?;
            written.contacts += 1;
        }
        for category in &decoded.categories {
            self.categories
                .save(category)
                .map_err(|source| ImportError::WriteFailed { written, source })?;
            written.categories += 1;
        }
        for check_in in &decoded.check_ins {
            self.check_ins
                .save(check_in)
                .map_err(|source| ImportError::WriteFailed { written, source })?;
            written.check_ins += 1;
        }

        Ok(written)
    }
}

/// Wraps one import run in `backup_import` start/ok/error events.
fn log_import<F>(source: &'static str, run: F) -> Result<ImportSummary, ImportError>
where
    F: FnOnce() -> Result<ImportSummary, ImportError>,
{
    info!("event=backup_import module=backup status=start source={source}");
    let result = run();
    match &result {
        Ok(summary) => info!(
            "event=backup_import module=backup status=ok source={source} contacts={} categories={} check_ins={}",
            summary.contacts, summary.categories, summary.check_ins
        ),
        Err(err) => error!(
            "event=backup_import module=backup status=error source={source} nothing_imported={} error={}",
            err.nothing_imported(),
            err
        ),
    }
    result
}

fn decode_source(source: ImportSource<'_>) -> Result<DecodedSnapshot, ImportError> {
    let value = match source {
        ImportSource::Raw(raw) => serde_json::from_str::<Value>(raw)
            .map_err(|err| ImportError::InvalidJson(err.to_string()))?,
        ImportSource::Parsed(value) => value,
    };

    let fields = validate_shape(&value)?;
    if let Some(version) = fields.get("version").and_then(Value::as_str) {
        if version != SNAPSHOT_VERSION {
            warn!(
                "event=backup_import module=backup status=warn reason=version_mismatch version={version}"
            );
        }
    }

    Ok(DecodedSnapshot {
        contacts: decode_entities(fields, "contacts")?,
        categories: decode_entities(fields, "categories")?,
        check_ins: decode_entities(fields, "checkIns")?,
    })
}

/// Checks the top-level shape and returns the object's fields.
fn validate_shape(value: &Value) -> Result<&Map<String, Value>, ImportError> {
    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(ImportError::NotAnObject {
                found: json_type_name(other),
            })
        }
    };

    for &(field, expected) in REQUIRED_FIELDS {
        match fields.get(field) {
            None => return Err(ImportError::MissingField(field)),
            Some(found) if !expected.matches(found) => {
                return Err(ImportError::InvalidFieldType {
                    field,
                    expected: expected.as_str(),
                })
            }
            Some(_) => {}
        }
    }

    Ok(fields)
}

fn decode_entities<E: DeserializeOwned>(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<E>, ImportError> {
    let items = fields
        .get(field)
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingField(field))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            E::deserialize(item).map_err(|err| ImportError::InvalidEntity {
                field,
                message: format!("index {index}: {err}"),
            })
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{log_import, validate_shape, ImportError, ImportSummary};
    use serde_json::json;

    #[test]
    fn log_import_passes_result_through() {
        let summary = ImportSummary {
            contacts: 1,
            categories: 2,
            check_ins: 3,
        };
        assert_eq!(log_import("snapshot", || Ok(summary)).unwrap(), summary);

        let err = log_import("raw", || Err(ImportError::MissingField("contacts"))).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("contacts")));
    }

    #[test]
    fn array_payload_is_not_an_object() {
        let err = validate_shape(&json!([])).unwrap_err();
        assert!(matches!(err, ImportError::NotAnObject { found: "array" }));
    }

    #[test]
    fn fields_are_checked_in_declared_order() {
        let err = validate_shape(&json!({ "contacts": [] })).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("version")));

        let err = validate_shape(&json!({
            "version": "1.0",
            "contacts": [],
            "categories": {},
            "checkIns": []
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::InvalidFieldType {
                field: "categories",
                expected: "array"
            }
        ));
    }

    #[test]
    fn version_must_be_a_string() {
        let err = validate_shape(&json!({
            "version": 1,
            "contacts": [],
            "categories": [],
            "checkIns": []
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid backup: field `version` must be a string"
        );
    }
}
