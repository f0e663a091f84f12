use chrono::{TimeZone, Utc};
use kith_core::serializer::deserialize_value;
use kith_core::{
    BackupService, Category, CategoryName, CheckIn, CheckInFrequency, Contact, ContactName,
    EntityCollection, FrequencyUnit, ImportError, ImportSource, ImportSummary,
    InMemoryCategoryRepository, InMemoryCheckInRepository, InMemoryContactRepository, MemoryStore,
    RepoError, Repository, StorageError, StoreCategoryRepository, StoreCheckInRepository,
    StoreContactRepository, SNAPSHOT_VERSION,
};
use serde_json::json;

struct Repos {
    contacts: InMemoryContactRepository,
    categories: InMemoryCategoryRepository,
    check_ins: InMemoryCheckInRepository,
}

impl Repos {
    fn new() -> Self {
        Self {
            contacts: InMemoryContactRepository::new(),
            categories: InMemoryCategoryRepository::new(),
            check_ins: InMemoryCheckInRepository::new(),
        }
    }

    fn backup(
        &self,
    ) -> BackupService<
        &InMemoryContactRepository,
        &InMemoryCategoryRepository,
        &InMemoryCheckInRepository,
    > {
        BackupService::new(&self.contacts, &self.categories, &self.check_ins)
    }

    fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.categories.is_empty() && self.check_ins.is_empty()
    }
}

fn seeded() -> Repos {
    let repos = Repos::new();
    let family = Category::new(
        CategoryName::new("Family").unwrap(),
        CheckInFrequency::new(1, FrequencyUnit::Weeks).unwrap(),
    )
    .unwrap();
    let ada = Contact::new(ContactName::new("Ada").unwrap())
        .unwrap()
        .assign_category(family.id())
        .unwrap();
    let grace = Contact::new(ContactName::new("Grace").unwrap()).unwrap();
    let check_in = CheckIn::schedule(
        ada.id(),
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
    )
    .unwrap();

    repos.categories.save(&family).unwrap();
    repos.contacts.save(&ada).unwrap();
    repos.contacts.save(&grace).unwrap();
    repos.check_ins.save(&check_in).unwrap();
    repos
}

#[test]
fn export_then_import_restores_every_entity() {
    let source = seeded();
    let backup = source.backup().create_backup().unwrap();

    let target = Repos::new();
    let summary = target.backup().import_from_str(&backup).unwrap();

    assert_eq!(
        summary,
        ImportSummary {
            contacts: 2,
            categories: 1,
            check_ins: 1
        }
    );
    assert_eq!(
        target.contacts.find_all().unwrap(),
        source.contacts.find_all().unwrap()
    );
    assert_eq!(
        target.categories.find_all().unwrap(),
        source.categories.find_all().unwrap()
    );
    assert_eq!(
        target.check_ins.find_all().unwrap(),
        source.check_ins.find_all().unwrap()
    );
}

#[test]
fn exported_snapshot_has_version_timestamp_and_camel_case_keys() {
    let repos = seeded();
    let at = Utc.timestamp_millis_opt(1_714_555_800_123).unwrap();
    let snapshot = repos.backup().export_data_at(at).unwrap();
    assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    assert_eq!(snapshot.exported_at, at);
    assert_eq!(snapshot.contacts.len(), 2);

    let backup = repos.backup().create_backup().unwrap();
    let value = deserialize_value(&backup).unwrap();
    assert!(value.get("exportedAt").unwrap().as_date().is_some());
    assert_eq!(value.get("checkIns").unwrap().as_array().unwrap().len(), 1);
    assert_eq!(value.get("categories").unwrap().as_array().unwrap().len(), 1);
}

#[test]
fn export_of_empty_repositories_is_importable() {
    let empty = Repos::new();
    let backup = empty.backup().create_backup().unwrap();

    let summary = Repos::new().backup().import_from_str(&backup).unwrap();
    assert_eq!(summary.total(), 0);
}

#[test]
fn invalid_json_is_rejected_without_writes() {
    let repos = Repos::new();
    let err = repos.backup().import_from_str("not json").unwrap_err();

    assert!(matches!(err, ImportError::InvalidJson(_)));
    assert!(err.nothing_imported());
    assert!(repos.is_empty());
}

#[test]
fn missing_contacts_field_is_reported_by_name() {
    let repos = Repos::new();
    let err = repos
        .backup()
        .import_data(ImportSource::Raw(r#"{"version":"1.0"}"#))
        .unwrap_err();

    assert!(matches!(err, ImportError::MissingField("contacts")));
    assert_eq!(
        err.to_string(),
        "invalid backup: missing required field `contacts`"
    );
    assert!(repos.is_empty());
}

#[test]
fn parsed_payload_with_wrong_types_is_rejected_without_writes() {
    let repos = Repos::new();
    let err = repos
        .backup()
        .import_value(json!({
            "version": "1.0",
            "contacts": [],
            "categories": "none",
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
    assert!(repos.is_empty());
}

#[test]
fn invalid_entity_anywhere_blocks_the_whole_import() {
    let source = seeded();
    let mut payload: serde_json::Value =
        serde_json::from_str(&source.backup().create_backup().unwrap()).unwrap();
    payload["checkIns"][0]["status"] = json!("cancelled");

    let target = Repos::new();
    let err = target.backup().import_value(payload).unwrap_err();

    assert!(matches!(
        err,
        ImportError::InvalidEntity {
            field: "checkIns",
            ..
        }
    ));
    assert!(target.is_empty());
}

#[test]
fn failed_write_keeps_earlier_writes_and_reports_them() {
    let backup = seeded().backup().create_backup().unwrap();

    let roomy = MemoryStore::new();
    let cramped = MemoryStore::with_quota(40);
    let contacts = StoreContactRepository::new(&roomy);
    let categories = StoreCategoryRepository::new(&cramped);
    let check_ins = StoreCheckInRepository::new(&roomy);
    let service = BackupService::new(&contacts, &categories, &check_ins);

    let err = service.import_from_str(&backup).unwrap_err();
    match &err {
        ImportError::WriteFailed { written, source } => {
            assert_eq!(written.contacts, 2);
            assert_eq!(written.categories, 0);
            assert_eq!(written.check_ins, 0);
            assert!(matches!(
                source,
                RepoError::Storage(StorageError::QuotaExceeded { .. })
            ));
        }
        other => panic!("expected WriteFailed, got {other:?}"),
    }
    assert!(!err.nothing_imported());
    assert_eq!(contacts.find_all().unwrap().size(), 2);
    assert!(check_ins.find_all().unwrap().is_empty());
}

#[test]
fn typed_snapshot_import_writes_same_counts() {
    let source = seeded();
    let snapshot = source.backup().export_data().unwrap();

    let target = Repos::new();
    let summary = target.backup().import_snapshot(&snapshot).unwrap();
    assert_eq!(summary.total(), 4);
    assert_eq!(target.contacts.len(), 2);
}
