use chrono::{TimeZone, Utc};
use kith_core::{
    CategoryId, CategoryService, CheckInId, CheckInService, CheckInStatus, ContactId,
    ContactInput, ContactService, EntityCollection, EntityKind, FrequencyUnit,
    InMemoryCategoryRepository, InMemoryCheckInRepository, InMemoryContactRepository,
    ServiceError, ValidationError,
};

struct Fixture {
    contacts: InMemoryContactRepository,
    categories: InMemoryCategoryRepository,
    check_ins: InMemoryCheckInRepository,
}

impl Fixture {
    fn new() -> Self {
        Self {
            contacts: InMemoryContactRepository::new(),
            categories: InMemoryCategoryRepository::new(),
            check_ins: InMemoryCheckInRepository::new(),
        }
    }

    fn categories(&self) -> CategoryService<&InMemoryCategoryRepository> {
        CategoryService::new(&self.categories)
    }

    fn contacts(&self) -> ContactService<&InMemoryContactRepository, &InMemoryCategoryRepository> {
        ContactService::new(&self.contacts, &self.categories)
    }

    fn check_ins(
        &self,
    ) -> CheckInService<
        &InMemoryCheckInRepository,
        &InMemoryContactRepository,
        &InMemoryCategoryRepository,
    > {
        CheckInService::new(&self.check_ins, &self.contacts, &self.categories)
    }
}

fn named(name: &str) -> ContactInput {
    ContactInput {
        name: name.to_string(),
        ..ContactInput::default()
    }
}

#[test]
fn category_service_creates_and_fetches_family() {
    let fixture = Fixture::new();
    let created = fixture
        .categories()
        .create_category("Family", 1, FrequencyUnit::Weeks)
        .unwrap();

    let fetched = fixture.categories().get_category(created.id()).unwrap();
    assert_eq!(fetched.name().as_str(), "Family");
    assert_eq!(fetched.frequency().value(), 1);
    assert_eq!(fetched.frequency().unit(), FrequencyUnit::Weeks);
}

#[test]
fn category_service_rejects_invalid_input_without_saving() {
    let fixture = Fixture::new();
    let err = fixture
        .categories()
        .create_category("Family", 0, FrequencyUnit::Days)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::OutOfRange { .. })
    ));

    let err = fixture
        .categories()
        .create_category(&"x".repeat(51), 1, FrequencyUnit::Days)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::TooLong { .. })
    ));
    assert!(fixture.categories.is_empty());
}

#[test]
fn category_rename_and_frequency_updates_are_persisted() {
    let fixture = Fixture::new();
    let service = fixture.categories();
    let created = service
        .create_category("Friends", 2, FrequencyUnit::Weeks)
        .unwrap();

    service.rename_category(created.id(), "Close friends").unwrap();
    service
        .update_frequency(created.id(), 1, FrequencyUnit::Months)
        .unwrap();

    let stored = service.get_category(created.id()).unwrap();
    assert_eq!(stored.name().as_str(), "Close friends");
    assert_eq!(stored.frequency().unit(), FrequencyUnit::Months);
    assert_eq!(service.list_categories().unwrap().size(), 1);

    service.delete_category(created.id()).unwrap();
    assert!(service.list_categories().unwrap().is_empty());
}

#[test]
fn missing_entities_are_not_found() {
    let fixture = Fixture::new();

    let err = fixture
        .categories()
        .get_category(CategoryId::generate())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Category,
            ..
        }
    ));

    let missing = ContactId::generate();
    match fixture.contacts().get_contact(missing).unwrap_err() {
        ServiceError::NotFound { kind, id } => {
            assert_eq!(kind, EntityKind::Contact);
            assert_eq!(id, missing.to_string());
        }
        other => panic!("expected NotFound, got {other:?}"),
    }

    assert!(matches!(
        fixture.check_ins().get_check_in(CheckInId::generate()),
        Err(ServiceError::NotFound {
            kind: EntityKind::CheckIn,
            ..
        })
    ));
}

#[test]
fn contact_service_treats_blank_optionals_as_absent() {
    let fixture = Fixture::new();
    let contact = fixture
        .contacts()
        .create_contact(&ContactInput {
            name: "Ada".to_string(),
            phone: Some("  ".to_string()),
            email: Some("Ada@Example.com".to_string()),
            location: Some(String::new()),
            relationship_context: None,
            category_id: None,
        })
        .unwrap();

    assert!(contact.phone().is_none());
    assert!(contact.location().is_none());
    assert_eq!(contact.email().unwrap().as_str(), "ada@example.com");
    assert_eq!(fixture.contacts().count().unwrap(), 1);
}

#[test]
fn contact_service_rejects_unknown_category() {
    let fixture = Fixture::new();
    let err = fixture
        .contacts()
        .create_contact(&ContactInput {
            category_id: Some(CategoryId::generate()),
            ..named("Ada")
        })
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Category,
            ..
        }
    ));
    assert!(fixture.contacts.is_empty());
}

#[test]
fn contact_service_assigns_categories_and_dates() {
    let fixture = Fixture::new();
    let family = fixture
        .categories()
        .create_category("Family", 1, FrequencyUnit::Weeks)
        .unwrap();
    let service = fixture.contacts();
    let ada = service.create_contact(&named("Ada")).unwrap();
    service.create_contact(&named("Grace")).unwrap();

    service.assign_category(ada.id(), family.id()).unwrap();
    let birthday = Utc.with_ymd_and_hms(1815, 12, 10, 0, 0, 0).unwrap();
    let updated = service
        .add_important_date(ada.id(), "Birthday", birthday)
        .unwrap();
    assert_eq!(updated.important_dates().size(), 1);

    let in_family = service.contacts_in_category(family.id()).unwrap();
    assert_eq!(in_family.size(), 1);
    assert_eq!(in_family.iter().next().unwrap().id(), ada.id());

    let cleared = service.assign_category(ada.id(), CategoryId::null()).unwrap();
    assert!(!cleared.has_category());

    let renamed = service.rename_contact(ada.id(), "Ada Lovelace").unwrap();
    assert_eq!(renamed.name().as_str(), "Ada Lovelace");

    service.delete_contact(ada.id()).unwrap();
    service.delete_contact(ada.id()).unwrap();
    assert_eq!(service.list_contacts().unwrap().size(), 1);
}

#[test]
fn schedule_next_uses_category_frequency() {
    let fixture = Fixture::new();
    let family = fixture
        .categories()
        .create_category("Family", 2, FrequencyUnit::Weeks)
        .unwrap();
    let ada = fixture
        .contacts()
        .create_contact(&ContactInput {
            category_id: Some(family.id()),
            ..named("Ada")
        })
        .unwrap();

    let from = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    let next = fixture.check_ins().schedule_next(ada.id(), from).unwrap();
    assert_eq!(
        next.scheduled_date(),
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    );
    assert_eq!(next.status(), CheckInStatus::Scheduled);
    assert_eq!(fixture.check_ins().list_for_contact(ada.id()).unwrap().size(), 1);
}

#[test]
fn schedule_next_requires_a_category() {
    let fixture = Fixture::new();
    let grace = fixture.contacts().create_contact(&named("Grace")).unwrap();

    let err = fixture
        .check_ins()
        .schedule_next(grace.id(), Utc::now())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Category,
            ..
        }
    ));

    let err = fixture
        .check_ins()
        .schedule_check_in(ContactId::generate(), Utc::now())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Contact,
            ..
        }
    ));
    assert!(fixture.check_ins.is_empty());
}

#[test]
fn check_in_transitions_are_persisted() {
    let fixture = Fixture::new();
    let ada = fixture.contacts().create_contact(&named("Ada")).unwrap();
    let service = fixture.check_ins();
    let early = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

    let first = service.schedule_check_in(ada.id(), early).unwrap();
    let second = service.schedule_check_in(ada.id(), later).unwrap();

    let completed = service
        .complete_check_in(first.id(), Some("Lunch"))
        .unwrap();
    assert_eq!(completed.notes().unwrap().as_str(), "Lunch");
    assert_eq!(
        service.get_check_in(first.id()).unwrap().status(),
        CheckInStatus::Completed
    );

    let err = service.skip_check_in(first.id()).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidTransition { .. })
    ));

    service.skip_check_in(second.id()).unwrap();
    let moved = service
        .reschedule_check_in(second.id(), early)
        .unwrap();
    assert_eq!(moved.status(), CheckInStatus::Scheduled);

    let cutoff = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap();
    let due = service.due_before(cutoff).unwrap();
    assert_eq!(due.size(), 1);
    assert_eq!(due.iter().next().unwrap().id(), second.id());
}

#[test]
fn schedule_next_past_year_9999_is_a_validation_error() {
    let fixture = Fixture::new();
    let yearly = fixture
        .categories()
        .create_category("Far away", 12, FrequencyUnit::Months)
        .unwrap();
    let ada = fixture
        .contacts()
        .create_contact(&ContactInput {
            category_id: Some(yearly.id()),
            ..named("Ada")
        })
        .unwrap();

    let from = Utc.with_ymd_and_hms(9999, 6, 1, 0, 0, 0).unwrap();
    let err = fixture.check_ins().schedule_next(ada.id(), from).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::OutOfRange { .. })
    ));
    assert!(fixture.check_ins.is_empty());
}
