use kith_core::{
    CategoryId, CategoryName, CheckInFrequency, ContactName, Email, FrequencyUnit, Location,
    Notes, ValidationError,
};

#[test]
fn category_names_up_to_fifty_chars_are_trimmed() {
    for len in [1_usize, 2, 25, 49, 50] {
        let raw = format!("  {}  ", "a".repeat(len));
        let name = CategoryName::new(&raw).unwrap();
        assert_eq!(name.as_str(), "a".repeat(len));
    }
}

#[test]
fn category_names_empty_or_too_long_fail() {
    assert_eq!(
        CategoryName::new("   ").unwrap_err(),
        ValidationError::Empty {
            field: "category name"
        }
    );
    assert_eq!(
        CategoryName::new(&"x".repeat(51)).unwrap_err(),
        ValidationError::TooLong {
            field: "category name",
            max: 50,
            actual: 51
        }
    );
}

#[test]
fn frequency_accepts_full_valid_range() {
    for value in 1..=365 {
        let frequency = CheckInFrequency::new(value, FrequencyUnit::Days).unwrap();
        assert_eq!(i64::from(frequency.value()), value);
        assert!(!frequency.is_null());
    }
}

#[test]
fn frequency_rejects_out_of_range_and_fractions() {
    for value in [-1, 0, 366, 10_000] {
        assert!(matches!(
            CheckInFrequency::new(value, FrequencyUnit::Weeks),
            Err(ValidationError::OutOfRange { actual, .. }) if actual == value
        ));
    }
    assert!(matches!(
        CheckInFrequency::from_number(7.25, FrequencyUnit::Days),
        Err(ValidationError::NonInteger { .. })
    ));
    assert!(CheckInFrequency::from_number(7.0, FrequencyUnit::Days).is_ok());
    assert!(CheckInFrequency::from_number(f64::NAN, FrequencyUnit::Days).is_err());
}

#[test]
fn null_frequency_is_never_valid() {
    let null = CheckInFrequency::null();
    assert!(null.is_null());
    assert_eq!(null.value(), 0);
    assert!(CheckInFrequency::new(i64::from(null.value()), null.unit()).is_err());
}

#[test]
fn frequency_wire_decoding_rejects_fractions() {
    let err = serde_json::from_str::<CheckInFrequency>(r#"{"value":1.5,"unit":"days"}"#)
        .unwrap_err();
    assert!(err.to_string().contains("must be an integer"), "{err}");

    let decoded: CheckInFrequency =
        serde_json::from_str(r#"{"value":2,"unit":"months"}"#).unwrap();
    assert_eq!(
        decoded,
        CheckInFrequency::new(2, FrequencyUnit::Months).unwrap()
    );
}

#[test]
fn text_values_enforce_their_caps() {
    assert!(ContactName::new(&"n".repeat(100)).is_ok());
    assert!(ContactName::new(&"n".repeat(101)).is_err());
    assert!(Location::new(&"l".repeat(201)).is_err());
    assert!(Notes::new(&"z".repeat(2000)).is_ok());
}

#[test]
fn ids_of_different_aggregates_share_validation_rules() {
    let raw = "11111111-2222-4333-8444-555555555555";
    let id = CategoryId::parse(raw).unwrap();
    assert_eq!(id.to_string(), raw);
    assert_eq!(id.as_uuid().to_string(), raw);
    assert!(CategoryId::parse("11111111-2222-4333-8444").is_err());
    assert!(CategoryId::null().is_null());
}

#[test]
fn email_cap_applies_after_lower_casing() {
    // `İ` lower-cases to two characters.
    let local = format!("İ{}", "a".repeat(241));
    let raw = format!("{local}@example.com");
    assert_eq!(raw.chars().count(), 254);
    assert_eq!(
        Email::new(&raw).unwrap_err(),
        ValidationError::TooLong {
            field: "email",
            max: 254,
            actual: 255
        }
    );

    let fits = format!("İ{}@example.com", "a".repeat(240));
    let email = Email::new(&fits).unwrap();
    assert_eq!(email.as_str().chars().count(), 254);
    let json = serde_json::to_string(&email).unwrap();
    assert_eq!(serde_json::from_str::<Email>(&json).unwrap(), email);
}
