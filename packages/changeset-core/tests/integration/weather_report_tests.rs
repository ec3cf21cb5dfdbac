//! Audited record scenarios.

use std::sync::Arc;

use changeset_core::schema::format_timestamp;
use changeset_core::{
    apply_changes, apply_changes_with_modifier, Applier, ApplyConfig, ChangeValue, Changeset,
    ChangesetError, SchemaRegistry,
};
use ntest::timeout;
use serde_json::json;

use super::helpers::{clearwater, Report};

#[timeout(1000)]
#[test]
fn test_modifier_and_weather_update() -> anyhow::Result<()> {
    let mut report = clearwater();
    let original = report.clone();
    let mut changes = Changeset::from_json(json!({"weather": "Thunderstorms"}))?;

    apply_changes_with_modifier(&mut changes, "Mr. Weatherdude", &mut report)?;

    assert_eq!(report.weather, "Thunderstorms");
    assert_eq!(report.audit.modified_by.as_deref(), Some("Mr. Weatherdude"));
    assert_eq!(report.city, original.city);
    assert_eq!(report.humidity, original.humidity);
    assert_eq!(report.alerts, original.alerts);
    assert_eq!(report.audit.created_by, "Dylan");
    assert_eq!(report.audit.created_at, original.audit.created_at);
    assert_eq!(report.audit.id, original.audit.id);
    assert!(report.audit.modified_at.is_none());
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_nonexistent_field_is_rejected() {
    let mut report = clearwater();
    let original = report.clone();
    let mut changes: Changeset = [("nonexistentField", "x")].into_iter().collect();

    let err = apply_changes(&mut changes, &mut report).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Unknown field(s) for record 'Report': nonexistentField"
    );
    assert!(err.is_validation_error());
    assert_eq!(report, original);
}

#[timeout(1000)]
#[test]
fn test_unknown_field_with_modifier_leaves_record_untouched() {
    let mut report = clearwater();
    let original = report.clone();
    let mut changes: Changeset = [("weather", "Fog"), ("windSpeed", "12")]
        .into_iter()
        .collect();

    let err =
        apply_changes_with_modifier(&mut changes, "Mr. Weatherdude", &mut report).unwrap_err();

    assert!(
        matches!(err, ChangesetError::UnknownField { ref fields, .. } if fields == &["windSpeed"])
    );
    assert_eq!(report, original);
}

#[timeout(1000)]
#[test]
fn test_empty_string_behaves_like_null() {
    let mut with_empty = clearwater();
    let mut with_null = with_empty.clone();

    let mut empty: Changeset = [("weather", "")].into_iter().collect();
    let mut null: Changeset = [("weather", ChangeValue::Null)].into_iter().collect();
    apply_changes(&mut empty, &mut with_empty).unwrap();
    apply_changes(&mut null, &mut with_null).unwrap();

    assert_eq!(with_empty, with_null);
    assert_eq!(with_empty.weather, "");
    assert_eq!(empty, null);
}

#[timeout(1000)]
#[test]
fn test_unset_sequence_behaves_like_null() {
    let mut report = clearwater();
    let mut changes = Changeset::new();
    changes.insert("alerts", ChangeValue::unset_sequence());

    apply_changes(&mut changes, &mut report).unwrap();

    assert!(report.alerts.is_empty());
    assert_eq!(changes.get("alerts"), Some(&ChangeValue::Null));
}

#[timeout(1000)]
#[test]
fn test_null_clears_optional_field() {
    let mut report = clearwater();
    let mut changes = Changeset::from_json(json!({"humidity": null})).unwrap();

    apply_changes(&mut changes, &mut report).unwrap();

    assert_eq!(report.humidity, None);
}

#[timeout(1000)]
#[test]
fn test_timestamp_roundtrip_with_fractional_seconds() {
    let mut report = clearwater();
    let mut changes: Changeset = [("modifiedDts", "2024-01-02T03:04:05.5Z")]
        .into_iter()
        .collect();

    apply_changes(&mut changes, &mut report).unwrap();

    let modified_at = report.audit.modified_at.expect("modifiedDts should be set");
    assert_eq!(format_timestamp(&modified_at), "2024-01-02T03:04:05.500Z");
}

#[timeout(1000)]
#[test]
fn test_timestamp_with_offset_is_normalized_to_utc() {
    let mut report = clearwater();
    let mut changes: Changeset = [("createdDts", "2024-01-02T05:04:05+02:00")]
        .into_iter()
        .collect();

    apply_changes(&mut changes, &mut report).unwrap();

    assert_eq!(
        format_timestamp(&report.audit.created_at),
        "2024-01-02T03:04:05Z"
    );
}

#[timeout(1000)]
#[test]
fn test_malformed_timestamp_is_coercion_error() {
    let mut report = clearwater();
    let mut changes: Changeset = [("createdDts", "yesterday")].into_iter().collect();

    let err = apply_changes(&mut changes, &mut report).unwrap_err();

    match err {
        ChangesetError::Coercion { field, value, .. } => {
            assert_eq!(field, "createdDts");
            assert_eq!(value, "\"yesterday\"");
        }
        other => panic!("expected coercion error, got {:?}", other),
    }
}

#[timeout(1000)]
#[test]
fn test_type_mismatch_is_coercion_error() {
    let mut report = clearwater();
    let mut changes = Changeset::from_json(json!({"humidity": "damp"})).unwrap();

    let err = apply_changes(&mut changes, &mut report).unwrap_err();

    assert!(matches!(err, ChangesetError::Coercion { ref field, .. } if field == "humidity"));
}

#[timeout(1000)]
#[test]
fn test_allow_unknown_applies_known_fields() {
    let applier = Applier::with_registry(
        Arc::new(SchemaRegistry::new()),
        ApplyConfig {
            reject_unknown_fields: false,
            ..Default::default()
        },
    );
    let mut report = clearwater();
    let mut changes = Changeset::from_json(json!({
        "weather": "Hail",
        "nonexistentField": true
    }))
    .unwrap();

    applier
        .apply_with_modifier(&mut changes, "Mr. Weatherdude", &mut report)
        .unwrap();

    assert_eq!(report.weather, "Hail");
    assert_eq!(report.audit.last_modifier(), "Mr. Weatherdude");
}

#[timeout(1000)]
#[test]
fn test_custom_modifier_tag() {
    let applier = Applier::with_registry(
        Arc::new(SchemaRegistry::new()),
        ApplyConfig {
            modifier_tag: "createdBy".to_string(),
            ..Default::default()
        },
    );
    let mut report = clearwater();
    let mut changes = Changeset::new();

    applier
        .apply_with_modifier(&mut changes, "Mr. Weatherdude", &mut report)
        .unwrap();

    assert_eq!(report.audit.created_by, "Mr. Weatherdude");
    assert!(report.audit.modified_by.is_none());
}

#[timeout(1000)]
#[test]
fn test_atomic_apply_rolls_back_partial_writes() {
    let applier = Applier::default();
    let mut report = clearwater();
    let original = report.clone();
    // "city" sorts before "humidity" and is written first
    let mut changes = Changeset::from_json(json!({"city": "Tampa", "humidity": "damp"})).unwrap();

    assert!(applier.apply_atomic(&mut changes, &mut report).is_err());
    assert_eq!(report, original);

    let mut changes = Changeset::from_json(json!({"city": "Tampa", "humidity": "damp"})).unwrap();
    assert!(applier.apply(&mut changes, &mut report).is_err());
    assert_eq!(report.city, "Tampa");
}

#[timeout(1000)]
#[test]
fn test_empty_changeset_is_noop() {
    let mut report = clearwater();
    let original = report.clone();

    apply_changes(&mut Changeset::new(), &mut report).unwrap();

    assert_eq!(report, original);
}

#[timeout(1000)]
#[test]
fn test_invalid_id_is_coercion_error() {
    let mut report = clearwater();
    let original = report.clone();
    let mut changes = Changeset::from_json(json!({"id": "not-a-uuid"})).unwrap();

    let err = apply_changes(&mut changes, &mut report).unwrap_err();

    match err {
        ChangesetError::Coercion { field, value, reason } => {
            assert_eq!(field, "id");
            assert_eq!(value, "\"not-a-uuid\"");
            assert!(reason.starts_with("invalid UUID"));
        }
        other => panic!("expected coercion error, got {:?}", other),
    }
    assert_eq!(report.audit.id, original.audit.id);
}

#[timeout(1000)]
#[test]
fn test_space_separated_timestamp_is_rejected() {
    let mut report = clearwater();
    let mut changes: Changeset = [("modifiedDts", "2024-01-02 03:04:05Z")]
        .into_iter()
        .collect();

    let err = apply_changes(&mut changes, &mut report).unwrap_err();

    assert!(matches!(err, ChangesetError::Coercion { ref field, .. } if field == "modifiedDts"));
    assert!(report.audit.modified_at.is_none());
}
