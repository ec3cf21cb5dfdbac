//! Property checks over generated changesets.

use changeset_core::{apply_changes, ChangeValue, Changeset, ChangesetError};
use proptest::prelude::*;

use super::helpers::{clearwater, REPORT_TAGS};

fn text_value() -> impl Strategy<Value = ChangeValue> {
    prop_oneof![
        Just(ChangeValue::Null),
        Just(ChangeValue::from("")),
        "[A-Za-z ]{1,16}".prop_map(ChangeValue::from),
    ]
}

fn report_changes() -> impl Strategy<Value = Changeset> {
    (
        proptest::option::of(text_value()),
        proptest::option::of(text_value()),
        proptest::option::of(prop_oneof![
            Just(ChangeValue::Null),
            (0u8..=100).prop_map(|h| ChangeValue::from(h as i64)),
        ]),
        proptest::option::of(prop::collection::vec("[a-z]{1,8}", 0..4)),
    )
        .prop_map(|(city, weather, humidity, alerts)| {
            let mut changes = Changeset::new();
            if let Some(city) = city {
                changes.insert("city", city);
            }
            if let Some(weather) = weather {
                changes.insert("weather", weather);
            }
            if let Some(humidity) = humidity {
                changes.insert("humidity", humidity);
            }
            if let Some(alerts) = alerts {
                changes.insert("alerts", alerts);
            }
            changes
        })
}

proptest! {
    #[test]
    fn prop_apply_is_idempotent(changes in report_changes()) {
        let mut once = clearwater();
        let mut twice = once.clone();

        apply_changes(&mut changes.clone(), &mut once).unwrap();
        apply_changes(&mut changes.clone(), &mut twice).unwrap();
        apply_changes(&mut changes.clone(), &mut twice).unwrap();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_unnamed_fields_are_untouched(changes in report_changes()) {
        let original = clearwater();
        let mut report = original.clone();

        apply_changes(&mut changes.clone(), &mut report).unwrap();

        prop_assert_eq!(&report.audit, &original.audit);
        if !changes.contains_key("city") {
            prop_assert_eq!(&report.city, &original.city);
        }
        if !changes.contains_key("weather") {
            prop_assert_eq!(&report.weather, &original.weather);
        }
        if !changes.contains_key("humidity") {
            prop_assert_eq!(report.humidity, original.humidity);
        }
        if !changes.contains_key("alerts") {
            prop_assert_eq!(&report.alerts, &original.alerts);
        }
    }

    #[test]
    fn prop_unknown_tag_always_fails(
        changes in report_changes(),
        tag in "[a-z]{3,12}".prop_filter("must not be a declared tag", |t| !REPORT_TAGS.contains(&t.as_str())),
    ) {
        let original = clearwater();
        let mut report = original.clone();
        let mut changes = changes;
        changes.insert(tag.clone(), 1);

        let err = apply_changes(&mut changes, &mut report).unwrap_err();

        prop_assert_eq!(err, ChangesetError::UnknownField {
            record: "Report".to_string(),
            fields: vec![tag],
        });
        prop_assert_eq!(report, original);
    }
}
