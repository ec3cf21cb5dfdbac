//! Shared fixtures for integration tests.

use changeset_core::schema::SchemaBuilder;
use changeset_core::{AuditFields, Patchable};

/// Audited weather report used across the integration suite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub audit: AuditFields,
    pub city: String,
    pub weather: String,
    pub humidity: Option<u8>,
    pub alerts: Vec<String>,
}

impl Patchable for Report {
    const RECORD_NAME: &'static str = "Report";

    fn describe() -> SchemaBuilder<Self> {
        SchemaBuilder::new()
            .embed("audit", |r: &mut Report| &mut r.audit)
            .field("city", "city", |r: &mut Report| &mut r.city)
            .field("weather", "weather", |r: &mut Report| &mut r.weather)
            .field("humidity", "humidity", |r: &mut Report| &mut r.humidity)
            .field("alerts", "alerts", |r: &mut Report| &mut r.alerts)
    }
}

/// Tags declared by [`Report`], including the embedded audit tags.
pub const REPORT_TAGS: [&str; 9] = [
    "id",
    "createdBy",
    "createdDts",
    "modifiedBy",
    "modifiedDts",
    "city",
    "weather",
    "humidity",
    "alerts",
];

/// Creates the Clearwater report created by Dylan.
pub fn clearwater() -> Report {
    Report {
        audit: AuditFields::new("Dylan"),
        city: "Clearwater".to_string(),
        weather: "Hot and sunny".to_string(),
        humidity: Some(70),
        alerts: vec!["UV index high".to_string()],
    }
}
