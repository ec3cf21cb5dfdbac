//! Integration tests for changeset application.
//!
//! Sections:
//! 1. Audited record scenarios
//! 2. Property checks over generated changesets

pub mod helpers;
pub mod property_tests;
pub mod weather_report_tests;
