//! Weather report record.

use std::fmt;

use changeset_core::schema::SchemaBuilder;
use changeset_core::{AuditFields, ChangeValue, CoercionFailure, DecodeScalar, Patchable};

/// Temperature in degrees Celsius.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Temperature(f64);

impl Temperature {
    pub fn from_celsius(celsius: f64) -> Self {
        Self(celsius)
    }

    pub fn from_fahrenheit(fahrenheit: f64) -> Self {
        Self((fahrenheit - 32.0) * 5.0 / 9.0)
    }

    pub fn celsius(&self) -> f64 {
        self.0
    }
}

impl DecodeScalar for Temperature {
    /// Accepts `"31C"`, `"88F"`, or a bare number of degrees Celsius.
    fn decode_scalar(value: &ChangeValue) -> Result<Self, CoercionFailure> {
        if let Some(number) = value.as_number().and_then(|n| n.as_f64()) {
            return Ok(Self::from_celsius(number));
        }

        let text = value
            .as_str()
            .ok_or_else(|| {
                CoercionFailure::new(format!("expected a temperature, got {}", value.kind()))
            })?
            .trim();
        let parse = |digits: &str| {
            digits
                .trim()
                .parse::<f64>()
                .map_err(|_| CoercionFailure::new(format!("invalid temperature '{}'", text)))
        };

        if let Some(digits) = text.strip_suffix(['C', 'c']) {
            parse(digits).map(Self::from_celsius)
        } else if let Some(digits) = text.strip_suffix(['F', 'f']) {
            parse(digits).map(Self::from_fahrenheit)
        } else {
            parse(text).map(Self::from_celsius)
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}C", self.celsius())
    }
}

/// Audited weather report for a city.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReport {
    pub audit: AuditFields,
    pub city: String,
    pub weather: String,
    pub temperature: Option<Temperature>,
    pub alerts: Vec<String>,
}

impl WeatherReport {
    pub fn new(
        city: impl Into<String>,
        weather: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            audit: AuditFields::new(created_by),
            city: city.into(),
            weather: weather.into(),
            temperature: None,
            alerts: Vec::new(),
        }
    }
}

impl Patchable for WeatherReport {
    const RECORD_NAME: &'static str = "WeatherReport";

    fn describe() -> SchemaBuilder<Self> {
        SchemaBuilder::new()
            .embed("audit", |r: &mut WeatherReport| &mut r.audit)
            .field("city", "city", |r: &mut WeatherReport| &mut r.city)
            .field("weather", "weather", |r: &mut WeatherReport| &mut r.weather)
            .scalar("temperature", "temperature", |r: &mut WeatherReport| {
                &mut r.temperature
            })
            .field("alerts", "alerts", |r: &mut WeatherReport| &mut r.alerts)
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "City: {}", self.city)?;
        writeln!(f, "Weather: {}", self.weather)?;
        if let Some(temperature) = &self.temperature {
            writeln!(f, "Temperature: {}", temperature)?;
        }
        if !self.alerts.is_empty() {
            writeln!(f, "Alerts: {}", self.alerts.join("; "))?;
        }
        write!(f, "Last reported by: {}", self.audit.last_modifier())
    }
}
