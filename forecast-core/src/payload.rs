//! Loosely-typed provider payloads.
//!
//! Every field is optional: the provider omits fields freely, and presence is
//! checked explicitly during extraction instead of by truthiness.

use serde::Deserialize;
use serde_json::Value;

/// One element of the location text-search result list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawLocation {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub localized_name: Option<String>,
}

impl RawLocation {
    /// Non-empty location key, if the provider supplied one.
    pub fn location_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Top level of a daily forecast response.
///
/// Entries are kept as raw JSON and decoded one at a time, so a single
/// malformed day never invalidates the rest of the series.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawForecast {
    #[serde(default)]
    pub daily_forecasts: Option<Vec<Value>>,
}

impl RawForecast {
    pub fn from_json(json: &Value) -> Option<Self> {
        RawForecast::deserialize(json).ok()
    }

    /// Daily entries, or `None` when the list is absent or empty.
    pub fn entries(&self) -> Option<&[Value]> {
        self.daily_forecasts.as_deref().filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDailyForecast {
    #[serde(default)]
    pub temperature: Option<RawTemperature>,
    #[serde(default)]
    pub day: Option<RawDayPart>,
}

impl RawDailyForecast {
    pub fn from_json(json: &Value) -> Option<Self> {
        RawDailyForecast::deserialize(json).ok()
    }

    pub fn minimum(&self) -> Option<&RawReading> {
        self.temperature.as_ref()?.minimum.as_ref()
    }

    pub fn maximum(&self) -> Option<&RawReading> {
        self.temperature.as_ref()?.maximum.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTemperature {
    #[serde(default)]
    pub minimum: Option<RawReading>,
    #[serde(default)]
    pub maximum: Option<RawReading>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawReading {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl RawReading {
    /// Both value and unit, or nothing. A value of 0 is a real reading.
    pub fn complete(&self) -> Option<(f64, &str)> {
        Some((self.value?, self.unit.as_deref()?))
    }
}

/// Daytime part of a daily entry, carrying the precipitation signal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDayPart {
    #[serde(default)]
    pub precipitation_type: Option<String>,
    #[serde(default)]
    pub precipitation_intensity: Option<String>,
    #[serde(default)]
    pub rain_probability: Option<f64>,
    #[serde(default)]
    pub precipitation_probability: Option<f64>,
}
