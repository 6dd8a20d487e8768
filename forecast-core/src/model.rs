use serde::{Deserialize, Serialize, Serializer};
use std::{convert::TryFrom, fmt};

use crate::error::ForecastError;

/// Requested forecast window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    OneDay,
    FiveDays,
}

impl Horizon {
    pub const fn days(&self) -> u8 {
        match self {
            Horizon::OneDay => 1,
            Horizon::FiveDays => 5,
        }
    }

    pub const fn all() -> &'static [Horizon] {
        &[Horizon::OneDay, Horizon::FiveDays]
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} day(s)", self.days())
    }
}

impl TryFrom<u8> for Horizon {
    type Error = ForecastError;

    fn try_from(days: u8) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(Horizon::OneDay),
            5 => Ok(Horizon::FiveDays),
            other => Err(ForecastError::InvalidHorizon(other)),
        }
    }
}

/// Normalized response handed to downstream clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedForecast {
    pub forecast: ForecastSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub max: TemperatureSummary,
    pub min: TemperatureSummary,
    /// Only present for the 1-day horizon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<RainSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub text: String,
    /// Whole readings serialize as JSON integers, as the provider sends them.
    #[serde(serialize_with = "serialize_reading")]
    pub value: f64,
    pub unit: String,
}

impl TemperatureSummary {
    pub fn maximum(horizon: Horizon, value: f64, unit: &str) -> Self {
        Self {
            text: format!(
                "Maximum temperature within the next {}: {value} {unit}",
                horizon
            ),
            value,
            unit: unit.to_string(),
        }
    }

    pub fn minimum(horizon: Horizon, value: f64, unit: &str) -> Self {
        Self {
            text: format!(
                "Minimum temperature within the next {}: {value} {unit}",
                horizon
            ),
            value,
            unit: unit.to_string(),
        }
    }
}

fn serialize_reading<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // Beyond 2^53 an f64 no longer holds every integer exactly.
    const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

    if value.fract() == 0.0 && value.abs() <= EXACT_INT_LIMIT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainSummary {
    pub text: String,
    /// Percentage string, e.g. `"25%"`.
    pub value: String,
}

impl RainSummary {
    pub fn new(horizon: Horizon, probability: RainProbability) -> Self {
        Self {
            text: format!("Probability of rain within the next {horizon}: {probability}"),
            value: probability.to_string(),
        }
    }
}

/// Chance of rain in whole percent, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RainProbability(u8);

impl RainProbability {
    pub const NONE: RainProbability = RainProbability(0);

    /// Rounds and clamps an explicit provider percentage.
    pub fn from_percent(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::NONE;
        }
        Self(percent.round().clamp(0.0, 100.0) as u8)
    }

    /// Maps a categorical precipitation intensity. Unknown intensities count as no rain.
    pub fn from_intensity(intensity: &str) -> Self {
        match intensity.trim().to_ascii_lowercase().as_str() {
            "light" => Self(25),
            "moderate" => Self(50),
            "heavy" => Self(75),
            _ => Self::NONE,
        }
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for RainProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
