use serde_json::Value;

use crate::{
    model::{
        ForecastSummary, Horizon, NormalizedForecast, RainProbability, RainSummary,
        TemperatureSummary,
    },
    payload::{RawDailyForecast, RawDayPart, RawForecast},
    validator::truncate_body,
};

/// Turns validated provider JSON into a [`NormalizedForecast`].
///
/// Returns `None` whenever either temperature extreme cannot be established;
/// the result is never partially populated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastShapeParser {
    verbose: bool,
}

impl ForecastShapeParser {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn parse(&self, json: &Value, horizon: Horizon) -> Option<NormalizedForecast> {
        let raw = RawForecast::from_json(json).unwrap_or_default();
        let Some(entries) = raw.entries() else {
            tracing::error!(
                "Forecast response has no daily forecasts. Response: {}",
                self.describe(json)
            );
            return None;
        };

        let summary = match horizon {
            Horizon::OneDay => self.single_day(entries, horizon),
            Horizon::FiveDays => self.multi_day(entries, horizon),
        };

        if summary.is_none() {
            tracing::error!(
                %horizon,
                "Forecast response is missing temperature data. Response: {}",
                self.describe(json)
            );
        }

        summary.map(|forecast| NormalizedForecast { forecast })
    }

    fn single_day(&self, entries: &[Value], horizon: Horizon) -> Option<ForecastSummary> {
        let entry = RawDailyForecast::from_json(entries.first()?)?;

        let (max_value, max_unit) = entry.maximum()?.complete()?;
        let (min_value, min_unit) = entry.minimum()?.complete()?;
        let rain = rain_probability(entry.day.as_ref());

        Some(ForecastSummary {
            max: TemperatureSummary::maximum(horizon, max_value, max_unit),
            min: TemperatureSummary::minimum(horizon, min_value, min_unit),
            rain: Some(RainSummary::new(horizon, rain)),
        })
    }

    fn multi_day(&self, entries: &[Value], horizon: Horizon) -> Option<ForecastSummary> {
        let days: Vec<RawDailyForecast> = entries
            .iter()
            .filter_map(|entry| {
                let day = RawDailyForecast::from_json(entry);
                if day.is_none() {
                    tracing::debug!("Skipping malformed daily forecast entry");
                }
                day
            })
            .collect();

        // Units are taken from the first day and assumed uniform across the series.
        let first = RawDailyForecast::from_json(entries.first()?)?;
        let min_unit = first.minimum()?.unit.clone()?;
        let max_unit = first.maximum()?.unit.clone()?;

        let mut lowest: Option<f64> = None;
        let mut highest: Option<f64> = None;

        for day in &days {
            let min = day.minimum().and_then(|r| r.value);
            let max = day.maximum().and_then(|r| r.value);
            let (Some(min), Some(max)) = (min, max) else {
                tracing::debug!("Skipping daily forecast entry with incomplete temperatures");
                continue;
            };

            lowest = Some(lowest.map_or(min, |current| current.min(min)));
            highest = Some(highest.map_or(max, |current| current.max(max)));
        }

        Some(ForecastSummary {
            max: TemperatureSummary::maximum(horizon, highest?, &max_unit),
            min: TemperatureSummary::minimum(horizon, lowest?, &min_unit),
            rain: None,
        })
    }

    fn describe(&self, json: &Value) -> String {
        let text = json.to_string();
        if self.verbose { text } else { truncate_body(&text) }
    }
}

/// Rain chance for a single day. Only a `Rain` precipitation type counts.
fn rain_probability(day: Option<&RawDayPart>) -> RainProbability {
    let Some(day) = day else {
        return RainProbability::NONE;
    };

    let is_rain = day
        .precipitation_type
        .as_deref()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("rain"));
    if !is_rain {
        return RainProbability::NONE;
    }

    match day.rain_probability.or(day.precipitation_probability) {
        Some(percent) => RainProbability::from_percent(percent),
        None => day
            .precipitation_intensity
            .as_deref()
            .map(RainProbability::from_intensity)
            .unwrap_or(RainProbability::NONE),
    }
}
