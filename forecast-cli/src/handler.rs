//! Request handling on top of [`ForecastService`]: city in, forecast out.

use anyhow::{Context, Result, bail};
use forecast_core::{ForecastService, Horizon, NormalizedForecast};

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(NormalizedForecast),
    /// The provider answered, but without usable temperature data.
    NoData,
    LocationNotFound(String),
}

pub async fn lookup_forecast(
    service: &dyn ForecastService,
    city: &str,
    horizon: Horizon,
) -> Result<Lookup> {
    if city.trim().is_empty() {
        bail!("Missing city. Hint: `forecast show <city>`.");
    }

    tracing::debug!(city, %horizon, "Looking up forecast");

    let location_key = service
        .resolve_location(city)
        .await
        .context("Loading forecast data failed")?;

    let Some(location_key) = location_key else {
        return Ok(Lookup::LocationNotFound(city.to_string()));
    };

    let forecast = service
        .get_forecast(&location_key, horizon)
        .await
        .context("Loading forecast data failed")?;

    Ok(forecast.map_or(Lookup::NoData, Lookup::Found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use forecast_core::{ForecastError, ForecastSummary, TemperatureSummary};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct StubService {
        key: Result<Option<&'static str>, ()>,
        forecast: Result<Option<NormalizedForecast>, ()>,
        calls: Mutex<Vec<String>>,
    }

    impl StubService {
        fn new(
            key: Result<Option<&'static str>, ()>,
            forecast: Result<Option<NormalizedForecast>, ()>,
        ) -> Self {
            Self {
                key,
                forecast,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ForecastService for StubService {
        async fn resolve_location(&self, query: &str) -> Result<Option<String>, ForecastError> {
            self.calls.lock().unwrap().push(format!("resolve:{query}"));
            self.key
                .map(|k| k.map(str::to_string))
                .map_err(|()| ForecastError::InvalidResponse("location"))
        }

        async fn get_forecast(
            &self,
            location_key: &str,
            horizon: Horizon,
        ) -> Result<Option<NormalizedForecast>, ForecastError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("forecast:{location_key}:{}", horizon.days()));
            self.forecast
                .clone()
                .map_err(|()| ForecastError::Network(anyhow::anyhow!("timed out")))
        }
    }

    fn sample() -> NormalizedForecast {
        NormalizedForecast {
            forecast: ForecastSummary {
                max: TemperatureSummary::maximum(Horizon::FiveDays, 12.0, "C"),
                min: TemperatureSummary::minimum(Horizon::FiveDays, -1.0, "C"),
                rain: None,
            },
        }
    }

    #[tokio::test]
    async fn blank_city_is_rejected_without_calls() {
        let service = StubService::new(Ok(Some("1")), Ok(None));
        let err = lookup_forecast(&service, "  ", Horizon::OneDay).await.unwrap_err();

        assert!(err.to_string().contains("Missing city"));
        assert!(service.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_location_skips_forecast() {
        let service = StubService::new(Ok(None), Ok(Some(sample())));
        let lookup = lookup_forecast(&service, "Atlantis", Horizon::OneDay).await.unwrap();

        assert_eq!(lookup, Lookup::LocationNotFound("Atlantis".into()));
        assert_eq!(*service.calls.lock().unwrap(), vec!["resolve:Atlantis"]);
    }

    #[tokio::test]
    async fn resolved_location_is_forecast() {
        let service = StubService::new(Ok(Some("178087")), Ok(Some(sample())));
        let lookup = lookup_forecast(&service, "Berlin", Horizon::FiveDays).await.unwrap();

        assert_eq!(lookup, Lookup::Found(sample()));
        assert_eq!(
            *service.calls.lock().unwrap(),
            vec!["resolve:Berlin", "forecast:178087:5"]
        );
    }

    #[tokio::test]
    async fn empty_forecast_is_no_data() {
        let service = StubService::new(Ok(Some("1")), Ok(None));
        let lookup = lookup_forecast(&service, "Berlin", Horizon::OneDay).await.unwrap();
        assert_eq!(lookup, Lookup::NoData);
    }

    #[tokio::test]
    async fn failures_are_reported_as_loading_failures() {
        let service = StubService::new(Err(()), Ok(None));
        let err = lookup_forecast(&service, "Berlin", Horizon::OneDay).await.unwrap_err();
        assert_eq!(err.to_string(), "Loading forecast data failed");
        assert!(format!("{err:#}").contains("location response is invalid"));

        let service = StubService::new(Ok(Some("1")), Err(()));
        let err = lookup_forecast(&service, "Berlin", Horizon::OneDay).await.unwrap_err();
        assert!(format!("{err:#}").contains("timed out"));
    }
}
