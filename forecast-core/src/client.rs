use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    cache::LocationCache,
    config::Config,
    error::ForecastError,
    model::{Horizon, NormalizedForecast},
    parser::ForecastShapeParser,
    resolver::LocationResolver,
    transport::{HttpTransport, ProviderRequest},
    validator::ResponseValidator,
};

/// What the request-handling layer needs from the forecast core.
#[async_trait]
pub trait ForecastService: Send + Sync + Debug {
    async fn resolve_location(&self, query: &str) -> Result<Option<String>, ForecastError>;

    async fn get_forecast(
        &self,
        location_key: &str,
        horizon: Horizon,
    ) -> Result<Option<NormalizedForecast>, ForecastError>;
}

/// Collaborators injected into [`ForecastClient`].
#[derive(Debug, Clone)]
pub struct Collaborators {
    pub cache: Arc<dyn LocationCache>,
    pub transport: Arc<dyn HttpTransport>,
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    api_key: String,
    forecast_1_day_url: String,
    forecast_5_days_url: String,
    use_metric_units: bool,
    transport: Arc<dyn HttpTransport>,
    resolver: LocationResolver,
    validator: ResponseValidator,
    parser: ForecastShapeParser,
}

impl ForecastClient {
    /// Build a client, failing fast on any missing required setting.
    pub fn new(config: &Config, collaborators: Collaborators) -> Result<Self, ForecastError> {
        let api_key = required(config.api_key.as_deref(), "api_key")?;
        let paths = config
            .url_paths
            .as_ref()
            .ok_or(ForecastError::Config { key: "url_paths" })?;
        let base_url = required(config.base_url.as_deref(), "base_url")?;

        let text_search = required(paths.text_search.as_deref(), "url_paths.text_search")?;
        let forecast_1_day = required(paths.forecast_1_day.as_deref(), "url_paths.forecast_1_day")?;
        let forecast_5_days =
            required(paths.forecast_5_days.as_deref(), "url_paths.forecast_5_days")?;

        let Collaborators { cache, transport } = collaborators;

        let resolver = LocationResolver::new(
            format!("{base_url}{text_search}"),
            api_key.to_string(),
            config.use_metric_units(),
            cache,
            transport.clone(),
            config.verbose,
        );

        Ok(Self {
            api_key: api_key.to_string(),
            forecast_1_day_url: format!("{base_url}{forecast_1_day}"),
            forecast_5_days_url: format!("{base_url}{forecast_5_days}"),
            use_metric_units: config.use_metric_units(),
            transport,
            resolver,
            validator: ResponseValidator::new(config.verbose),
            parser: ForecastShapeParser::new(config.verbose),
        })
    }

    pub async fn resolve_location(&self, query: &str) -> Result<Option<String>, ForecastError> {
        self.resolver.resolve(query).await
    }

    /// Fetch and normalize the forecast for a resolved location.
    ///
    /// `Ok(None)` means the provider answered but the body lacked usable
    /// temperature data.
    pub async fn get_forecast(
        &self,
        location_key: &str,
        horizon: Horizon,
    ) -> Result<Option<NormalizedForecast>, ForecastError> {
        let request = self.forecast_request(location_key, horizon);

        let response = self.transport.get(&request).await.map_err(|e| {
            tracing::error!(location_key, %horizon, "Forecast request error: {:#}", e);
            ForecastError::Network(e)
        })?;

        let forecast = self
            .validator
            .validate(response.as_ref())
            .ok_or(ForecastError::InvalidResponse("forecast"))?;

        Ok(self.parser.parse(&forecast, horizon))
    }

    fn forecast_request(&self, location_key: &str, horizon: Horizon) -> ProviderRequest {
        let base = match horizon {
            Horizon::OneDay => &self.forecast_1_day_url,
            Horizon::FiveDays => &self.forecast_5_days_url,
        };

        ProviderRequest::new(format!("{base}{location_key}"))
            .param("apikey", self.api_key.as_str())
            .param("metric", self.use_metric_units.to_string())
    }
}

#[async_trait]
impl ForecastService for ForecastClient {
    async fn resolve_location(&self, query: &str) -> Result<Option<String>, ForecastError> {
        ForecastClient::resolve_location(self, query).await
    }

    async fn get_forecast(
        &self,
        location_key: &str,
        horizon: Horizon,
    ) -> Result<Option<NormalizedForecast>, ForecastError> {
        ForecastClient::get_forecast(self, location_key, horizon).await
    }
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, ForecastError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ForecastError::Config { key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::UrlPaths, validator::RawResponse};
    use anyhow::anyhow;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct NoCache;

    impl LocationCache for NoCache {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) {}

        fn save(&self) -> anyhow::Result<()> {
            Ok(())
        }

        fn clear(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct StubTransport {
        response: Option<RawResponse>,
        fail: bool,
        requests: Mutex<Vec<ProviderRequest>>,
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn get(&self, request: &ProviderRequest) -> anyhow::Result<Option<RawResponse>> {
            self.requests.lock().push(request.clone());
            if self.fail {
                return Err(anyhow!("dns failure"));
            }
            Ok(self.response.clone())
        }
    }

    fn config() -> Config {
        Config {
            api_key: Some("KEY".into()),
            base_url: Some("http://provider.test".into()),
            url_paths: Some(UrlPaths {
                text_search: Some("/search".into()),
                forecast_1_day: Some("/1day/".into()),
                forecast_5_days: Some("/5day/".into()),
            }),
            ..Config::default()
        }
    }

    fn client_with(config: &Config, transport: Arc<StubTransport>) -> ForecastClient {
        ForecastClient::new(
            config,
            Collaborators {
                cache: Arc::new(NoCache),
                transport,
            },
        )
        .expect("valid config")
    }

    fn answering(status: u16, body: &str) -> Arc<StubTransport> {
        Arc::new(StubTransport {
            response: Some(RawResponse::new(status, body)),
            ..StubTransport::default()
        })
    }

    fn collaborators() -> Collaborators {
        Collaborators {
            cache: Arc::new(NoCache),
            transport: Arc::new(StubTransport::default()),
        }
    }

    #[test]
    fn construction_requires_api_key() {
        let cfg = Config {
            api_key: None,
            ..config()
        };
        let err = ForecastClient::new(&cfg, collaborators()).unwrap_err();
        assert!(matches!(err, ForecastError::Config { key: "api_key" }));

        let cfg = Config {
            api_key: Some(String::new()),
            ..config()
        };
        let err = ForecastClient::new(&cfg, collaborators()).unwrap_err();
        assert!(matches!(err, ForecastError::Config { key: "api_key" }));
    }

    #[test]
    fn construction_requires_url_paths_and_base_url() {
        let cfg = Config {
            url_paths: None,
            ..config()
        };
        let err = ForecastClient::new(&cfg, collaborators()).unwrap_err();
        assert!(matches!(err, ForecastError::Config { key: "url_paths" }));

        let cfg = Config {
            base_url: None,
            ..config()
        };
        let err = ForecastClient::new(&cfg, collaborators()).unwrap_err();
        assert!(matches!(err, ForecastError::Config { key: "base_url" }));

        let mut cfg = config();
        if let Some(paths) = cfg.url_paths.as_mut() {
            paths.forecast_5_days = None;
        }
        let err = ForecastClient::new(&cfg, collaborators()).unwrap_err();
        assert!(err.to_string().contains("url_paths.forecast_5_days"));
    }

    #[tokio::test]
    async fn horizon_selects_endpoint_and_metric_defaults_on() {
        let transport = answering(200, "{}");
        let client = client_with(&config(), transport.clone());

        client.get_forecast("123", Horizon::OneDay).await.unwrap();
        client.get_forecast("123", Horizon::FiveDays).await.unwrap();

        let requests = transport.requests.lock();
        assert_eq!(requests[0].url, "http://provider.test/1day/123");
        assert_eq!(requests[1].url, "http://provider.test/5day/123");
        for request in requests.iter() {
            assert_eq!(request.query_value("apikey"), Some("KEY"));
            assert_eq!(request.query_value("metric"), Some("true"));
        }
    }

    #[tokio::test]
    async fn imperial_flag_is_forwarded() {
        let transport = answering(200, "{}");
        let cfg = Config {
            use_metric_units: Some(false),
            ..config()
        };
        let client = client_with(&cfg, transport.clone());

        client.get_forecast("123", Horizon::OneDay).await.unwrap();

        assert_eq!(transport.requests.lock()[0].query_value("metric"), Some("false"));
    }

    #[tokio::test]
    async fn forecast_is_normalized() {
        let body = json!({
            "DailyForecasts": [{
                "Temperature": {
                    "Minimum": { "Value": 0, "Unit": "C" },
                    "Maximum": { "Value": 100, "Unit": "F" }
                }
            }]
        });
        let client = client_with(&config(), answering(200, &body.to_string()));

        let forecast = client
            .get_forecast("123", Horizon::OneDay)
            .await
            .unwrap()
            .expect("forecast")
            .forecast;

        assert_eq!(forecast.min.value, 0.0);
        assert_eq!(forecast.max.unit, "F");
    }

    #[tokio::test]
    async fn incomplete_body_is_none_not_error() {
        let client = client_with(&config(), answering(200, r#"{"DailyForecasts":[]}"#));
        let forecast = client.get_forecast("123", Horizon::FiveDays).await.unwrap();
        assert!(forecast.is_none());
    }

    #[tokio::test]
    async fn invalid_and_network_failures_are_distinct() {
        for transport in [answering(500, "{}"), answering(200, "asd"), answering(200, "")] {
            let client = client_with(&config(), transport);
            let err = client.get_forecast("1", Horizon::OneDay).await.unwrap_err();
            assert!(matches!(err, ForecastError::InvalidResponse("forecast")));
        }

        let transport = Arc::new(StubTransport {
            fail: true,
            ..StubTransport::default()
        });
        let client = client_with(&config(), transport);
        let err = client.get_forecast("1", Horizon::OneDay).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn usable_through_trait_object() {
        let service: Box<dyn ForecastService> =
            Box::new(client_with(&config(), answering(200, r#"[{"Key":"42"}]"#)));

        let key = service.resolve_location("Berlin").await.unwrap();
        assert_eq!(key.as_deref(), Some("42"));
    }
}
