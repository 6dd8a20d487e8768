use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    cache::LocationCache,
    error::ForecastError,
    payload::RawLocation,
    transport::{HttpTransport, ProviderRequest},
    validator::ResponseValidator,
};

/// Maps a search string to a provider location key, cache first.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    search_url: String,
    api_key: String,
    use_metric_units: bool,
    cache: Arc<dyn LocationCache>,
    transport: Arc<dyn HttpTransport>,
    validator: ResponseValidator,
}

impl LocationResolver {
    pub fn new(
        search_url: String,
        api_key: String,
        use_metric_units: bool,
        cache: Arc<dyn LocationCache>,
        transport: Arc<dyn HttpTransport>,
        verbose: bool,
    ) -> Self {
        Self {
            search_url,
            api_key,
            use_metric_units,
            cache,
            transport,
            validator: ResponseValidator::new(verbose),
        }
    }

    /// Resolve `query` to a location key.
    ///
    /// `Ok(None)` means the provider knows no such place. At most one request is
    /// sent; a cache hit sends none.
    pub async fn resolve(&self, query: &str) -> Result<Option<String>, ForecastError> {
        if query.is_empty() {
            return Err(ForecastError::EmptyQuery);
        }

        if let Some(key) = self.cache.get(query).filter(|k| !k.is_empty()) {
            tracing::info!(query, key = %key, "Location key loaded from cache");
            return Ok(Some(key));
        }

        let request = ProviderRequest::new(self.search_url.as_str())
            .param("q", query)
            .param("apikey", self.api_key.as_str())
            .param("metric", self.use_metric_units.to_string());

        let response = self.transport.get(&request).await.map_err(|e| {
            tracing::error!(query, "Location key request error: {:#}", e);
            ForecastError::Network(e)
        })?;

        let locations = self
            .validator
            .validate(response.as_ref())
            .ok_or(ForecastError::InvalidResponse("location"))?;

        let Some((key, name)) = first_location(&locations) else {
            tracing::info!(query, "No location matched the search string");
            return Ok(None);
        };

        tracing::info!(
            query,
            key = %key,
            name = name.as_deref().unwrap_or_default(),
            "Location key request success"
        );
        self.cache.set(query, &key);
        if let Err(e) = self.cache.save() {
            tracing::warn!("Failed to persist location cache: {:#}", e);
        }

        Ok(Some(key))
    }
}

/// Key and display name of the first search result; later candidates are ignored.
fn first_location(locations: &Value) -> Option<(String, Option<String>)> {
    let first = locations.as_array()?.first()?;
    let location = RawLocation::deserialize(first).ok()?;
    let key = location.location_key()?.to_string();
    Some((key, location.localized_name))
}
