use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use std::fmt::Debug;

use crate::validator::RawResponse;

/// Outbound GET request to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
}

impl ProviderRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    /// Issue the request and capture whatever came back.
    ///
    /// `Err` means the call itself failed. `Ok(None)` means it settled without a
    /// response. Status and body are never judged here.
    async fn get(&self, request: &ProviderRequest) -> Result<Option<RawResponse>>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &ProviderRequest) -> Result<Option<RawResponse>> {
        let res = self
            .http
            .get(&request.url)
            .query(&request.query)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", request.url))?;

        let status = res.status().as_u16();
        let text = res
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", request.url))?;

        tracing::debug!(url = %request.url, status, bytes = text.len(), "Provider response received");

        Ok(Some(RawResponse {
            status,
            text: Some(text),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_query_params_in_order() {
        let request = ProviderRequest::new("http://example.test/search")
            .param("q", "Berlin")
            .param("apikey", "KEY");

        assert_eq!(
            request.query,
            vec![("q", "Berlin".to_string()), ("apikey", "KEY".to_string())]
        );
        assert_eq!(request.query_value("apikey"), Some("KEY"));
        assert_eq!(request.query_value("metric"), None);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let request = ProviderRequest::new(format!("http://127.0.0.1:{port}/forecast"));
        let err = ReqwestTransport::new().get(&request).await.unwrap_err();

        assert!(err.to_string().contains("Failed to send request"));
    }
}
