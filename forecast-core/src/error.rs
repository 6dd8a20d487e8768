use thiserror::Error;

/// Failures surfaced by the forecast core.
///
/// An empty location search or an incomplete forecast body is not an error:
/// those come back as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A required setting is missing; raised when the client is constructed.
    #[error("Missing required configuration key '{key}'")]
    Config { key: &'static str },

    #[error("Search string must not be empty")]
    EmptyQuery,

    #[error("Unsupported forecast horizon: {0} day(s). Supported: 1, 5.")]
    InvalidHorizon(u8),

    /// The outbound call itself failed.
    #[error("Network request failed: {0:#}")]
    Network(anyhow::Error),

    /// The call settled but the payload failed validation.
    #[error("Provider {0} response is invalid")]
    InvalidResponse(&'static str),
}

impl ForecastError {
    pub fn is_network(&self) -> bool {
        matches!(self, ForecastError::Network(_))
    }

    pub fn is_invalid_response(&self) -> bool {
        matches!(self, ForecastError::InvalidResponse(_))
    }
}
