//! Core library for the `forecast` proxy.
//!
//! This crate defines:
//! - Location resolution backed by a persistent search-string cache
//! - Provider response validation and forecast normalization
//! - Configuration handling and the HTTP transport seam
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod payload;
pub mod resolver;
pub mod transport;
pub mod validator;

pub use cache::{FileCache, LocationCache};
pub use client::{Collaborators, ForecastClient, ForecastService};
pub use config::{Config, UrlPaths};
pub use error::ForecastError;
pub use model::{
    ForecastSummary, Horizon, NormalizedForecast, RainProbability, RainSummary,
    TemperatureSummary,
};
pub use parser::ForecastShapeParser;
pub use resolver::LocationResolver;
pub use transport::{HttpTransport, ProviderRequest, ReqwestTransport};
pub use validator::{RawResponse, ResponseValidator};
