use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use forecast_core::{
    Collaborators, Config, FileCache, ForecastClient, Horizon, LocationCache, ReqwestTransport,
};
use std::sync::Arc;

use crate::handler::{Lookup, lookup_forecast};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Temperature and rain forecast lookup")]
pub struct Cli {
    /// Log debug output and whole provider payloads.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key and unit preference.
    Configure,

    /// Show the forecast for a city.
    Show {
        /// Free-text place name, e.g. "Berlin".
        city: String,

        /// Forecast window in days: 1 or 5.
        #[arg(long, default_value_t = 1)]
        days: u8,
    },

    /// Forget every cached location key.
    ClearCache,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, days } => {
                let horizon = Horizon::try_from(days)?;
                show(&city, horizon, self.verbose).await
            }
            Command::ClearCache => {
                let config = Config::load()?;
                let cache = FileCache::load(config.cache_file_path()?)?;
                cache.clear()?;
                println!("Location cache cleared: {}", cache.path().display());
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("Provider API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let metric = inquire::Confirm::new("Use metric units?")
        .with_default(config.use_metric_units())
        .prompt()
        .context("Failed to read unit preference")?;

    config.set_api_key(api_key.trim().to_string());
    config.use_metric_units = Some(metric);
    config.apply_provider_defaults();
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: &str, horizon: Horizon, verbose: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.verbose |= verbose;
    ensure_configured(&config)?;

    let cache = Arc::new(FileCache::load(config.cache_file_path()?)?);
    if config.clear_cache {
        cache.clear()?;
    }

    let client = ForecastClient::new(
        &config,
        Collaborators {
            cache,
            transport: Arc::new(ReqwestTransport::new()),
        },
    )
    .context("Invalid configuration. Hint: run `forecast configure` first.")?;

    match lookup_forecast(&client, city, horizon).await? {
        Lookup::Found(forecast) => {
            println!("{}", serde_json::to_string_pretty(&forecast)?);
            Ok(())
        }
        Lookup::NoData => {
            println!("No forecast data available for '{city}' within the next {horizon}.");
            Ok(())
        }
        Lookup::LocationNotFound(query) => Err(anyhow!("Location not found: {query}")),
    }
}

fn ensure_configured(config: &Config) -> Result<()> {
    if !config.is_configured() {
        bail!("No API key configured. Hint: run `forecast configure` first.");
    }
    Ok(())
}
