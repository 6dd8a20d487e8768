use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://dataservice.accuweather.com";
pub const DEFAULT_CACHE_ID: &str = "forecast_default_cache";

/// Provider endpoint paths, appended to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UrlPaths {
    pub text_search: Option<String>,
    pub forecast_1_day: Option<String>,
    pub forecast_5_days: Option<String>,
}

impl UrlPaths {
    pub fn provider_defaults() -> Self {
        Self {
            text_search: Some("/locations/v1/cities/search".to_string()),
            forecast_1_day: Some("/forecasts/v1/daily/1day/".to_string()),
            forecast_5_days: Some("/forecasts/v1/daily/5day/".to_string()),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// base_url = "http://dataservice.accuweather.com"
/// use_metric_units = true
///
/// [url_paths]
/// text_search = "/locations/v1/cities/search"
/// forecast_1_day = "/forecasts/v1/daily/1day/"
/// forecast_5_days = "/forecasts/v1/daily/5day/"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,

    /// Unit flag sent with forecast requests; metric when unset.
    pub use_metric_units: Option<bool>,

    /// Name of the location cache file, without extension.
    pub cache_id: Option<String>,

    /// Drop every cached location key at startup.
    #[serde(default)]
    pub clear_cache: bool,

    /// Log whole provider payloads instead of excerpts.
    #[serde(default)]
    pub verbose: bool,

    pub url_paths: Option<UrlPaths>,
}

impl Config {
    /// Config with the provider's base URL and endpoint paths filled in.
    pub fn with_provider_defaults() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            url_paths: Some(UrlPaths::provider_defaults()),
            ..Self::default()
        }
    }

    /// Fill whichever of base URL and endpoint paths are still unset.
    pub fn apply_provider_defaults(&mut self) {
        let defaults = UrlPaths::provider_defaults();

        self.base_url.get_or_insert_with(|| DEFAULT_BASE_URL.to_string());

        let paths = self.url_paths.get_or_insert_with(UrlPaths::default);
        if paths.text_search.is_none() {
            paths.text_search = defaults.text_search;
        }
        if paths.forecast_1_day.is_none() {
            paths.forecast_1_day = defaults.forecast_1_day;
        }
        if paths.forecast_5_days.is_none() {
            paths.forecast_5_days = defaults.forecast_5_days;
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn use_metric_units(&self) -> bool {
        self.use_metric_units.unwrap_or(true)
    }

    pub fn cache_id(&self) -> &str {
        self.cache_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_CACHE_ID)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_file_path()?)
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::config_file_path()?)
    }

    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the location cache file for the configured cache id.
    pub fn cache_file_path(&self) -> Result<PathBuf> {
        Ok(Self::project_dirs()?
            .cache_dir()
            .join(format!("{}.json", self.cache_id())))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "forecast-proxy", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}
