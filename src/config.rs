use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FetchError, Result};

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
pub const DEFAULT_COUNTRY: &str = "Belgium";
pub const DEFAULT_OUTPUT_PATH: &str = "belgian_teams_simple.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const API_KEY_ENV: &str = "APISPORTS_KEY";
pub const BASE_URL_ENV: &str = "APISPORTS_BASE_URL";
pub const COUNTRY_ENV: &str = "TEAMS_COUNTRY";
pub const OUTPUT_ENV: &str = "TEAMS_OUTPUT";

/// Contents of `config.toml`. Every field is optional.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Values given explicitly on the command line.
#[derive(Default, Debug, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub country: Option<String>,
    pub output_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub country: String,
    pub output_path: PathBuf,
    pub base_url: Url,
    /// `None` disables the request timeout.
    pub timeout: Option<Duration>,
    pub retries: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| FetchError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| FetchError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "teams-fetch")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(FetchError::NoConfigDir)
    }

    /// Resolve settings from the process environment.
    pub fn resolve(&self, overrides: Overrides) -> Result<Settings> {
        self.resolve_with(overrides, |name| std::env::var(name).ok())
    }

    /// Precedence for each value: explicit flag, environment, config file, default.
    pub fn resolve_with<F>(&self, overrides: Overrides, env_var: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| env_var(name).filter(|v| !v.trim().is_empty());

        let api_key = overrides
            .api_key
            .or_else(|| env(API_KEY_ENV))
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.trim().is_empty())
            .ok_or(FetchError::MissingApiKey)?;

        let country = overrides
            .country
            .or_else(|| env(COUNTRY_ENV))
            .or_else(|| self.country.clone())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

        let output_path = overrides
            .output_path
            .or_else(|| env(OUTPUT_ENV).map(PathBuf::from))
            .or_else(|| self.output_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

        let base_url = env(BASE_URL_ENV)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).map_err(|_| FetchError::InvalidUrl(base_url))?;

        let timeout_secs = overrides
            .timeout_secs
            .or(self.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Settings {
            api_key,
            country,
            output_path,
            base_url,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            retries: overrides.retries.or(self.retries).unwrap_or(0),
        })
    }
}
