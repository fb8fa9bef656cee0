#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::config::toml_config::TomlConfig;
use crate::domain::model::Endpoints;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_endpoint_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 原始 Flask 後端開發伺服器的預設位址
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Effective backend settings after merging defaults, TOML and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub endpoints: Endpoints,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientSettings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            base_url: config
                .backend
                .base_url
                .clone()
                .unwrap_or(defaults.base_url),
            timeout_seconds: config.backend.timeout_seconds,
            endpoints: config.endpoints.clone(),
        }
    }

    pub fn with_overrides(mut self, base_url: Option<String>, timeout_seconds: Option<u64>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if timeout_seconds.is_some() {
            self.timeout_seconds = timeout_seconds;
        }
        self
    }
}

impl ConfigProvider for ClientSettings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validate_url("backend.base_url", &self.base_url)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("backend.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        validate_endpoint_path("endpoints.subject_codes", &self.endpoints.subject_codes)?;
        validate_endpoint_path("endpoints.courses", &self.endpoints.courses)?;
        validate_endpoint_path("endpoints.prerequisites", &self.endpoints.prerequisites)?;
        Ok(())
    }
}
