use crate::config::LogFormat;
use crate::domain::model::Endpoints;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{validate_endpoint_path, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<LogFormat>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PREREQ_API_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CatalogError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        self.logging.as_ref().and_then(|l| l.format)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.backend.base_url {
            validate_url("backend.base_url", base_url)?;
        }
        validate_endpoint_path("endpoints.subject_codes", &self.endpoints.subject_codes)?;
        validate_endpoint_path("endpoints.courses", &self.endpoints.courses)?;
        validate_endpoint_path("endpoints.prerequisites", &self.endpoints.prerequisites)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[backend]
base_url = "https://catalog.example.edu/api"
timeout_seconds = 15

[endpoints]
prerequisites = "search/prerequisites"

[logging]
verbose = true
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("https://catalog.example.edu/api")
        );
        assert_eq!(config.backend.timeout_seconds, Some(15));
        assert_eq!(config.endpoints.prerequisites, "search/prerequisites");
        assert_eq!(config.endpoints.courses, "courses");
        assert!(config.verbose());
        assert_eq!(config.log_format(), Some(LogFormat::Json));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.backend.base_url.is_none());
        assert_eq!(config.endpoints, Endpoints::default());
        assert!(!config.verbose());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PREREQ_TEST_BACKEND", "https://test.catalog.edu");

        let toml_content = r#"
[backend]
base_url = "${PREREQ_TEST_BACKEND}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("https://test.catalog.edu")
        );

        std::env::remove_var("PREREQ_TEST_BACKEND");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
[backend]
base_url = "${PREREQ_TEST_DEFINITELY_UNSET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[backend\nbase_url = 1").unwrap_err();
        assert!(matches!(err, CatalogError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[backend]
base_url = "http://localhost:8080"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("http://localhost:8080")
        );
    }
}
