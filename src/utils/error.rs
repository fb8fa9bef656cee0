use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 後端回報的錯誤，訊息原樣顯示給使用者
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("No course is selected")]
    NoCourseSelected,

    #[error("{operation} response discarded: a newer request superseded it")]
    Superseded { operation: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Data,
    Configuration,
    Selection,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::ApiError(_) => ErrorCategory::Network,
            CatalogError::Server { .. } => ErrorCategory::Server,
            CatalogError::SerializationError(_)
            | CatalogError::CsvError(_)
            | CatalogError::MalformedResponse { .. } => ErrorCategory::Data,
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CatalogError::ValidationError { .. }
            | CatalogError::NoCourseSelected
            | CatalogError::Superseded { .. } => ErrorCategory::Selection,
            CatalogError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::Superseded { .. } => ErrorSeverity::Low,
            CatalogError::ApiError(_)
            | CatalogError::Server { .. }
            | CatalogError::MalformedResponse { .. } => ErrorSeverity::Medium,
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 網路層或解碼失敗（相對於後端明確回報的錯誤）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CatalogError::ApiError(_)
                | CatalogError::SerializationError(_)
                | CatalogError::MalformedResponse { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the catalog backend is running and reachable at the configured base URL"
            }
            ErrorCategory::Server => "Re-select the option to retry; the backend rejected the request",
            ErrorCategory::Data => "The backend answered with an unexpected shape; verify the endpoint paths",
            ErrorCategory::Configuration => "Review the --base-url flag, PREREQ_API_URL and the TOML config file",
            ErrorCategory::Selection => "Pick a subject and a course from the offered options",
            ErrorCategory::Io => "Check file permissions and that the output is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CatalogError::Server { message, .. } => message.clone(),
            CatalogError::ApiError(e) if e.is_timeout() => {
                "The catalog backend did not answer in time".to_string()
            }
            CatalogError::ApiError(e) if e.is_connect() => {
                "Could not connect to the catalog backend".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
