use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuakeMapError {
    #[error("Feed unavailable at {url}: {reason}")]
    FeedUnavailable { url: String, reason: String },

    #[error("Feed response malformed: {reason}")]
    FeedMalformed { reason: String },

    #[error("Feature #{index} invalid: {reason}")]
    FeatureInvalid { index: usize, reason: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Map rendering error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Io,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度決定程序退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl QuakeMapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuakeMapError::FeedUnavailable { .. } => ErrorCategory::Network,
            QuakeMapError::FeedMalformed { .. }
            | QuakeMapError::FeatureInvalid { .. }
            | QuakeMapError::CsvError(_)
            | QuakeMapError::SerializationError(_) => ErrorCategory::Data,
            QuakeMapError::ConfigError { .. }
            | QuakeMapError::ConfigValidationError { .. }
            | QuakeMapError::InvalidConfigValueError { .. }
            | QuakeMapError::MissingConfigError { .. } => ErrorCategory::Configuration,
            QuakeMapError::IoError(_) => ErrorCategory::Io,
            QuakeMapError::RenderError { .. } => ErrorCategory::Rendering,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆記錄錯誤只會被跳過
            QuakeMapError::FeatureInvalid { .. } => ErrorSeverity::Low,
            QuakeMapError::FeedUnavailable { .. } | QuakeMapError::FeedMalformed { .. } => {
                ErrorSeverity::Medium
            }
            QuakeMapError::ConfigError { .. }
            | QuakeMapError::ConfigValidationError { .. }
            | QuakeMapError::InvalidConfigValueError { .. }
            | QuakeMapError::MissingConfigError { .. }
            | QuakeMapError::CsvError(_)
            | QuakeMapError::SerializationError(_)
            | QuakeMapError::RenderError { .. } => ErrorSeverity::High,
            QuakeMapError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            QuakeMapError::FeedUnavailable { .. } => {
                "Check network connectivity and the feed URL, or raise --timeout-seconds"
            }
            QuakeMapError::FeedMalformed { .. } => {
                "Make sure the feed URL points at a GeoJSON FeatureCollection"
            }
            QuakeMapError::FeatureInvalid { .. } => {
                "The record was skipped; no action is needed unless many records are rejected"
            }
            QuakeMapError::MissingConfigError { .. } => {
                "Provide the missing value via flag, environment variable or config file"
            }
            QuakeMapError::ConfigError { .. }
            | QuakeMapError::ConfigValidationError { .. }
            | QuakeMapError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
            QuakeMapError::IoError(_) => "Check that the output directory is writable",
            QuakeMapError::CsvError(_)
            | QuakeMapError::SerializationError(_)
            | QuakeMapError::RenderError { .. } => "Re-run with --verbose and report the log",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QuakeMapError::FeedUnavailable { url, .. } => {
                format!("Could not reach the earthquake feed at {}", url)
            }
            QuakeMapError::FeedMalformed { .. } => {
                "The earthquake feed returned data that could not be read".to_string()
            }
            QuakeMapError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn unavailable(url: &str, reason: impl Into<String>) -> Self {
        QuakeMapError::FeedUnavailable {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        QuakeMapError::FeedMalformed {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuakeMapError>;
