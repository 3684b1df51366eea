//! Structured error handling for tokenscreen
//!
//! Only boundary operations (loading token dumps, loading configuration)
//! can fail. The scoring pipeline itself never returns an error: per-token
//! failures are converted into degraded annotations instead.

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Clone)]
pub enum ScreenerError {
    // Configuration loading & validation errors
    Configuration(ConfigurationError),

    // Token data parsing & validation errors
    Data(DataError),
}

impl std::fmt::Display for ScreenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenerError::Configuration(e) => write!(f, "Configuration Error: {}", e),
            ScreenerError::Data(e) => write!(f, "Data Error: {}", e),
        }
    }
}

impl std::error::Error for ScreenerError {}

// =============================================================================
// CONFIGURATION ERROR TYPES
// =============================================================================

#[derive(Debug, Clone)]
pub enum ConfigurationError {
    InvalidConfig { field: String, reason: String },
    FileUnreadable { path: String, error: String },
    ParseFailed { path: String, error: String },
    AlreadyInitialized,
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::InvalidConfig { field, reason } => {
                write!(f, "Invalid config field '{}': {}", field, reason)
            }
            ConfigurationError::FileUnreadable { path, error } => {
                write!(f, "Failed to read config file '{}': {}", path, error)
            }
            ConfigurationError::ParseFailed { path, error } => {
                write!(f, "Failed to parse config file '{}': {}", path, error)
            }
            ConfigurationError::AlreadyInitialized => write!(f, "Config already initialized"),
        }
    }
}

// =============================================================================
// DATA ERROR TYPES
// =============================================================================

#[derive(Debug, Clone)]
pub enum DataError {
    ParseError {
        data_type: String,
        error: String,
    },
    InvalidFormat {
        expected: String,
        received: String,
    },
    FileUnreadable {
        path: String,
        error: String,
    },
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::ParseError { data_type, error } => {
                write!(f, "Failed to parse {}: {}", data_type, error)
            }
            DataError::InvalidFormat { expected, received } => {
                write!(f, "Invalid format: expected {}, received {}", expected, received)
            }
            DataError::FileUnreadable { path, error } => {
                write!(f, "Failed to read '{}': {}", path, error)
            }
        }
    }
}

// =============================================================================
// CONVERSIONS & BUILDERS
// =============================================================================

impl From<serde_json::Error> for ScreenerError {
    fn from(err: serde_json::Error) -> Self {
        ScreenerError::Data(DataError::ParseError {
            data_type: "JSON".to_string(),
            error: err.to_string(),
        })
    }
}

impl ScreenerError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScreenerError::Configuration(ConfigurationError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        })
    }

    pub fn invalid_format(expected: impl Into<String>, received: impl Into<String>) -> Self {
        ScreenerError::Data(DataError::InvalidFormat {
            expected: expected.into(),
            received: received.into(),
        })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ScreenerError::Configuration(_))
    }
}

pub type ScreenerResult<T> = Result<T, ScreenerError>;
