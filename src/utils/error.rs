use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Unable to find the '{field}' collection in the source document")]
    MissingCollection { field: String },

    #[error("Unrecognized data upload type: {value}")]
    UnsupportedDataType { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::SerializationError(_) | EtlError::MissingCollection { .. } => {
                ErrorCategory::Data
            }
            EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::UnsupportedDataType { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check that the backend is reachable from this host and retry".to_string()
            }
            EtlError::IoError(_) => "Check that the input file exists and is readable".to_string(),
            EtlError::SerializationError(_) => {
                "Make sure the input file is valid GeoJSON".to_string()
            }
            EtlError::MissingCollection { field } => {
                format!("The input document must contain a top-level '{}' array", field)
            }
            EtlError::UnsupportedDataType { .. } => {
                "Use --data-type country or --data-type earthquake".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Provide '{}' on the command line or in the config file", field)
            }
            EtlError::InvalidConfigValueError { .. } | EtlError::ConfigValidationError { .. } => {
                "Review the command line flags and the config file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(_) => "Unable to talk to the upload backend".to_string(),
            EtlError::IoError(e) => format!("Unable to read the input file: {}", e),
            EtlError::SerializationError(e) => format!("The input file is not valid JSON: {}", e),
            EtlError::MissingCollection { field } => {
                format!("Error: unable to find the {} in the geojson file", field)
            }
            EtlError::UnsupportedDataType { value } => {
                format!("Error: unrecognized data upload type {}", value)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
