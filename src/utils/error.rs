use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error(
        "No access code provided. Must be provided either by parameter, the {env_var} environment variable, or an access code file"
    )]
    AuthenticationMissing { env_var: String },

    #[error("Unknown dataset name: {name}")]
    UnknownDataset { name: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Malformed JSON in {dataset} response: {source}")]
    MalformedJson {
        dataset: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported record shape at '{field}': {kind} values cannot be flattened")]
    UnsupportedShape { field: String, kind: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code used by the binaries.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::AuthenticationMissing { .. }
            | EtlError::UnknownDataset { .. }
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::ApiError(_) | EtlError::HttpStatus { .. } => ErrorCategory::Network,
            EtlError::MalformedJson { .. } | EtlError::UnsupportedShape { .. } => {
                ErrorCategory::Data
            }
            EtlError::ZipError(_)
            | EtlError::CsvError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::AuthenticationMissing { .. } => {
                "No WSDOT Traveler Info access code was found".to_string()
            }
            EtlError::UnknownDataset { name } => format!(
                "'{}' is not a WSDOT Traveler Info dataset. Valid values are: {}",
                name,
                crate::domain::model::Dataset::names().join(", ")
            ),
            EtlError::ApiError(_) | EtlError::HttpStatus { .. } => {
                format!("Could not download data from WSDOT: {}", self)
            }
            EtlError::MalformedJson { dataset, .. } => {
                format!("WSDOT returned a response for {} that is not valid JSON", dataset)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::AuthenticationMissing { env_var } => format!(
                "Pass the code as an argument, set {}, or create accesscode.txt",
                env_var
            ),
            EtlError::UnknownDataset { .. } => {
                "Check the spelling and capitalization of the dataset name".to_string()
            }
            EtlError::ApiError(_) => "Check the network connection and try again".to_string(),
            EtlError::HttpStatus { status, .. } if *status == 400 || *status == 401 => {
                "Check that the access code is valid".to_string()
            }
            EtlError::HttpStatus { .. } | EtlError::MalformedJson { .. } => {
                "The WSDOT service may be unavailable; try again later".to_string()
            }
            EtlError::UnsupportedShape { .. } => {
                "The dataset's payload shape changed; the record layout needs updating".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line options".to_string()
            }
            _ => "Check that the output path is writable and has free space".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
