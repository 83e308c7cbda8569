use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 輸入檔不存在通常是路徑打錯，可以直接修正後重跑
            EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ErrorSeverity::Medium
            }
            EtlError::IoError(_) => ErrorSeverity::Critical,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorSeverity::High,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Check that the input file exists, e.g. inside the 'data' folder".to_string()
            }
            EtlError::IoError(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                "Check read permission on the input and write permission on the output directory"
                    .to_string()
            }
            EtlError::IoError(_) => "Check disk space and file system health".to_string(),
            EtlError::CsvError(_) => {
                "Make sure the file has a header row and uses the configured delimiter".to_string()
            }
            EtlError::SerializationError(_) => {
                "The summary report could not be encoded; rerun without --summary".to_string()
            }
            EtlError::ConfigError { .. } | EtlError::ConfigValidationError { .. } => {
                "Fix the configuration file syntax and try again".to_string()
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            EtlError::ProcessingError { .. } => {
                "Inspect the input data with --verbose to find the offending rows".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("Could not find a required file: {}", e)
            }
            EtlError::IoError(e) => format!("File access failed: {}", e),
            EtlError::CsvError(e) => format!("The sales file could not be read as CSV: {}", e),
            EtlError::SerializationError(e) => format!("Failed to write the summary: {}", e),
            EtlError::ConfigError { message } => format!("Configuration problem: {}", message),
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            EtlError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not a valid {}: {}", value, field, reason),
            EtlError::ProcessingError { message } => format!("Processing failed: {}", message),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_medium_severity() {
        let err = EtlError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "data/sales_data.csv",
        ));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.recovery_suggestion().contains("data"));
    }

    #[test]
    fn test_config_errors_are_configuration_category() {
        let err = EtlError::InvalidConfigValueError {
            field: "delimiter".to_string(),
            value: "ab".to_string(),
            reason: "must be a single byte".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("delimiter"));
    }
}
