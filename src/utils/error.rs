use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No marker string found in the file ({markers_checked} known markers checked)")]
    FormatNotRecognized { markers_checked: usize },

    #[error("Marker found but no sample records were extracted")]
    NoDataExtracted,

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Excel workbook error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤分類，用於日誌與使用者訊息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Export,
    System,
}

/// 錯誤嚴重程度，CLI 依此決定退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ExtractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExtractError::FormatNotRecognized { .. } | ExtractError::NoDataExtracted => {
                ErrorCategory::Input
            }
            ExtractError::ConfigError { .. }
            | ExtractError::ConfigValidationError { .. }
            | ExtractError::InvalidConfigValueError { .. }
            | ExtractError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ExtractError::ZipError(_)
            | ExtractError::XlsxError(_)
            | ExtractError::CsvError(_)
            | ExtractError::SerializationError(_) => ErrorCategory::Export,
            ExtractError::IoError(_) | ExtractError::ProcessingError { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ExtractError::NoDataExtracted => ErrorSeverity::Medium,
            ExtractError::FormatNotRecognized { .. } => ErrorSeverity::High,
            ExtractError::ConfigError { .. }
            | ExtractError::ConfigValidationError { .. }
            | ExtractError::InvalidConfigValueError { .. }
            | ExtractError::MissingConfigError { .. } => ErrorSeverity::High,
            ExtractError::ZipError(_)
            | ExtractError::XlsxError(_)
            | ExtractError::CsvError(_)
            | ExtractError::IoError(_)
            | ExtractError::SerializationError(_)
            | ExtractError::ProcessingError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ExtractError::FormatNotRecognized { .. } => {
                "Make sure the file is an unmodified RECORD.TXT capture from the LS6500 printer port"
            }
            ExtractError::NoDataExtracted => {
                "The capture contains no sample lines; check that the counting run finished before the file was saved"
            }
            ExtractError::ConfigError { .. }
            | ExtractError::ConfigValidationError { .. }
            | ExtractError::InvalidConfigValueError { .. }
            | ExtractError::MissingConfigError { .. } => {
                "Check the command line arguments and the instrument profile TOML file"
            }
            ExtractError::IoError(_) => {
                "Check that the input file exists and the output directory is writable"
            }
            ExtractError::ZipError(_)
            | ExtractError::XlsxError(_)
            | ExtractError::CsvError(_)
            | ExtractError::SerializationError(_)
            | ExtractError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExtractError::FormatNotRecognized { .. } => {
                "No marker string found in the file.".to_string()
            }
            ExtractError::NoDataExtracted => {
                "The file was recognized but no CPM values could be extracted.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_not_recognized_is_input_error() {
        let err = ExtractError::FormatNotRecognized { markers_checked: 2 };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(
            err.user_friendly_message(),
            "No marker string found in the file."
        );
        assert!(err.to_string().contains("2 known markers"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ExtractError = io.into();
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_no_data_is_less_severe_than_config_errors() {
        let config = ExtractError::MissingConfigError {
            field: "input".to_string(),
        };
        assert!(ExtractError::NoDataExtracted.severity() < config.severity());
    }
}
