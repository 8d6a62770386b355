use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Source '{source_arg}' is neither an existing file nor an http(s) URL")]
    SourceNotFound { source_arg: String },

    #[error("Document from {origin} is not valid UTF-8")]
    InvalidEncoding { origin: String },

    #[error("Message grid {width}x{height} exceeds the limit of {limit} cells per side")]
    GridTooLarge {
        width: usize,
        height: usize,
        limit: usize,
    },

    #[error("Self-test failed: {actual:?} != {expected:?}")]
    SelfTest { expected: String, actual: String },
}

impl SecretError {
    /// Process exit code reported by the CLI for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SecretError::HttpError(_) | SecretError::SourceNotFound { .. } => 2,
            _ => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SecretError::HttpError(e) => match e.status() {
                Some(status) => format!("The document server answered with {}", status),
                None if e.is_timeout() => "Timed out while fetching the document".to_string(),
                None => format!("Could not fetch the document: {}", e),
            },
            SecretError::IoError(e) => format!("Could not read or write a file: {}", e),
            SecretError::SourceNotFound { source_arg } => {
                format!("Cannot find '{}' as a file or URL", source_arg)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SecretError::HttpError(_) => {
                "Check the URL and your network connection, or run with `sample` to decode the offline sample"
            }
            SecretError::SourceNotFound { .. } => {
                "Pass an existing file path or a URL starting with http:// or https://"
            }
            SecretError::InvalidEncoding { .. } => "Save the document as UTF-8 text",
            SecretError::GridTooLarge { .. } => {
                "Raise --max-dimension if the coordinates really are that large"
            }
            SecretError::ConfigError { .. } | SecretError::InvalidConfigValueError { .. } => {
                "Fix the flagged setting in the command line or the TOML config"
            }
            SecretError::CsvError(_) => "Check that the delimited file has one row per glyph",
            _ => "Re-run with --verbose for more details",
        }
    }
}

pub type Result<T> = std::result::Result<T, SecretError>;
