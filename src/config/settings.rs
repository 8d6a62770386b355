use crate::config::toml_config::TomlConfig;
use crate::core::decoder::DEFAULT_MAX_DIMENSION;
use crate::core::ConfigProvider;
use crate::domain::model::{ColumnLayout, OutputFormat, Source};
use crate::utils::error::{Result, SecretError};
use crate::utils::validation::{
    validate_document_url, validate_grid_limit, validate_output_dir, validate_output_file_name,
    validate_timeout_seconds, Validate,
};
use std::path::Path;

/// Published document used when no source is given.
pub const DEFAULT_DOCUMENT_URL: &str = "https://docs.google.com/document/d/e/2PACX-1vQiVT_Jj04V35C-YRzvoqyEYYzdXHcRyMUZCVQRYCu6gQJX7hbNhJ5eFCMuoX47cAsDW2ZBYppUQITr/pub";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;
pub const DEFAULT_OUTPUT_FILE: &str = "secret_message.txt";

/// Fully resolved run settings: defaults, then TOML, then command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: Source,
    pub fallback_to_sample: bool,
    pub timeout_seconds: u64,
    pub column_layout: Option<ColumnLayout>,
    pub max_dimension: usize,
    pub output_path: Option<String>,
    pub output_file: String,
    pub output_format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: Source::Url(DEFAULT_DOCUMENT_URL.to_string()),
            fallback_to_sample: true,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            column_layout: None,
            max_dimension: DEFAULT_MAX_DIMENSION,
            output_path: None,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            output_format: OutputFormat::Text,
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(source) = &config.source {
            if let Some(location) = &source.location {
                settings.set_source(location)?;
            }
            if let Some(fallback) = source.fallback_to_sample {
                settings.fallback_to_sample = fallback;
            }
            if let Some(timeout) = source.timeout_seconds {
                settings.timeout_seconds = timeout;
            }
        }

        if let Some(decode) = &config.decode {
            if decode.column_order.is_some() {
                settings.column_layout = decode.column_order;
            }
            if let Some(max_dimension) = decode.max_dimension {
                settings.max_dimension = max_dimension;
            }
        }

        if let Some(output) = &config.output {
            if output.path.is_some() {
                settings.output_path = output.path.clone();
            }
            if let Some(filename) = &output.filename {
                settings.output_file = filename.clone();
            }
            if let Some(format) = output.format {
                settings.output_format = format;
            }
        }

        Ok(settings)
    }

    /// An explicit source turns the sample fallback off; callers may re-enable it afterwards.
    pub fn set_source(&mut self, location: &str) -> Result<()> {
        self.source = locate_source(location)?;
        self.fallback_to_sample = false;
        Ok(())
    }
}

/// `sample` selects the offline sample, an existing path selects a file,
/// anything else has to be an http(s) URL.
pub fn locate_source(location: &str) -> Result<Source> {
    let trimmed = location.trim();
    if trimmed.eq_ignore_ascii_case("sample") || trimmed.eq_ignore_ascii_case("--sample") {
        return Ok(Source::Sample);
    }

    let path = Path::new(trimmed);
    if !trimmed.is_empty() && path.exists() {
        let absolute = std::fs::canonicalize(path)?;
        return Ok(Source::File(absolute));
    }

    if validate_document_url("source", trimmed).is_ok() {
        return Ok(Source::Url(trimmed.to_string()));
    }

    Err(SecretError::SourceNotFound {
        source_arg: location.to_string(),
    })
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        if let Source::Url(url) = &self.source {
            validate_document_url("source", url)?;
        }

        validate_timeout_seconds(
            "source.timeout_seconds",
            self.timeout_seconds,
            MAX_TIMEOUT_SECONDS,
        )?;
        validate_grid_limit("decode.max_dimension", self.max_dimension)?;

        if let Some(path) = &self.output_path {
            validate_output_dir("output.path", path)?;
        }
        validate_output_file_name("output.filename", &self.output_file)?;

        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn source(&self) -> &Source {
        &self.source
    }

    fn fallback_to_sample(&self) -> bool {
        self.fallback_to_sample
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn column_layout(&self) -> Option<ColumnLayout> {
        self.column_layout
    }

    fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
    }
}
