use crate::config::settings::Settings;
use crate::config::toml_config::TomlConfig;
use crate::domain::model::{ColumnLayout, OutputFormat};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "secret-message")]
#[command(about = "Decode a coordinate-based secret message and print it as a character grid")]
pub struct CliConfig {
    /// URL or file to decode; `sample` uses the offline sample, `test` runs the self-test
    pub source: Option<String>,

    #[arg(long, help = "Decode the built-in offline sample")]
    pub sample: bool,

    #[arg(long = "test", help = "Run the built-in self-test and exit")]
    pub self_test: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Column order of coordinate rows, e.g. char-x-y or x-char-y
    #[arg(long)]
    pub column_order: Option<ColumnLayout>,

    /// Largest accepted grid width or height
    #[arg(long)]
    pub max_dimension: Option<usize>,

    /// Directory to write the decoded message into
    #[arg(short, long)]
    pub output: Option<String>,

    /// File name used inside the output directory
    #[arg(long)]
    pub output_file: Option<String>,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Fail instead of decoding the sample when the default document is unreachable")]
    pub no_fallback: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn wants_self_test(&self) -> bool {
        self.self_test
            || self
                .source
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("test") || s.eq_ignore_ascii_case("--test"))
    }

    /// Defaults, then the TOML file, then flags.
    pub fn to_settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from: {}", path);
                Settings::from_toml(&TomlConfig::from_file(path)?)?
            }
            None => Settings::default(),
        };

        if self.sample {
            settings.set_source("sample")?;
        } else if let Some(source) = &self.source {
            settings.set_source(source)?;
        }
        if self.no_fallback {
            settings.fallback_to_sample = false;
        }

        if let Some(timeout) = self.timeout {
            settings.timeout_seconds = timeout;
        }
        if self.column_order.is_some() {
            settings.column_layout = self.column_order;
        }
        if let Some(max_dimension) = self.max_dimension {
            settings.max_dimension = max_dimension;
        }
        if self.output.is_some() {
            settings.output_path = self.output.clone();
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = output_file.clone();
        }
        if let Some(format) = self.format {
            settings.output_format = format;
        }

        settings.validate()?;
        Ok(settings)
    }
}
