use crate::domain::model::{ColumnLayout, OutputFormat};
use crate::utils::error::{Result, SecretError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

/// Every section and key is optional; missing values fall back to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: Option<SourceConfig>,
    pub decode: Option<DecodeConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL, file path, or `sample`.
    pub location: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub fallback_to_sample: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodeConfig {
    pub column_order: Option<ColumnLayout>,
    pub max_dimension: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub filename: Option<String>,
    pub format: Option<OutputFormat>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SecretError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SecretError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[source]
location = "https://example.com/doc"
timeout_seconds = 30
fallback_to_sample = false

[decode]
column_order = "x-char-y"
max_dimension = 512

[output]
path = "./out"
filename = "message.json"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let source = config.source.unwrap();
        let decode = config.decode.unwrap();
        let output = config.output.unwrap();

        assert_eq!(source.location.as_deref(), Some("https://example.com/doc"));
        assert_eq!(source.timeout_seconds, Some(30));
        assert_eq!(source.fallback_to_sample, Some(false));
        assert_eq!(decode.column_order, Some(ColumnLayout::X_CHAR_Y));
        assert_eq!(decode.max_dimension, Some(512));
        assert_eq!(output.path.as_deref(), Some("./out"));
        assert_eq!(output.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.source.is_none());
        assert!(config.decode.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn test_bad_column_order_is_config_error() {
        let err = TomlConfig::from_toml_str("[decode]\ncolumn_order = \"x-y\"\n").unwrap_err();
        assert!(matches!(err, SecretError::ConfigError { .. }));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SECRET_MESSAGE_TEST_URL", "https://test.example.com/doc");

        let toml_content = r#"
[source]
location = "${SECRET_MESSAGE_TEST_URL}"

[output]
path = "${SECRET_MESSAGE_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.source.unwrap().location.as_deref(),
            Some("https://test.example.com/doc")
        );
        assert_eq!(
            config.output.unwrap().path.as_deref(),
            Some("${SECRET_MESSAGE_UNSET_VAR}")
        );

        std::env::remove_var("SECRET_MESSAGE_TEST_URL");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\nlocation = \"sample\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.source.unwrap().location.as_deref(), Some("sample"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TomlConfig::from_file("/no/such/secret-message.toml").unwrap_err();
        assert!(matches!(err, SecretError::IoError(_)));
    }
}
