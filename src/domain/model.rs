use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One symbol placed at a grid coordinate. `y = 0` is the top row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    pub symbol: String,
    pub x: usize,
    pub y: usize,
}

/// Column index of each field inside a three-field coordinate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnLayout {
    pub symbol: usize,
    pub x: usize,
    pub y: usize,
}

impl ColumnLayout {
    pub const CHAR_X_Y: ColumnLayout = ColumnLayout {
        symbol: 0,
        x: 1,
        y: 2,
    };

    /// Column order of the published Google Docs table.
    pub const X_CHAR_Y: ColumnLayout = ColumnLayout {
        symbol: 1,
        x: 0,
        y: 2,
    };
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::CHAR_X_Y
    }
}

impl fmt::Display for ColumnLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = ["", "", ""];
        names[self.symbol] = "char";
        names[self.x] = "x";
        names[self.y] = "y";
        write!(f, "{}", names.join("-"))
    }
}

impl FromStr for ColumnLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<String> = s.split('-').map(|p| p.trim().to_lowercase()).collect();
        if parts.len() != 3 {
            return Err(format!(
                "column order '{}' must name three columns, e.g. char-x-y",
                s
            ));
        }

        let position = |names: &[&str]| parts.iter().position(|p| names.contains(&p.as_str()));
        match (
            position(&["char", "symbol"]),
            position(&["x"]),
            position(&["y"]),
        ) {
            (Some(symbol), Some(x), Some(y)) => Ok(ColumnLayout { symbol, x, y }),
            _ => Err(format!(
                "column order '{}' must contain each of char, x and y exactly once",
                s
            )),
        }
    }
}

impl TryFrom<String> for ColumnLayout {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnLayout> for String {
    fn from(layout: ColumnLayout) -> Self {
        layout.to_string()
    }
}

/// Where the coordinate document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
    Sample,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Sample => write!(f, "sample"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Html,
    Delimited { delimiter: u8 },
}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(DocumentFormat::Delimited { delimiter: b',' }),
            "tsv" => Some(DocumentFormat::Delimited { delimiter: b'\t' }),
            "htm" | "html" => Some(DocumentFormat::Html),
            _ => None,
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "text/html" | "application/xhtml+xml" => Some(DocumentFormat::Html),
            "text/csv" => Some(DocumentFormat::Delimited { delimiter: b',' }),
            "text/tab-separated-values" => Some(DocumentFormat::Delimited { delimiter: b'\t' }),
            _ => None,
        }
    }

    pub fn sniff(body: &str) -> Self {
        let head = body.trim_start();
        if head.starts_with('<') {
            let lower = head.to_ascii_lowercase();
            if lower.contains("<html") || lower.contains("<table") || lower.contains("<tr") {
                return DocumentFormat::Html;
            }
        }
        DocumentFormat::Text
    }

    /// Extension first, then content type, then the body itself.
    pub fn detect(extension: Option<&str>, content_type: Option<&str>, body: &str) -> Self {
        extension
            .and_then(Self::from_extension)
            .or_else(|| content_type.and_then(Self::from_content_type))
            .unwrap_or_else(|| Self::sniff(body))
    }
}

#[derive(Debug, Clone)]
pub struct RawDocument {
    pub origin: String,
    pub format: DocumentFormat,
    pub body: String,
    /// Set when this is the offline sample standing in for a source that could not be read.
    pub fallback_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedMessage {
    pub glyphs: Vec<Glyph>,
    pub skipped_rows: usize,
    pub width: usize,
    pub height: usize,
    pub message: String,
}

impl DecodedMessage {
    pub fn render_as(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Text => Ok(self.message.clone()),
            OutputFormat::Json => serde_json::to_string_pretty(self),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unsupported output format '{}' (text, json)", other)),
        }
    }
}
