use crate::utils::error::{Result, SecretError};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> SecretError {
    SecretError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Coordinate documents are fetched over http(s) and need a host.
pub fn validate_document_url(field: &str, url: &str) -> Result<()> {
    let parsed = Url::parse(url)
        .map_err(|e| invalid(field, url, format!("not a document URL: {}", e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            url,
            format!(
                "documents are fetched over http or https, not {}",
                parsed.scheme()
            ),
        ));
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid(field, url, "document URL has no host")),
    }
}

/// The directory the decoded message is written into.
pub fn validate_output_dir(field: &str, dir: &str) -> Result<()> {
    if dir.trim().is_empty() {
        return Err(invalid(field, dir, "output directory cannot be empty"));
    }
    if dir.contains('\0') {
        return Err(invalid(field, dir, "output directory contains a NUL byte"));
    }
    if Path::new(dir).is_file() {
        return Err(invalid(
            field,
            dir,
            "output directory points at an existing file",
        ));
    }
    Ok(())
}

/// Joined onto the output directory, so it must be a bare file name.
pub fn validate_output_file_name(field: &str, name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(invalid(field, name, "message file name cannot be empty"));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\', '\0']) {
        return Err(invalid(
            field,
            name,
            "message file name must not contain path separators",
        ));
    }
    Ok(())
}

pub fn validate_timeout_seconds(field: &str, seconds: u64, max_seconds: u64) -> Result<()> {
    if seconds == 0 || seconds > max_seconds {
        return Err(invalid(
            field,
            seconds,
            format!("fetch timeout must be between 1 and {} seconds", max_seconds),
        ));
    }
    Ok(())
}

pub fn validate_grid_limit(field: &str, max_dimension: usize) -> Result<()> {
    if max_dimension == 0 {
        return Err(invalid(
            field,
            max_dimension,
            "grid limit must allow at least one row and column",
        ));
    }
    Ok(())
}
