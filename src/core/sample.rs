use crate::core::decoder::decode_text;
use crate::domain::model::{DocumentFormat, RawDocument};
use crate::utils::error::{Result, SecretError};

pub const SAMPLE_DOCUMENT: &str = "H 0 0
E 1 0
L 2 0
L 3 0
O 4 0
W 0 1
O 1 1
R 2 1
L 3 1
D 4 1
";

pub const SAMPLE_EXPECTED: &str = "HELLO\nWORLD";

pub fn sample_document() -> RawDocument {
    RawDocument {
        origin: "sample".to_string(),
        format: DocumentFormat::Text,
        body: SAMPLE_DOCUMENT.to_string(),
        fallback_from: None,
    }
}

/// Decodes the built-in sample and checks the rendered grid.
pub fn self_test() -> Result<()> {
    let decoded = decode_text(SAMPLE_DOCUMENT)?;
    if decoded.message != SAMPLE_EXPECTED {
        return Err(SecretError::SelfTest {
            expected: SAMPLE_EXPECTED.to_string(),
            actual: decoded.message,
        });
    }
    Ok(())
}
