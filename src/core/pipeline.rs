use crate::adapters::http::HttpFetcher;
use crate::core::decoder::{self, DecodeOptions};
use crate::core::{html, sample};
use crate::core::{ConfigProvider, DecodedMessage, Pipeline, Storage};
use crate::domain::model::{DocumentFormat, RawDocument, Source};
use crate::utils::error::{Result, SecretError};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub struct SecretMessagePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    fetcher: HttpFetcher,
}

impl<S: Storage, C: ConfigProvider> SecretMessagePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let fetcher = HttpFetcher::new(Duration::from_secs(config.timeout_seconds()))?;
        Ok(Self {
            storage,
            config,
            fetcher,
        })
    }

    async fn read_source(&self, source: &Source) -> Result<RawDocument> {
        match source {
            Source::Url(url) => {
                let fetched = self.fetcher.fetch(url).await?;
                let extension = Url::parse(url).ok().and_then(|parsed| {
                    let name = parsed.path_segments()?.next_back()?.to_string();
                    Path::new(&name)
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .map(str::to_string)
                });
                let format = DocumentFormat::detect(
                    extension.as_deref(),
                    fetched.content_type.as_deref(),
                    &fetched.body,
                );
                Ok(RawDocument {
                    origin: url.clone(),
                    format,
                    body: fetched.body,
                    fallback_from: None,
                })
            }
            Source::File(path) => {
                let origin = path.display().to_string();
                let bytes = self.storage.read_file(&origin).await?;
                let body = String::from_utf8(bytes).map_err(|_| SecretError::InvalidEncoding {
                    origin: origin.clone(),
                })?;
                let extension = path.extension().and_then(|ext| ext.to_str());
                let format = DocumentFormat::detect(extension, None, &body);
                Ok(RawDocument {
                    origin,
                    format,
                    body,
                    fallback_from: None,
                })
            }
            Source::Sample => Ok(sample::sample_document()),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SecretMessagePipeline<S, C> {
    async fn extract(&self) -> Result<RawDocument> {
        let source = self.config.source();
        tracing::debug!("Reading document from {}", source);

        match self.read_source(source).await {
            Ok(document) => Ok(document),
            Err(e) if self.config.fallback_to_sample() && *source != Source::Sample => {
                tracing::warn!("⚠️  Could not read {}: {}", source, e);
                tracing::warn!("Using offline sample instead");
                Ok(RawDocument {
                    fallback_from: Some(format!("{}: {}", source, e)),
                    ..sample::sample_document()
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn transform(&self, document: RawDocument) -> Result<DecodedMessage> {
        tracing::debug!(
            "Decoding {} ({:?}, {} bytes)",
            document.origin,
            document.format,
            document.body.len()
        );

        let rows = match document.format {
            DocumentFormat::Html => {
                let rows = html::table_rows(&document.body);
                if rows.is_empty() {
                    tracing::debug!("No table rows found, reading HTML as text");
                    decoder::text_rows(&html::to_text(&document.body))
                } else {
                    rows
                }
            }
            DocumentFormat::Delimited { delimiter } => {
                decoder::delimited_rows(&document.body, delimiter)?
            }
            DocumentFormat::Text => decoder::text_rows(&document.body),
        };

        let options = DecodeOptions {
            layout: self.config.column_layout(),
            max_dimension: self.config.max_dimension(),
        };
        let decoded = decoder::decode_rows(rows, &options)?;

        if decoded.skipped_rows > 0 {
            tracing::debug!("Skipped {} unparseable rows", decoded.skipped_rows);
        }
        Ok(decoded)
    }

    /// Writes relative to the storage root, which is expected to be the output directory.
    async fn load(&self, message: &DecodedMessage) -> Result<Option<String>> {
        let Some(output_path) = self.config.output_path() else {
            return Ok(None);
        };

        let content = message.render_as(self.config.output_format())?;
        let file_name = self.config.output_file();
        self.storage
            .write_file(file_name, content.as_bytes())
            .await?;

        Ok(Some(
            Path::new(output_path).join(file_name).display().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Settings;
    use crate::domain::model::{ColumnLayout, OutputFormat};
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SecretError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn settings_for(source: Source) -> Settings {
        Settings {
            source,
            fallback_to_sample: false,
            ..Settings::default()
        }
    }

    fn document(format: DocumentFormat, body: &str) -> RawDocument {
        RawDocument {
            origin: "test".to_string(),
            format,
            body: body.to_string(),
            fallback_from: None,
        }
    }

    #[tokio::test]
    async fn test_extract_plain_text_url() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/message");
            then.status(200)
                .header("Content-Type", "text/plain")
                .body("H 0 0\nI 1 0\n");
        });

        let config = settings_for(Source::Url(server.url("/message")));
        let pipeline = SecretMessagePipeline::new(MockStorage::new(), config).unwrap();

        let doc = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert!(doc.fallback_from.is_none());
        assert_eq!(doc.format, DocumentFormat::Text);
        assert_eq!(doc.origin, server.url("/message"));
        assert_eq!(doc.body, "H 0 0\nI 1 0\n");
    }

    #[tokio::test]
    async fn test_extract_detects_csv_by_url_extension() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/glyphs.csv");
            then.status(200)
                .header("Content-Type", "application/octet-stream")
                .body("A,0,0\n");
        });

        let url = format!("{}?download=1", server.url("/glyphs.csv"));
        let pipeline = SecretMessagePipeline::new(MockStorage::new(), settings_for(Source::Url(url)))
            .unwrap();

        let doc = pipeline.extract().await.unwrap();
        assert_eq!(doc.format, DocumentFormat::Delimited { delimiter: b',' });
    }

    #[tokio::test]
    async fn test_extract_failure_without_fallback_is_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(500);
        });

        let pipeline =
            SecretMessagePipeline::new(MockStorage::new(), settings_for(Source::Url(server.url("/"))))
                .unwrap();

        let err = pipeline.extract().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, SecretError::HttpError(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_extract_failure_falls_back_to_sample() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(503);
        });

        let config = Settings {
            source: Source::Url(server.url("/")),
            fallback_to_sample: true,
            ..Settings::default()
        };
        let pipeline = SecretMessagePipeline::new(MockStorage::new(), config).unwrap();

        let doc = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert_eq!(doc.origin, "sample");
        assert_eq!(doc.body, sample::SAMPLE_DOCUMENT);
        let notice = doc.fallback_from.unwrap();
        assert!(notice.starts_with(&server.url("/")));
        assert!(notice.contains("503"));
    }

    #[tokio::test]
    async fn test_extract_file_through_storage() {
        let storage = MockStorage::new();
        storage.put_file("/data/glyphs.tsv", b"A\t0\t0\n").await;

        let config = settings_for(Source::File(PathBuf::from("/data/glyphs.tsv")));
        let pipeline = SecretMessagePipeline::new(storage, config).unwrap();

        let doc = pipeline.extract().await.unwrap();
        assert_eq!(doc.origin, "/data/glyphs.tsv");
        assert_eq!(doc.format, DocumentFormat::Delimited { delimiter: b'\t' });
    }

    #[tokio::test]
    async fn test_extract_rejects_non_utf8_file() {
        let storage = MockStorage::new();
        storage.put_file("/data/bad.txt", &[0xff, 0xfe, 0x00]).await;

        let config = settings_for(Source::File(PathBuf::from("/data/bad.txt")));
        let pipeline = SecretMessagePipeline::new(storage, config).unwrap();

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, SecretError::InvalidEncoding { .. }));
    }

    #[tokio::test]
    async fn test_transform_html_table() {
        let html = "<html><body><table>\
            <tr><td>x-coordinate</td><td>Character</td><td>y-coordinate</td></tr>\
            <tr><td>0</td><td>&#9608;</td><td>0</td></tr>\
            <tr><td>1</td><td>&#9608;</td><td>1</td></tr>\
            </table></body></html>";

        let pipeline =
            SecretMessagePipeline::new(MockStorage::new(), settings_for(Source::Sample)).unwrap();
        let decoded = pipeline
            .transform(document(DocumentFormat::Html, html))
            .await
            .unwrap();

        assert_eq!(decoded.message, "█ \n █");
        assert_eq!(decoded.skipped_rows, 0);
    }

    #[tokio::test]
    async fn test_transform_html_paragraphs() {
        let html = "<html><body><p>O 0 0</p><p>K 1 0</p></body></html>";

        let pipeline =
            SecretMessagePipeline::new(MockStorage::new(), settings_for(Source::Sample)).unwrap();
        let decoded = pipeline
            .transform(document(DocumentFormat::Html, html))
            .await
            .unwrap();

        assert_eq!(decoded.message, "OK");
    }

    #[tokio::test]
    async fn test_transform_uses_configured_layout() {
        let config = Settings {
            column_layout: Some(ColumnLayout::X_CHAR_Y),
            ..settings_for(Source::Sample)
        };
        let pipeline = SecretMessagePipeline::new(MockStorage::new(), config).unwrap();

        let decoded = pipeline
            .transform(document(DocumentFormat::Text, "0 H 0\n1 I 0"))
            .await
            .unwrap();
        assert_eq!(decoded.message, "HI");
    }

    #[tokio::test]
    async fn test_transform_respects_max_dimension() {
        let config = Settings {
            max_dimension: 3,
            ..settings_for(Source::Sample)
        };
        let pipeline = SecretMessagePipeline::new(MockStorage::new(), config).unwrap();

        let err = pipeline
            .transform(document(DocumentFormat::Text, "A 3 0"))
            .await
            .unwrap_err();
        assert!(matches!(err, SecretError::GridTooLarge { limit: 3, .. }));
    }

    #[tokio::test]
    async fn test_load_without_output_path() {
        let storage = MockStorage::new();
        let pipeline =
            SecretMessagePipeline::new(storage.clone(), settings_for(Source::Sample)).unwrap();

        let decoded = decoder::decode_text(sample::SAMPLE_DOCUMENT).unwrap();
        let output = pipeline.load(&decoded).await.unwrap();

        assert!(output.is_none());
        assert!(storage.files.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_writes_text_file() {
        let storage = MockStorage::new();
        let config = Settings {
            output_path: Some("out".to_string()),
            ..settings_for(Source::Sample)
        };
        let pipeline = SecretMessagePipeline::new(storage.clone(), config).unwrap();

        let decoded = decoder::decode_text(sample::SAMPLE_DOCUMENT).unwrap();
        let output = pipeline.load(&decoded).await.unwrap();

        let expected = Path::new("out").join("secret_message.txt");
        assert_eq!(output.as_deref(), Some(expected.to_str().unwrap()));
        let written = storage.get_file("secret_message.txt").await.unwrap();
        assert_eq!(written, sample::SAMPLE_EXPECTED.as_bytes());
    }

    #[tokio::test]
    async fn test_load_writes_json_file() {
        let storage = MockStorage::new();
        let config = Settings {
            output_path: Some("out".to_string()),
            output_file: "message.json".to_string(),
            output_format: OutputFormat::Json,
            ..settings_for(Source::Sample)
        };
        let pipeline = SecretMessagePipeline::new(storage.clone(), config).unwrap();

        let decoded = decoder::decode_text("A 1 0").unwrap();
        pipeline.load(&decoded).await.unwrap();

        let written = storage.get_file("message.json").await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(json["message"], " A");
        assert_eq!(json["width"], 2);
        assert_eq!(json["height"], 1);
    }
}
