use crate::domain::model::{ColumnLayout, DecodedMessage, OutputFormat, RawDocument, Source};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> &Source;
    fn fallback_to_sample(&self) -> bool;
    fn timeout_seconds(&self) -> u64;
    /// `None` means use a header row if present, otherwise `char-x-y`.
    fn column_layout(&self) -> Option<ColumnLayout>;
    fn max_dimension(&self) -> usize;
    fn output_path(&self) -> Option<&str>;
    fn output_file(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawDocument>;
    async fn transform(&self, document: RawDocument) -> Result<DecodedMessage>;
    async fn load(&self, message: &DecodedMessage) -> Result<Option<String>>;
}
