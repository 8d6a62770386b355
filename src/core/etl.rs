use crate::core::{DecodedMessage, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub message: DecodedMessage,
    pub output_path: Option<String>,
    /// Why the offline sample was decoded instead of the configured source.
    pub fallback_notice: Option<String>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        tracing::info!("Starting decode");

        // Extract
        let document = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} bytes from {}",
            document.body.len(),
            document.origin
        );
        let fallback_notice = document.fallback_from.clone();

        // Transform
        let message = self.pipeline.transform(document).await?;
        tracing::info!(
            "Decoded {} glyphs into a {}x{} grid ({} rows skipped)",
            message.glyphs.len(),
            message.width,
            message.height,
            message.skipped_rows
        );

        // Load
        let output_path = self.pipeline.load(&message).await?;
        if let Some(path) = &output_path {
            tracing::info!("Output saved to: {}", path);
        }

        tracing::debug!("Finished in {:?}", started.elapsed());
        Ok(RunReport {
            message,
            output_path,
            fallback_notice,
        })
    }
}
