use crate::utils::error::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub body: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("secret-message/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// GETs `url`; non-2xx statuses are errors.
    pub async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        tracing::debug!("Making request to: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("Response status: {}", response.status());

        let response = response.error_for_status()?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        tracing::debug!("Fetched {} bytes ({:?})", body.len(), content_type);
        Ok(FetchedDocument { body, content_type })
    }
}
