//! HTTP implementation of the remote fetch contract.

use super::{ByteStream, RemoteFetcher, RemoteMetadata};
use crate::error::{Result, TrallError};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;
use url::Url;

/// Fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn parse(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| TrallError::TransferFailed(format!("invalid URL: {}", e)))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn head(&self, url: &str) -> Result<RemoteMetadata> {
        let url = Self::parse(url)?;
        let response = self
            .client
            .head(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TrallError::TransferFailed(e.to_string()))?;

        let content_length = response.content_length();
        debug!("HEAD probe: content-length {:?}", content_length);
        Ok(RemoteMetadata { content_length })
    }

    async fn stream_get(&self, url: &str) -> Result<ByteStream> {
        let url = Self::parse(url)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TrallError::TransferFailed(e.to_string()))?;

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| TrallError::TransferFailed(e.to_string())));
        Ok(Box::pin(stream))
    }
}
