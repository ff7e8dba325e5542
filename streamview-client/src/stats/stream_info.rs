use crate::error::EngineError;
use crate::transport::{stream_stats_url, streams_url};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use streamview_core::{StreamStats, StreamSummary};
use tracing::debug;
use url::Url;

/// Server-side stream metadata used for the viewer count.
#[async_trait]
pub trait StreamInfoSource: Send + Sync {
    async fn stream_stats(&self, server_endpoint: &str, stream_key: &str) -> Result<StreamStats, EngineError>;
}

/// `StreamInfoSource` backed by the server's JSON API.
#[derive(Clone, Debug)]
pub struct HttpStreamInfo {
    client: reqwest::Client,
}

impl HttpStreamInfo {
    pub fn new(timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Lists the streams the server currently knows about.
    pub async fn list_streams(&self, server_endpoint: &str) -> Result<Vec<StreamSummary>, EngineError> {
        let url = streams_url(server_endpoint)?;
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, EngineError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl StreamInfoSource for HttpStreamInfo {
    async fn stream_stats(&self, server_endpoint: &str, stream_key: &str) -> Result<StreamStats, EngineError> {
        let url = stream_stats_url(server_endpoint, stream_key)?;
        self.get_json(url).await
    }
}
