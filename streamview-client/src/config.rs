use crate::error::ViewerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use streamview_core::utils::{
    DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2, DEFAULT_STUN_ADDR_3, DEFAULT_STUN_ADDR_4,
};
use streamview_core::{IceServerConfig, TransportKind};

pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;
pub const DEFAULT_STATS_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_VIEWER_COUNT_INTERVAL_MS: u64 = 5000;

/// Viewer settings, usually read from `viewer.toml` and CLI overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub stream_key: String,
    pub server_endpoint: String,
    pub transport: TransportKind,
    pub ice_servers: Vec<IceServerConfig>,
    pub reconnect_delay_ms: u64,
    pub stats_interval_ms: u64,
    pub viewer_count_interval_ms: u64,
    pub log_capacity: usize,
    pub http_timeout_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            stream_key: String::new(),
            server_endpoint: "http://localhost:8080".to_string(),
            transport: TransportKind::PeerToPeer,
            ice_servers: default_ice_servers(),
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            stats_interval_ms: DEFAULT_STATS_INTERVAL_MS,
            viewer_count_interval_ms: DEFAULT_VIEWER_COUNT_INTERVAL_MS,
            log_capacity: crate::logbook::DEFAULT_LOG_CAPACITY,
            http_timeout_ms: 10_000,
        }
    }
}

impl ViewerConfig {
    pub fn connect_request(&self) -> ConnectRequest {
        ConnectRequest {
            stream_key: self.stream_key.clone(),
            server_endpoint: self.server_endpoint.clone(),
            transport: self.transport,
        }
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms.max(1))
    }

    pub fn viewer_count_interval(&self) -> Duration {
        Duration::from_millis(self.viewer_count_interval_ms.max(1))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

/// The four public Google STUN servers, bundled into one ICE entry.
pub fn default_ice_servers() -> Vec<IceServerConfig> {
    vec![IceServerConfig {
        urls: vec![
            DEFAULT_STUN_ADDR.to_string(),
            DEFAULT_STUN_ADDR_2.to_string(),
            DEFAULT_STUN_ADDR_3.to_string(),
            DEFAULT_STUN_ADDR_4.to_string(),
        ],
        username: None,
        credential: None,
    }]
}

/// Parameters of a single connect call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub stream_key: String,
    pub server_endpoint: String,
    pub transport: TransportKind,
}

impl ConnectRequest {
    pub fn new(
        stream_key: impl Into<String>,
        server_endpoint: impl Into<String>,
        transport: TransportKind,
    ) -> Self {
        Self {
            stream_key: stream_key.into(),
            server_endpoint: server_endpoint.into(),
            transport,
        }
    }

    /// Trims both fields and rejects empty ones.
    pub fn validated(&self) -> Result<ConnectRequest, ViewerError> {
        let stream_key = self.stream_key.trim();
        if stream_key.is_empty() {
            return Err(ViewerError::Validation("stream key is required".to_string()));
        }

        let server_endpoint = self.server_endpoint.trim();
        if server_endpoint.is_empty() {
            return Err(ViewerError::Validation(
                "server endpoint is required".to_string(),
            ));
        }

        Ok(ConnectRequest {
            stream_key: stream_key.to_string(),
            server_endpoint: server_endpoint.to_string(),
            transport: self.transport,
        })
    }
}
