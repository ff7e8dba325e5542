use serde::{Deserialize, Serialize};

/// Entry of `GET /api/streams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub stream_key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub viewer_count: u32,
}

/// Body of `GET /api/streams/{key}/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamStats {
    pub viewer_count: u32,
    /// Server-side stream status, e.g. `"Live"` or `{"Error": "..."}`.
    #[serde(default)]
    pub status: serde_json::Value,
    /// Seconds since the stream was created.
    #[serde(default)]
    pub uptime: i64,
}
