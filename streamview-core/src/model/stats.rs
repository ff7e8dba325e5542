use serde::{Deserialize, Serialize};

/// Raw inbound counter reading taken from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSample {
    pub bytes_received: u64,
    pub timestamp_ms: f64,
}

impl StatsSample {
    pub fn new(bytes_received: u64, timestamp_ms: f64) -> Self {
        Self {
            bytes_received,
            timestamp_ms,
        }
    }
}

/// Values shown next to the player. `None` means "not available".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub bitrate_kbps: Option<u32>,
    pub viewer_count: Option<u32>,
    pub latency_ms: Option<u32>,
}
