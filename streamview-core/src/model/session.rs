use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery mechanism of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    #[serde(alias = "webrtc")]
    PeerToPeer,
    #[serde(alias = "hls")]
    SegmentedPull,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::PeerToPeer => write!(f, "webrtc"),
            TransportKind::SegmentedPull => write!(f, "hls"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webrtc" | "peer_to_peer" | "peer-to-peer" | "p2p" => Ok(TransportKind::PeerToPeer),
            "hls" | "segmented_pull" | "segmented-pull" => Ok(TransportKind::SegmentedPull),
            other => Err(format!("unknown transport kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    Idle,
    Connecting,
    Connected,
    Disconnected,
}

impl SessionStatus {
    /// Idle and Disconnected both accept a fresh connect.
    pub fn is_restartable(self) -> bool {
        matches!(self, SessionStatus::Idle | SessionStatus::Disconnected)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Connecting => "Connecting",
            SessionStatus::Connected => "Connected",
            SessionStatus::Disconnected => "Disconnected",
        };
        f.write_str(label)
    }
}
