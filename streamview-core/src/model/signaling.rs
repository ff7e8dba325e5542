use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// Control message exchanged with the server over the signaling socket.
///
/// Encoded externally tagged, one message per text frame:
/// `{"Answer": {"sdp": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalMessage {
    Offer {
        stream_key: String,
        sdp: String,
    },
    Answer {
        sdp: String,
    },
    IceCandidate {
        candidate: String,
        sdp_mid: Option<String>,
        sdp_mline_index: Option<u16>,
    },
    Error {
        message: String,
    },
}

impl SignalMessage {
    /// Variant tag as it appears on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            SignalMessage::Offer { .. } => "Offer",
            SignalMessage::Answer { .. } => "Answer",
            SignalMessage::IceCandidate { .. } => "IceCandidate",
            SignalMessage::Error { .. } => "Error",
        }
    }
}
