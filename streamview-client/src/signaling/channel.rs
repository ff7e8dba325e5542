use serde::Deserialize;
use streamview_core::SignalMessage;
use tokio::sync::mpsc;
use tracing::{debug, error};
use url::Url;

/// Result of decoding one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Message(SignalMessage),
    Unrecognized { raw: String, reason: String },
}

/// Decodes a text frame into a signal message.
pub fn decode_frame(raw: &str) -> Inbound {
    match serde_json::from_str::<SignalMessage>(raw) {
        Ok(msg) => Inbound::Message(msg),
        Err(e) => Inbound::Unrecognized {
            raw: raw.to_string(),
            reason: e.to_string(),
        },
    }
}

/// `RTCIceCandidateInit` as produced by browsers and webrtc-rs `to_json()`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InnerIce {
    candidate: String,
    sdp_mid: Option<String>,
    #[serde(alias = "sdpMlineIndex")]
    sdp_m_line_index: Option<u16>,
}

/// Remote candidate ready to be handed to the peer transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCandidate {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_mline_index: Option<u16>,
}

impl RemoteCandidate {
    /// Some servers wrap the whole candidate init object as JSON inside the
    /// `candidate` field; unwrap it when it parses.
    pub fn from_signal(candidate: String, sdp_mid: Option<String>, sdp_mline_index: Option<u16>) -> Self {
        if candidate.trim().starts_with('{') {
            match serde_json::from_str::<InnerIce>(&candidate) {
                Ok(inner) => {
                    return Self {
                        candidate: inner.candidate,
                        sdp_mid: inner.sdp_mid.or(sdp_mid),
                        sdp_mline_index: inner.sdp_m_line_index.or(sdp_mline_index),
                    };
                }
                Err(e) => debug!("Candidate looked like JSON but did not parse: {}", e),
            }
        }

        Self {
            candidate,
            sdp_mid,
            sdp_mline_index,
        }
    }
}

/// Outbound half of the signaling connection owned by the controller.
///
/// Delivery is best effort: while the channel is not open, messages are
/// dropped without queueing or error.
pub struct SignalingChannel {
    url: Url,
    outbound: Option<mpsc::UnboundedSender<String>>,
}

impl SignalingChannel {
    pub fn new(url: Url, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self {
            url,
            outbound: Some(outbound),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_open(&self) -> bool {
        self.outbound.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Returns whether the message was handed to the connection.
    pub fn send(&self, msg: &SignalMessage) -> bool {
        let Some(tx) = self.outbound.as_ref().filter(|tx| !tx.is_closed()) else {
            debug!("Signaling channel not open, dropping {}", msg.tag());
            return false;
        };

        let json = match serde_json::to_string(msg) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize signal message: {}", e);
                return false;
            }
        };

        tx.send(json).is_ok()
    }

    /// Marks the channel closed; later sends are dropped.
    pub fn mark_closed(&mut self) {
        self.outbound = None;
    }

    /// Closes the connection. Returns `false` when it was already closed.
    pub fn close(&mut self) -> bool {
        self.outbound.take().is_some()
    }
}
