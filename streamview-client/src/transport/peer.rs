use crate::error::TransportError;
use crate::presentation::RemoteStream;
use crate::signaling::RemoteCandidate;
use async_trait::async_trait;
use std::sync::Arc;
use streamview_core::IceServerConfig;
use tokio::sync::mpsc;

/// Aggregate connection state of a peer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Events the peer transport emits for the controller loop.
#[derive(Debug)]
pub enum PeerEvent {
    /// Remote media arrived.
    Track(RemoteStream),

    /// A local ICE candidate was gathered and must be signaled to the server.
    LocalCandidate {
        candidate: String,
        sdp_mid: Option<String>,
        sdp_mline_index: Option<u16>,
    },

    StateChanged(PeerState),
}

/// Inbound video counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InboundVideoReport {
    pub bytes_received: u64,
    pub timestamp_ms: f64,
    /// Round-trip time of the selected candidate pair, when known.
    pub round_trip_ms: Option<f64>,
}

/// A receive-only peer session.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Creates an offer for receiving audio and video, applies it as the local
    /// description and returns its SDP.
    async fn create_offer(&self) -> Result<String, TransportError>;

    async fn apply_answer(&self, sdp: String) -> Result<(), TransportError>;

    async fn add_remote_candidate(&self, candidate: RemoteCandidate) -> Result<(), TransportError>;

    async fn inbound_video_report(&self) -> Option<InboundVideoReport>;

    async fn close(&self) -> Result<(), TransportError>;
}

/// Factory for peer sessions, injected into the controller.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        events: mpsc::Sender<PeerEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError>;
}
