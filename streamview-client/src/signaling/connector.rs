use crate::error::SignalingError;
use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

/// Event surfaced by an open signaling connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A text frame, expected to carry one JSON `SignalMessage`.
    Text(String),
    /// A binary frame of the given length. The protocol has no use for it.
    Binary(usize),
    /// Transport-level error. Usually followed by `Closed`.
    Error(String),
    /// The connection is gone. Sent at most once.
    Closed,
}

/// Both directions of an open signaling connection.
///
/// Dropping every clone of `outbound` closes the connection.
pub struct SignalingLink {
    pub outbound: mpsc::UnboundedSender<String>,
    pub inbound: mpsc::UnboundedReceiver<LinkEvent>,
}

/// Factory for signaling connections, injected into the controller.
#[async_trait]
pub trait SignalingConnector: Send + Sync {
    async fn open(&self, url: &Url) -> Result<SignalingLink, SignalingError>;
}
