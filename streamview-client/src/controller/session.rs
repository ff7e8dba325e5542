use crate::config::ConnectRequest;
use crate::signaling::SignalingChannel;
use crate::transport::{PeerTransport, SegmentedPlayback};
use std::sync::Arc;
use streamview_core::SessionId;
use tokio::task::JoinHandle;

/// Resources of the live session. Owned only by the controller loop.
pub(crate) struct ActiveSession {
    pub id: SessionId,
    pub generation: u64,
    pub request: ConnectRequest,
    pub signaling: Option<SignalingChannel>,
    pub peer: Option<Arc<dyn PeerTransport>>,
    pub segmented: Option<SegmentedPlayback>,
    /// Id of the remote stream bound to the surface, if any.
    pub bound_stream: Option<String>,
    /// Signaling opener and event pumps; aborted on teardown.
    pub tasks: Vec<JoinHandle<()>>,
}

impl ActiveSession {
    pub fn new(generation: u64, request: ConnectRequest) -> Self {
        Self {
            id: SessionId::new(),
            generation,
            request,
            signaling: None,
            peer: None,
            segmented: None,
            bound_stream: None,
            tasks: Vec::new(),
        }
    }
}
