use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use streamview_client::error::TransportError;
use streamview_client::signaling::RemoteCandidate;
use streamview_client::transport::{
    InboundVideoReport, PeerConnector, PeerEvent, PeerState, PeerTransport,
};
use streamview_client::{MediaKind, RemoteStream};
use streamview_core::IceServerConfig;
use tokio::sync::mpsc;

pub const MOCK_OFFER_SDP: &str = "v=0\r\nm=video 9 UDP/TLS/RTP/SAVPF 96\r\na=recvonly\r\n";

/// Recorded state of one mock peer session.
#[derive(Default)]
pub struct MockPeerState {
    pub answers: Mutex<Vec<String>>,
    pub candidates: Mutex<Vec<RemoteCandidate>>,
    pub closes: AtomicUsize,
    pub report: Mutex<Option<InboundVideoReport>>,
    pub fail_offer: AtomicBool,
}

pub struct MockPeer {
    state: Arc<MockPeerState>,
}

#[async_trait]
impl PeerTransport for MockPeer {
    async fn create_offer(&self) -> Result<String, TransportError> {
        if self.state.fail_offer.load(Ordering::SeqCst) {
            return Err(TransportError::Candidate("offer failed".to_string()));
        }
        Ok(MOCK_OFFER_SDP.to_string())
    }

    async fn apply_answer(&self, sdp: String) -> Result<(), TransportError> {
        self.state.answers.lock().unwrap().push(sdp);
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: RemoteCandidate) -> Result<(), TransportError> {
        self.state.candidates.lock().unwrap().push(candidate);
        Ok(())
    }

    async fn inbound_video_report(&self) -> Option<InboundVideoReport> {
        *self.state.report.lock().unwrap()
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Test-side handle of a peer session the controller created.
pub struct PeerHandle {
    pub state: Arc<MockPeerState>,
    pub events: mpsc::Sender<PeerEvent>,
    pub ice_servers: Vec<IceServerConfig>,
}

impl PeerHandle {
    pub async fn emit(&self, event: PeerEvent) {
        // The controller drops the receiver once the session is released.
        let _ = self.events.send(event).await;
    }

    pub async fn set_state(&self, state: PeerState) {
        self.emit(PeerEvent::StateChanged(state)).await;
    }

    pub async fn deliver_track(&self, stream_id: &str, kind: MediaKind) {
        let stream = RemoteStream::detached(stream_id, format!("{stream_id}-{kind:?}"), kind);
        self.emit(PeerEvent::Track(stream)).await;
    }

    pub fn set_report(&self, bytes_received: u64, timestamp_ms: f64, round_trip_ms: Option<f64>) {
        *self.state.report.lock().unwrap() = Some(InboundVideoReport {
            bytes_received,
            timestamp_ms,
            round_trip_ms,
        });
    }

    pub fn close_count(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct MockPeerConnector {
    handles_tx: mpsc::UnboundedSender<PeerHandle>,
    fail_create: Arc<AtomicBool>,
    fail_offer: Arc<AtomicBool>,
}

impl MockPeerConnector {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PeerHandle>) {
        let (handles_tx, handles_rx) = mpsc::unbounded_channel();
        let connector = Self {
            handles_tx,
            fail_create: Arc::new(AtomicBool::new(false)),
            fail_offer: Arc::new(AtomicBool::new(false)),
        };
        (connector, handles_rx)
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_offer(&self, fail: bool) {
        self.fail_offer.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PeerConnector for MockPeerConnector {
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        events: mpsc::Sender<PeerEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }

        let state = Arc::new(MockPeerState::default());
        state
            .fail_offer
            .store(self.fail_offer.load(Ordering::SeqCst), Ordering::SeqCst);

        let _ = self.handles_tx.send(PeerHandle {
            state: state.clone(),
            events,
            ice_servers: ice_servers.to_vec(),
        });

        Ok(Arc::new(MockPeer { state }))
    }
}
