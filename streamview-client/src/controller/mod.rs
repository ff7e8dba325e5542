//! Connection controller: the single owner of the viewing session.
//!
//! [`ViewerController`] is a cloneable handle. Every operation is sent to one
//! loop task that owns the session, its transports and the timers, so state
//! transitions are processed strictly one at a time.

use crate::config::{ConnectRequest, ViewerConfig};
use crate::error::{EngineError, ViewerError, ViewerResult};
use crate::logbook::{LogBook, LogEntry, LogSink};
use crate::presentation::{PlaybackEvent, PresentationSurface};
use crate::signaling::{SignalingConnector, WsConnector};
use crate::stats::{HttpStreamInfo, StreamInfoSource};
use crate::transport::{HlsPullEngineFactory, PeerConnector, RtcPeerConnector, SegmentEngineFactory};
use std::sync::Arc;
use streamview_core::{DerivedStats, SessionStatus, TransportKind};
use tokio::sync::{mpsc, oneshot, watch};

mod command;
mod connect_impl;
mod event;
mod peer_events_impl;
mod session;
mod session_loop;
mod signal_impl;
mod teardown_impl;
mod timers_impl;

use command::ControllerCommand;
use session_loop::ControllerLoop;

pub const CONNECTING_OVERLAY: &str = "Connecting...";
pub const DISCONNECTED_OVERLAY: &str = "Disconnected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffordanceAction {
    Connect,
    Disconnect,
}

/// State of the connect/disconnect control shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordance {
    pub action: AffordanceAction,
    pub enabled: bool,
}

impl Affordance {
    pub fn for_status(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Connecting => Self {
                action: AffordanceAction::Connect,
                enabled: false,
            },
            SessionStatus::Connected => Self {
                action: AffordanceAction::Disconnect,
                enabled: true,
            },
            SessionStatus::Idle | SessionStatus::Disconnected => Self {
                action: AffordanceAction::Connect,
                enabled: true,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match (self.action, self.enabled) {
            (AffordanceAction::Connect, false) => "Connecting...",
            (AffordanceAction::Connect, true) => "Connect",
            (AffordanceAction::Disconnect, _) => "Disconnect",
        }
    }
}

/// Everything a caller can observe about the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub status: SessionStatus,
    pub transport: Option<TransportKind>,
    pub affordance: Affordance,
    pub stats: DerivedStats,
    pub overlay: Option<String>,
    pub generation: u64,
}

impl Default for ControllerSnapshot {
    fn default() -> Self {
        Self {
            status: SessionStatus::Idle,
            transport: None,
            affordance: Affordance::for_status(SessionStatus::Idle),
            stats: DerivedStats::default(),
            overlay: None,
            generation: 0,
        }
    }
}

/// External components the controller drives.
#[derive(Clone)]
pub struct Collaborators {
    pub surface: Arc<dyn PresentationSurface>,
    pub signaling: Arc<dyn SignalingConnector>,
    pub peers: Arc<dyn PeerConnector>,
    pub segment_engines: Option<Arc<dyn SegmentEngineFactory>>,
    pub stream_info: Option<Arc<dyn StreamInfoSource>>,
    pub log_sink: Option<Arc<dyn LogSink>>,
}

impl Collaborators {
    pub fn new(
        surface: Arc<dyn PresentationSurface>,
        signaling: Arc<dyn SignalingConnector>,
        peers: Arc<dyn PeerConnector>,
    ) -> Self {
        Self {
            surface,
            signaling,
            peers,
            segment_engines: None,
            stream_info: None,
            log_sink: None,
        }
    }

    /// WebSocket signaling, webrtc-rs peers, the HLS pull engine and the HTTP
    /// stream API.
    pub fn production(
        surface: Arc<dyn PresentationSurface>,
        config: &ViewerConfig,
    ) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;
        let engines = HlsPullEngineFactory::with_client(client.clone());
        let stream_info = HttpStreamInfo::with_client(client);

        Ok(Self::new(surface, Arc::new(WsConnector::new()), Arc::new(RtcPeerConnector))
            .with_segment_engines(Arc::new(engines))
            .with_stream_info(Arc::new(stream_info)))
    }

    pub fn with_segment_engines(mut self, factory: Arc<dyn SegmentEngineFactory>) -> Self {
        self.segment_engines = Some(factory);
        self
    }

    pub fn with_stream_info(mut self, source: Arc<dyn StreamInfoSource>) -> Self {
        self.stream_info = Some(source);
        self
    }

    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }
}

/// Handle to a running controller loop.
#[derive(Clone)]
pub struct ViewerController {
    command_tx: mpsc::Sender<ControllerCommand>,
    snapshot_rx: watch::Receiver<ControllerSnapshot>,
    logbook: LogBook,
}

impl ViewerController {
    /// Spawns the controller loop on the current tokio runtime.
    pub fn spawn(config: ViewerConfig, collaborators: Collaborators) -> Self {
        let mut logbook = LogBook::new(config.log_capacity);
        if let Some(sink) = collaborators.log_sink.clone() {
            logbook = logbook.with_sink(sink);
        }

        let (command_tx, command_rx) = mpsc::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(ControllerSnapshot::default());

        let controller_loop =
            ControllerLoop::new(config, collaborators, logbook.clone(), command_rx, snapshot_tx);
        tokio::spawn(controller_loop.run());

        Self {
            command_tx,
            snapshot_rx,
            logbook,
        }
    }

    /// Disconnects a Connecting or Connected session, otherwise connects with
    /// the configured request.
    pub async fn toggle_connection(&self) -> ViewerResult<()> {
        self.request(|reply| ControllerCommand::Toggle { reply }).await?
    }

    pub async fn connect(&self, request: ConnectRequest) -> ViewerResult<()> {
        self.request(|reply| ControllerCommand::Connect { request, reply })
            .await?
    }

    /// Idempotent. Returns once the session has been released.
    pub async fn disconnect(&self) -> ViewerResult<()> {
        self.request(|reply| ControllerCommand::Disconnect { reply })
            .await
    }

    /// Forwards a presentation-surface observation. Only the overlay reacts.
    pub async fn report_playback(&self, event: PlaybackEvent) -> ViewerResult<()> {
        self.command_tx
            .send(ControllerCommand::Playback(event))
            .await
            .map_err(|_| ViewerError::ControllerClosed)
    }

    /// Disconnects and stops the loop. Later calls fail with `ControllerClosed`.
    pub async fn shutdown(&self) -> ViewerResult<()> {
        self.request(|reply| ControllerCommand::Shutdown { reply })
            .await
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.snapshot_rx.borrow().status
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.logbook.entries()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ControllerCommand,
    ) -> ViewerResult<T> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(build(reply))
            .await
            .map_err(|_| ViewerError::ControllerClosed)?;
        rx.await.map_err(|_| ViewerError::ControllerClosed)
    }
}
