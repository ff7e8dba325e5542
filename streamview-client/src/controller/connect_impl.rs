use crate::config::ConnectRequest;
use crate::controller::CONNECTING_OVERLAY;
use crate::controller::event::{SessionEvent, SessionEventKind};
use crate::controller::session::ActiveSession;
use crate::controller::session_loop::ControllerLoop;
use crate::error::{ViewerError, ViewerResult};
use crate::transport::{SegmentedPlayback, attach_segmented, manifest_url, signaling_url};
use streamview_core::{SessionStatus, TransportKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

impl ControllerLoop {
    /// Validates `request`, replaces the current session and starts the
    /// selected transport. Strategy failures are not returned; they move the
    /// status to Disconnected and are logged.
    pub(super) async fn connect(&mut self, request: ConnectRequest) -> ViewerResult<()> {
        let request = match request.validated() {
            Ok(request) => request,
            Err(e) => {
                self.logbook.error(e.to_string());
                return Err(e);
            }
        };

        if self.status == SessionStatus::Connecting {
            debug!("Connect rejected, an attempt is already in progress");
            return Err(ViewerError::ConnectInProgress);
        }

        self.timers.cancel_all();
        self.release_session().await;

        self.generation += 1;
        self.session = Some(ActiveSession::new(self.generation, request.clone()));
        self.status = SessionStatus::Connecting;
        self.transport = Some(request.transport);
        self.set_overlay(Some(CONNECTING_OVERLAY.to_string()));
        self.publish();

        self.logbook.info(format!(
            "Connecting to stream '{}' at {} via {}",
            request.stream_key, request.server_endpoint, request.transport
        ));

        match request.transport {
            TransportKind::PeerToPeer => self.open_signaling(&request).await,
            TransportKind::SegmentedPull => self.start_segmented(&request).await,
        }

        Ok(())
    }

    /// Starts the signaling connect in the background; the outcome arrives as
    /// `SignalingOpened`.
    async fn open_signaling(&mut self, request: &ConnectRequest) {
        let url = match signaling_url(&request.server_endpoint) {
            Ok(url) => url,
            Err(e) => {
                self.fail_setup(ViewerError::Setup(format!("invalid signaling endpoint: {e}")))
                    .await;
                return;
            }
        };

        info!("Opening signaling channel {}", url);
        let connector = self.collaborators.signaling.clone();
        let tx = self.event_tx.clone();
        let generation = self.generation;

        let task = tokio::spawn(async move {
            let result = connector.open(&url).await;
            let _ = tx
                .send(SessionEvent::new(
                    generation,
                    SessionEventKind::SignalingOpened(url, result),
                ))
                .await;
        });

        if let Some(session) = self.session.as_mut() {
            session.tasks.push(task);
        }
    }

    async fn start_segmented(&mut self, request: &ConnectRequest) {
        let manifest = match manifest_url(&request.server_endpoint, &request.stream_key) {
            Ok(url) => url,
            Err(e) => {
                self.fail_setup(ViewerError::Setup(format!("invalid manifest endpoint: {e}")))
                    .await;
                return;
            }
        };

        let (engine_tx, engine_rx) = mpsc::channel(64);
        let attached = attach_segmented(
            manifest,
            &self.collaborators.surface,
            self.collaborators.segment_engines.as_ref(),
            engine_tx,
        );

        match attached {
            Ok(playback) => {
                let native = matches!(playback, SegmentedPlayback::Native);
                let pump = self.spawn_pump(engine_rx, SessionEventKind::Engine);
                if let Some(session) = self.session.as_mut() {
                    session.segmented = Some(playback);
                    session.tasks.push(pump);
                }

                if native {
                    self.mark_connected();
                }
            }
            Err(e) => self.fail_setup(e.into()).await,
        }
    }

    /// Marks the session Connected. No-op unless it is currently Connecting.
    pub(super) fn mark_connected(&mut self) {
        if self.status != SessionStatus::Connecting {
            return;
        }

        self.status = SessionStatus::Connected;
        self.set_overlay(None);
        self.logbook.info("Connected");
        self.start_viewer_count_timer();
        self.publish();
    }

    /// Forwards every message from `rx` into the loop under the current
    /// generation until either side goes away.
    pub(super) fn spawn_pump<T: Send + 'static>(
        &self,
        mut rx: mpsc::Receiver<T>,
        wrap: fn(T) -> SessionEventKind,
    ) -> tokio::task::JoinHandle<()> {
        let tx = self.event_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            while let Some(item) = rx.recv().await {
                if tx
                    .send(SessionEvent::new(generation, wrap(item)))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        })
    }
}
