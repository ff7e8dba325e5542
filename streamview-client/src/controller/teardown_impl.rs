use crate::controller::DISCONNECTED_OVERLAY;
use crate::controller::session_loop::ControllerLoop;
use crate::error::ViewerError;
use crate::transport::PeerState;
use streamview_core::{DerivedStats, SessionStatus};
use tracing::{debug, info, warn};

impl ControllerLoop {
    /// Explicit disconnect. Always cancels the timers, including a pending
    /// reconnect; releases and logs only when a session is live.
    pub(super) async fn disconnect(&mut self) {
        let reconnect_pending = self.timers.cancel_all();

        // Invalidate anything already queued for the old generation.
        self.generation += 1;

        if !self.release_session().await {
            if reconnect_pending {
                debug!("Disconnect cancelled a pending reconnect");
            }
            if self.status != SessionStatus::Idle {
                self.status = SessionStatus::Disconnected;
            }
            self.publish();
            return;
        }

        self.status = SessionStatus::Disconnected;
        self.set_overlay(Some(DISCONNECTED_OVERLAY.to_string()));
        self.logbook.info("Disconnected");
        self.publish();
    }

    /// Aborts a Connecting session after a bootstrap error.
    pub(super) async fn fail_setup(&mut self, error: ViewerError) {
        self.logbook.error(error.to_string());
        self.end_session().await;
    }

    /// A Connected peer transport reported `failed` or `disconnected`: tear the
    /// session down and schedule one reconnect under the current generation.
    pub(super) async fn transport_failure(&mut self, state: PeerState) {
        let error = ViewerError::Transport(format!("peer connection {state:?}"));
        self.logbook.error(error.to_string());

        let request = self.session.as_ref().map(|s| s.request.clone());
        self.end_session().await;

        if let Some(request) = request {
            let delay = self.config.reconnect_delay();
            self.logbook.info(format!(
                "Reconnecting in {} ms",
                delay.as_millis()
            ));
            self.schedule_reconnect(request, delay);
        }
    }

    /// Releases the session after a failure and settles on Disconnected.
    pub(super) async fn end_session(&mut self) {
        self.timers.cancel_all();
        self.release_session().await;
        self.status = SessionStatus::Disconnected;
        self.set_overlay(Some(DISCONNECTED_OVERLAY.to_string()));
        self.publish();
    }

    /// Releases every resource of the live session. Returns `false` when there
    /// was none.
    pub(super) async fn release_session(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };

        info!(
            "Releasing session {} (generation {})",
            session.id, session.generation
        );

        for task in session.tasks.drain(..) {
            task.abort();
        }

        self.timers.cancel_stats();
        self.sampler.reset();
        self.stats = DerivedStats::default();

        if let Some(playback) = session.segmented.take() {
            playback.stop();
        }

        if let Some(peer) = session.peer.take() {
            if let Err(e) = peer.close().await {
                warn!("Failed to close peer connection: {}", e);
            }
        }

        if let Some(mut signaling) = session.signaling.take() {
            if signaling.close() {
                debug!("Signaling channel to {} closed", signaling.url());
            }
        }

        self.collaborators.surface.clear_source();
        true
    }
}
