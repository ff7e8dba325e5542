use crate::config::ConnectRequest;
use crate::controller::event::{SessionEvent, SessionEventKind};
use crate::controller::session_loop::ControllerLoop;
use crate::transport::InboundVideoReport;
use std::time::Duration;
use streamview_core::{SessionStatus, StatsSample, TransportKind};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Handles of the controller's periodic and one-shot timers.
#[derive(Default)]
pub(crate) struct Timers {
    stats: Option<JoinHandle<()>>,
    viewer_count: Option<JoinHandle<()>>,
    reconnect: Option<(JoinHandle<()>, ConnectRequest)>,
}

impl Timers {
    /// Aborts every timer. Returns whether a reconnect was pending.
    pub fn cancel_all(&mut self) -> bool {
        self.cancel_stats();
        if let Some(handle) = self.viewer_count.take() {
            handle.abort();
        }
        match self.reconnect.take() {
            Some((handle, _)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_stats(&mut self) {
        if let Some(handle) = self.stats.take() {
            handle.abort();
        }
    }

    pub fn stats_running(&self) -> bool {
        self.stats.is_some()
    }

    fn take_reconnect(&mut self) -> Option<ConnectRequest> {
        self.reconnect.take().map(|(_, request)| request)
    }
}

impl ControllerLoop {
    pub(super) fn schedule_reconnect(&mut self, request: ConnectRequest, delay: Duration) {
        let tx = self.event_tx.clone();
        let generation = self.generation;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx
                .send(SessionEvent::new(generation, SessionEventKind::ReconnectDue))
                .await;
        });

        if let Some((previous, _)) = self.timers.reconnect.replace((handle, request)) {
            previous.abort();
        }
    }

    pub(super) async fn on_reconnect_due(&mut self) {
        let Some(request) = self.timers.take_reconnect() else {
            return;
        };
        if self.status != SessionStatus::Disconnected {
            debug!("Reconnect skipped, status is {}", self.status);
            return;
        }

        self.logbook.info("Attempting automatic reconnect");
        if let Err(e) = self.connect(request).await {
            self.logbook.error(format!("Automatic reconnect failed: {e}"));
        }
    }

    /// Starts sampling inbound video counters. Peer-to-peer only.
    pub(super) fn start_stats_sampler(&mut self) {
        if self.timers.stats_running() || self.transport != Some(TransportKind::PeerToPeer) {
            return;
        }
        let Some(peer) = self.session.as_ref().and_then(|s| s.peer.clone()) else {
            return;
        };

        let tx = self.event_tx.clone();
        let generation = self.generation;
        let period = self.config.stats_interval();

        self.sampler.reset();
        self.timers.stats = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let report = peer.inbound_video_report().await;
                if tx
                    .send(SessionEvent::new(
                        generation,
                        SessionEventKind::StatsReport(report),
                    ))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        }));
    }

    pub(super) fn start_viewer_count_timer(&mut self) {
        if self.timers.viewer_count.is_some() {
            return;
        }
        let Some(source) = self.collaborators.stream_info.clone() else {
            return;
        };
        let Some(request) = self.session.as_ref().map(|s| s.request.clone()) else {
            return;
        };

        let tx = self.event_tx.clone();
        let generation = self.generation;
        let period = self.config.viewer_count_interval();

        self.timers.viewer_count = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let result = source
                    .stream_stats(&request.server_endpoint, &request.stream_key)
                    .await
                    .map(|stats| stats.viewer_count)
                    .map_err(|e| e.to_string());
                if tx
                    .send(SessionEvent::new(
                        generation,
                        SessionEventKind::ViewerCount(result),
                    ))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        }));
    }

    pub(super) fn on_stats_report(&mut self, report: Option<InboundVideoReport>) {
        if self.status != SessionStatus::Connected {
            return;
        }
        let Some(report) = report else {
            debug!("No inbound video report yet");
            return;
        };

        let sample = StatsSample::new(report.bytes_received, report.timestamp_ms);
        self.stats.bitrate_kbps = self.sampler.sample(sample);
        self.stats.latency_ms = report
            .round_trip_ms
            .filter(|ms| *ms > 0.0)
            .map(|ms| ms.round() as u32);
        self.publish();
    }

    pub(super) fn on_viewer_count(&mut self, result: Result<u32, String>) {
        match result {
            Ok(count) => {
                self.stats.viewer_count = Some(count);
                self.publish();
            }
            Err(e) => debug!("Viewer count unavailable: {}", e),
        }
    }
}
