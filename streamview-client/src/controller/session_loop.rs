use crate::config::ViewerConfig;
use crate::controller::command::ControllerCommand;
use crate::controller::event::{SessionEvent, SessionEventKind};
use crate::controller::session::ActiveSession;
use crate::controller::timers_impl::Timers;
use crate::controller::{Affordance, Collaborators, ControllerSnapshot};
use crate::error::ViewerError;
use crate::logbook::LogBook;
use crate::presentation::PlaybackEvent;
use crate::stats::StatsSampler;
use streamview_core::{DerivedStats, SessionStatus, TransportKind};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

pub(crate) struct ControllerLoop {
    pub(super) config: ViewerConfig,
    pub(super) collaborators: Collaborators,
    pub(super) logbook: LogBook,
    command_rx: mpsc::Receiver<ControllerCommand>,
    event_rx: mpsc::Receiver<SessionEvent>,
    pub(super) event_tx: mpsc::Sender<SessionEvent>,
    snapshot_tx: watch::Sender<ControllerSnapshot>,

    pub(super) status: SessionStatus,
    pub(super) transport: Option<TransportKind>,
    pub(super) generation: u64,
    pub(super) session: Option<ActiveSession>,
    pub(super) sampler: StatsSampler,
    pub(super) stats: DerivedStats,
    pub(super) overlay: Option<String>,
    pub(super) timers: Timers,
}

impl ControllerLoop {
    pub fn new(
        config: ViewerConfig,
        collaborators: Collaborators,
        logbook: LogBook,
        command_rx: mpsc::Receiver<ControllerCommand>,
        snapshot_tx: watch::Sender<ControllerSnapshot>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(256);

        Self {
            config,
            collaborators,
            logbook,
            command_rx,
            event_rx,
            event_tx,
            snapshot_tx,
            status: SessionStatus::Idle,
            transport: None,
            generation: 0,
            session: None,
            sampler: StatsSampler::new(),
            stats: DerivedStats::default(),
            overlay: None,
            timers: Timers::default(),
        }
    }

    pub async fn run(mut self) {
        info!("Viewer controller loop started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(ControllerCommand::Shutdown { reply }) => {
                            self.disconnect().await;
                            let _ = reply.send(());
                            break;
                        }
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("All controller handles dropped. Shutting down.");
                            self.disconnect().await;
                            break;
                        }
                    }
                }

                // The loop keeps its own sender, so this branch never sees `None`.
                Some(evt) = self.event_rx.recv() => {
                    self.handle_event(evt).await;
                }
            }
        }

        info!("Viewer controller loop finished");
    }

    async fn handle_command(&mut self, cmd: ControllerCommand) {
        match cmd {
            ControllerCommand::Toggle { reply } => {
                let result = if self.status.is_restartable() {
                    let request = self.config.connect_request();
                    self.connect(request).await
                } else {
                    self.disconnect().await;
                    Ok(())
                };
                let _ = reply.send(result);
            }

            ControllerCommand::Connect { request, reply } => {
                let result = self.connect(request).await;
                let _ = reply.send(result);
            }

            ControllerCommand::Disconnect { reply } => {
                self.disconnect().await;
                let _ = reply.send(());
            }

            ControllerCommand::Playback(event) => self.handle_playback(event),

            // Handled in `run` because it ends the loop.
            ControllerCommand::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    async fn handle_event(&mut self, event: SessionEvent) {
        if event.generation != self.generation {
            debug!(
                "Dropping event from generation {} (current {})",
                event.generation, self.generation
            );
            return;
        }

        match event.kind {
            SessionEventKind::SignalingOpened(url, result) => {
                self.on_signaling_opened(url, result).await
            }
            SessionEventKind::Link(link_event) => self.on_link_event(link_event).await,
            SessionEventKind::Peer(peer_event) => self.on_peer_event(peer_event).await,
            SessionEventKind::Engine(engine_event) => self.on_engine_event(engine_event).await,
            SessionEventKind::StatsReport(report) => self.on_stats_report(report),
            SessionEventKind::ViewerCount(result) => self.on_viewer_count(result),
            SessionEventKind::ReconnectDue => self.on_reconnect_due().await,
        }
    }

    fn handle_playback(&mut self, event: PlaybackEvent) {
        if let PlaybackEvent::Error(message) = &event {
            self.logbook
                .error(ViewerError::Playback(message.clone()).to_string());
        }
        self.set_overlay(event.overlay_text());
        self.publish();
    }

    pub(super) fn set_overlay(&mut self, overlay: Option<String>) {
        self.collaborators.surface.set_overlay(overlay.as_deref());
        self.overlay = overlay;
    }

    /// Pushes the current state to every `subscribe()` receiver.
    pub(super) fn publish(&self) {
        let snapshot = ControllerSnapshot {
            status: self.status,
            transport: self.transport,
            affordance: Affordance::for_status(self.status),
            stats: self.stats,
            overlay: self.overlay.clone(),
            generation: self.generation,
        };
        self.snapshot_tx.send_replace(snapshot);
    }
}
