use crate::controller::session_loop::ControllerLoop;
use crate::error::ViewerError;
use crate::presentation::MediaSource;
use crate::transport::{EngineEvent, PeerEvent, PeerState};
use streamview_core::{SessionStatus, SignalMessage};
use tracing::{debug, info};

impl ControllerLoop {
    pub(super) async fn on_peer_event(&mut self, event: PeerEvent) {
        match event {
            PeerEvent::Track(stream) => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                match session.bound_stream.as_deref() {
                    None => {
                        info!("Binding remote stream {} to the surface", stream.stream_id);
                        session.bound_stream = Some(stream.stream_id.clone());
                        self.collaborators
                            .surface
                            .set_source(MediaSource::Remote(stream));
                    }
                    Some(bound) if bound == stream.stream_id => {
                        debug!("Adding {:?} track {} to {}", stream.kind, stream.track_id, bound);
                        self.collaborators.surface.add_track(stream);
                    }
                    Some(bound) => {
                        debug!(
                            "Ignoring track {} of stream {}, {} is bound",
                            stream.track_id, stream.stream_id, bound
                        );
                    }
                }
                self.mark_connected();
            }

            PeerEvent::LocalCandidate {
                candidate,
                sdp_mid,
                sdp_mline_index,
            } => {
                self.send_signal(&SignalMessage::IceCandidate {
                    candidate,
                    sdp_mid,
                    sdp_mline_index,
                });
            }

            PeerEvent::StateChanged(state) => self.on_peer_state(state).await,
        }
    }

    async fn on_peer_state(&mut self, state: PeerState) {
        match state {
            PeerState::Connected => {
                self.mark_connected();
                self.start_stats_sampler();
            }

            PeerState::Failed | PeerState::Disconnected => match self.status {
                SessionStatus::Connected => self.transport_failure(state).await,
                SessionStatus::Connecting => {
                    let error = ViewerError::Setup(format!("peer connection {state:?} during setup"));
                    self.fail_setup(error).await;
                }
                _ => debug!("Peer state {:?} with no live session", state),
            },

            other => debug!("Peer state {:?}", other),
        }
    }

    pub(super) async fn on_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::ManifestParsed { segments, live } => {
                info!("Manifest parsed ({} segments, live={})", segments, live);
                self.mark_connected();
            }

            // Before the first manifest there is nothing to play yet.
            EngineEvent::Error(message) if self.status == SessionStatus::Connecting => {
                let error = ViewerError::Setup(format!("manifest unavailable: {message}"));
                self.fail_setup(error).await;
            }

            EngineEvent::Error(message) => {
                self.logbook.warn(format!("Segment engine error: {message}"));
            }

            EngineEvent::Ended => {
                self.logbook.info("Stream playlist ended");
            }
        }
    }
}
