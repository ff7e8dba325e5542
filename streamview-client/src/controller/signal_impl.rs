use crate::controller::event::{SessionEvent, SessionEventKind};
use crate::controller::session_loop::ControllerLoop;
use crate::error::{SignalingError, TransportError, ViewerError};
use crate::signaling::{
    Inbound, LinkEvent, RemoteCandidate, SignalingChannel, SignalingLink, decode_frame,
};
use streamview_core::{SessionStatus, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

impl ControllerLoop {
    pub(super) async fn on_signaling_opened(
        &mut self,
        url: Url,
        result: Result<SignalingLink, SignalingError>,
    ) {
        if self.status != SessionStatus::Connecting {
            debug!("Signaling opened after the attempt ended, dropping it");
            return;
        }

        let link = match result {
            Ok(link) => link,
            Err(e) => {
                self.logbook.error(ViewerError::Signaling(e).to_string());
                self.end_session().await;
                return;
            }
        };

        self.logbook.info(format!("Signaling connected to {url}"));
        let pump = self.spawn_link_pump(link.inbound);
        if let Some(session) = self.session.as_mut() {
            session.signaling = Some(SignalingChannel::new(url, link.outbound));
            session.tasks.push(pump);
        }

        if let Err(e) = self.start_negotiation().await {
            self.fail_setup(e.into()).await;
        }
    }

    /// Creates the peer session, subscribes to it and sends the offer.
    async fn start_negotiation(&mut self) -> Result<(), TransportError> {
        let (peer_tx, peer_rx) = mpsc::channel(256);
        let peer = self
            .collaborators
            .peers
            .create(&self.config.ice_servers, peer_tx)
            .await?;

        let pump = self.spawn_pump(peer_rx, SessionEventKind::Peer);
        let Some(session) = self.session.as_mut() else {
            pump.abort();
            let _ = peer.close().await;
            return Err(TransportError::Closed);
        };
        session.peer = Some(peer.clone());
        session.tasks.push(pump);
        let stream_key = session.request.stream_key.clone();

        let sdp = peer.create_offer().await?;
        info!("Sending offer for stream '{}'", stream_key);
        self.send_signal(&SignalMessage::Offer { stream_key, sdp });
        Ok(())
    }

    pub(super) fn send_signal(&self, msg: &SignalMessage) {
        let Some(channel) = self.session.as_ref().and_then(|s| s.signaling.as_ref()) else {
            debug!("No signaling channel, dropping {}", msg.tag());
            return;
        };
        channel.send(msg);
    }

    fn spawn_link_pump(
        &self,
        mut inbound: mpsc::UnboundedReceiver<LinkEvent>,
    ) -> tokio::task::JoinHandle<()> {
        let tx = self.event_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            while let Some(event) = inbound.recv().await {
                let closed = event == LinkEvent::Closed;
                if tx
                    .send(SessionEvent::new(generation, SessionEventKind::Link(event)))
                    .await
                    .is_err()
                    || closed
                {
                    break;
                }
            }
        })
    }

    pub(super) async fn on_link_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Text(raw) => match decode_frame(&raw) {
                Inbound::Message(msg) => self.dispatch_signal(msg).await,
                Inbound::Unrecognized { reason, .. } => {
                    self.logbook
                        .warn(format!("Ignoring unrecognized signaling frame: {reason}"));
                }
            },

            LinkEvent::Binary(len) => {
                self.logbook
                    .warn(format!("Ignoring binary signaling frame ({len} bytes)"));
            }

            LinkEvent::Error(e) => {
                let error = ViewerError::Signaling(SignalingError::Channel(e));
                self.logbook.error(error.to_string());
            }

            LinkEvent::Closed => self.on_signaling_closed().await,
        }
    }

    async fn dispatch_signal(&mut self, msg: SignalMessage) {
        match msg {
            SignalMessage::Answer { sdp } => {
                let Some(peer) = self.session.as_ref().and_then(|s| s.peer.clone()) else {
                    warn!("Answer received without a peer session");
                    return;
                };
                info!("Received answer from server");
                if let Err(e) = peer.apply_answer(sdp).await {
                    let error = ViewerError::Setup(format!("failed to apply answer: {e}"));
                    if self.status == SessionStatus::Connecting {
                        self.fail_setup(error).await;
                    } else {
                        self.logbook.error(error.to_string());
                    }
                }
            }

            SignalMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_mline_index,
            } => {
                let Some(peer) = self.session.as_ref().and_then(|s| s.peer.clone()) else {
                    warn!("ICE candidate received without a peer session");
                    return;
                };
                let candidate = RemoteCandidate::from_signal(candidate, sdp_mid, sdp_mline_index);
                if let Err(e) = peer.add_remote_candidate(candidate).await {
                    self.logbook
                        .warn(format!("Failed to add remote ICE candidate: {e}"));
                }
            }

            SignalMessage::Error { message } => {
                self.logbook.error(format!("Server error: {message}"));
            }

            SignalMessage::Offer { .. } => {
                self.logbook
                    .warn("Ignoring offer from server; viewers only send offers");
            }
        }
    }

    /// The signaling connection went away. Ends the session without retrying.
    async fn on_signaling_closed(&mut self) {
        if let Some(channel) = self.session.as_mut().and_then(|s| s.signaling.as_mut()) {
            channel.mark_closed();
        }

        self.logbook
            .warn(ViewerError::Signaling(SignalingError::Closed).to_string());

        if matches!(
            self.status,
            SessionStatus::Connecting | SessionStatus::Connected
        ) {
            self.end_session().await;
        }
    }
}
