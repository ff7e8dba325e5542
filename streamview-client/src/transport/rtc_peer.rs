use crate::error::TransportError;
use crate::presentation::{MediaKind, RemoteStream};
use crate::signaling::RemoteCandidate;
use crate::transport::peer::{InboundVideoReport, PeerConnector, PeerEvent, PeerState, PeerTransport};
use async_trait::async_trait;
use std::sync::Arc;
use streamview_core::IceServerConfig;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::stats::StatsReportType;
use webrtc::track::track_remote::TrackRemote;

fn rtc_ice_servers(servers: &[IceServerConfig]) -> Vec<RTCIceServer> {
    servers
        .iter()
        .map(|s| RTCIceServer {
            urls: s.urls.clone(),
            credential: s.credential.clone().unwrap_or_default(),
            username: s.username.clone().unwrap_or_default(),
        })
        .collect()
}

fn peer_state(s: RTCPeerConnectionState) -> PeerState {
    match s {
        RTCPeerConnectionState::Connecting => PeerState::Connecting,
        RTCPeerConnectionState::Connected => PeerState::Connected,
        RTCPeerConnectionState::Disconnected => PeerState::Disconnected,
        RTCPeerConnectionState::Failed => PeerState::Failed,
        RTCPeerConnectionState::Closed => PeerState::Closed,
        _ => PeerState::New,
    }
}

/// Creates [`RtcPeerTransport`] sessions.
#[derive(Debug, Default, Clone)]
pub struct RtcPeerConnector;

#[async_trait]
impl PeerConnector for RtcPeerConnector {
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        events: mpsc::Sender<PeerEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError> {
        let transport = RtcPeerTransport::new(ice_servers, events).await?;
        Ok(Arc::new(transport))
    }
}

/// Receive-only WebRTC session backed by webrtc-rs.
pub struct RtcPeerTransport {
    peer_connection: Arc<RTCPeerConnection>,
    epoch: Instant,
}

impl RtcPeerTransport {
    /// Builds the peer connection, registers audio and video receivers and
    /// wires its callbacks into `event_tx`.
    pub async fn new(
        ice_servers: &[IceServerConfig],
        event_tx: mpsc::Sender<PeerEvent>,
    ) -> Result<Self, TransportError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: rtc_ice_servers(ice_servers),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        for kind in [RTPCodecType::Video, RTPCodecType::Audio] {
            peer_connection
                .add_transceiver_from_kind(
                    kind,
                    Some(RTCRtpTransceiverInit {
                        direction: RTCRtpTransceiverDirection::Recvonly,
                        send_encodings: vec![],
                    }),
                )
                .await?;
        }

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    info!("Peer connection state changed: {}", s);
                    let _ = tx.send(PeerEvent::StateChanged(peer_state(s))).await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx
                    .send(PeerEvent::LocalCandidate {
                        candidate: init.candidate,
                        sdp_mid: init.sdp_mid,
                        sdp_mline_index: init.sdp_mline_index,
                    })
                    .await;
            })
        }));

        let track_tx = event_tx;
        peer_connection.on_track(Box::new(move |track: Arc<TrackRemote>, _, _| {
            let tx = track_tx.clone();
            Box::pin(async move {
                let kind = match track.kind() {
                    RTPCodecType::Audio => MediaKind::Audio,
                    RTPCodecType::Video => MediaKind::Video,
                    other => {
                        debug!("Ignoring track of kind {}", other);
                        return;
                    }
                };
                debug!("Remote {:?} track {} arrived", kind, track.id());
                let _ = tx.send(PeerEvent::Track(RemoteStream::new(track, kind))).await;
            })
        }));

        Ok(Self {
            peer_connection,
            epoch: Instant::now(),
        })
    }

    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.peer_connection
    }
}

#[async_trait]
impl PeerTransport for RtcPeerTransport {
    async fn create_offer(&self) -> Result<String, TransportError> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    async fn apply_answer(&self, sdp: String) -> Result<(), TransportError> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: RemoteCandidate) -> Result<(), TransportError> {
        if candidate.candidate.is_empty() {
            return Err(TransportError::Candidate("empty candidate".to_string()));
        }

        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_mline_index,
            username_fragment: None,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn inbound_video_report(&self) -> Option<InboundVideoReport> {
        let stats = self.peer_connection.get_stats().await;

        let mut bytes_received = None;
        let mut round_trip_ms = None;
        for report in stats.reports.values() {
            match report {
                StatsReportType::InboundRTP(inbound) if inbound.kind == "video" => {
                    bytes_received = Some(inbound.bytes_received);
                }
                StatsReportType::CandidatePair(pair) if pair.nominated => {
                    if pair.current_round_trip_time > 0.0 {
                        round_trip_ms = Some(pair.current_round_trip_time * 1000.0);
                    }
                }
                _ => {}
            }
        }

        bytes_received.map(|bytes_received| InboundVideoReport {
            bytes_received,
            timestamp_ms: self.epoch.elapsed().as_secs_f64() * 1000.0,
            round_trip_ms,
        })
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
