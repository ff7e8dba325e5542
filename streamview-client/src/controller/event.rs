use crate::error::SignalingError;
use crate::signaling::{LinkEvent, SignalingLink};
use crate::transport::{EngineEvent, InboundVideoReport, PeerEvent};
use url::Url;

/// Something that happened to a session, tagged with the generation it
/// belongs to. Events from an older generation are dropped by the loop.
pub(crate) struct SessionEvent {
    pub generation: u64,
    pub kind: SessionEventKind,
}

pub(crate) enum SessionEventKind {
    /// The signaling connect attempt finished.
    SignalingOpened(Url, Result<SignalingLink, SignalingError>),

    Link(LinkEvent),

    Peer(PeerEvent),

    Engine(EngineEvent),

    /// A stats tick pulled a report from the peer transport.
    StatsReport(Option<InboundVideoReport>),

    ViewerCount(Result<u32, String>),

    ReconnectDue,
}

impl SessionEvent {
    pub fn new(generation: u64, kind: SessionEventKind) -> Self {
        Self { generation, kind }
    }
}
