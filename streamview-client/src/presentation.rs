use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use webrtc::track::track_remote::TrackRemote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Remote media delivered by the peer transport.
#[derive(Clone)]
pub struct RemoteStream {
    pub stream_id: String,
    pub track_id: String,
    pub kind: MediaKind,
    track: Option<Arc<TrackRemote>>,
}

impl RemoteStream {
    pub fn new(track: Arc<TrackRemote>, kind: MediaKind) -> Self {
        Self {
            stream_id: track.stream_id(),
            track_id: track.id(),
            kind,
            track: Some(track),
        }
    }

    /// A stream description with no RTP source behind it.
    pub fn detached(stream_id: impl Into<String>, track_id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            stream_id: stream_id.into(),
            track_id: track_id.into(),
            kind,
            track: None,
        }
    }

    /// RTP track to read media from, if backed by a live peer connection.
    pub fn track(&self) -> Option<&Arc<TrackRemote>> {
        self.track.as_ref()
    }
}

impl fmt::Debug for RemoteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStream")
            .field("stream_id", &self.stream_id)
            .field("track_id", &self.track_id)
            .field("kind", &self.kind)
            .field("live", &self.track.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum MediaSource {
    /// Manifest URL handed to a surface that plays HLS natively.
    Manifest(Url),
    /// Media arriving over the peer connection.
    Remote(RemoteStream),
    /// Segments pushed by the client-side engine via `append_segment`.
    SegmentFeed(Url),
}

#[derive(Debug, Clone)]
pub struct MediaSegment {
    pub sequence: u64,
    pub uri: Url,
    pub duration: Duration,
    pub data: Bytes,
}

/// Rendering side of the player.
///
/// The surface observes media and reports playback events back through
/// `ViewerController::report_playback`; it never decides connection state.
pub trait PresentationSurface: Send + Sync {
    fn supports_native_hls(&self) -> bool;

    fn set_source(&self, source: MediaSource);

    /// Another track of the remote stream already bound with `set_source`.
    fn add_track(&self, track: RemoteStream);

    fn clear_source(&self);

    fn append_segment(&self, segment: MediaSegment);

    fn set_overlay(&self, message: Option<&str>);
}

/// Observations reported by the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    LoadStart,
    DataLoaded,
    Waiting,
    Playing,
    Error(String),
}

impl PlaybackEvent {
    /// Overlay text for the event; `None` hides the overlay.
    pub fn overlay_text(&self) -> Option<String> {
        match self {
            PlaybackEvent::LoadStart => Some("Loading stream...".to_string()),
            PlaybackEvent::DataLoaded | PlaybackEvent::Playing => None,
            PlaybackEvent::Waiting => Some("Buffering...".to_string()),
            PlaybackEvent::Error(message) => Some(format!("Playback error: {message}")),
        }
    }
}
