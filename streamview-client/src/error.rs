use thiserror::Error;

/// Malformed or unsupported server endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    Invalid { endpoint: String, reason: String },

    #[error("Unsupported endpoint scheme: {0}")]
    UnsupportedScheme(String),
}

/// Errors produced by the signaling link.
#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("Invalid signaling endpoint: {0}")]
    InvalidEndpoint(#[from] EndpointError),

    #[error("Failed to open signaling channel: {0}")]
    Connect(String),

    #[error("Signaling channel error: {0}")]
    Channel(String),

    #[error("Signaling channel closed")]
    Closed,
}

/// Errors raised while bootstrapping or driving a media transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("WebRTC error: {0}")]
    WebRtc(#[from] webrtc::Error),

    #[error("Invalid ICE candidate: {0}")]
    Candidate(String),

    #[error("Invalid playback endpoint: {0}")]
    InvalidEndpoint(#[from] EndpointError),

    #[error("Segmented playback is not supported by this surface")]
    SegmentedPlaybackUnsupported,

    #[error("Segment engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Transport closed")]
    Closed,
}

/// Errors reported by the segment-fetching engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] EndpointError),

    #[error("Playlist parsing error: {0}")]
    PlaylistParse(String),
}

/// Error surface of the connection controller.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A connection attempt is already in progress")]
    ConnectInProgress,

    #[error("Signaling error: {0}")]
    Signaling(#[from] SignalingError),

    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Controller is shut down")]
    ControllerClosed,
}

impl From<TransportError> for ViewerError {
    fn from(e: TransportError) -> Self {
        ViewerError::Setup(e.to_string())
    }
}

pub type ViewerResult<T> = Result<T, ViewerError>;
