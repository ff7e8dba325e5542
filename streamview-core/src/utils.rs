/// Public STUN servers used when no ICE configuration is supplied.
pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_3: &str = "stun:stun2.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_4: &str = "stun:stun3.l.google.com:19302";

/// Path of the signaling WebSocket, relative to the server endpoint.
pub const SIGNALING_PATH: &str = "/api/webrtc/ws";

/// Prefix of the HLS playback tree: `/hls/{stream_key}/playlist.m3u8`.
pub const HLS_PATH_PREFIX: &str = "hls";
pub const HLS_PLAYLIST_NAME: &str = "playlist.m3u8";

/// Stream directory API.
pub const STREAMS_API_PATH: &str = "/api/streams";
