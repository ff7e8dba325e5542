//! Derivation of the server URLs a viewer talks to.
//!
//! A configured endpoint may be given with an HTTP or WebSocket scheme, or as a
//! bare `host:port`; each consumer re-targets it to the scheme it needs.

use crate::error::EndpointError;
use streamview_core::utils::{HLS_PATH_PREFIX, HLS_PLAYLIST_NAME, SIGNALING_PATH, STREAMS_API_PATH};
use url::Url;

fn parse_endpoint(endpoint: &str) -> Result<Url, EndpointError> {
    let trimmed = endpoint.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let mut url = Url::parse(&candidate).map_err(|e| EndpointError::Invalid {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn with_scheme(mut url: Url, secure: bool, websocket: bool) -> Result<Url, EndpointError> {
    let scheme = match (websocket, secure) {
        (true, true) => "wss",
        (true, false) => "ws",
        (false, true) => "https",
        (false, false) => "http",
    };
    url.set_scheme(scheme)
        .map_err(|_| EndpointError::UnsupportedScheme(url.scheme().to_string()))?;
    Ok(url)
}

fn is_secure(url: &Url) -> Result<bool, EndpointError> {
    match url.scheme() {
        "http" | "ws" => Ok(false),
        "https" | "wss" => Ok(true),
        other => Err(EndpointError::UnsupportedScheme(other.to_string())),
    }
}

fn append_path(mut url: Url, suffix: &str) -> Url {
    let base = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{base}{suffix}"));
    url
}

fn push_segments(mut url: Url, segments: &[&str]) -> Result<Url, EndpointError> {
    let endpoint = url.to_string();
    url.path_segments_mut()
        .map_err(|_| EndpointError::Invalid {
            endpoint,
            reason: "endpoint cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `{ws-endpoint}/api/webrtc/ws`
pub fn signaling_url(endpoint: &str) -> Result<Url, EndpointError> {
    let url = parse_endpoint(endpoint)?;
    let secure = is_secure(&url)?;
    let url = with_scheme(url, secure, true)?;
    Ok(append_path(url, SIGNALING_PATH))
}

/// `{http-endpoint}`, the base of every HTTP resource on the server.
pub fn http_base_url(endpoint: &str) -> Result<Url, EndpointError> {
    let url = parse_endpoint(endpoint)?;
    let secure = is_secure(&url)?;
    with_scheme(url, secure, false)
}

/// `{http-endpoint}/hls/{stream_key}/playlist.m3u8`
pub fn manifest_url(endpoint: &str, stream_key: &str) -> Result<Url, EndpointError> {
    let base = http_base_url(endpoint)?;
    push_segments(base, &[HLS_PATH_PREFIX, stream_key, HLS_PLAYLIST_NAME])
}

/// `{http-endpoint}/api/streams`
pub fn streams_url(endpoint: &str) -> Result<Url, EndpointError> {
    let base = http_base_url(endpoint)?;
    Ok(append_path(base, STREAMS_API_PATH))
}

/// `{http-endpoint}/api/streams/{stream_key}/stats`
pub fn stream_stats_url(endpoint: &str, stream_key: &str) -> Result<Url, EndpointError> {
    let base = streams_url(endpoint)?;
    push_segments(base, &[stream_key, "stats"])
}
