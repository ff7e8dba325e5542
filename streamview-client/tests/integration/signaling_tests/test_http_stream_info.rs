use std::time::Duration;
use streamview_client::error::EngineError;
use streamview_client::stats::{HttpStreamInfo, StreamInfoSource};

use crate::integration::init_tracing;
use crate::utils::MockServer;

#[tokio::test]
async fn test_lists_streams() {
    init_tracing();
    let server = MockServer::start().await.unwrap();
    let info = HttpStreamInfo::new(Duration::from_secs(5)).unwrap();

    let streams = info.list_streams(&server.endpoint()).await.unwrap();

    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].stream_key, "arena");
    assert!(streams[0].is_live);
}

#[tokio::test]
async fn test_fetches_stream_stats() {
    init_tracing();
    let server = MockServer::start().await.unwrap();
    let info = HttpStreamInfo::new(Duration::from_secs(5)).unwrap();

    let stats = info.stream_stats(&server.endpoint(), "arena").await.unwrap();
    assert_eq!(stats.viewer_count, 12);
    assert_eq!(stats.uptime, 360);

    let missing = info.stream_stats(&server.endpoint(), "nope").await;
    assert!(matches!(
        missing,
        Err(EngineError::HttpStatus { status: 404, .. })
    ));
}
