use std::sync::Arc;
use std::time::Duration;
use streamview_client::transport::HlsPullEngineFactory;
use streamview_client::{
    Collaborators, ConnectRequest, SessionStatus, TransportKind, ViewerConfig, ViewerController,
};

use crate::integration::init_tracing;
use crate::utils::{
    MockPeerConnector, MockServer, MockSignalingConnector, MockSurface, SurfaceCall, count_logs,
    wait_for_status, wait_until,
};

fn engine_viewer(surface: Arc<MockSurface>) -> ViewerController {
    let (signaling, _ends) = MockSignalingConnector::new();
    let (peers, _handles) = MockPeerConnector::new();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let engines = HlsPullEngineFactory::with_client(client);

    let collaborators = Collaborators::new(surface, Arc::new(signaling), Arc::new(peers))
        .with_segment_engines(Arc::new(engines));
    ViewerController::spawn(ViewerConfig::default(), collaborators)
}

#[tokio::test]
async fn test_engine_appends_segments_in_order() {
    init_tracing();
    let server = MockServer::start().await.unwrap();
    let surface = Arc::new(MockSurface::new());
    let controller = engine_viewer(surface.clone());

    controller
        .connect(ConnectRequest::new(
            "arena",
            server.endpoint(),
            TransportKind::SegmentedPull,
        ))
        .await
        .unwrap();

    wait_for_status(&controller, SessionStatus::Connected)
        .await
        .unwrap();
    wait_until(|| surface.segments().len() == 2).await.unwrap();

    let segments = surface.segments();
    assert_eq!(segments[0].sequence, 0);
    assert_eq!(segments[1].sequence, 1);
    assert_eq!(&segments[0].data[..], b"ts:segment0.ts");
    assert!(segments[1].uri.as_str().ends_with("/hls/arena/segment1.ts"));

    let feed = format!("{}/hls/arena/playlist.m3u8", server.endpoint());
    assert_eq!(surface.calls()[1], SurfaceCall::SegmentFeed(feed));

    wait_until(|| count_logs(&controller, "Stream playlist ended") == 1)
        .await
        .unwrap();
    assert_eq!(controller.status(), SessionStatus::Connected);
}

#[tokio::test]
async fn test_unavailable_manifest_fails_setup() {
    init_tracing();
    let server = MockServer::start().await.unwrap();
    let surface = Arc::new(MockSurface::new());
    let controller = engine_viewer(surface.clone());

    controller
        .connect(ConnectRequest::new(
            "missing",
            server.endpoint(),
            TransportKind::SegmentedPull,
        ))
        .await
        .unwrap();

    wait_for_status(&controller, SessionStatus::Disconnected)
        .await
        .unwrap();
    assert_eq!(count_logs(&controller, "manifest unavailable"), 1);
    assert!(surface.segments().is_empty());
}
