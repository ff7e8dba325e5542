use streamview_client::transport::PeerState;
use streamview_client::{AffordanceAction, SessionStatus, TransportKind, ViewerError};

use crate::integration::init_tracing;
use crate::utils::{TestViewer, peer_config, wait_for_status};

#[tokio::test]
async fn test_connect_disables_affordance_until_connected() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));

    viewer.controller.toggle_connection().await.unwrap();

    let snapshot = viewer.controller.snapshot();
    assert_eq!(snapshot.status, SessionStatus::Connecting);
    assert_eq!(snapshot.transport, Some(TransportKind::PeerToPeer));
    assert!(!snapshot.affordance.enabled);
    assert_eq!(snapshot.overlay.as_deref(), Some("Connecting..."));

    let end = viewer.next_server_end().await.unwrap();
    assert_eq!(end.url.as_str(), "ws://localhost:8080/api/webrtc/ws");

    let peer = viewer.next_peer().await.unwrap();
    peer.set_state(PeerState::Connected).await;

    let snapshot = wait_for_status(&viewer.controller, SessionStatus::Connected)
        .await
        .unwrap();
    assert!(snapshot.affordance.enabled);
    assert_eq!(snapshot.affordance.action, AffordanceAction::Disconnect);
    assert_eq!(snapshot.overlay, None);
}

#[tokio::test]
async fn test_toggle_while_connecting_disconnects() {
    init_tracing();
    let viewer = TestViewer::spawn(peer_config("arena"));

    viewer.controller.toggle_connection().await.unwrap();
    viewer.controller.toggle_connection().await.unwrap();

    let snapshot = viewer.controller.snapshot();
    assert_eq!(snapshot.status, SessionStatus::Disconnected);
    assert!(snapshot.affordance.enabled);
    assert_eq!(snapshot.overlay.as_deref(), Some("Disconnected"));
}

#[tokio::test]
async fn test_connect_while_connecting_is_rejected() {
    init_tracing();
    let viewer = TestViewer::spawn(peer_config("arena"));

    viewer
        .controller
        .connect(viewer_request("arena"))
        .await
        .unwrap();
    let second = viewer.controller.connect(viewer_request("other")).await;

    assert!(matches!(second, Err(ViewerError::ConnectInProgress)));
    assert_eq!(viewer.controller.status(), SessionStatus::Connecting);
}

#[tokio::test]
async fn test_toggle_disconnects_connected_session() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));
    let (_end, peer) = viewer.connect_peer().await.unwrap();

    viewer.controller.toggle_connection().await.unwrap();

    let snapshot = viewer.controller.snapshot();
    assert_eq!(snapshot.status, SessionStatus::Disconnected);
    assert_eq!(snapshot.affordance.action, AffordanceAction::Connect);
    assert!(snapshot.affordance.enabled);
    assert_eq!(peer.close_count(), 1);
}

#[tokio::test]
async fn test_new_connect_replaces_previous_session() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));
    let (mut first_end, first_peer) = viewer.connect_peer().await.unwrap();
    let first_generation = viewer.controller.snapshot().generation;

    viewer
        .controller
        .connect(viewer_request("second"))
        .await
        .unwrap();

    assert_eq!(first_peer.close_count(), 1);
    assert!(first_end.client_closed());
    assert!(viewer.controller.snapshot().generation > first_generation);

    // Events from the replaced session no longer count.
    first_peer.set_state(PeerState::Connected).await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(viewer.controller.status(), SessionStatus::Connecting);
}

fn viewer_request(key: &str) -> streamview_client::ConnectRequest {
    streamview_client::ConnectRequest::new(key, "http://localhost:8080", TransportKind::PeerToPeer)
}
