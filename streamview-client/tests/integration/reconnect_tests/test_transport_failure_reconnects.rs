use std::time::Duration;
use streamview_client::SessionStatus;
use streamview_client::transport::PeerState;

use crate::integration::init_tracing;
use crate::utils::{TestViewer, count_logs, peer_config, wait_for_status};

#[tokio::test(start_paused = true)]
async fn test_transport_failure_reconnects_once_after_delay() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));
    let (_end, peer) = viewer.connect_peer().await.unwrap();

    peer.set_state(PeerState::Failed).await;
    wait_for_status(&viewer.controller, SessionStatus::Disconnected)
        .await
        .unwrap();
    assert_eq!(peer.close_count(), 1);
    assert_eq!(count_logs(&viewer.controller, "Transport failure"), 1);

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert_eq!(viewer.signaling.open_count(), 1);
    assert_eq!(viewer.controller.status(), SessionStatus::Disconnected);

    let end = viewer.next_server_end().await.unwrap();
    assert_eq!(end.url.as_str(), "ws://localhost:8080/api/webrtc/ws");
    assert_eq!(viewer.signaling.open_count(), 2);
    assert_eq!(viewer.controller.status(), SessionStatus::Connecting);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(viewer.signaling.open_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_disconnected_state_also_triggers_reconnect() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));
    let (_end, peer) = viewer.connect_peer().await.unwrap();

    peer.set_state(PeerState::Disconnected).await;
    wait_for_status(&viewer.controller, SessionStatus::Disconnected)
        .await
        .unwrap();

    let _end = viewer.next_server_end().await.unwrap();
    let new_peer = viewer.next_peer().await.unwrap();
    new_peer.set_state(PeerState::Connected).await;
    wait_for_status(&viewer.controller, SessionStatus::Connected)
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_failure_while_connecting_does_not_retry() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));

    viewer.controller.toggle_connection().await.unwrap();
    let _end = viewer.next_server_end().await.unwrap();
    let peer = viewer.next_peer().await.unwrap();

    peer.set_state(PeerState::Failed).await;
    wait_for_status(&viewer.controller, SessionStatus::Disconnected)
        .await
        .unwrap();
    assert_eq!(count_logs(&viewer.controller, "Setup error"), 1);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(viewer.signaling.open_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_signaling_close_never_retries() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));
    let (end, _peer) = viewer.connect_peer().await.unwrap();

    end.close();
    wait_for_status(&viewer.controller, SessionStatus::Disconnected)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(viewer.signaling.open_count(), 1);
    assert_eq!(viewer.controller.status(), SessionStatus::Disconnected);
}
