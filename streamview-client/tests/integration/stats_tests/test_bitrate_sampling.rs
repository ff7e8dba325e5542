use streamview_client::SessionStatus;
use streamview_client::transport::PeerState;

use crate::integration::init_tracing;
use crate::utils::{PeerHandle, TestViewer, peer_config, wait_for, wait_for_status};

/// Connects with a baseline report in place and waits until it was sampled.
async fn connected_with_baseline(viewer: &mut TestViewer, bytes: u64, ts: f64) -> PeerHandle {
    viewer.controller.toggle_connection().await.unwrap();
    let _end = viewer.next_server_end().await.unwrap();
    let peer = viewer.next_peer().await.unwrap();

    peer.set_report(bytes, ts, Some(25.4));
    peer.set_state(PeerState::Connected).await;
    wait_for_status(&viewer.controller, SessionStatus::Connected)
        .await
        .unwrap();
    wait_for(&viewer.controller, |s| s.stats.latency_ms == Some(25))
        .await
        .unwrap();
    peer
}

#[tokio::test(start_paused = true)]
async fn test_bitrate_from_consecutive_reports() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));
    let peer = connected_with_baseline(&mut viewer, 1000, 0.0).await;
    assert_eq!(viewer.controller.snapshot().stats.bitrate_kbps, None);

    peer.set_report(26000, 1000.0, Some(31.0));

    let snapshot = wait_for(&viewer.controller, |s| s.stats.bitrate_kbps.is_some())
        .await
        .unwrap();
    assert_eq!(snapshot.stats.bitrate_kbps, Some(200));
    assert_eq!(snapshot.stats.latency_ms, Some(31));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_timestamp_reports_unavailable() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));
    let peer = connected_with_baseline(&mut viewer, 1000, 1000.0).await;

    peer.set_report(5000, 1000.0, Some(40.0));

    let snapshot = wait_for(&viewer.controller, |s| s.stats.latency_ms == Some(40))
        .await
        .unwrap();
    assert_eq!(snapshot.stats.bitrate_kbps, None);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_stops_sampling() {
    init_tracing();
    let mut viewer = TestViewer::spawn(peer_config("arena"));
    let peer = connected_with_baseline(&mut viewer, 1000, 0.0).await;

    viewer.controller.disconnect().await.unwrap();
    peer.set_report(26000, 1000.0, Some(31.0));
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    let stats = viewer.controller.snapshot().stats;
    assert_eq!(stats.bitrate_kbps, None);
    assert_eq!(stats.latency_ms, None);
}
