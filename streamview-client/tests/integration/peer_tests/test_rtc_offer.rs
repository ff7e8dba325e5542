use streamview_client::transport::{PeerTransport, RtcPeerTransport};
use tokio::sync::mpsc;

use crate::integration::init_tracing;

#[tokio::test]
async fn test_offer_requests_receive_only_audio_and_video() {
    init_tracing();
    let (tx, _rx) = mpsc::channel(16);
    let transport = RtcPeerTransport::new(&[], tx).await.unwrap();

    let sdp = transport.create_offer().await.unwrap();

    assert!(sdp.contains("m=video"), "offer lacks video: {sdp}");
    assert!(sdp.contains("m=audio"), "offer lacks audio: {sdp}");
    assert!(sdp.contains("a=recvonly"));
    assert!(!sdp.contains("a=sendrecv"));
    assert!(transport.peer_connection().local_description().await.is_some());

    transport.close().await.unwrap();
}
