use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use streamview_client::error::SignalingError;
use streamview_client::signaling::{LinkEvent, SignalingConnector, SignalingLink};
use streamview_core::SignalMessage;
use tokio::sync::mpsc;
use url::Url;

/// Server end of a mock signaling connection.
pub struct ServerEnd {
    pub url: Url,
    pub from_client: mpsc::UnboundedReceiver<String>,
    pub to_client: mpsc::UnboundedSender<LinkEvent>,
}

impl ServerEnd {
    /// Next message the client sent, decoded.
    pub async fn recv_signal(&mut self) -> Option<SignalMessage> {
        let raw = self.from_client.recv().await?;
        serde_json::from_str(&raw).ok()
    }

    pub fn send_signal(&self, msg: &SignalMessage) {
        let raw = serde_json::to_string(msg).unwrap();
        let _ = self.to_client.send(LinkEvent::Text(raw));
    }

    pub fn send_raw(&self, raw: &str) {
        let _ = self.to_client.send(LinkEvent::Text(raw.to_string()));
    }

    pub fn close(&self) {
        let _ = self.to_client.send(LinkEvent::Closed);
    }

    /// Whether the client dropped its outbound sender.
    pub fn client_closed(&mut self) -> bool {
        matches!(
            self.from_client.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        )
    }
}

/// Connector that hands every opened connection to the test.
#[derive(Clone)]
pub struct MockSignalingConnector {
    ends_tx: mpsc::UnboundedSender<ServerEnd>,
    opens: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MockSignalingConnector {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ServerEnd>) {
        let (ends_tx, ends_rx) = mpsc::unbounded_channel();
        let connector = Self {
            ends_tx,
            opens: Arc::new(AtomicUsize::new(0)),
            fail: Arc::new(AtomicBool::new(false)),
        };
        (connector, ends_rx)
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SignalingConnector for MockSignalingConnector {
    async fn open(&self, url: &Url) -> Result<SignalingLink, SignalingError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("[MockSignaling] open {}", url);

        if self.fail.load(Ordering::SeqCst) {
            return Err(SignalingError::Connect("connection refused".to_string()));
        }

        let (outbound, from_client) = mpsc::unbounded_channel();
        let (to_client, inbound) = mpsc::unbounded_channel();
        let _ = self.ends_tx.send(ServerEnd {
            url: url.clone(),
            from_client,
            to_client,
        });

        Ok(SignalingLink { outbound, inbound })
    }
}
