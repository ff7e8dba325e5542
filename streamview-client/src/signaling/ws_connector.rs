use crate::error::SignalingError;
use crate::signaling::{LinkEvent, SignalingConnector, SignalingLink};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket signaling connector backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }

    async fn sender_task(
        mut write: SplitSink<WsStream, Message>,
        mut rx: mpsc::UnboundedReceiver<String>,
    ) {
        while let Some(text) = rx.recv().await {
            if let Err(e) = write.send(Message::Text(text.into())).await {
                error!("Failed to send signaling frame: {}", e);
                break;
            }
        }

        let _ = write.send(Message::Close(None)).await;
        debug!("Signaling sender task terminated");
    }

    async fn receiver_task(
        mut read: SplitStream<WsStream>,
        tx: mpsc::UnboundedSender<LinkEvent>,
    ) {
        while let Some(msg) = read.next().await {
            let event = match msg {
                Ok(Message::Text(text)) => LinkEvent::Text(text.as_str().to_owned()),
                Ok(Message::Binary(data)) => LinkEvent::Binary(data.len()),
                Ok(Message::Close(frame)) => {
                    info!("Signaling socket closed by server: {:?}", frame);
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!("Signaling socket error: {}", e);
                    let _ = tx.send(LinkEvent::Error(e.to_string()));
                    break;
                }
            };

            if tx.send(event).is_err() {
                debug!("Signaling listener dropped, stopping receiver");
                return;
            }
        }

        let _ = tx.send(LinkEvent::Closed);
        debug!("Signaling receiver task terminated");
    }
}

#[async_trait]
impl SignalingConnector for WsConnector {
    async fn open(&self, url: &Url) -> Result<SignalingLink, SignalingError> {
        info!("Connecting to signaling server: {}", url);

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| SignalingError::Connect(e.to_string()))?;

        let (write, read) = ws_stream.split();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        tokio::spawn(Self::sender_task(write, out_rx));
        tokio::spawn(Self::receiver_task(read, in_tx));

        Ok(SignalingLink {
            outbound: out_tx,
            inbound: in_rx,
        })
    }
}
