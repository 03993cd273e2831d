//! WebSocket push channel.
//!
//! One background task per connection: it connects, forwards text frames to
//! the [`PushFeed`] and answers pings. Closing the owning
//! [`PushConnection`] cancels the task, which sends a close frame if the
//! socket was up.

use agentdesk_application::{PushChannel, PushConnection, PushEvent, PushFeed};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, info, warn};

/// Push channel over WebSocket, one connection per user id
pub struct WebSocketPushChannel {
    base_url: String,
}

impl WebSocketPushChannel {
    /// `base_url` is the `ws://` or `wss://` address the user id is appended to.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, user_id: i64) -> String {
        format!("{}/{}", self.base_url, user_id)
    }
}

impl PushChannel for WebSocketPushChannel {
    fn open(&self, user_id: i64) -> PushConnection {
        let (feed, connection) = PushConnection::pair(user_id);
        let url = self.url_for(user_id);
        tokio::spawn(run_connection(url, feed));
        connection
    }
}

async fn run_connection(url: String, feed: PushFeed) {
    debug!("Connecting push channel to {}", url);
    let connected = tokio::select! {
        _ = feed.cancelled() => {
            debug!("Push channel to {} closed before connecting", url);
            return;
        }
        result = connect_async(url.as_str()) => result,
    };

    let stream = match connected {
        Ok((stream, _)) => stream,
        Err(e) => {
            warn!("Push channel to {} failed: {}", url, e);
            feed.send(PushEvent::Failed(e.to_string())).await;
            return;
        }
    };
    info!("Push channel connected to {}", url);

    let (mut ws_tx, mut ws_rx) = stream.split();
    if !feed.send(PushEvent::Opened).await {
        let _ = ws_tx.send(WsMessage::Close(None)).await;
        return;
    }

    loop {
        let msg = tokio::select! {
            _ = feed.cancelled() => {
                debug!("Closing push channel to {}", url);
                let _ = ws_tx.send(WsMessage::Close(None)).await;
                break;
            }
            msg = ws_rx.next() => msg,
        };

        let event = match msg {
            Some(Ok(WsMessage::Text(text))) => PushEvent::Frame(text),
            Some(Ok(WsMessage::Binary(bytes))) => match String::from_utf8(bytes) {
                Ok(text) => PushEvent::Frame(text),
                Err(_) => {
                    debug!("Ignoring non-UTF-8 binary frame");
                    continue;
                }
            },
            Some(Ok(WsMessage::Ping(data))) => {
                let _ = ws_tx.send(WsMessage::Pong(data)).await;
                continue;
            }
            Some(Ok(WsMessage::Close(frame))) => {
                let reason = frame
                    .map(|f| f.reason.to_string())
                    .filter(|r| !r.is_empty());
                feed.send(PushEvent::Closed { reason }).await;
                break;
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                feed.send(PushEvent::Failed(e.to_string())).await;
                break;
            }
            None => {
                feed.send(PushEvent::Closed { reason: None }).await;
                break;
            }
        };

        if !feed.send(event).await {
            break;
        }
    }
}
