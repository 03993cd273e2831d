//! Push channel port
//!
//! A push channel is a long-lived, server-to-client connection keyed by user
//! id. Opening one never blocks: the adapter connects in the background and
//! reports progress as [`PushEvent`]s through a [`PushConnection`].

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Buffer size for events between the connection task and its owner.
pub const PUSH_EVENT_BUFFER: usize = 64;

/// Something that happened on a push connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// The handshake completed.
    Opened,
    /// A raw inbound text frame.
    Frame(String),
    /// The peer closed the connection.
    Closed { reason: Option<String> },
    /// The connection could not be established or errored.
    Failed(String),
}

/// Opens push connections.
pub trait PushChannel: Send + Sync {
    fn open(&self, user_id: i64) -> PushConnection;
}

/// Owner side of a push connection.
///
/// Dropping it (or calling [`close`](Self::close)) cancels the background
/// task, so no further events can be observed.
pub struct PushConnection {
    user_id: i64,
    events: mpsc::Receiver<PushEvent>,
    shutdown: CancellationToken,
}

impl PushConnection {
    /// Create a connection and the feed its background task writes to.
    pub fn pair(user_id: i64) -> (PushFeed, PushConnection) {
        let (tx, rx) = mpsc::channel(PUSH_EVENT_BUFFER);
        let shutdown = CancellationToken::new();
        let feed = PushFeed {
            tx,
            shutdown: shutdown.clone(),
        };
        let connection = PushConnection {
            user_id,
            events: rx,
            shutdown,
        };
        (feed, connection)
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Next event, or `None` once the background task has ended.
    pub async fn recv(&mut self) -> Option<PushEvent> {
        self.events.recv().await
    }

    /// Close unconditionally. Safe to call in any state, any number of times.
    pub fn close(&mut self) {
        self.shutdown.cancel();
        self.events.close();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl Drop for PushConnection {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Background-task side of a push connection.
#[derive(Clone)]
pub struct PushFeed {
    tx: mpsc::Sender<PushEvent>,
    shutdown: CancellationToken,
}

impl PushFeed {
    /// Forward an event. Returns `false` once the owner is gone.
    pub async fn send(&self, event: PushEvent) -> bool {
        if self.shutdown.is_cancelled() {
            return false;
        }
        self.tx.send(event).await.is_ok()
    }

    /// Resolves when the owner closes or drops the connection.
    pub async fn cancelled(&self) {
        self.shutdown.cancelled().await
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}
