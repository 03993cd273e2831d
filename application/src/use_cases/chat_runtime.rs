//! Chat runtime: the event loop around [`ChatController`].
//!
//! The runtime owns the controller, the push connection of the active
//! session and the channel that delivery tasks report back on. Everything
//! that mutates chat state happens inside its methods, so callers drive it
//! from a single task:
//!
//! ```text
//! UI line ──submit()──> placeholder + spawn delivery ──┐
//!                                                      ▼
//! push frames ──process_next()──> controller <── delivery outcome
//! ```
//!
//! Bootstrap is awaited inline and suspends the caller. Delivery requests are
//! fire-and-forget tasks. The push connection is read as frames arrive.

use super::bootstrap_session::BootstrapSessionUseCase;
use super::chat_controller::{ChatController, ChatError, FrameOutcome};
use crate::config::ChatConfig;
use crate::ports::chat_notifier::{ChatNotifier, NoChatNotifier};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::message_delivery::MessageDelivery;
use crate::ports::push_channel::{PushChannel, PushConnection, PushEvent};
use crate::ports::session_gateway::{GatewayError, SessionGateway};
use agentdesk_domain::{ChannelEvent, ChannelState, ComposingState};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Result of a delivery task, tagged with the epoch it was issued under.
#[derive(Debug)]
struct DeliveryOutcome {
    epoch: u64,
    result: Result<(), GatewayError>,
}

/// What one call to [`ChatRuntime::process_next`] handled.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    /// A delivery request finished; `failed` if it hit a transport error.
    Delivery { failed: bool },
    /// A delivery outcome for a discarded session was ignored.
    StaleDelivery,
    /// A push frame was applied.
    Frame(FrameOutcome),
    /// The push channel changed state.
    Channel(ChannelState),
}

pub struct ChatRuntime {
    bootstrap: BootstrapSessionUseCase,
    delivery: Arc<dyn MessageDelivery>,
    push: Arc<dyn PushChannel>,
    notifier: Arc<dyn ChatNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
    controller: ChatController,
    connection: Option<PushConnection>,
    outcomes_tx: mpsc::UnboundedSender<DeliveryOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<DeliveryOutcome>,
}

impl ChatRuntime {
    pub fn new(
        sessions: Arc<dyn SessionGateway>,
        delivery: Arc<dyn MessageDelivery>,
        push: Arc<dyn PushChannel>,
        config: ChatConfig,
    ) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            bootstrap: BootstrapSessionUseCase::new(sessions),
            delivery,
            push,
            notifier: Arc::new(NoChatNotifier),
            conversation_logger: Arc::new(NoConversationLogger),
            controller: ChatController::new(config),
            connection: None,
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ChatNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Read-only view of the chat state, for rendering.
    pub fn controller(&self) -> &ChatController {
        &self.controller
    }

    pub fn has_session(&self) -> bool {
        self.controller.session().is_some()
    }

    /// Bootstrap a session for `username` under `client_code` and open its
    /// push channel.
    ///
    /// On failure the previous session (if any) is left untouched.
    pub async fn start_session(&mut self, username: &str, client_code: &str) -> Result<(), ChatError> {
        let session = self
            .bootstrap
            .execute(username, client_code)
            .await
            .map_err(|e| ChatError::Bootstrap(e.to_string()))?;

        self.change_user();
        let user_id = session.user_id();
        let epoch = self.controller.install(session);

        if let Some(session) = self.controller.session() {
            self.conversation_logger.log(ConversationEvent::new(
                "session_started",
                json!({
                    "epoch": epoch,
                    "session_id": session.session_id(),
                    "user_id": session.user_id(),
                    "username": session.username(),
                    "client_code": session.client().code,
                    "history": session.messages().len(),
                }),
            ));
            self.notifier.on_session_started(session);
        }

        debug!("Opening push channel for user {}", user_id);
        self.connection = Some(self.push.open(user_id));
        self.notifier.on_channel_changed(self.controller.channel());
        Ok(())
    }

    /// Discard the active session (operator change).
    ///
    /// The push channel is closed unconditionally; outstanding deliveries are
    /// not cancelled, but their outcomes will be ignored.
    pub fn change_user(&mut self) {
        self.close_connection();
        if self.controller.discard() {
            info!("Session discarded");
            self.conversation_logger.log(ConversationEvent::new(
                "session_discarded",
                json!({ "epoch": self.controller.epoch() }),
            ));
            self.notifier.on_session_ended();
            self.notifier.on_channel_changed(self.controller.channel());
        }
    }

    /// Submit the draft. Returns `true` if a message was sent.
    ///
    /// The placeholder is appended and the draft cleared before the delivery
    /// request is spawned, so the operator's message always renders before
    /// the agent's reply.
    pub fn submit(&mut self, draft: &mut String) -> Result<bool, ChatError> {
        let Some(submitted) = self.controller.submit(draft, chrono::Utc::now())? else {
            return Ok(false);
        };

        self.notifier.on_message_appended(&submitted.placeholder);
        self.notifier.on_composing_changed(self.controller.composing());
        self.conversation_logger.log(ConversationEvent::new(
            "message_sent",
            json!({
                "epoch": submitted.epoch,
                "id": submitted.placeholder.id.to_string(),
                "text": submitted.request.text,
            }),
        ));

        let delivery = Arc::clone(&self.delivery);
        let outcomes = self.outcomes_tx.clone();
        let epoch = submitted.epoch;
        let request = submitted.request;
        tokio::spawn(async move {
            let result = delivery.deliver(&request).await;
            // The runtime may be gone already; nothing left to update then
            let _ = outcomes.send(DeliveryOutcome { epoch, result });
        });

        Ok(true)
    }

    /// Wait for the next delivery outcome or push event and apply it.
    ///
    /// Cancel-safe: it only awaits channel receives, so it can sit in a
    /// `tokio::select!` next to UI input.
    pub async fn process_next(&mut self) -> RuntimeEvent {
        tokio::select! {
            Some(outcome) = self.outcomes_rx.recv() => self.handle_delivery(outcome),
            event = next_push_event(&mut self.connection) => self.handle_push(event),
        }
    }

    fn handle_delivery(&mut self, outcome: DeliveryOutcome) -> RuntimeEvent {
        let error = match outcome.result {
            Ok(()) => {
                debug!("Delivery accepted (epoch {})", outcome.epoch);
                return RuntimeEvent::Delivery { failed: false };
            }
            Err(e) => e,
        };

        if !self.controller.delivery_failed(outcome.epoch) {
            debug!("Ignoring delivery failure from stale session: {}", error);
            return RuntimeEvent::StaleDelivery;
        }

        warn!("Delivery failed: {}", error);
        self.conversation_logger.log(ConversationEvent::new(
            "delivery_failed",
            json!({ "epoch": outcome.epoch, "error": error.to_string() }),
        ));
        self.notifier.on_composing_changed(ComposingState::Idle);
        self.notifier.on_error(&ChatError::Delivery.to_string());
        RuntimeEvent::Delivery { failed: true }
    }

    fn handle_push(&mut self, event: PushEvent) -> RuntimeEvent {
        let epoch = self.controller.epoch();
        match event {
            PushEvent::Opened => {
                info!("Push channel established");
                self.conversation_logger
                    .log(ConversationEvent::new("channel_opened", json!({ "epoch": epoch })));
                let state = self.controller.channel_event(epoch, ChannelEvent::Established);
                self.notifier.on_channel_changed(state);
                RuntimeEvent::Channel(state)
            }
            PushEvent::Closed { reason } => {
                info!(
                    "Push channel closed{}",
                    reason.as_deref().map(|r| format!(": {}", r)).unwrap_or_default()
                );
                self.channel_dropped(epoch, reason)
            }
            PushEvent::Failed(error) => {
                warn!("Push channel error: {}", error);
                self.channel_dropped(epoch, Some(error))
            }
            PushEvent::Frame(raw) => {
                let outcome = self.controller.receive_frame(epoch, &raw);
                match &outcome {
                    FrameOutcome::Appended { message, settled } => {
                        debug!("Push: confirmed message ({} placeholders settled)", settled);
                        self.conversation_logger.log(ConversationEvent::new(
                            "message_received",
                            json!({
                                "epoch": epoch,
                                "id": message.id.to_string(),
                                "role": message.role.as_str(),
                                "content": message.content,
                            }),
                        ));
                        self.notifier.on_message_appended(message);
                        self.notifier.on_composing_changed(self.controller.composing());
                    }
                    FrameOutcome::Acknowledged => {
                        debug!("Agent has received the message and is processing");
                        self.conversation_logger
                            .log(ConversationEvent::new("control_token", json!({ "epoch": epoch })));
                    }
                    FrameOutcome::Dropped => {
                        warn!("Received unrecognized push frame: {}", raw);
                        self.conversation_logger.log(ConversationEvent::new(
                            "frame_dropped",
                            json!({ "epoch": epoch, "raw": raw }),
                        ));
                    }
                    FrameOutcome::Stale => {
                        debug!("Ignoring push frame for inactive session");
                    }
                }
                RuntimeEvent::Frame(outcome)
            }
        }
    }

    /// No reconnect: the channel stays closed until a new session starts.
    fn channel_dropped(&mut self, epoch: u64, reason: Option<String>) -> RuntimeEvent {
        self.close_connection();
        self.conversation_logger.log(ConversationEvent::new(
            "channel_closed",
            json!({ "epoch": epoch, "reason": reason }),
        ));
        let state = self.controller.channel_event(epoch, ChannelEvent::Dropped);
        self.notifier.on_channel_changed(state);
        RuntimeEvent::Channel(state)
    }

    fn close_connection(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            debug!("Closing push channel for user {}", connection.user_id());
            connection.close();
        }
    }
}

/// Next event of the current connection; pends forever without one.
async fn next_push_event(connection: &mut Option<PushConnection>) -> PushEvent {
    match connection {
        Some(conn) => conn
            .recv()
            .await
            .unwrap_or(PushEvent::Closed { reason: None }),
        None => std::future::pending().await,
    }
}
