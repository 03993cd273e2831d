//! Chat controller: single owner of the chat session context.
//!
//! [`ChatController`] holds the active [`ConversationSession`], the
//! [`ComposingState`] and the [`ChannelState`], and is the only place they
//! are mutated. It is synchronous and performs no I/O: the
//! [`ChatRuntime`](super::chat_runtime::ChatRuntime) feeds it events and
//! carries out the requests it returns.
//!
//! # Epochs
//!
//! Every installed session gets a new epoch. Asynchronous results (delivery
//! outcomes, push frames) are tagged with the epoch they belong to and are
//! ignored once that session is no longer current.

use crate::config::ChatConfig;
use crate::ports::message_delivery::DeliveryRequest;
use agentdesk_domain::{
    ChannelEvent, ChannelState, ComposingEvent, ComposingState, ConversationSession,
    InboundFrame, Message, decode_frame,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by chat operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("{0}")]
    Bootstrap(String),

    #[error("could not deliver the message to the agent")]
    Delivery,

    #[error("the agent is still replying to the previous message")]
    AwaitingReply,
}

/// Result of a successful submit: the placeholder that was appended and the
/// request that still has to be issued.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub epoch: u64,
    pub placeholder: Message,
    pub request: DeliveryRequest,
}

/// What applying one push frame did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// A confirmed message was appended; `settled` placeholders were marked sent.
    Appended { message: Message, settled: usize },
    /// The control token; nothing changed.
    Acknowledged,
    /// Not structured and not the control token.
    Dropped,
    /// The frame belongs to a session that is no longer current.
    Stale,
}

pub struct ChatController {
    config: ChatConfig,
    session: Option<ConversationSession>,
    composing: ComposingState,
    channel: ChannelState,
    epoch: u64,
    last_placeholder: i64,
}

impl ChatController {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            session: None,
            composing: ComposingState::Idle,
            channel: ChannelState::Disconnected,
            epoch: 0,
            last_placeholder: 0,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&ConversationSession> {
        self.session.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        self.session.as_ref().map(|s| s.messages()).unwrap_or(&[])
    }

    pub fn composing(&self) -> ComposingState {
        self.composing
    }

    pub fn channel(&self) -> ChannelState {
        self.channel
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Install a freshly bootstrapped session, replacing any previous one.
    ///
    /// The message list is replaced wholesale by the session's history and
    /// the push channel moves to `Connecting`. Returns the new epoch.
    pub fn install(&mut self, session: ConversationSession) -> u64 {
        if self.session.is_some() {
            self.discard();
        }
        self.epoch += 1;
        self.session = Some(session);
        self.composing = ComposingState::Idle;
        self.channel = self.channel.on(ChannelEvent::Activate);
        self.epoch
    }

    /// Discard the active session. Returns `false` if there was none.
    ///
    /// Teardown is unconditional: the channel is closed whatever its state
    /// and the epoch advances so late results cannot touch the next session.
    pub fn discard(&mut self) -> bool {
        let had_session = self.session.take().is_some();
        self.composing = ComposingState::Idle;
        self.channel = self.channel.on(ChannelEvent::Teardown);
        self.epoch += 1;
        had_session
    }

    /// Submit the draft as a new operator message.
    ///
    /// Blank drafts and submits without a session are no-ops (`Ok(None)`)
    /// and leave the draft untouched. Otherwise the placeholder is appended,
    /// the draft is cleared and the composing flag is set, all before the
    /// caller issues the returned delivery request.
    pub fn submit(
        &mut self,
        draft: &mut String,
        now: DateTime<Utc>,
    ) -> Result<Option<Submitted>, ChatError> {
        if draft.trim().is_empty() {
            return Ok(None);
        }
        if self.session.is_none() {
            return Ok(None);
        }
        if self.config.serialize_sends && self.composing.is_composing() {
            return Err(ChatError::AwaitingReply);
        }

        let placeholder_id = self.next_placeholder_id(now);
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };

        let text = std::mem::take(draft);
        let placeholder = Message::placeholder(placeholder_id, text.clone(), now);
        session.append(placeholder.clone());
        self.composing = self.composing.on(ComposingEvent::SendDispatched);

        Ok(Some(Submitted {
            epoch: self.epoch,
            placeholder,
            request: DeliveryRequest {
                username: session.username().to_string(),
                client_code: session.client().code.clone(),
                text,
            },
        }))
    }

    /// A delivery request failed at the transport level.
    ///
    /// Clears the composing flag; the placeholder stays where it is. Returns
    /// `false` if the failure belongs to a discarded session.
    pub fn delivery_failed(&mut self, epoch: u64) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.composing = self.composing.on(ComposingEvent::DeliveryFailed);
        true
    }

    /// Apply a lifecycle event of the current push connection.
    pub fn channel_event(&mut self, epoch: u64, event: ChannelEvent) -> ChannelState {
        if self.is_current(epoch) {
            self.channel = self.channel.on(event);
        }
        self.channel
    }

    /// Apply one raw push frame.
    pub fn receive_frame(&mut self, epoch: u64, raw: &str) -> FrameOutcome {
        if !self.is_current(epoch) || !self.channel.is_live() {
            return FrameOutcome::Stale;
        }
        let Some(session) = self.session.as_mut() else {
            return FrameOutcome::Stale;
        };

        match decode_frame(raw, &self.config.control_token) {
            InboundFrame::Message(message) => {
                self.composing = self.composing.on(ComposingEvent::MessageConfirmed);
                let settled = session.settle_pending();
                session.append(message.clone());
                FrameOutcome::Appended { message, settled }
            }
            InboundFrame::Control => {
                self.composing = self.composing.on(ComposingEvent::ProcessingAcknowledged);
                FrameOutcome::Acknowledged
            }
            InboundFrame::Unrecognized => FrameOutcome::Dropped,
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.session.is_some() && epoch == self.epoch
    }

    /// Unix-millisecond ids, strictly increasing within this controller.
    fn next_placeholder_id(&mut self, now: DateTime<Utc>) -> i64 {
        let id = now.timestamp_millis().max(self.last_placeholder + 1);
        self.last_placeholder = id;
        id
    }
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new(ChatConfig::default())
    }
}
