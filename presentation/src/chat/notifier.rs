//! Console rendering of chat notifications

use crate::config::OutputConfig;
use crate::output::console::ConsoleFormatter;
use agentdesk_application::ChatNotifier;
use agentdesk_domain::{ChannelState, ComposingState, ConversationSession, Message};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Prints chat updates and drives the "agent is typing" spinner
pub struct ConsoleChatNotifier {
    output: OutputConfig,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleChatNotifier {
    pub fn new(output: OutputConfig) -> Self {
        Self {
            output,
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Print a line without tearing the spinner.
    fn print(&self, text: &str) {
        let guard = self.spinner.lock().ok();
        match guard.as_deref().and_then(Option::as_ref) {
            Some(spinner) => spinner.suspend(|| println!("{}", text)),
            None => println!("{}", text),
        }
    }

    fn start_spinner(&self) {
        if !self.output.show_progress {
            return;
        }
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        if slot.is_some() {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_message("agent is typing...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        *slot = Some(spinner);
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(spinner) = slot.take()
        {
            spinner.finish_and_clear();
        }
    }

    pub fn is_typing_shown(&self) -> bool {
        self.spinner.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl ChatNotifier for ConsoleChatNotifier {
    fn on_session_started(&self, session: &ConversationSession) {
        self.print(&ConsoleFormatter::format_session(session, &self.output));
    }

    fn on_session_ended(&self) {
        self.stop_spinner();
        self.print(&format!("{}", "Session closed.".dimmed()));
    }

    fn on_message_appended(&self, message: &Message) {
        self.print(&ConsoleFormatter::format_message(message, &self.output));
    }

    fn on_composing_changed(&self, state: ComposingState) {
        match state {
            ComposingState::Composing => self.start_spinner(),
            ComposingState::Idle => self.stop_spinner(),
        }
    }

    fn on_channel_changed(&self, state: ChannelState) {
        if state == ChannelState::Closed {
            self.stop_spinner();
            self.print(&format!(
                "{}",
                "Push channel closed; replies will not arrive until /user starts a new session."
                    .yellow()
            ));
        }
    }

    fn on_error(&self, message: &str) {
        self.print(&ConsoleFormatter::format_error(message));
    }
}
