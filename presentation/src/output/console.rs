//! Console output formatter for the chat

use crate::config::OutputConfig;
use agentdesk_application::ChatController;
use agentdesk_domain::{Client, ConversationSession, Message, Role, UserSummary};
use chrono::Local;
use colored::Colorize;

/// Formats chat state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One message as a single block: `[HH:MM] you: text`.
    ///
    /// Continuation lines are indented under the text.
    pub fn format_message(message: &Message, config: &OutputConfig) -> String {
        let time = match message.created_at {
            Some(ts) if config.show_timestamps => {
                format!("{} ", format!("[{}]", ts.with_timezone(&Local).format("%H:%M")).dimmed())
            }
            _ => String::new(),
        };

        let label = match message.role {
            Role::Human => "you".cyan().bold(),
            Role::Agent => "agent".green().bold(),
        };

        let pending = if message.is_pending() {
            format!(" {}", "(sending)".dimmed())
        } else {
            String::new()
        };

        let indent = " ".repeat(if time.is_empty() { 0 } else { 8 } + label.chars().count() + 2);
        let mut lines = message.content.lines();
        let mut output = format!(
            "{}{}: {}{}",
            time,
            label,
            lines.next().unwrap_or_default(),
            pending
        );
        for line in lines {
            output.push('\n');
            output.push_str(&indent);
            output.push_str(line);
        }
        output
    }

    /// Session banner followed by its history.
    pub fn format_session(session: &ConversationSession, config: &OutputConfig) -> String {
        let mut output = Self::header(&format!(
            "{} @ {} ({})",
            session.username(),
            session.client().name,
            session.client().code
        ));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Session:".cyan().bold(),
            session.session_id()
        ));

        if session.messages().is_empty() {
            output.push_str(&format!("{}\n", "No previous messages.".dimmed()));
        } else {
            output.push_str(&Self::format_history(session.messages(), config));
        }
        output
    }

    pub fn format_history(messages: &[Message], config: &OutputConfig) -> String {
        let mut output = String::new();
        for message in messages {
            output.push_str(&Self::format_message(message, config));
            output.push('\n');
        }
        output
    }

    /// Numbered list of clients for the login flow.
    pub fn format_clients(clients: &[Client]) -> String {
        let mut output = format!("{}\n", "Clients:".cyan().bold());
        for (i, client) in clients.iter().enumerate() {
            output.push_str(&format!(
                "  {:>2}. {} {}\n",
                i + 1,
                client.name,
                format!("({})", client.code).dimmed()
            ));
        }
        output
    }

    /// Numbered list of a client's users for the login flow.
    pub fn format_users(users: &[UserSummary]) -> String {
        if users.is_empty() {
            return format!("{}\n", "No users yet; type a new username.".dimmed());
        }
        let mut output = format!("{}\n", "Users:".cyan().bold());
        for (i, user) in users.iter().enumerate() {
            output.push_str(&format!("  {:>2}. {}\n", i + 1, user.username));
        }
        output
    }

    /// `/status` output.
    pub fn format_status(controller: &ChatController) -> String {
        let Some(session) = controller.session() else {
            return format!(
                "{} no active session (channel {})\n",
                "Status:".cyan().bold(),
                controller.channel()
            );
        };
        let mut output = format!("{}\n", "Status:".cyan().bold());
        output.push_str(&format!(
            "  user:      {} (id {})\n",
            session.username(),
            session.user_id()
        ));
        output.push_str(&format!(
            "  client:    {} ({})\n",
            session.client().name,
            session.client().code
        ));
        output.push_str(&format!("  session:   {}\n", session.session_id()));
        output.push_str(&format!("  channel:   {}\n", controller.channel()));
        output.push_str(&format!(
            "  composing: {}\n",
            if controller.composing().is_composing() {
                "agent is typing"
            } else {
                "idle"
            }
        ));
        output.push_str(&format!(
            "  messages:  {} ({} pending)\n",
            session.messages().len(),
            session.pending_count()
        ));
        output
    }

    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    fn header(title: &str) -> String {
        let line = "═".repeat(title.chars().count().max(40) + 4);
        format!(
            "\n{}\n  {}\n{}\n",
            line.blue(),
            title.bold(),
            line.blue()
        )
    }
}
