//! REPL (Read-Eval-Print Loop) for the operator chat

use super::login::{resolve_client, resolve_username};
use crate::config::OutputConfig;
use crate::output::console::ConsoleFormatter;
use agentdesk_application::{BrowseDirectoryUseCase, ChatError, ChatRuntime};
use colored::Colorize;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

/// Whether the REPL keeps going after handling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interactive chat REPL
///
/// Reads operator input line by line while applying push frames and
/// delivery outcomes as they arrive.
pub struct ChatRepl<R> {
    runtime: ChatRuntime,
    directory: BrowseDirectoryUseCase,
    output: OutputConfig,
    input: Lines<R>,
    preset_client: Option<String>,
    preset_username: Option<String>,
}

impl<R: AsyncBufRead + Unpin> ChatRepl<R> {
    pub fn new(
        runtime: ChatRuntime,
        directory: BrowseDirectoryUseCase,
        output: OutputConfig,
        input: R,
    ) -> Self {
        Self {
            runtime,
            directory,
            output,
            input: input.lines(),
            preset_client: None,
            preset_username: None,
        }
    }

    /// Skip (part of) the interactive login for the first session.
    pub fn with_login(mut self, client: Option<String>, username: Option<String>) -> Self {
        self.preset_client = client;
        self.preset_username = username;
        self
    }

    pub fn runtime(&self) -> &ChatRuntime {
        &self.runtime
    }

    /// Run the interactive REPL until `/quit` or end of input
    pub async fn run(&mut self) -> io::Result<()> {
        self.print_welcome();

        let client = self.preset_client.take();
        let username = self.preset_username.take();
        let flow = match (client, username) {
            (Some(client), Some(username)) => {
                self.start_session(&username, &client).await;
                Flow::Continue
            }
            (client, _) => self.login(client).await?,
        };
        if flow == Flow::Quit {
            println!("Bye!");
            return Ok(());
        }

        loop {
            tokio::select! {
                line = self.input.next_line() => {
                    let Some(line) = line? else {
                        println!("Bye!");
                        break;
                    };
                    if self.handle_line(line).await? == Flow::Quit {
                        println!("Bye!");
                        break;
                    }
                }
                event = self.runtime.process_next() => {
                    debug!("Runtime event: {:?}", event);
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            agentdesk - Operator Chat        │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /user             - Change client/user (starts a new session)");
        println!("  /history          - Show the conversation so far");
        println!("  /status           - Show session and channel state");
        println!("  /quit, /exit, /q  - Exit");
        println!();
    }

    async fn handle_line(&mut self, line: String) -> io::Result<Flow> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Flow::Continue);
        }
        if trimmed.starts_with('/') {
            return self.handle_command(trimmed).await;
        }

        if !self.runtime.has_session() {
            println!("No active session. Use /user to start one.");
            return Ok(Flow::Continue);
        }

        let mut draft = line;
        match self.runtime.submit(&mut draft) {
            Ok(_) => {}
            Err(ChatError::AwaitingReply) => {
                println!(
                    "{}",
                    "The agent is still replying; wait for the answer before sending again."
                        .yellow()
                );
            }
            Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
        }
        Ok(Flow::Continue)
    }

    /// Handle slash commands.
    async fn handle_command(&mut self, cmd: &str) -> io::Result<Flow> {
        match cmd {
            "/quit" | "/exit" | "/q" => return Ok(Flow::Quit),
            "/help" | "/h" | "/?" => {
                println!();
                Self::print_help();
            }
            "/user" => {
                self.runtime.change_user();
                return self.login(None).await;
            }
            "/history" => match self.runtime.controller().session() {
                Some(session) => print!(
                    "{}",
                    ConsoleFormatter::format_history(session.messages(), &self.output)
                ),
                None => println!("No active session."),
            },
            "/status" => print!(
                "{}",
                ConsoleFormatter::format_status(self.runtime.controller())
            ),
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        Ok(Flow::Continue)
    }

    /// Interactive client and user selection, then session bootstrap.
    ///
    /// A failed bootstrap is reported and leaves the REPL without a session.
    async fn login(&mut self, client_code: Option<String>) -> io::Result<Flow> {
        let client_code = match client_code {
            Some(code) => code,
            None => match self.choose_client().await? {
                Some(code) => code,
                None => return Ok(Flow::Quit),
            },
        };

        let users = match self.directory.users_for(&client_code).await {
            Ok(users) => users,
            Err(e) => {
                println!("{}", ConsoleFormatter::format_error(&e.to_string()));
                Vec::new()
            }
        };
        print!("{}", ConsoleFormatter::format_users(&users));

        let username = loop {
            let Some(line) = self.prompt("user (number or new name)>").await? else {
                return Ok(Flow::Quit);
            };
            if line.trim() == "/quit" {
                return Ok(Flow::Quit);
            }
            if let Some(username) = resolve_username(&line, &users) {
                break username;
            }
        };

        self.start_session(&username, &client_code).await;
        Ok(Flow::Continue)
    }

    /// Returns the chosen client code, or `None` to quit.
    async fn choose_client(&mut self) -> io::Result<Option<String>> {
        let clients = match self.directory.active_clients().await {
            Ok(clients) => clients,
            Err(e) => {
                println!("{}", ConsoleFormatter::format_error(&e.to_string()));
                Vec::new()
            }
        };
        if clients.is_empty() {
            println!("No active clients available; enter a client code.");
        } else {
            print!("{}", ConsoleFormatter::format_clients(&clients));
        }

        loop {
            let Some(line) = self.prompt("client>").await? else {
                return Ok(None);
            };
            let line = line.trim();
            if line == "/quit" {
                return Ok(None);
            }
            if clients.is_empty() && !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
            match resolve_client(line, &clients) {
                Some(client) => return Ok(Some(client.code.clone())),
                None if line.is_empty() => {}
                None => println!("Unknown client: {}", line),
            }
        }
    }

    async fn start_session(&mut self, username: &str, client_code: &str) {
        if let Err(e) = self.runtime.start_session(username, client_code).await {
            println!("{}", ConsoleFormatter::format_error(&e.to_string()));
            println!("Use /user to try again.");
        }
    }

    async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{} ", label.bold());
        io::stdout().flush()?;
        self.input.next_line().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdesk_application::{
        ChatConfig, ClientDirectory, DeliveryRequest, GatewayError, MessageDelivery, PushChannel,
        PushConnection, SessionGateway,
    };
    use agentdesk_domain::{Client, ClientRef, ConversationSession, SessionRequest, UserSummary};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct FakeBackend {
        sessions: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SessionGateway for FakeBackend {
        async fn resolve_session(
            &self,
            request: &SessionRequest,
        ) -> Result<ConversationSession, GatewayError> {
            self.sessions.lock().unwrap().push((
                request.username().to_string(),
                request.client_code().to_string(),
            ));
            Ok(ConversationSession::new(
                1,
                request.username(),
                ClientRef {
                    id: 1,
                    code: request.client_code().to_string(),
                    name: "Acme".to_string(),
                },
                "s1",
                vec![],
            )
            .unwrap())
        }
    }

    #[async_trait]
    impl ClientDirectory for FakeBackend {
        async fn clients(&self) -> Result<Vec<Client>, GatewayError> {
            Ok(vec![
                Client {
                    id: 1,
                    code: "OLD".to_string(),
                    name: "Old Corp".to_string(),
                    status: "Inactivo".to_string(),
                },
                Client {
                    id: 2,
                    code: "ACME".to_string(),
                    name: "Acme".to_string(),
                    status: "Activo".to_string(),
                },
            ])
        }

        async fn users_for_client(&self, _code: &str) -> Result<Vec<UserSummary>, GatewayError> {
            Ok(vec![UserSummary {
                id: 4,
                username: "ana".to_string(),
            }])
        }
    }

    #[async_trait]
    impl MessageDelivery for FakeBackend {
        async fn deliver(&self, _request: &DeliveryRequest) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    impl PushChannel for FakeBackend {
        fn open(&self, user_id: i64) -> PushConnection {
            // Keep the connection idle: the feed is dropped immediately,
            // which the runtime sees as a closed channel.
            let (_feed, connection) = PushConnection::pair(user_id);
            connection
        }
    }

    fn repl(script: &'static str) -> (ChatRepl<&'static [u8]>, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend {
            sessions: Mutex::new(Vec::new()),
        });
        let runtime = ChatRuntime::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            ChatConfig::default(),
        );
        let directory = BrowseDirectoryUseCase::new(backend.clone());
        let repl = ChatRepl::new(runtime, directory, OutputConfig::default(), script.as_bytes());
        (repl, backend)
    }

    #[tokio::test]
    async fn test_login_then_send() {
        // Client 1 of the active list is ACME; user 1 is "ana"
        let (mut repl, backend) = repl("1\n1\nhola\n/status\n/quit\n");
        repl.run().await.unwrap();

        assert_eq!(
            backend.sessions.lock().unwrap().as_slice(),
            [("ana".to_string(), "ACME".to_string())]
        );
        let messages = repl.runtime().controller().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hola");
    }

    #[tokio::test]
    async fn test_preset_login_skips_prompts() {
        let (repl, backend) = repl("/quit\n");
        let mut repl = repl.with_login(Some("ACME".to_string()), Some("luis".to_string()));
        repl.run().await.unwrap();
        assert_eq!(
            backend.sessions.lock().unwrap().as_slice(),
            [("luis".to_string(), "ACME".to_string())]
        );
    }

    #[tokio::test]
    async fn test_new_username_and_user_switch() {
        let (mut repl, backend) = repl("acme\nmaria\n/user\n1\n1\n/quit\n");
        repl.run().await.unwrap();
        assert_eq!(
            backend.sessions.lock().unwrap().as_slice(),
            [
                ("maria".to_string(), "ACME".to_string()),
                ("ana".to_string(), "ACME".to_string())
            ]
        );
        assert_eq!(
            repl.runtime().controller().session().unwrap().username(),
            "ana"
        );
    }

    #[tokio::test]
    async fn test_end_of_input_during_login_quits() {
        let (mut repl, backend) = repl("1\n");
        repl.run().await.unwrap();
        assert!(backend.sessions.lock().unwrap().is_empty());
        assert!(!repl.runtime().has_session());
    }

    #[tokio::test]
    async fn test_text_without_session_is_not_sent() {
        let (mut repl, _backend) = repl("/quit\n");
        let flow = repl.handle_line("hola".to_string()).await.unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(repl.runtime().controller().messages().is_empty());
    }
}
