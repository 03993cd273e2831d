//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for agentdesk
#[derive(Parser, Debug)]
#[command(name = "agentdesk")]
#[command(author, version, about = "Operator console for chatting with a support agent")]
#[command(long_about = r#"
agentdesk opens a chat session with the agent service on behalf of a client user.

A session is bootstrapped from the core API (history included), outbound
messages go to the agent's question endpoint, and replies arrive over a
WebSocket push channel.

Configuration files are loaded from (in priority order):
1. AGENTDESK_<SECTION>__<KEY>          Environment variables
2. --config <path>                     Explicit config file
3. ./agentdesk.toml                    Project-level config
4. ~/.config/agentdesk/config.toml     Global config

Example:
  agentdesk
  agentdesk --client ACME --username ana
  agentdesk --list-clients
"#)]
pub struct Cli {
    /// Client code to chat as (skips the interactive client choice)
    #[arg(long, value_name = "CODE")]
    pub client: Option<String>,

    /// Username to chat as (needs --client)
    #[arg(short, long, value_name = "NAME", requires = "client")]
    pub username: Option<String>,

    /// Print the active clients and exit
    #[arg(long)]
    pub list_clients: bool,

    /// Refuse to send while the agent is still replying
    #[arg(long)]
    pub serialize_sends: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Append a JSONL transcript of the conversation to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide the typing indicator
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_login_flags() {
        let cli = Cli::parse_from(["agentdesk", "--client", "ACME", "-u", "ana", "-vv"]);
        assert_eq!(cli.client.as_deref(), Some("ACME"));
        assert_eq!(cli.username.as_deref(), Some("ana"));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.serialize_sends);
    }

    #[test]
    fn test_username_requires_client() {
        assert!(Cli::try_parse_from(["agentdesk", "--username", "ana"]).is_err());
    }
}
