//! CLI entrypoint for agentdesk
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use agentdesk_application::{
    BrowseDirectoryUseCase, ChatNotifier, ChatRuntime, ConversationLogger, NoConversationLogger,
};
use agentdesk_infrastructure::{
    AgentApiClient, ConfigLoader, CoreApiClient, FileConfig, JsonlConversationLogger,
    WebSocketPushChannel,
};
use agentdesk_presentation::{ChatRepl, Cli, ConsoleChatNotifier, ConsoleFormatter, OutputConfig};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting agentdesk");

    // === Dependency Injection ===
    let timeout = config.core.timeout();
    let core = Arc::new(
        CoreApiClient::new(&config.core.base_url, timeout).context("invalid core API settings")?,
    );
    let directory = BrowseDirectoryUseCase::new(core.clone());

    if cli.list_clients {
        let clients = directory
            .active_clients()
            .await
            .context("could not list clients")?;
        print!("{}", ConsoleFormatter::format_clients(&clients));
        return Ok(());
    }

    let agent = Arc::new(
        AgentApiClient::new(
            &config.agent.base_url,
            &config.agent.question_endpoint,
            timeout,
        )
        .context("invalid agent API settings")?,
    );
    let push_base = config
        .agent
        .push_base_url()
        .ok_or_else(|| anyhow!("cannot derive a push channel address from agent.base_url"))?;
    let push = Arc::new(WebSocketPushChannel::new(push_base));

    let output = OutputConfig {
        color: !cli.no_color && config.output.color,
        show_timestamps: config.output.show_timestamps,
        show_progress: !cli.quiet,
    };
    let notifier: Arc<dyn ChatNotifier> = Arc::new(ConsoleChatNotifier::new(output.clone()));
    let conversation_logger: Arc<dyn ConversationLogger> = match &config.logging.transcript {
        Some(path) => match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    let runtime = ChatRuntime::new(core, agent, push, config.chat_config())
        .with_notifier(notifier)
        .with_conversation_logger(conversation_logger);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut repl = ChatRepl::new(runtime, directory, output, stdin)
        .with_login(cli.client.clone(), cli.username.clone());
    repl.run().await?;

    Ok(())
}

/// Initialize logging based on verbosity level.
///
/// Logs go to stderr, or to `--log-file` through a non-blocking writer whose
/// guard must live until exit.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("could not create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Load file configuration, apply command-line overrides and validate.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    if cli.serialize_sends {
        config.chat.serialize_sends = true;
    }
    if let Some(path) = &cli.transcript {
        config.logging.transcript = Some(path.clone());
    }

    let issues = config.validate();
    let mut errors = Vec::new();
    for issue in issues {
        if issue.is_error() {
            errors.push(issue.to_string());
        } else {
            warn!("{}", issue.message);
        }
    }
    if !errors.is_empty() {
        bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }

    Ok(config)
}
