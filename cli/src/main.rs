//! Command-line chat client: login/logout/history one-shots and an
//! interactive `chat` session on stdin/stdout.
//!
//! Logs go to stderr through `tracing`; chat output goes to stdout as
//! `[HH:MM:SS] name: body`.


use std::io;

use chatroom::config::ConfigError;
use chatroom::history::LATEST_PAGE;
use chatroom::http::HttpClient;
use chatroom::reconnect::{CLOSE_GOING_AWAY, LEGACY_RECONNECT_DELAY};
use chatroom::socket::{self, SessionUpdate};
use chatroom::{ClientConfig, ClientError, HistoryPager, Message, ReconnectPolicy};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("stdin read failed: {0}")]
    Stdin(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chat-cli", about = "Chat server HTTP and websocket CLI")]
struct Cli {
    /// Server origin; overrides `CHAT_BASE_URL` from the environment.
    #[arg(long)]
    base_url: Option<String>,

    /// Reconnect policy for `chat`; overrides `CHAT_RECONNECT`.
    #[arg(long, value_enum)]
    reconnect: Option<ReconnectArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the bearer token.
    Login {
        #[arg(long, env = "CHAT_USER")]
        user: String,
        #[arg(long, env = "CHAT_PASSWORD")]
        password: String,
    },
    /// Invalidate a token.
    Logout {
        #[arg(long, env = "CHAT_TOKEN")]
        token: String,
    },
    /// Print one history page as JSON.
    History {
        #[arg(long, env = "CHAT_TOKEN")]
        token: String,
        /// Page number; -1 is the newest page.
        #[arg(long, default_value_t = LATEST_PAGE, allow_negative_numbers = true)]
        page: i64,
    },
    /// Interactive session: log in, join, and chat from stdin.
    Chat {
        #[arg(long, env = "CHAT_USER")]
        user: String,
        #[arg(long, env = "CHAT_PASSWORD")]
        password: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReconnectArg {
    Never,
    Legacy,
    Fixed,
}

/// One line typed into an interactive session.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Empty,
    Send(String),
    More,
    Quit,
}

/// Only a truly empty line is skipped; whitespace is sent as typed.
fn parse_input(line: &str) -> Input {
    if line.is_empty() {
        return Input::Empty;
    }
    match line.trim() {
        "/more" => Input::More,
        "/quit" => Input::Quit,
        _ => Input::Send(line.to_owned()),
    }
}

fn format_message(msg: &Message) -> String {
    format!("[{}] {msg}", msg.time_label())
}

/// Apply the `--base-url` and `--reconnect` flags on top of the env config.
fn resolve_config(mut config: ClientConfig, base_url: Option<&str>, reconnect: Option<ReconnectArg>) -> Result<ClientConfig, ConfigError> {
    if let Some(url) = base_url {
        config.base_url = ClientConfig::for_base_url(url)?.base_url;
    }
    match reconnect {
        None => {}
        Some(ReconnectArg::Never) => config.reconnect = ReconnectPolicy::Never,
        Some(ReconnectArg::Legacy) => config.reconnect = ReconnectPolicy::legacy(),
        Some(ReconnectArg::Fixed) => {
            // Keep delay/attempt tuning from the environment if it asked for fixed too.
            if !matches!(config.reconnect, ReconnectPolicy::Fixed { .. }) {
                config.reconnect = ReconnectPolicy::Fixed {
                    delay: LEGACY_RECONNECT_DELAY,
                    exempt_codes: vec![CLOSE_GOING_AWAY],
                    max_attempts: None,
                };
            }
        }
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    if let Err(err) = dotenvy::dotenv() {
        // A missing .env file is the common case.
        if !err.not_found() {
            eprintln!("ignoring .env: {err}");
        }
    }
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = resolve_config(ClientConfig::from_env()?, cli.base_url.as_deref(), cli.reconnect)?;
    debug!(base_url = %config.base_url, reconnect = ?config.reconnect, "config loaded");
    let http = HttpClient::new(&config)?;

    match cli.command {
        Command::Login { user, password } => {
            let token = http.login(&user, &password).await?;
            println!("{token}");
            Ok(())
        }
        Command::Logout { token } => {
            http.logout(&token).await?;
            println!("ok");
            Ok(())
        }
        Command::History { token, page } => {
            let history = http.history(page, &token).await?;
            println!("{}", serde_json::to_string_pretty(&history)?);
            Ok(())
        }
        Command::Chat { user, password } => run_chat(&config, &http, &user, &password).await,
    }
}

async fn run_chat(config: &ClientConfig, http: &HttpClient, user: &str, password: &str) -> Result<(), CliError> {
    let token = http.login(user, password).await?;
    info!(%user, "logged in");

    let mut pager = HistoryPager::new();
    print_older_page(http, &token, &mut pager).await;

    let mut handle = socket::connect(config, &token, user);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            update = handle.next_update() => match update {
                Some(SessionUpdate::Resumed) => {
                    info!("reconnected");
                    // The close dropped everything shown so far; start over from the newest page.
                    pager = HistoryPager::new();
                    print_older_page(http, &token, &mut pager).await;
                }
                Some(update) => render_update(update),
                None => break,
            },
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Send(body) => {
                        if let Err(err) = handle.send(&body) {
                            eprintln!("Publish failed: {err}");
                        }
                    }
                    Input::More => print_older_page(http, &token, &mut pager).await,
                    Input::Quit => {
                        stdin_open = false;
                        handle.close();
                    }
                },
                None => {
                    stdin_open = false;
                    handle.close();
                }
            },
        }
    }
    handle.join().await;

    if let Err(err) = http.logout(&token).await {
        warn!(error = %err, "logout failed");
    }
    Ok(())
}

fn render_update(update: SessionUpdate) {
    match update {
        SessionUpdate::Connected | SessionUpdate::Resumed => info!("connected"),
        SessionUpdate::Identity(me) => info!(id = %me.id, name = %me.name, "joined"),
        SessionUpdate::Message { message, .. } => println!("{}", format_message(&message)),
        SessionUpdate::Discarded(reason) => warn!(%reason, "dropped frame"),
        SessionUpdate::Rejected => warn!("dropped binary frame"),
        SessionUpdate::IdentityMismatch { expected, actual } => {
            eprintln!("server identified this session as {actual}, expected {expected}; disconnecting");
        }
        SessionUpdate::SendFailed(reason) => eprintln!("Publish failed: {reason}"),
        SessionUpdate::DialFailed(reason) => eprintln!("connection failed: {reason}"),
        SessionUpdate::Closed { code, reconnect_in: Some(delay) } => {
            eprintln!("disconnected (code {code:?}); reconnecting in {}ms", delay.as_millis());
        }
        SessionUpdate::Closed { code, reconnect_in: None } => eprintln!("disconnected (code {code:?})"),
    }
}

/// Fetch and print the next older page; failures are reported, not fatal.
async fn print_older_page(http: &HttpClient, token: &str, pager: &mut HistoryPager) {
    let Some(page) = pager.begin() else {
        eprintln!("no older messages");
        return;
    };
    match http.history(page, token).await {
        Ok(history) => {
            pager.complete(history.page);
            println!("-- history page {} --", history.page);
            for msg in &history.messages {
                println!("{}", format_message(msg));
            }
        }
        Err(err) => {
            pager.fail();
            eprintln!("History failed: {err}");
        }
    }
}
