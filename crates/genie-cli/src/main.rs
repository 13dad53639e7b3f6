//! genie - terminal client for the DataGenie analytics assistant

mod auth;
mod commands;
mod config;
mod repl;
mod ui;

use clap::Parser;
use genie_api::{HttpGateway, TokenSource};
use genie_chat::{ChatSession, MessageKind};
use genie_tui::Theme;
use std::io::{self, Write};
use std::sync::Arc;

/// genie - ask DataGenie about your business data
#[derive(Parser, Debug)]
#[command(name = "genie")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL (default: hosted DataGenie API)
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Run in non-interactive mode with a single question
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Print the reply of a single question as JSON
    #[arg(long, requires = "command")]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,

    /// Sign in with email and password (password is read from stdin)
    #[arg(long, value_name = "EMAIL")]
    login: Option<String>,

    /// Forget the stored session
    #[arg(long)]
    logout: bool,

    /// Show sign-in status
    #[arg(long)]
    auth_status: bool,
}

const LOG_FILTER: &str = "genie=debug,genie_api=debug,genie_chat=debug";

/// Verbose logging goes to stderr, or to a file while the TUI owns the screen
fn init_tracing(verbose: bool, use_tui: bool) {
    if !verbose {
        return;
    }

    if use_tui {
        let path = config::Config::config_dir().join("genie.log");
        let file = std::fs::create_dir_all(config::Config::config_dir())
            .and_then(|_| std::fs::File::create(&path));
        match file {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(LOG_FILTER)
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .init();
            }
            Err(e) => eprintln!("Warning: Failed to open log file {}: {}", path.display(), e),
        }
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(LOG_FILTER)
            .with_writer(io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Load config file
    let cfg = config::Config::load();

    let use_tui = args.command.is_none() && !args.no_tui && cfg.tui.unwrap_or(true);
    init_tracing(args.verbose, use_tui);

    let provider = cfg
        .identity_provider()
        .map(|(url, key)| auth::IdentityProvider::new(url, key));

    if let Some(email) = args.login {
        return handle_login(provider.as_ref(), &email).await;
    }

    if args.logout {
        return handle_logout();
    }

    if args.auth_status {
        return show_auth_status();
    }

    let base_url = cfg.resolve_base_url(args.base_url.as_deref());
    tracing::debug!("Using backend {}", base_url);

    let token_source = Arc::new(auth::StoredSession::new(provider));
    let user = token_source.session().await.display_name().map(str::to_string);

    let gateway = HttpGateway::new(&base_url).with_token_source(token_source);
    let session = ChatSession::new(Arc::new(gateway));

    // Non-interactive mode
    if let Some(command) = args.command {
        return run_command(session, &command, args.json).await;
    }

    // TUI mode
    if use_tui {
        let theme = cfg
            .theme
            .as_deref()
            .map(Theme::by_name)
            .unwrap_or_else(Theme::dark);
        let mut state = ui::TuiState::new(session, base_url, user.clone(), theme);
        if let Some(name) = user {
            state.notify(&format!("Signed in as {}.", name));
        }
        return ui::run_tui(state).await;
    }

    // Interactive mode (simple stdin/stdout)
    repl::run_interactive(session, &base_url, user.as_deref()).await
}

async fn run_command(mut session: ChatSession, command: &str, json: bool) -> anyhow::Result<()> {
    let Some(message) = session.send(command).await else {
        eprintln!("Error: Nothing to send");
        std::process::exit(1);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(message)?);
    } else {
        print_message(message)?;
    }

    if message.kind() == MessageKind::Error {
        std::process::exit(1);
    }
    Ok(())
}

fn print_message(message: &genie_chat::Message) -> io::Result<()> {
    match message.kind() {
        MessageKind::Error => repl::write_message(&mut io::stderr(), message),
        _ => repl::write_message(&mut io::stdout(), message),
    }
}

async fn handle_login(provider: Option<&auth::IdentityProvider>, email: &str) -> anyhow::Result<()> {
    let Some(provider) = provider else {
        eprintln!("No identity provider configured.");
        eprintln!("Add an [auth] section with url and api_key to {}", config::Config::config_path().display());
        std::process::exit(1);
    };

    eprint!("Password for {}: ", email);
    io::stderr().flush()?;

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    match auth::login(provider, email, password).await {
        Ok(creds) => {
            println!("Signed in as {}", creds.display_name());
            println!(
                "Credentials saved to {}",
                config::Config::config_dir().join("credentials.json").display()
            );
        }
        Err(e) => {
            eprintln!("Login failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn handle_logout() -> anyhow::Result<()> {
    match auth::logout() {
        Ok(()) => println!("Signed out"),
        Err(e) => {
            eprintln!("Logout failed: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn show_auth_status() -> anyhow::Result<()> {
    println!("Authentication Status");
    println!("{}", "-".repeat(40));

    if std::env::var(auth::TOKEN_ENV).is_ok_and(|t| !t.is_empty()) {
        println!("{:<12} set (overrides stored credentials)", auth::TOKEN_ENV);
    }

    let status = match auth::load_credentials() {
        Some(creds) if creds.is_expired() => format!(
            "Signed in as {} (token expired, will refresh on next use)",
            creds.email
        ),
        Some(creds) => {
            let expires = chrono::DateTime::from_timestamp_millis(creds.expires)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!("Signed in as {} (expires: {})", creds.email, expires)
        }
        None => "Not signed in".to_string(),
    };
    println!("{:<12} {}", "Session", status);

    println!();
    println!("Login with: genie --login <email>");
    println!("Logout with: genie --logout");

    Ok(())
}
