//! smsir CLI
//!
//! Send SMS, check credit and lines through SMS.ir, or drive everything
//! from an interactive menu.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use smsir::api::{ApiError, SmsApi, SmsClient};
use smsir::config::{log_path_for, ConfigError, CredentialStore, Credentials, FileStore};
use smsir::report::{format_credentials, format_credit, format_lines, format_receipt};
use smsir::tui::{self, Exit, Launcher, RunError};
use smsir::types::{resolve_line, split_mobiles, BulkSendRequest, LineError, OutputFormat};

#[derive(Parser)]
#[command(name = "smsir")]
#[command(about = "SMS.ir CLI - A simple message can connect worlds with a single command")]
#[command(long_about = "SMS.ir CLI: send SMS messages, check your credit and sending lines, \
or use the interactive menu.\n\n\
Quick start:\n  \
smsir config set --api-key KEY --line LINE\n  \
smsir send -m \"Hello\" -t 09120000000\n  \
smsir credit\n  \
smsir lines\n  \
smsir menu")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.smsir/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show more details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API key and line number
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Send an SMS to one or more mobile numbers
    Send {
        /// Message text to send
        #[arg(short, long)]
        message: String,

        /// Comma-separated list of mobile numbers
        #[arg(short = 't', long)]
        to: String,

        /// Line number (uses the configured one if omitted)
        #[arg(short, long)]
        line: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Show current credit balance
    Credit {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// List available sending lines
    Lines {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Launch the interactive menu
    Menu,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Save API key and default line number
    Set {
        /// SMS.ir API key
        #[arg(long)]
        api_key: String,

        /// Default line number
        #[arg(long)]
        line: String,
    },

    /// Show the current configuration (API key masked)
    Show {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Check that API key and line number are set
    Validate,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Error)]
enum CommandError {
    #[error("error loading configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0}")]
    Usage(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    };

    let store = match cli.config {
        Some(path) => FileStore::new(path),
        None => match FileStore::at_default_location() {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let log_file = matches!(command, Commands::Menu).then(|| log_path_for(store.path()));
    let _guard = init_tracing(cli.verbose, log_file.as_deref());

    let result = match command {
        Commands::Config { action } => match action {
            ConfigAction::Set { api_key, line } => cmd_config_set(&store, api_key, line),
            ConfigAction::Show { format } => cmd_config_show(&store, format.into()),
            ConfigAction::Validate => cmd_config_validate(&store),
        },
        Commands::Send {
            message,
            to,
            line,
            format,
        } => cmd_send(&store, &message, &to, line.as_deref(), format.into()).await,
        Commands::Credit { format } => cmd_credit(&store, format.into()).await,
        Commands::Lines { format } => cmd_lines(&store, format.into()).await,
        Commands::Menu => cmd_menu(store).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// LOGGING
// ============================================================================

/// Install the global subscriber.
///
/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`. With a
/// log file (the interactive menu owns the terminal) output goes there
/// through a non-blocking writer whose guard must outlive the session.
fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let target = log_file.and_then(|path| Some((path.parent()?, path.file_name()?)));
    match target {
        Some((dir, name)) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
            None
        }
    }
}

// ============================================================================
// PROGRESS HELPERS
// ============================================================================

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.yellow} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Await a remote call, with a spinner on stderr in human mode.
async fn with_spinner<T>(
    format: OutputFormat,
    msg: &str,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    if format != OutputFormat::Human {
        return call.await;
    }
    let pb = spinner(msg);
    let result = call.await;
    pb.finish_and_clear();
    result
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_config_set(store: &FileStore, api_key: String, line: String) -> Result<(), CommandError> {
    let mut credentials = store.load_stored().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "existing configuration unreadable, starting from defaults");
        Credentials::default()
    });
    credentials.api_key = api_key;
    credentials.line_number = line;
    store.save(&credentials)?;

    println!("Configuration saved successfully");
    Ok(())
}

fn cmd_config_show(store: &FileStore, format: OutputFormat) -> Result<(), CommandError> {
    let credentials = store.load()?;
    print!("{}", format_credentials(&credentials, format));
    Ok(())
}

fn cmd_config_validate(store: &FileStore) -> Result<(), CommandError> {
    let credentials = store.load()?;
    credentials.validate().map_err(CommandError::Invalid)?;
    println!("Configuration is valid");
    Ok(())
}

/// Load credentials and build a client. Only the key is mandatory here;
/// `send --line` works without a configured line.
fn connect(store: &FileStore) -> Result<(Credentials, SmsClient), CommandError> {
    let credentials = store.load()?;
    if credentials.api_key.is_empty() {
        return Err(CommandError::Invalid(ConfigError::MissingApiKey));
    }
    let client = SmsClient::new(&credentials)?;
    Ok((credentials, client))
}

async fn cmd_send(
    store: &FileStore,
    message: &str,
    to: &str,
    line: Option<&str>,
    format: OutputFormat,
) -> Result<(), CommandError> {
    if message.is_empty() {
        return Err(CommandError::Usage("message is required".to_string()));
    }
    if to.trim().is_empty() {
        return Err(CommandError::Usage("to mobiles is required".to_string()));
    }

    let (credentials, client) = connect(store)?;
    let line_number =
        resolve_line(line.unwrap_or_default(), &credentials.line_number).map_err(|e| match e {
            LineError::Missing => CommandError::Usage(
                "line number is required (use --line flag or configure it)".to_string(),
            ),
            invalid => CommandError::Usage(invalid.to_string()),
        })?;

    let request = BulkSendRequest::new(line_number, message, split_mobiles(to));
    let receipt = with_spinner(format, "Sending SMS...", client.send_bulk(&request)).await?;

    print!("{}", format_receipt(&receipt, format));
    Ok(())
}

async fn cmd_credit(store: &FileStore, format: OutputFormat) -> Result<(), CommandError> {
    let (_, client) = connect(store)?;
    let credit = with_spinner(format, "Fetching credit...", client.balance()).await?;
    print!("{}", format_credit(credit, format));
    Ok(())
}

async fn cmd_lines(store: &FileStore, format: OutputFormat) -> Result<(), CommandError> {
    let (_, client) = connect(store)?;
    let lines = with_spinner(format, "Fetching lines...", client.lines()).await?;
    print!("{}", format_lines(&lines, format));
    Ok(())
}

async fn cmd_menu(store: FileStore) -> Result<(), CommandError> {
    let launcher = Launcher::with_http_client(Box::new(store));
    match tui::run(launcher).await? {
        Exit::Quit => println!("Goodbye! 👋"),
        Exit::Help => {
            Cli::command().print_help()?;
            println!();
        }
    }
    Ok(())
}
