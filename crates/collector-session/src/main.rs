/*
[INPUT]:  CLI arguments, optional YAML configuration file
[OUTPUT]: Settings, login, task list and the interactive collector loop
[POS]:    Binary entry point
[UPDATE]: When changing CLI subcommands, flags, or startup flow
*/

mod cli;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use collector_session::{AppConfig, CollectorApp, JsonSettingsStore};

#[derive(Parser, Debug)]
#[command(name = "wms-collector", version, about = "Warehouse collector task client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    /// Overrides `log.level` from the config file
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<String>,
    /// Validate configuration and exit
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save service URL and tenant, then validate the tenant
    Settings {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        tenant: Option<String>,
    },
    /// Log in and show where the worker lands
    Login {
        #[arg(long)]
        user: String,
        /// Prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// List open tasks for the logged-in worker
    Tasks,
    /// Interactive login, task selection and scanning
    Run,
    /// Notify the backend that the worker left
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let config = load_config(args.config_path.as_deref())?;
    let log_level = args
        .log_level
        .clone()
        .or_else(|| config.log.level.clone())
        .unwrap_or_else(|| "info".to_string());
    let _log_guard = init_tracing(&log_level, config.log.file.as_deref())?;

    info!(
        config_path = ?args.config_path,
        dry_run = args.dry_run,
        "starting wms-collector"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let store = match &config.settings_path {
        Some(path) => JsonSettingsStore::open(path).await,
        None => JsonSettingsStore::new().await,
    }
    .context("open settings store")?;
    info!(path = %store.path().display(), "settings loaded");

    let mut app = CollectorApp::new(Arc::new(store), config.client_config());

    match args.command.unwrap_or(Command::Run) {
        Command::Settings { url, tenant } => cli::configure(&mut app, url, tenant).await,
        Command::Login { user, password } => cli::login(&mut app, &user, password).await,
        Command::Tasks => cli::list_tasks(&mut app).await,
        Command::Run => cli::interactive::run_interactive(&mut app).await,
        Command::Logout => cli::logout(&mut app).await,
    }
}

/// Logs go to stderr, or to a daily-rolling file when `log.file` is set so
/// they do not interleave with the interactive prompts.
fn init_tracing(log_level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    let Some(log_file) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow!(err))
            .context("initialize tracing subscriber")?;
        return Ok(None);
    };

    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .context("log.file must name a file")?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("create log dir {}", directory.display()))?;

    let appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(Some(guard))
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let path_str = path
        .to_str()
        .context("config path must be valid utf-8")?;
    AppConfig::from_file(path_str).context("load config")
}
