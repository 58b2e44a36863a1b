//! installer-settings: host binary for the settings store.
//!
//! Plays the part of the application's lifecycle manager: it opens the
//! settings, registers them for shutdown, runs one command, and then fires
//! shutdown so the settings file is written exactly once.
//!
//! # Usage
//!
//! ```text
//! installer-settings [OPTIONS] <COMMAND>
//!
//! Commands:
//!   status   Show install state (fresh, already installed, version changed)
//!   get      Print one value
//!   put      Store a value (omit VALUE to store an empty string)
//!   show     Print every setting
//!   expand   Expand ${name} placeholders using the settings
//!   run      Keep the settings open until Ctrl-C, then persist
//!
//! Options:
//!   --config <PATH>               Settings file [env: INSTALLER_SETTINGS_CONFIG]
//!   --installer-version <VERSION> Running version [env: INSTALLER_VERSION]
//!   --host-config <PATH>          host.toml [env: INSTALLER_SETTINGS_HOST_CONFIG]
//! ```
//!
//! Values are resolved in the order CLI/env, then `host.toml`, then built-in
//! defaults (the platform config directory and this binary's version).

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use installer_settings::infrastructure::storage::host_config::{
    self, HostConfig, HostConfigError,
};
use installer_settings::{expand_symbols, ConfigurationStore, ShutdownRegistry};
use settings_core::{InstallState, INSTALLER_VERSION, PREVIOUS_INSTALLER_VERSION};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Persistent installer settings with version tracking.
#[derive(Debug, Parser)]
#[command(
    name = "installer-settings",
    about = "Open, inspect, and update an application's installer settings",
    version
)]
struct Cli {
    /// Path of the settings properties file.
    #[arg(long, env = "INSTALLER_SETTINGS_CONFIG")]
    config: Option<PathBuf>,

    /// Version of the running application, compared with the recorded one.
    #[arg(long, env = "INSTALLER_VERSION")]
    installer_version: Option<String>,

    /// Path of the TOML host config.
    #[arg(long, env = "INSTALLER_SETTINGS_HOST_CONFIG")]
    host_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show how opening the settings concluded.
    Status {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the value stored under KEY.
    Get { key: String },
    /// Store VALUE under KEY; without VALUE an empty string is stored.
    Put { key: String, value: Option<String> },
    /// Print every setting in key order.
    Show {
        /// Print as a JSON object.
        #[arg(long)]
        json: bool,
    },
    /// Expand ${name} placeholders in TEMPLATE.
    Expand { template: String },
    /// Keep the settings open until Ctrl-C, then persist them.
    Run,
}

/// `status` output.
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    path: String,
    state: &'static str,
    already_installed: bool,
    installer_version: Option<&'a str>,
    previous_version: Option<&'a str>,
}

// ── Startup ───────────────────────────────────────────────────────────────────

fn load_host(cli_path: Option<&PathBuf>) -> anyhow::Result<HostConfig> {
    let path = match cli_path {
        Some(path) => path.clone(),
        None => match host_config::default_host_config_path() {
            Ok(path) => path,
            Err(HostConfigError::NoPlatformConfigDir) => return Ok(HostConfig::default()),
            Err(e) => return Err(e.into()),
        },
    };
    host_config::load_host_config(&path)
        .with_context(|| format!("failed to load host config {}", path.display()))
}

/// Resolves the settings path, creating the default directory when it is used.
fn resolve_settings_path(cli: Option<PathBuf>, host: &HostConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.or_else(|| host.config_file_path.clone()) {
        return Ok(path);
    }

    let path = host_config::default_settings_path()
        .context("no --config given and no platform config directory available")?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    Ok(path)
}

fn init_logging(default_level: &str) {
    // `RUST_LOG` wins over the host config level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let host = load_host(cli.host_config.as_ref())?;
    init_logging(&host.log_level);

    let path = resolve_settings_path(cli.config, &host)?;
    let version = cli
        .installer_version
        .or_else(|| host.installer_version.clone())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    let store = ConfigurationStore::open(&path, &version)
        .with_context(|| format!("failed to open settings {}", path.display()))?;
    let store = Arc::new(Mutex::new(store));

    let mut registry = ShutdownRegistry::new();
    registry.register(store.clone());

    let outcome = execute(cli.command, &store).await;
    let persisted = registry.shutdown();

    match (outcome, persisted) {
        (Ok(()), persisted) => persisted.context("failed to persist settings"),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(persist_err)) => {
            error!("failed to persist settings: {persist_err}");
            Err(e)
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn execute(command: Command, store: &Mutex<ConfigurationStore>) -> anyhow::Result<()> {
    match command {
        Command::Run => {
            info!("settings open; press Ctrl-C to persist and exit");
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?;
            info!("shutdown signal received");
            Ok(())
        }
        other => execute_locked(other, store),
    }
}

fn execute_locked(command: Command, store: &Mutex<ConfigurationStore>) -> anyhow::Result<()> {
    let mut store = store
        .lock()
        .map_err(|_| anyhow!("settings lock poisoned"))?;

    match command {
        Command::Status { json } => print_status(&store, json)?,
        Command::Get { key } => match store.get(&key) {
            Some(value) => println!("{value}"),
            None => {
                warn!(key = %key, "no such setting");
                return Err(anyhow!("no setting named '{key}'"));
            }
        },
        Command::Put { key, value } => store.put(key, value.as_deref()),
        Command::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.properties())?);
            } else {
                for (key, value) in store.properties() {
                    println!("{key}={value}");
                }
            }
        }
        Command::Expand { template } => println!("{}", expand_symbols(&template, &*store)?),
        // Waits on the async runtime; see `execute`.
        Command::Run => {}
    }
    Ok(())
}

fn print_status(store: &ConfigurationStore, json: bool) -> anyhow::Result<()> {
    let state = match store.install_state() {
        InstallState::FreshInstall => "fresh-install",
        InstallState::AlreadyInstalled => "already-installed",
        InstallState::VersionChanged { .. } => "version-changed",
    };
    let report = StatusReport {
        path: store.path().display().to_string(),
        state,
        already_installed: store.is_already_installed(),
        installer_version: store.get(INSTALLER_VERSION),
        previous_version: store.get(PREVIOUS_INSTALLER_VERSION),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("path:              {}", report.path);
        println!("state:             {}", report.state);
        println!("already installed: {}", report.already_installed);
        println!("installer version: {}", report.installer_version.unwrap_or("-"));
        println!("previous version:  {}", report.previous_version.unwrap_or("-"));
    }
    Ok(())
}
