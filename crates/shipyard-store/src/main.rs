//! `shipyard` command-line entry point.
//!
//! Resolves a dashboard configuration the same way the web UI does and lets
//! the display overrides and local section edits be inspected or changed
//! from a terminal.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_settings()            -- settings.toml, or defaults
//!  └─ tracing subscriber         -- RUST_LOG, else settings.log_level
//!  └─ ConfigStore::new(...)
//!       ├─ HttpFetcher | DirectoryFetcher   (from --base)
//!       ├─ StaticAuth                        (from --role / [auth])
//!       ├─ JsonFileStorage | MemoryStorage   (from [storage] / --ephemeral)
//!       └─ TracingReporter
//!  └─ resolve_config(--page)
//!  └─ run the subcommand, print its result to stdout
//! ```
//!
//! Logs go to stderr so stdout can be piped.  A critical error left in the
//! store after the command ran makes the process exit with status 1, after
//! the best-effort output has been printed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shipyard_core::make_page_name;
use shipyard_store::infrastructure::auth::{Role, StaticAuth};
use shipyard_store::infrastructure::fetch::{DirectoryFetcher, HttpFetcher};
use shipyard_store::infrastructure::reporting::TracingReporter;
use shipyard_store::infrastructure::storage::local::{JsonFileStorage, MemoryStorage};
use shipyard_store::infrastructure::storage::settings::{
    load_settings, load_settings_from, settings_dir, StoreSettings,
};
use shipyard_store::{ConfigFetcher, ConfigStore, KeyValueStore};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Shipyard dashboard configuration tool.
#[derive(Debug, Parser)]
#[command(
    name = "shipyard",
    about = "Resolve and edit Shipyard dashboard configurations",
    version
)]
struct Cli {
    /// Base URL of the server hosting the documents, or a local directory.
    #[arg(long, global = true, env = "SHIPYARD_BASE")]
    base: Option<String>,

    /// Path of the root document, relative to the base.
    #[arg(long, global = true, env = "SHIPYARD_CONFIG_PATH")]
    config_path: Option<String>,

    /// Role to act as.
    #[arg(long, global = true, value_enum, env = "SHIPYARD_ROLE")]
    role: Option<Role>,

    /// Settings file to read instead of the platform default.
    #[arg(long, global = true, env = "SHIPYARD_SETTINGS")]
    settings: Option<PathBuf>,

    /// Keep local overrides in memory only, for this run.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the resolved configuration as JSON.
    Resolve {
        /// Sub-page name or slug.
        #[arg(long)]
        page: Option<String>,
    },
    /// Print the current user's permissions.
    Permissions {
        #[arg(long)]
        page: Option<String>,
    },
    /// Print the resolved configuration as YAML.
    Export {
        #[arg(long)]
        page: Option<String>,
    },
    /// Store a theme override.
    SetTheme {
        theme: String,
        #[arg(long)]
        page: Option<String>,
    },
    /// Store an item layout override (`auto`, `horizontal`, `vertical`).
    SetLayout {
        layout: String,
        #[arg(long)]
        page: Option<String>,
    },
    /// Store an icon size override (`small`, `medium`, `large`).
    SetIconSize {
        size: String,
        #[arg(long)]
        page: Option<String>,
    },
    /// Save the resolved sections as a local override.
    SaveLocal {
        #[arg(long)]
        page: Option<String>,
    },
    /// Remove every local override for the page.
    ResetLocal {
        #[arg(long)]
        page: Option<String>,
    },
}

impl Command {
    /// The sub-page slug this command runs against.
    fn page(&self) -> Option<String> {
        let page = match self {
            Command::Resolve { page }
            | Command::Permissions { page }
            | Command::Export { page }
            | Command::SetTheme { page, .. }
            | Command::SetLayout { page, .. }
            | Command::SetIconSize { page, .. }
            | Command::SaveLocal { page }
            | Command::ResetLocal { page } => page,
        };
        page.as_deref().map(make_page_name)
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn build_fetcher(base: &str, timeout: Duration) -> anyhow::Result<Arc<dyn ConfigFetcher>> {
    if base.starts_with("http://") || base.starts_with("https://") {
        let fetcher = HttpFetcher::new(base, timeout).context("failed to build HTTP client")?;
        Ok(Arc::new(fetcher))
    } else {
        Ok(Arc::new(DirectoryFetcher::new(base)))
    }
}

fn build_storage(
    cli: &Cli,
    settings: &StoreSettings,
) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if cli.ephemeral {
        return Ok(Arc::new(MemoryStorage::new()));
    }
    let dir = match &cli.settings {
        Some(path) => path.parent().map(PathBuf::from),
        None => settings_dir().ok(),
    };
    match settings.storage_file(dir.as_deref()) {
        Some(path) => {
            let storage = JsonFileStorage::open(&path)
                .with_context(|| format!("failed to open local storage {}", path.display()))?;
            Ok(Arc::new(storage))
        }
        None => {
            warn!("no location for local storage; overrides will not be kept");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

fn build_auth(cli: &Cli, settings: &StoreSettings) -> StaticAuth {
    let auth = StaticAuth::new(cli.role.unwrap_or(settings.auth.role));
    match (&settings.auth.username, &settings.auth.password) {
        (Some(user), Some(pass)) => auth.with_credentials(user.clone(), pass.clone()),
        _ => auth,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("failed to encode output")?);
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    }
    .context("failed to load settings")?;

    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    let base = cli.base.clone().unwrap_or_else(|| settings.source.base.clone());
    let root_config_path = settings.root_config_path(cli.config_path.as_deref());
    info!(base = %base, path = %root_config_path, "starting");

    let fetcher = build_fetcher(&base, Duration::from_secs(settings.source.timeout_secs))?;
    let storage = build_storage(&cli, &settings)?;
    let auth = Arc::new(build_auth(&cli, &settings));
    let mut store = ConfigStore::new(fetcher, auth, storage, Arc::new(TracingReporter))
        .with_root_config_path(root_config_path);

    let page = cli.command.page();
    let config = store.resolve_config(page.as_deref()).await;

    match cli.command {
        Command::Resolve { .. } => print_json(&config)?,
        Command::Permissions { .. } => print_json(&store.permissions())?,
        Command::Export { .. } => print!("{}", store.export_config()?),
        Command::SetTheme { theme, .. } => {
            store.set_theme(theme);
            println!("{}", store.theme());
        }
        Command::SetLayout { layout, .. } => {
            store.set_item_layout(layout);
            println!("{}", store.layout());
        }
        Command::SetIconSize { size, .. } => {
            store.set_item_size(size);
            println!("{}", store.icon_size());
        }
        Command::SaveLocal { .. } => {
            store.save_sections_locally()?;
            println!("saved {} section(s)", store.config().sections.len());
        }
        Command::ResetLocal { .. } => {
            store.clear_local_overrides();
            println!("local overrides cleared");
        }
    }

    if let Some(message) = store.critical_error() {
        error!("{message}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
