//! Parlor TUI entry point.

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use parlor_client::{ApiClient, PreferenceStore};
use parlor_proto::DEFAULT_ROOM;
use parlor_tui::{App, AppConfig, Runtime, TerminalDriver};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "parlor.log";

/// Parlor terminal chat client
#[derive(Parser, Debug)]
#[command(name = "parlor-tui")]
#[command(about = "Terminal client for the Parlor chat server")]
#[command(version)]
struct Args {
    /// Base URL of the chat API. The real-time channel is served at
    /// `/socket.io/` under the same host.
    #[arg(short, long, env = "PARLOR_API_BASE", default_value = "http://localhost:8080")]
    server: String,

    /// Display name to join with at startup.
    #[arg(short, long)]
    name: Option<String>,

    /// Room to show at startup.
    #[arg(short, long, default_value = DEFAULT_ROOM)]
    room: String,

    /// Preferences file. Defaults to the platform config directory.
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Log file. The terminal is busy with the UI, so logs never go to it.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Send logs to `path`, filtered by `RUST_LOG` (default `info`).
fn init_logging(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(Mutex::new(file)).with_ansi(false).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefs_path = args.prefs.unwrap_or_else(PreferenceStore::default_path);
    let log_path = args.log_file.unwrap_or_else(|| prefs_path.with_file_name(LOG_FILE_NAME));
    init_logging(&log_path)?;

    let api = ApiClient::new(&args.server)?;
    let store = PreferenceStore::new(prefs_path);
    let prefs = store.load();
    tracing::info!(server = %api.base(), prefs = %store.path().display(), "starting");

    let config = AppConfig { default_room: args.room, ..AppConfig::default() };
    let app = App::new(config, prefs);
    let driver = TerminalDriver::new(api, store, args.name)?;

    Ok(Runtime::new(driver, app).run().await?)
}
