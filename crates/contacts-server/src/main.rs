//! contacts-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite document store, and serves the contacts API over HTTP.
//!
//! ```
//! cargo run -p contacts-server -- --port 8080 --store-path ~/contacts.db
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use contacts_api::AppState;
use contacts_server::{ServerConfig, expand_tilde, shutdown_signal};
use contacts_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Contacts API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Port to listen on; overrides the config file.
  #[arg(short, long, env = "PORT")]
  port: Option<u16>,

  /// SQLite file backing the document store; overrides the config file.
  #[arg(long)]
  store_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  // CLI flags win over the file and CONTACTS_* variables.
  if let Some(port) = cli.port {
    server_cfg.port = port;
  }
  if let Some(path) = cli.store_path {
    server_cfg.store_path = path;
  }

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let namespace = server_cfg.namespace();
  tracing::info!(path = ?store_path, %namespace, "opened document store");

  let state = AppState::new(store, namespace);
  let app = contacts_server::router(state, &server_cfg);
  let address = server_cfg.address();

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("listening on http://{address}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}
