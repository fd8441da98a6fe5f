//! HTTP server wiring for the contacts API.
//!
//! Wraps [`contacts_api::api_router`] with request tracing and CORS, and
//! owns the server's runtime configuration.

use std::path::{Path, PathBuf};

use axum::{
  Router,
  http::{HeaderName, Method, header},
};
use contacts_api::AppState;
use contacts_core::store::{DocumentStore, Namespace};
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CONTACTS_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// Logical database holding the contacts collection.
  pub database:     String,
  pub collection:   String,
  pub cors_enabled: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:         "0.0.0.0".to_string(),
      port:         8080,
      store_path:   PathBuf::from("contacts.db"),
      database:     "contacts".to_string(),
      collection:   "contacts".to_string(),
      cors_enabled: true,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `CONTACTS_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("CONTACTS"))
      .build()?
      .try_deserialize()
  }

  pub fn namespace(&self) -> Namespace {
    Namespace::new(&self.database, &self.collection)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Headers browsers may send on cross-origin requests.
const ALLOWED_HEADERS: [HeaderName; 5] = [
  header::ORIGIN,
  HeaderName::from_static("x-requested-with"),
  header::CONTENT_TYPE,
  header::ACCEPT,
  HeaderName::from_static("z-key"),
];

/// Permissive CORS: any origin, the five contact verbs plus preflight.
pub fn cors_layer() -> CorsLayer {
  CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers(ALLOWED_HEADERS)
}

/// Build the full application router for `state`.
pub fn router<S>(state: AppState<S>, config: &ServerConfig) -> Router
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let app = contacts_api::api_router(state);
  let app = if config.cors_enabled {
    app.layer(cors_layer())
  } else {
    app
  };
  app.layer(TraceLayer::new_for_http())
}

// ─── Process helpers ─────────────────────────────────────────────────────────

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
  use tokio::signal;

  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl+C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to install SIGTERM handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
    _ = terminate => tracing::info!("received SIGTERM, shutting down"),
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Integration tests ───────────────────────────────────────────────────────
