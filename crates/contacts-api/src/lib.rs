//! JSON REST API for the contacts collection.
//!
//! Exposes an axum [`Router`] backed by any
//! [`contacts_core::store::DocumentStore`]. CORS, tracing, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = contacts_api::api_router(AppState::new(store, namespace));
//! ```

pub mod contacts;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use contacts_core::store::{DocumentStore, Namespace};

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers: the store handle, opened once
/// at startup, and the collection every operation targets.
#[derive(Clone)]
pub struct AppState<S: DocumentStore> {
  pub store:     Arc<S>,
  pub namespace: Arc<Namespace>,
}

impl<S: DocumentStore> AppState<S> {
  pub fn new(store: S, namespace: Namespace) -> Self {
    Self { store: Arc::new(store), namespace: Arc::new(namespace) }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the contacts router for `state`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type. Unmatched paths and unsupported methods answer
/// with the same error envelope as the handlers.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/contacts", get(contacts::list::<S>))
    .route("/contacts/", get(contacts::list::<S>))
    .route("/contacts/{id}", get(contacts::get_one::<S>))
    .route("/contacts/add", post(contacts::create::<S>))
    .route("/contacts/update/{id}", put(contacts::update_one::<S>))
    .route("/contacts/delete/{id}", delete(contacts::delete_one::<S>))
    .fallback(unknown_route)
    .method_not_allowed_fallback(method_not_allowed)
    .with_state(state)
}

async fn unknown_route() -> ApiError { ApiError::RouteNotFound }

async fn method_not_allowed() -> ApiError { ApiError::MethodNotAllowed }

#[cfg(test)]
mod tests;
