//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure renders as the same envelope, `{"error": "<message>"}`.
//! Store faults are logged here and replaced by a generic message.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Body message for a lookup that matched no contact.
pub const NOT_FOUND_MESSAGE: &str = "Contact not found.";

/// Body message for a path no route matches.
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Not Found";

/// Body message for a known path hit with an unsupported method.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";

/// Body message for any storage failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("contact not found")]
  NotFound,

  /// The path identifier is not a well-formed document id.
  #[error("invalid contact id: {0}")]
  MalformedIdentifier(String),

  /// The request body could not be read, or claimed JSON and was not.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("no route matches the request path")]
  RouteNotFound,

  #[error("method not allowed")]
  MethodNotAllowed,

  #[error("store error while {action}: {source}")]
  Store {
    action: &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn store<E>(action: &'static str, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store { action, source: Box::new(source) }
  }
}

impl From<contacts_core::Error> for ApiError {
  fn from(e: contacts_core::Error) -> Self {
    match e {
      contacts_core::Error::InvalidIdentifier(raw) => {
        ApiError::MalformedIdentifier(raw)
      }
      other => ApiError::store("mapping contact", other),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_owned()),
      ApiError::MalformedIdentifier(raw) => {
        tracing::warn!(id = %raw, "rejected malformed contact id");
        (StatusCode::BAD_REQUEST, format!("invalid contact id: {raw}"))
      }
      ApiError::BadRequest(m) => {
        tracing::warn!(reason = %m, "rejected request body");
        (StatusCode::BAD_REQUEST, m.clone())
      }
      ApiError::RouteNotFound => {
        (StatusCode::NOT_FOUND, ROUTE_NOT_FOUND_MESSAGE.to_owned())
      }
      ApiError::MethodNotAllowed => {
        (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE.to_owned())
      }
      ApiError::Store { action, source } => {
        tracing::error!(error = %source, "error {action}");
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
