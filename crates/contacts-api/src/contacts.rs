//! Handlers for the `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | All contacts, store order; `/contacts/` too |
//! | `GET`    | `/contacts/{id}` | 404 if not found |
//! | `POST`   | `/contacts/add` | Body: [`ContactBody`]; returns 201 + `{"id": ...}` |
//! | `PUT`    | `/contacts/update/{id}` | Body: [`ContactBody`]; full overwrite, 204; 404 if nothing changed |
//! | `DELETE` | `/contacts/delete/{id}` | 204 |

use axum::{
  Json,
  body::Bytes,
  extract::{FromRequest, Path, Request, State},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use contacts_core::{
  DocumentId,
  contact::{Contact, ContactRecord},
  store::{Body, DocumentStore},
};
use serde::Serialize;
use serde_json::Value;

use crate::{AppState, error::ApiError};

// ─── Request / response bodies ───────────────────────────────────────────────

/// Raw field set of a create or update request.
///
/// A request without a JSON content type, with an empty body, or whose JSON
/// is not an object yields an empty set. Only syntactically broken JSON under
/// a JSON content type is rejected.
#[derive(Debug, Default)]
pub struct ContactBody(pub Body);

impl ContactBody {
  pub fn into_record(self) -> Result<ContactRecord, ApiError> {
    Ok(ContactRecord::from_body(self.0)?)
  }
}

impl<S> FromRequest<S> for ContactBody
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    if !has_json_content_type(req.headers()) {
      return Ok(Self::default());
    }

    let bytes = Bytes::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(Self::default());
    }

    match serde_json::from_slice(&bytes) {
      Ok(Value::Object(map)) => Ok(Self(map)),
      Ok(_) => Ok(Self::default()),
      Err(e) => Err(ApiError::BadRequest(format!("malformed JSON body: {e}"))),
    }
  }
}

/// `application/json`, or any `application/*+json`, parameters ignored.
fn has_json_content_type(headers: &HeaderMap) -> bool {
  let Some(value) = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
  else {
    return false;
  };

  let essence = value.split(';').next().unwrap_or_default().trim();
  let essence = essence.to_ascii_lowercase();
  essence == "application/json"
    || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Response body of `POST /contacts/add`.
#[derive(Debug, Serialize)]
pub struct Created {
  pub id: DocumentId,
}

fn parse_id(raw: &str) -> Result<DocumentId, ApiError> {
  Ok(DocumentId::parse(raw)?)
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /contacts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let docs = state
    .store
    .find_all(&state.namespace)
    .await
    .map_err(|e| ApiError::store("fetching contacts", e))?;

  let contacts = docs
    .into_iter()
    .map(Contact::from_document)
    .collect::<Result<Vec<_>, _>>()?;

  tracing::debug!(count = contacts.len(), "listed contacts");
  Ok(Json(contacts))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /contacts/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Contact>, ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_id(&raw_id)?;

  let doc = state
    .store
    .find_by_id(&state.namespace, id)
    .await
    .map_err(|e| ApiError::store("fetching contact by id", e))?
    .ok_or(ApiError::NotFound)?;

  Ok(Json(Contact::from_document(doc)?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /contacts/add` — returns 201 + the assigned identifier.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: ContactBody,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = body.into_record()?;

  let id = state
    .store
    .insert(&state.namespace, record.to_body()?)
    .await
    .map_err(|e| ApiError::store("creating contact", e))?;

  tracing::info!(%id, "created contact");
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /contacts/update/{id}` — replaces all five fields; omitted fields
/// are cleared. Answers 404 unless the stored body actually changed, so an
/// update that leaves an existing contact untouched is also 404.
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
  body: ContactBody,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_id(&raw_id)?;
  let record = body.into_record()?;

  let outcome = state
    .store
    .replace_by_id(&state.namespace, id, record.to_body()?)
    .await
    .map_err(|e| ApiError::store("updating contact", e))?;

  if !outcome.modified {
    tracing::debug!(%id, matched = outcome.matched, "update modified nothing");
    return Err(ApiError::NotFound);
  }

  tracing::info!(%id, "updated contact");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /contacts/delete/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = parse_id(&raw_id)?;

  let deleted = state
    .store
    .delete_by_id(&state.namespace, id)
    .await
    .map_err(|e| ApiError::store("deleting contact", e))?;

  if deleted == 0 {
    return Err(ApiError::NotFound);
  }

  tracing::info!(%id, "deleted contact");
  Ok(StatusCode::NO_CONTENT)
}
