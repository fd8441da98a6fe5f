//! Router-level tests against an in-memory SQLite store.

use std::io;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use contacts_core::{
  DocumentId,
  store::{self, Document, DocumentStore, Namespace, ReplaceOutcome},
};
use contacts_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, api_router};

async fn make_app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(AppState::new(store, Namespace::new("contacts", "contacts")))
}

async fn send(
  app: &Router,
  method: Method,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Option<Value>) {
  match body {
    Some(v) => send_raw(app, method, uri, Some("application/json"), v.to_string()).await,
    None => send_raw(app, method, uri, None, String::new()).await,
  }
}

/// Send `body` verbatim, with a `Content-Type` header only when given.
async fn send_raw(
  app: &Router,
  method: Method,
  uri: &str,
  content_type: Option<&str>,
  body: String,
) -> (StatusCode, Option<Value>) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(content_type) = content_type {
    builder = builder.header(header::CONTENT_TYPE, content_type);
  }
  let resp = app.clone().oneshot(builder.body(Body::from(body)).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() {
    None
  } else {
    Some(serde_json::from_slice(&bytes).unwrap())
  };
  (status, json)
}

fn ada() -> Value {
  json!({
    "firstName": "Ada",
    "lastName": "Lovelace",
    "email": "ada@x.io",
    "favoriteColor": "blue",
    "birthday": "1815-12-10",
  })
}

async fn create(app: &Router, body: Value) -> String {
  let (status, json) = send(app, Method::POST, "/contacts/add", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);
  json.unwrap()["id"].as_str().unwrap().to_owned()
}

fn not_found() -> Option<Value> { Some(json!({ "error": "Contact not found." })) }

// ── Create / get ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_round_trips_all_fields() {
  let app = make_app().await;
  let id = create(&app, ada()).await;

  let (status, json) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);

  let mut expected = ada();
  expected["_id"] = json!(id);
  assert_eq!(json.unwrap(), expected);
}

#[tokio::test]
async fn create_returns_only_the_id() {
  let app = make_app().await;
  let (status, json) = send(&app, Method::POST, "/contacts/add", Some(ada())).await;
  assert_eq!(status, StatusCode::CREATED);

  let json = json.unwrap();
  let obj = json.as_object().unwrap();
  assert_eq!(obj.len(), 1);
  assert!(DocumentId::parse(obj["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn create_with_empty_object_stores_empty_contact() {
  let app = make_app().await;
  let id = create(&app, json!({})).await;

  let (_, json) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
  assert_eq!(json.unwrap(), json!({ "_id": id }));
}

#[tokio::test]
async fn create_drops_unknown_keys() {
  let app = make_app().await;
  let id = create(&app, json!({ "firstName": "Ada", "title": "Countess" })).await;

  let (_, json) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
  assert_eq!(json.unwrap(), json!({ "_id": id, "firstName": "Ada" }));
}

#[tokio::test]
async fn create_stores_non_string_values_as_given() {
  let app = make_app().await;
  let id = create(
    &app,
    json!({ "firstName": 42, "birthday": { "y": 1815 }, "email": null }),
  )
  .await;

  let (status, json) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    json.unwrap(),
    json!({ "_id": id, "firstName": 42, "birthday": { "y": 1815 }, "email": null })
  );
}

#[tokio::test]
async fn create_without_json_content_type_stores_empty_contact() {
  let app = make_app().await;
  let cases = [
    (None, r#"{"firstName":"Ada"}"#),
    (Some("text/plain"), r#"{"firstName":"Ada"}"#),
    (Some("application/x-www-form-urlencoded"), "firstName=Ada"),
    (Some("application/json"), ""),
    (Some("application/json"), "[1, 2, 3]"),
  ];

  for (content_type, body) in cases {
    let (status, json) =
      send_raw(&app, Method::POST, "/contacts/add", content_type, body.to_owned()).await;
    assert_eq!(status, StatusCode::CREATED, "{content_type:?} {body}");
    let id = json.unwrap()["id"].as_str().unwrap().to_owned();

    let (_, json) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
    assert_eq!(json.unwrap(), json!({ "_id": id }), "{content_type:?} {body}");
  }
}

#[tokio::test]
async fn create_accepts_json_content_type_with_parameters() {
  let app = make_app().await;
  let (status, json) = send_raw(
    &app,
    Method::POST,
    "/contacts/add",
    Some("application/json; charset=utf-8"),
    ada().to_string(),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = json.unwrap()["id"].as_str().unwrap().to_owned();

  let (_, json) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
  assert_eq!(json.unwrap()["firstName"], json!("Ada"));
}

#[tokio::test]
async fn create_with_broken_json_is_bad_request() {
  let app = make_app().await;
  let (status, json) = send_raw(
    &app,
    Method::POST,
    "/contacts/add",
    Some("application/json"),
    r#"{"firstName": "Ada""#.to_owned(),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let json = json.unwrap();
  assert!(json["error"].as_str().unwrap().starts_with("malformed JSON body"), "{json}");

  let (_, list) = send(&app, Method::GET, "/contacts", None).await;
  assert_eq!(list.unwrap(), json!([]));
}

#[tokio::test]
async fn get_unknown_id_returns_404() {
  let app = make_app().await;
  let uri = format!("/contacts/{}", DocumentId::new());
  let (status, json) = send(&app, Method::GET, &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(json, not_found());
}

// ── List ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_empty_returns_empty_array() {
  let app = make_app().await;
  let (status, json) = send(&app, Method::GET, "/contacts", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json.unwrap(), json!([]));
}

#[tokio::test]
async fn list_answers_with_trailing_slash() {
  let app = make_app().await;
  let id = create(&app, ada()).await;

  let (status, json) = send(&app, Method::GET, "/contacts/", None).await;
  assert_eq!(status, StatusCode::OK);
  let json = json.unwrap();
  assert_eq!(json.as_array().unwrap().len(), 1);
  assert_eq!(json[0]["_id"], json!(id));
}

#[tokio::test]
async fn list_contains_every_created_contact() {
  let app = make_app().await;
  let mut ids = Vec::new();
  for i in 0..25 {
    ids.push(create(&app, json!({ "firstName": format!("c{i}") })).await);
  }

  let (status, json) = send(&app, Method::GET, "/contacts", None).await;
  assert_eq!(status, StatusCode::OK);
  let listed: Vec<String> = json
    .unwrap()
    .as_array()
    .unwrap()
    .iter()
    .map(|c| c["_id"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(listed, ids);
}

// ── Update ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_and_clears_omitted_fields() {
  let app = make_app().await;
  let id = create(&app, ada()).await;

  let (status, json) = send(
    &app,
    Method::PUT,
    &format!("/contacts/update/{id}"),
    Some(json!({
      "firstName": "Augusta",
      "lastName": "King",
      "favoriteColor": "green",
      "birthday": "1815-12-10",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(json.is_none());

  let (_, json) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
  let json = json.unwrap();
  assert_eq!(json["firstName"], json!("Augusta"));
  assert_eq!(json["favoriteColor"], json!("green"));
  assert!(json.get("email").is_none(), "email should be cleared: {json}");
}

#[tokio::test]
async fn update_with_identical_body_returns_404() {
  let app = make_app().await;
  let id = create(&app, ada()).await;

  let (status, json) =
    send(&app, Method::PUT, &format!("/contacts/update/{id}"), Some(ada())).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(json, not_found());

  // The contact itself is untouched.
  let (status, json) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json.unwrap()["firstName"], json!("Ada"));
}

#[tokio::test]
async fn update_after_a_change_then_repeat_returns_404() {
  let app = make_app().await;
  let id = create(&app, ada()).await;
  let uri = format!("/contacts/update/{id}");
  let body = json!({ "firstName": "Augusta" });

  let (first, _) = send(&app, Method::PUT, &uri, Some(body.clone())).await;
  let (second, json) = send(&app, Method::PUT, &uri, Some(body)).await;
  assert_eq!(first, StatusCode::NO_CONTENT);
  assert_eq!(second, StatusCode::NOT_FOUND);
  assert_eq!(json, not_found());
}

#[tokio::test]
async fn update_unknown_id_returns_404() {
  let app = make_app().await;
  let uri = format!("/contacts/update/{}", DocumentId::new());
  let (status, json) = send(&app, Method::PUT, &uri, Some(ada())).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(json, not_found());

  let (_, list) = send(&app, Method::GET, "/contacts", None).await;
  assert_eq!(list.unwrap(), json!([]));
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_then_get_returns_404() {
  let app = make_app().await;
  let id = create(&app, ada()).await;

  let (status, json) =
    send(&app, Method::DELETE, &format!("/contacts/delete/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(json.is_none());

  let (status, _) = send(&app, Method::GET, &format!("/contacts/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_twice_returns_404_second_time() {
  let app = make_app().await;
  let id = create(&app, ada()).await;
  let uri = format!("/contacts/delete/{id}");

  let (first, _) = send(&app, Method::DELETE, &uri, None).await;
  let (second, json) = send(&app, Method::DELETE, &uri, None).await;
  assert_eq!(first, StatusCode::NO_CONTENT);
  assert_eq!(second, StatusCode::NOT_FOUND);
  assert_eq!(json, not_found());
}

// ── Malformed identifiers ────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_id_returns_400_on_every_id_route() {
  let app = make_app().await;
  let cases = [
    (Method::GET, "/contacts/not-a-real-id", None),
    (Method::PUT, "/contacts/update/not-a-real-id", Some(ada())),
    (Method::DELETE, "/contacts/delete/not-a-real-id", None),
  ];

  for (method, uri, body) in cases {
    let (status, json) = send(&app, method.clone(), uri, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
    assert_eq!(
      json.unwrap(),
      json!({ "error": "invalid contact id: not-a-real-id" }),
      "{method} {uri}"
    );
  }

  // The service keeps answering afterwards.
  let (status, _) = send(&app, Method::GET, "/contacts", None).await;
  assert_eq!(status, StatusCode::OK);
}

// ── Unrouted requests ────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_path_returns_404_envelope() {
  let app = make_app().await;
  for uri in ["/", "/people", "/contacts/a/b", "/contacts/add/extra"] {
    let (status, json) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    assert_eq!(json.unwrap(), json!({ "error": "Not Found" }), "{uri}");
  }
}

#[tokio::test]
async fn wrong_method_returns_405_envelope() {
  let app = make_app().await;
  let id = DocumentId::new();
  let cases = [
    (Method::GET, "/contacts/add".to_owned()),
    (Method::POST, "/contacts".to_owned()),
    (Method::DELETE, format!("/contacts/update/{id}")),
    (Method::PUT, format!("/contacts/delete/{id}")),
  ];

  for (method, uri) in cases {
    let (status, json) = send(&app, method.clone(), &uri, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
    assert_eq!(json.unwrap(), json!({ "error": "Method Not Allowed" }), "{method} {uri}");
  }
}

// ── Store faults ─────────────────────────────────────────────────────────────

#[derive(Clone)]
struct FailingStore;

fn fault() -> io::Error { io::Error::other("connection reset by peer") }

impl DocumentStore for FailingStore {
  type Error = io::Error;

  async fn find_all(&self, _ns: &Namespace) -> io::Result<Vec<Document>> {
    Err(fault())
  }

  async fn find_by_id(&self, _ns: &Namespace, _id: DocumentId) -> io::Result<Option<Document>> {
    Err(fault())
  }

  async fn insert(&self, _ns: &Namespace, _body: store::Body) -> io::Result<DocumentId> {
    Err(fault())
  }

  async fn replace_by_id(
    &self,
    _ns: &Namespace,
    _id: DocumentId,
    _body: store::Body,
  ) -> io::Result<ReplaceOutcome> {
    Err(fault())
  }

  async fn delete_by_id(&self, _ns: &Namespace, _id: DocumentId) -> io::Result<u64> {
    Err(fault())
  }
}

#[tokio::test]
async fn store_faults_return_500_without_detail() {
  let app = api_router(AppState::new(FailingStore, Namespace::new("contacts", "contacts")));
  let id = DocumentId::new();
  let cases = [
    (Method::GET, "/contacts".to_owned(), None),
    (Method::GET, format!("/contacts/{id}"), None),
    (Method::POST, "/contacts/add".to_owned(), Some(ada())),
    (Method::PUT, format!("/contacts/update/{id}"), Some(ada())),
    (Method::DELETE, format!("/contacts/delete/{id}"), None),
  ];

  for (method, uri, body) in cases {
    let (status, json) = send(&app, method.clone(), &uri, body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
    assert_eq!(json.unwrap(), json!({ "error": "Internal Server Error" }), "{method} {uri}");
  }
}
