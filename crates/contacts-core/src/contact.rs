//! Contact types and the mapping between contacts and stored documents.
//!
//! A contact is nothing more than a document whose body holds up to five
//! known fields. Absent fields are absent from the document; they are never
//! stored as empty strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
  Error, Result,
  id::DocumentId,
  store::{Body, Document},
};

/// The storable field set of a contact.
///
/// Values are kept exactly as supplied, whatever their JSON type. `None`
/// means "not provided"; on update that clears the stored value. An explicit
/// `null` is a provided value and is stored as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
  #[serde(default, deserialize_with = "provided", skip_serializing_if = "Option::is_none")]
  pub first_name:     Option<Value>,
  #[serde(default, deserialize_with = "provided", skip_serializing_if = "Option::is_none")]
  pub last_name:      Option<Value>,
  #[serde(default, deserialize_with = "provided", skip_serializing_if = "Option::is_none")]
  pub email:          Option<Value>,
  #[serde(default, deserialize_with = "provided", skip_serializing_if = "Option::is_none")]
  pub favorite_color: Option<Value>,
  /// Usually date-formatted text; never parsed.
  #[serde(default, deserialize_with = "provided", skip_serializing_if = "Option::is_none")]
  pub birthday:       Option<Value>,
}

/// A key that is present is `Some`, even when its value is `null`. Missing
/// keys fall back to `None` through `#[serde(default)]`.
fn provided<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
  D: Deserializer<'de>,
{
  Value::deserialize(deserializer).map(Some)
}

impl ContactRecord {
  /// Render as a document body containing only the provided fields.
  pub fn to_body(&self) -> Result<Body> {
    match serde_json::to_value(self)? {
      Value::Object(map) => Ok(map),
      _ => Err(Error::NotAnObject),
    }
  }

  /// Pick the five contact fields out of `body`; other keys are dropped.
  ///
  /// This is the only mapping applied to request bodies: no coercion, no
  /// trimming, no validation.
  pub fn from_body(body: Body) -> Result<Self> {
    Ok(serde_json::from_value(Value::Object(body))?)
  }
}

/// A persisted contact as returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
  /// Store-assigned identifier, exposed under the store-native `_id` key.
  #[serde(rename = "_id")]
  pub id:     DocumentId,
  #[serde(flatten)]
  pub record: ContactRecord,
}

impl Contact {
  pub fn from_document(doc: Document) -> Result<Self> {
    Ok(Self { id: doc.id, record: ContactRecord::from_body(doc.body)? })
  }
}
