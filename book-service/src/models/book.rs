use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record of the collection. Field order is the persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
}

/// Request bodies must be JSON objects. Derived impls would also fill a struct
/// from an array by position, so the object is decoded first.
fn decode_object<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    let object: Map<String, Value> = serde_json::from_slice(body)?;
    serde_json::from_value(Value::Object(object))
}

/// `null`, `false`, zero, and empty strings, arrays and objects.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn into_text(field: &str, value: Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(serde_json::Error::custom(format!(
            "{} must be a string, got {}",
            field, other
        ))),
    }
}

/// Body of a create request. Fields are kept as raw JSON so that absent and
/// falsy values are a validation failure rather than a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct NewBook {
    pub title: Option<Value>,
    pub author: Option<Value>,
}

impl NewBook {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        decode_object(body)
    }

    /// `Ok(None)` when either field is missing or falsy. A present, truthy
    /// value that is not a string is an error.
    pub fn into_fields(self) -> Result<Option<(String, String)>, serde_json::Error> {
        match (self.title, self.author) {
            (Some(title), Some(author)) if !is_falsy(&title) && !is_falsy(&author) => Ok(Some((
                into_text("title", title)?,
                into_text("author", author)?,
            ))),
            _ => Ok(None),
        }
    }
}

/// Body of a replace-fields request. An absent field, or one sent as explicit
/// `null`, keeps the stored value; a provided string replaces it even when empty.
#[derive(Debug, Default, Deserialize)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl BookUpdate {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        decode_object(body)
    }

    pub fn apply_to(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
    }
}
