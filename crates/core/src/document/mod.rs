//! Document module
//!
//! Records are stored as semi-structured JSON objects. A handful of fields
//! are known and queried by the stores; everything else is carried verbatim.

mod filter;
mod result;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, Result};

pub use filter::Filter;
pub use result::{DeleteResult, InsertOneResult, UpdateResult};

/// A stored record
pub type Document = Map<String, Value>;

/// Key holding the system-assigned identifier
pub const ID_FIELD: &str = "_id";

/// Generate a fresh opaque identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Identifier of a document, if it has a string one
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

/// Resolve a dotted path such as `host.email`
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write `value` at a dotted path, creating intermediate objects.
///
/// A non-object value sitting on the path is replaced by an object.
pub fn assign(doc: &mut Document, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            doc.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = doc
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                assign(child, rest, value);
            }
        }
    }
}

/// Validate the keys of a field-level update.
///
/// Every key must be a well-formed dotted path, and no key may be a prefix
/// path of another (`email` with `email.x`), since both would write the same
/// slot.
pub fn check_update_paths(set: &Document) -> Result<()> {
    if let Some(path) = set
        .keys()
        .find(|path| path.split('.').any(str::is_empty))
    {
        return Err(Error::InvalidInput(format!(
            "Invalid field path '{}'",
            path
        )));
    }

    for path in set.keys() {
        if path.starts_with(ID_FIELD) && path[ID_FIELD.len()..].starts_with('.') {
            return Err(Error::InvalidInput(format!("Cannot update '{}'", path)));
        }
        let conflict = path
            .match_indices('.')
            .map(|(index, _)| &path[..index])
            .find(|parent| set.contains_key(*parent));
        if let Some(parent) = conflict {
            return Err(Error::InvalidInput(format!(
                "Updating '{}' conflicts with updating '{}'",
                path, parent
            )));
        }
    }
    Ok(())
}

/// Build the document a field-level update would produce on an empty record
pub fn expand(set: &Document) -> Result<Document> {
    check_update_paths(set)?;
    let mut doc = Document::new();
    for (path, value) in set {
        assign(&mut doc, path, value.clone());
    }
    Ok(doc)
}

/// Serialize a typed record into a document
pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidInput(format!(
            "Expected a JSON object, got {}",
            other
        ))),
    }
}

/// Deserialize a document into a typed record
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Deserialize every document that fits `T`, logging and skipping the rest
pub fn from_documents<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = document_id(&doc).map(str::to_string);
            match from_document(doc) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(
                        collection,
                        id = ?id,
                        error = %err,
                        "Skipping malformed document"
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_lookup_nested_path() {
        let home = doc(json!({ "host": { "email": "h@x.com" }, "location": "Dhaka" }));

        assert_eq!(lookup(&home, "host.email"), Some(&json!("h@x.com")));
        assert_eq!(lookup(&home, "location"), Some(&json!("Dhaka")));
        assert!(lookup(&home, "host.name").is_none());
        assert!(lookup(&home, "location.city").is_none());
    }

    #[test]
    fn test_assign_creates_intermediate_objects() {
        let mut home = doc(json!({ "host": "legacy" }));
        assign(&mut home, "host.email", json!("h@x.com"));
        assign(&mut home, "title", json!("Cabin"));

        assert_eq!(
            Value::Object(home),
            json!({ "host": { "email": "h@x.com" }, "title": "Cabin" })
        );
    }

    #[test]
    fn test_to_document_rejects_scalars() {
        let result = to_document(&42);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn test_update_paths_must_not_overlap() {
        assert!(check_update_paths(&doc(json!({ "host.email": "h@x.com", "hostel": 1 }))).is_ok());
        assert!(check_update_paths(&doc(json!({ "host": {}, "host.name": "H" }))).is_err());
        assert!(check_update_paths(&doc(json!({ "email": "a@x.com", "email.x": 1 }))).is_err());
        assert!(check_update_paths(&doc(json!({ "a": 1, "a-b": 2, "a.b.c": 3 }))).is_err());
        assert!(check_update_paths(&doc(json!({ "_id.x": 1 }))).is_err());
        assert!(check_update_paths(&doc(json!({ "_idx": 1 }))).is_ok());
        assert!(check_update_paths(&doc(json!({ "a.": 1 }))).is_err());
        assert!(check_update_paths(&doc(json!({ ".a": 1 }))).is_err());
        assert!(check_update_paths(&doc(json!({ "": 1 }))).is_err());
    }

    #[test]
    fn test_expand_nests_dotted_keys() {
        let expanded = expand(&doc(json!({ "host.email": "h@x.com", "price": 10 }))).unwrap();
        assert_eq!(
            Value::Object(expanded),
            json!({ "host": { "email": "h@x.com" }, "price": 10 })
        );
    }

    #[test]
    fn test_from_documents_skips_malformed() {
        #[derive(serde::Deserialize)]
        struct Named {
            name: String,
        }

        let docs = vec![
            doc(json!({ "_id": "1", "name": "ok" })),
            doc(json!({ "_id": "2", "name": { "nested": true } })),
            doc(json!({ "_id": "3", "name": "also ok" })),
        ];
        let names: Vec<String> = from_documents::<Named>("test", docs)
            .into_iter()
            .map(|named| named.name)
            .collect();
        assert_eq!(names, vec!["ok", "also ok"]);
    }
}
