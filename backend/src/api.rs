//! Public API surface for the Rust backend.
//!
//! Request schemas for the item endpoints plus the field-level validation
//! that runs before any repository call. The read representation is
//! [`Item`] itself.

pub use crate::models::{Item, ItemChanges, ItemId, NewItem, TITLE_MAX_LENGTH};

use serde::{Deserialize, Deserializer, Serialize};

/// A single field-level validation failure.
///
/// `loc` is the path to the offending value, starting with where it was
/// read from (`body`, `query` or `path`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(
        loc: impl IntoIterator<Item = impl Into<String>>,
        msg: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            loc: loc.into_iter().map(Into::into).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// A required body field was not supplied.
    pub fn missing(field: &str) -> Self {
        Self::new(["body", field], "Field required", "missing")
    }
}

pub type ValidationResult<T> = Result<T, Vec<FieldError>>;

/// Request body for `POST /items/`.
///
/// `title` is declared optional here so that its absence is reported as a
/// field error by [`ItemCreate::validate`] instead of a generic decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCreate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItemCreate {
    /// Check required fields and bounds, producing the storage-ready value.
    pub fn validate(self) -> ValidationResult<NewItem> {
        let mut errors = Vec::new();

        let title = match self.title {
            Some(title) => {
                check_title(&title, &mut errors);
                title
            }
            None => {
                errors.push(FieldError::missing("title"));
                String::new()
            }
        };

        if errors.is_empty() {
            Ok(NewItem {
                title,
                description: self.description,
            })
        } else {
            Err(errors)
        }
    }
}

/// Request body for `PUT /items/{item_id}`.
///
/// Every field is optional. The outer `Option` records presence, the inner
/// one records an explicit `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

impl ItemUpdate {
    /// Check supplied fields, producing the partial update to apply.
    pub fn validate(self) -> ValidationResult<ItemChanges> {
        let mut errors = Vec::new();

        let title = match self.title {
            Some(Some(title)) => {
                check_title(&title, &mut errors);
                Some(title)
            }
            Some(None) => {
                errors.push(FieldError::new(
                    ["body", "title"],
                    "Input should be a valid string",
                    "string_type",
                ));
                None
            }
            None => None,
        };

        if errors.is_empty() {
            Ok(ItemChanges {
                title,
                description: self.description,
            })
        } else {
            Err(errors)
        }
    }
}

// Empty titles are accepted; only the column bound is enforced.
fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    if title.chars().count() > TITLE_MAX_LENGTH {
        errors.push(FieldError::new(
            ["body", "title"],
            format!("String should have at most {} characters", TITLE_MAX_LENGTH),
            "string_too_long",
        ));
    }
}

/// Maps a present key to `Some(..)` so that `null` and absence stay distinct.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_title() {
        let req: ItemCreate = serde_json::from_str(r#"{"description": "d"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::missing("title")]);
    }

    #[test]
    fn test_create_accepts_empty_title() {
        let req: ItemCreate = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        let new_item = req.validate().unwrap();
        assert_eq!(new_item.title, "");
        assert_eq!(new_item.description, None);
    }

    #[test]
    fn test_create_rejects_long_title() {
        let req = ItemCreate {
            title: Some("x".repeat(TITLE_MAX_LENGTH + 1)),
            description: None,
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].kind, "string_too_long");
        assert_eq!(errors[0].loc, vec!["body", "title"]);
    }

    #[test]
    fn test_create_title_at_bound_is_valid() {
        let req = ItemCreate {
            title: Some("é".repeat(TITLE_MAX_LENGTH)),
            description: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_distinguishes_absent_from_null() {
        let absent: ItemUpdate = serde_json::from_str(r#"{"title": "B"}"#).unwrap();
        let changes = absent.validate().unwrap();
        assert_eq!(changes.title.as_deref(), Some("B"));
        assert_eq!(changes.description, None);

        let cleared: ItemUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let changes = cleared.validate().unwrap();
        assert_eq!(changes.title, None);
        assert_eq!(changes.description, Some(None));
    }

    #[test]
    fn test_update_rejects_null_title() {
        let req: ItemUpdate = serde_json::from_str(r#"{"title": null}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].loc, vec!["body", "title"]);
    }

    #[test]
    fn test_empty_update_is_valid() {
        let req: ItemUpdate = serde_json::from_str("{}").unwrap();
        assert!(req.validate().unwrap().is_empty());
    }

    #[test]
    fn test_field_error_serializes_type_key() {
        let json = serde_json::to_value(FieldError::missing("title")).unwrap();
        assert_eq!(json["type"], "missing");
        assert_eq!(json["loc"], serde_json::json!(["body", "title"]));
    }
}
