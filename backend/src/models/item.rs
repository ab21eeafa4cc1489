//! Domain types for the persisted item resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters accepted for an item title.
///
/// Mirrors the `VARCHAR(100)` bound of the `items.title` column.
pub const TITLE_MAX_LENGTH: usize = 100;

/// Item identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    pub fn new(value: i64) -> Self {
        ItemId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(v: i64) -> Self {
        ItemId(v)
    }
}

impl From<ItemId> for i64 {
    fn from(v: ItemId) -> Self {
        v.0
    }
}

/// A persisted item as read back from storage.
///
/// This is also the read representation returned by the HTTP API:
/// `{"id": 1, "title": "A", "description": "d"}`. A missing description
/// serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
}

/// Validated data for a new item. Storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
}

impl NewItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Validated partial update for an existing item.
///
/// `None` leaves the stored field untouched. For `description`,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

impl ItemChanges {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// True when no field is set; applying the changes is a no-op.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// Apply the supplied fields to `item` in place.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(ref title) = self.title {
            item.title = title.clone();
        }
        if let Some(ref description) = self.description {
            item.description = description.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Item {
        Item {
            id: ItemId::new(7),
            title: "A".to_string(),
            description: Some("d".to_string()),
        }
    }

    #[test]
    fn test_item_serializes_flat() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "title": "A", "description": "d"})
        );
    }

    #[test]
    fn test_missing_description_serializes_as_null() {
        let mut item = sample();
        item.description = None;
        let json = serde_json::to_value(item).unwrap();
        assert!(json["description"].is_null());
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let mut item = sample();
        ItemChanges::default().title("B").apply_to(&mut item);
        assert_eq!(item.title, "B");
        assert_eq!(item.description.as_deref(), Some("d"));

        ItemChanges::default().description(None).apply_to(&mut item);
        assert_eq!(item.title, "B");
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_empty_changes_are_noop() {
        let mut item = sample();
        let changes = ItemChanges::default();
        assert!(changes.is_empty());
        changes.apply_to(&mut item);
        assert_eq!(item, sample());
    }
}
