use diesel::prelude::*;

use super::schema::items;
use crate::models::{Item, ItemChanges, ItemId, NewItem};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: ItemId::new(row.id),
            title: row.title,
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub struct NewItemRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
}

impl<'a> From<&'a NewItem> for NewItemRow<'a> {
    fn from(item: &'a NewItem) -> Self {
        NewItemRow {
            title: &item.title,
            description: item.description.as_deref(),
        }
    }
}

/// Changeset for a partial update.
///
/// Diesel skips `None` fields; `Some(None)` on `description` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
pub struct ItemChangeset {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

impl From<&ItemChanges> for ItemChangeset {
    fn from(changes: &ItemChanges) -> Self {
        ItemChangeset {
            title: changes.title.clone(),
            description: changes.description.clone(),
        }
    }
}
