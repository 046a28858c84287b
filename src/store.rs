//! RecordStore — CRUD over the persisted collection.
//!
//! Every operation works on a fresh snapshot: load the document, apply the
//! change, write the whole document back. There is no cross-request cache.
//! Mutations run load-mutate-save inside one mutex so overlapping writers
//! cannot drop each other's changes; reads skip the lock, because saves
//! replace the document atomically and a loader never sees a torn file.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::StoreError;
use crate::item::Item;
use crate::persist::JsonDocument;
use crate::schema::{self, ValidationError};

/// Exact-match filter for [`RecordStore::list`].
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

pub struct RecordStore {
    document: JsonDocument,
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(document: JsonDocument) -> Self {
        Self {
            document,
            write_lock: Mutex::new(()),
        }
    }

    /// All items in insertion order, optionally narrowed to those whose
    /// named field equals the filter value. The comparison is string-typed,
    /// so numeric and boolean fields never match a query string; an unknown
    /// field name yields no matches, not an error.
    pub fn list(&self, filter: Option<&Filter>) -> Result<Vec<Item>, StoreError> {
        let collection = self.document.load()?;
        let items = match filter {
            None => collection.items,
            Some(f) => {
                let wanted = Value::String(f.value.clone());
                collection
                    .items
                    .into_iter()
                    .filter(|item| item.field(&f.field).is_some_and(|v| v == wanted))
                    .collect()
            }
        };
        Ok(items)
    }

    /// First item with the given id, or `None` — a missing id is not an
    /// error on the read path.
    pub fn get_by_id(&self, id: u64) -> Result<Option<Item>, StoreError> {
        let collection = self.document.load()?;
        Ok(collection.items.into_iter().find(|item| item.id == id))
    }

    /// Validate, assign `id = count + 1`, default `createdAt` to now when
    /// the caller did not supply one, append, persist. Returns the stored
    /// item including the assigned id.
    pub fn create(&self, mut record: Map<String, Value>) -> Result<Item, StoreError> {
        schema::validate(&record)?;
        let _guard = self.write_guard();
        let mut collection = self.document.load()?;

        let id = collection.next_id();
        record.insert("id".to_string(), Value::from(id));
        if !record.contains_key("createdAt") {
            record.insert("createdAt".to_string(), Value::String(now_stamp()));
        }
        let item: Item = serde_json::from_value(Value::Object(record))
            .map_err(|e| ValidationError::Shape(e.to_string()))?;

        collection.items.push(item.clone());
        self.document.save(&collection)?;
        debug!(id, "item created");
        Ok(item)
    }

    /// Validate, then merge the patch over the existing record: fields not
    /// in the patch survive, `id` is immutable, and `createdAt` is taken
    /// from the patch if supplied, otherwise kept from the existing record.
    /// Fails with `NotFound` when the id does not exist.
    pub fn update(&self, id: u64, mut patch: Map<String, Value>) -> Result<(), StoreError> {
        schema::validate(&patch)?;
        let _guard = self.write_guard();
        let mut collection = self.document.load()?;

        let index = collection
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let existing = serde_json::to_value(&collection.items[index])
            .map_err(|e| ValidationError::Shape(e.to_string()))?;
        let mut merged = match existing {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        patch.remove("id");
        let created_at = patch
            .remove("createdAt")
            .or_else(|| merged.get("createdAt").cloned())
            .unwrap_or_else(|| Value::String(now_stamp()));
        for (key, value) in patch {
            merged.insert(key, value);
        }
        merged.insert("createdAt".to_string(), created_at);

        let item: Item = serde_json::from_value(Value::Object(merged))
            .map_err(|e| ValidationError::Shape(e.to_string()))?;
        collection.items[index] = item;
        self.document.save(&collection)?;
        debug!(id, "item updated");
        Ok(())
    }

    /// Stamp one shared `updatedAt` value on every item, unconditionally.
    /// Returns the stamp that was applied.
    pub fn touch_all_updated_at(&self) -> Result<String, StoreError> {
        let _guard = self.write_guard();
        let mut collection = self.document.load()?;

        let stamp = now_stamp();
        for item in &mut collection.items {
            item.updated_at = Some(stamp.clone());
        }
        self.document.save(&collection)?;
        debug!(count = collection.items.len(), "updatedAt stamped on all items");
        Ok(stamp)
    }

    /// Remove the item with the given id, preserving the remaining items'
    /// ids and order. Fails with `NotFound` when the id does not exist.
    pub fn delete_by_id(&self, id: u64) -> Result<(), StoreError> {
        let _guard = self.write_guard();
        let mut collection = self.document.load()?;

        let index = collection
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;
        collection.items.remove(index);
        self.document.save(&collection)?;
        debug!(id, "item deleted");
        Ok(())
    }

    fn write_guard(&self) -> MutexGuard<'_, ()> {
        // A poisoned lock means another operation panicked, but the document
        // on disk is still whole (saves are atomic), so keep going.
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Current local time as `YYYY-MM-DD HH:mm`, the format used for
/// `createdAt`, `updatedAt`, and audit lines.
pub(crate) fn now_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}
