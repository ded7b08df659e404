//! The persistence seam: a small trait every backing store implements,
//! plus an in-memory store good enough for tests and for running the
//! whole engine without an external database.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// The two tables the dispatcher reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Mazes,
    MazeSolutions,
}

/// Storage errors. `NotFound` is expected and handled by callers;
/// `Backend` wraps whatever a real database driver would surface.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no record found")]
    NotFound,
    #[error("store backend error: {0}")]
    Backend(String),
}

/// An abstract key/field store. Every record is a JSON value keyed by a
/// UUID; `get_by_field`/`get_by_fields` do an equality scan over a named
/// top-level field, mirroring a schemaless document store's query model.
pub trait Store: Send + Sync {
    fn get_by_key(&self, table: Table, key: Uuid) -> Result<serde_json::Value, StoreError>;

    fn get_by_field(
        &self,
        table: Table,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, StoreError>;

    fn get_by_fields(
        &self,
        table: Table,
        fields: &[(&str, &serde_json::Value)],
    ) -> Result<Vec<serde_json::Value>, StoreError>;

    fn put(&self, table: Table, key: Uuid, value: serde_json::Value) -> Result<(), StoreError>;

    fn update(&self, table: Table, key: Uuid, value: serde_json::Value) -> Result<(), StoreError>;

    fn delete(&self, table: Table, key: Uuid) -> Result<(), StoreError>;

    fn list(&self, table: Table) -> Result<Vec<serde_json::Value>, StoreError>;
}

/// Typed convenience wrapper over [`Store`] for one record type `T`.
pub struct TypedStore<'a, T> {
    store: &'a dyn Store,
    table: Table,
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T: Serialize + DeserializeOwned> TypedStore<'a, T> {
    pub fn new(store: &'a dyn Store, table: Table) -> Self {
        Self {
            store,
            table,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn get_by_key(&self, key: Uuid) -> Result<T, StoreError> {
        let value = self.store.get_by_key(self.table, key)?;
        serde_json::from_value(value).map_err(|e| StoreError::Backend(e.to_string()))
    }

    pub fn get_by_field(&self, field: &str, value: &serde_json::Value) -> Result<Vec<T>, StoreError> {
        self.store
            .get_by_field(self.table, field, value)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| StoreError::Backend(e.to_string())))
            .collect()
    }

    pub fn get_by_fields(&self, fields: &[(&str, &serde_json::Value)]) -> Result<Vec<T>, StoreError> {
        self.store
            .get_by_fields(self.table, fields)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| StoreError::Backend(e.to_string())))
            .collect()
    }

    pub fn put(&self, key: Uuid, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::Backend(e.to_string()))?;
        self.store.put(self.table, key, value)
    }

    pub fn update(&self, key: Uuid, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::Backend(e.to_string()))?;
        self.store.update(self.table, key, value)
    }

    pub fn delete(&self, key: Uuid) -> Result<(), StoreError> {
        self.store.delete(self.table, key)
    }

    pub fn list(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .list(self.table)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| StoreError::Backend(e.to_string())))
            .collect()
    }
}

/// A `HashMap`-per-table store guarded by one mutex each. Linear scan for
/// field lookups, same as a small schemaless database would do without
/// a secondary index.
#[derive(Default)]
pub struct InMemoryStore {
    mazes: Mutex<HashMap<Uuid, serde_json::Value>>,
    maze_solutions: Mutex<HashMap<Uuid, serde_json::Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table_lock(&self, table: Table) -> &Mutex<HashMap<Uuid, serde_json::Value>> {
        match table {
            Table::Mazes => &self.mazes,
            Table::MazeSolutions => &self.maze_solutions,
        }
    }
}

fn matches_field(value: &serde_json::Value, field: &str, expected: &serde_json::Value) -> bool {
    value.get(field).map(|v| v == expected).unwrap_or(false)
}

impl Store for InMemoryStore {
    fn get_by_key(&self, table: Table, key: Uuid) -> Result<serde_json::Value, StoreError> {
        self.table_lock(table)
            .lock()
            .expect("store mutex poisoned")
            .get(&key)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn get_by_field(
        &self,
        table: Table,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        Ok(self
            .table_lock(table)
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|v| matches_field(v, field, value))
            .cloned()
            .collect())
    }

    fn get_by_fields(
        &self,
        table: Table,
        fields: &[(&str, &serde_json::Value)],
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        Ok(self
            .table_lock(table)
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|v| fields.iter().all(|(field, expected)| matches_field(v, field, expected)))
            .cloned()
            .collect())
    }

    fn put(&self, table: Table, key: Uuid, value: serde_json::Value) -> Result<(), StoreError> {
        self.table_lock(table).lock().expect("store mutex poisoned").insert(key, value);
        Ok(())
    }

    fn update(&self, table: Table, key: Uuid, value: serde_json::Value) -> Result<(), StoreError> {
        let mut guard = self.table_lock(table).lock().expect("store mutex poisoned");
        if !guard.contains_key(&key) {
            return Err(StoreError::NotFound);
        }
        guard.insert(key, value);
        Ok(())
    }

    fn delete(&self, table: Table, key: Uuid) -> Result<(), StoreError> {
        let mut guard = self.table_lock(table).lock().expect("store mutex poisoned");
        guard.remove(&key).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn list(&self, table: Table) -> Result<Vec<serde_json::Value>, StoreError> {
        Ok(self.table_lock(table).lock().expect("store mutex poisoned").values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Widget {
        owner: String,
        count: u32,
    }

    #[test]
    fn round_trips_through_typed_store() {
        let backing = InMemoryStore::new();
        let typed: TypedStore<Widget> = TypedStore::new(&backing, Table::Mazes);
        let key = Uuid::from_u128(1);

        typed
            .put(
                key,
                &Widget {
                    owner: "alice".into(),
                    count: 3,
                },
            )
            .unwrap();

        let fetched = typed.get_by_key(key).unwrap();
        assert_eq!(fetched, Widget { owner: "alice".into(), count: 3 });
    }

    #[test]
    fn field_lookup_scans_table() {
        let backing = InMemoryStore::new();
        let typed: TypedStore<Widget> = TypedStore::new(&backing, Table::Mazes);

        typed.put(Uuid::from_u128(1), &Widget { owner: "alice".into(), count: 1 }).unwrap();
        typed.put(Uuid::from_u128(2), &Widget { owner: "bob".into(), count: 2 }).unwrap();

        let found = typed
            .get_by_field("owner", &serde_json::json!("bob"))
            .unwrap();
        assert_eq!(found, vec![Widget { owner: "bob".into(), count: 2 }]);
    }

    #[test]
    fn update_requires_existing_key() {
        let backing = InMemoryStore::new();
        let typed: TypedStore<Widget> = TypedStore::new(&backing, Table::Mazes);
        let result = typed.update(Uuid::from_u128(9), &Widget { owner: "x".into(), count: 0 });
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn delete_removes_entry() {
        let backing = InMemoryStore::new();
        let typed: TypedStore<Widget> = TypedStore::new(&backing, Table::Mazes);
        let key = Uuid::from_u128(1);
        typed.put(key, &Widget { owner: "x".into(), count: 0 }).unwrap();
        typed.delete(key).unwrap();
        assert!(matches!(typed.get_by_key(key), Err(StoreError::NotFound)));
    }
}
