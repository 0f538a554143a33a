use std::path::PathBuf;

use crate::infra::sqlite::queries::{get_entry, list_entries, remove_entry, set_entry};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::store::{KeyValueStore, StoreError};

pub struct SqliteStore {
    pub db_path: PathBuf,
}

impl SqliteStore {
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let db_path = db_path.into();
        init_db(&db_path).map_err(|err| StoreError::Message(err.to_string()))?;
        Ok(Self { db_path })
    }

    pub fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        list_entries(&self.db_path, prefix).map_err(|err| StoreError::Message(err.to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        get_entry(&self.db_path, key).map_err(|err| StoreError::Message(err.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        set_entry(&self.db_path, key, value).map_err(|err| StoreError::Message(err.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        remove_entry(&self.db_path, key).map_err(|err| StoreError::Message(err.to_string()))
    }
}
