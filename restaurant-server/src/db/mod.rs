//! redb-based document store
//!
//! Every entity lives in its own table as a JSON document keyed by id.
//! Uniqueness (user email, restaurant name, order codes, ...) is enforced by
//! separate index tables mapping the unique key to the owning id. Index
//! checks and document writes always share one write transaction, so two
//! concurrent inserts of the same key cannot both commit.
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `users`, `restaurants`, ... | id | JSON document |
//! | `*_idx` | unique key | id |

pub mod models;
pub mod repository;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Document table: key = id, value = JSON-serialized entity
pub type DocTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Unique index table: key = normalized unique value, value = id
pub type IndexTable = TableDefinition<'static, &'static str, &'static str>;

pub const USERS_TABLE: DocTable = TableDefinition::new("users");
pub const RESTAURANTS_TABLE: DocTable = TableDefinition::new("restaurants");
pub const CATEGORIES_TABLE: DocTable = TableDefinition::new("categories");
pub const MENU_ITEMS_TABLE: DocTable = TableDefinition::new("menu_items");
pub const ORDERS_TABLE: DocTable = TableDefinition::new("orders");
pub const TRANSACTIONS_TABLE: DocTable = TableDefinition::new("transactions");
pub const CONTACTS_TABLE: DocTable = TableDefinition::new("contact_messages");

pub const USER_EMAIL_INDEX: IndexTable = TableDefinition::new("user_email_idx");
pub const RESTAURANT_NAME_INDEX: IndexTable = TableDefinition::new("restaurant_name_idx");
/// 每个店主只能有一个餐厅
pub const RESTAURANT_OWNER_INDEX: IndexTable = TableDefinition::new("restaurant_owner_idx");
pub const CATEGORY_NAME_INDEX: IndexTable = TableDefinition::new("category_name_idx");
pub const ORDER_CODE_INDEX: IndexTable = TableDefinition::new("order_code_idx");
pub const TRANSACTION_CODE_INDEX: IndexTable = TableDefinition::new("transaction_code_idx");

const DOC_TABLES: [DocTable; 7] = [
    USERS_TABLE,
    RESTAURANTS_TABLE,
    CATEGORIES_TABLE,
    MENU_ITEMS_TABLE,
    ORDERS_TABLE,
    TRANSACTIONS_TABLE,
    CONTACTS_TABLE,
];

const INDEX_TABLES: [IndexTable; 6] = [
    USER_EMAIL_INDEX,
    RESTAURANT_NAME_INDEX,
    RESTAURANT_OWNER_INDEX,
    CATEGORY_NAME_INDEX,
    ORDER_CODE_INDEX,
    TRANSACTION_CODE_INDEX,
];

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A unique index already holds the key (value: field name)
    #[error("Duplicate value for {0}")]
    Duplicate(String),

    /// The document to overwrite no longer exists (value: id)
    #[error("Document {0} not found")]
    NotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// One entry of a unique index
#[derive(Clone)]
pub struct UniqueKey {
    pub index: IndexTable,
    pub key: String,
    /// Field name reported on conflict
    pub field: &'static str,
}

impl UniqueKey {
    pub fn new(index: IndexTable, key: impl Into<String>, field: &'static str) -> Self {
        Self {
            index,
            key: key.into(),
            field,
        }
    }
}

/// Document store backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl Storage {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate`, so a record is on disk as
    /// soon as the write call returns.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing and ephemeral runs)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            for table in DOC_TABLES {
                let _ = write_txn.open_table(table)?;
            }
            for index in INDEX_TABLES {
                let _ = write_txn.open_table(index)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Reads ==========

    /// Fetch one document by id
    pub fn get<T: DeserializeOwned>(&self, table: DocTable, id: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let docs = read_txn.open_table(table)?;
        let doc = docs
            .get(id)?
            .map(|value| serde_json::from_slice::<T>(value.value()))
            .transpose()?;
        Ok(doc)
    }

    /// Load every document of a table (in id order)
    pub fn scan<T: DeserializeOwned>(&self, table: DocTable) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let docs = read_txn.open_table(table)?;

        let mut result = Vec::new();
        for entry in docs.iter()? {
            let (_, value) = entry?;
            result.push(serde_json::from_slice(value.value())?);
        }
        Ok(result)
    }

    /// Resolve a unique key to its id
    pub fn lookup(&self, index: IndexTable, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(index)?;
        let id = table.get(key)?.map(|value| value.value().to_string());
        Ok(id)
    }

    // ========== Writes ==========

    /// Insert a new document and claim its unique keys atomically
    ///
    /// Fails with [`StorageError::Duplicate`] (nothing written) when the id
    /// or any unique key is already taken.
    pub fn insert<T: Serialize>(
        &self,
        table: DocTable,
        id: &str,
        doc: &T,
        unique: &[UniqueKey],
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(doc)?;
        let txn = self.db.begin_write()?;
        {
            for entry in unique {
                let mut index = txn.open_table(entry.index)?;
                if index.get(entry.key.as_str())?.is_some() {
                    return Err(StorageError::Duplicate(entry.field.to_string()));
                }
                index.insert(entry.key.as_str(), id)?;
            }

            let mut docs = txn.open_table(table)?;
            if docs.get(id)?.is_some() {
                return Err(StorageError::Duplicate("id".to_string()));
            }
            docs.insert(id, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Overwrite an existing document, moving unique keys from `released` to `claimed`
    ///
    /// Released keys are only removed when they still point at `id`. A
    /// claimed key held by another id fails with [`StorageError::Duplicate`].
    /// A document deleted since it was read fails with
    /// [`StorageError::NotFound`] and is not written back.
    pub fn replace<T: Serialize>(
        &self,
        table: DocTable,
        id: &str,
        doc: &T,
        released: &[UniqueKey],
        claimed: &[UniqueKey],
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(doc)?;
        let txn = self.db.begin_write()?;
        {
            let mut docs = txn.open_table(table)?;
            if docs.get(id)?.is_none() {
                return Err(StorageError::NotFound(id.to_string()));
            }

            release_keys(&txn, id, released)?;
            for entry in claimed {
                let mut index = txn.open_table(entry.index)?;
                let holder = index.get(entry.key.as_str())?.map(|v| v.value().to_string());
                match holder {
                    Some(holder) if holder != id => {
                        return Err(StorageError::Duplicate(entry.field.to_string()));
                    }
                    Some(_) => {}
                    None => {
                        index.insert(entry.key.as_str(), id)?;
                    }
                }
            }

            docs.insert(id, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Delete a document and release its unique keys; returns whether it existed
    pub fn remove(&self, table: DocTable, id: &str, released: &[UniqueKey]) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            release_keys(&txn, id, released)?;
            let mut docs = txn.open_table(table)?;
            let removed = docs.remove(id)?.is_some();
            removed
        };
        txn.commit()?;
        Ok(existed)
    }
}

fn release_keys(txn: &redb::WriteTransaction, id: &str, keys: &[UniqueKey]) -> StorageResult<()> {
    for entry in keys {
        let mut index = txn.open_table(entry.index)?;
        let owned_by_id = index
            .get(entry.key.as_str())?
            .is_some_and(|v| v.value() == id);
        if owned_by_id {
            index.remove(entry.key.as_str())?;
        }
    }
    Ok(())
}

/// Normalize a value used as a case-insensitive unique key
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}
