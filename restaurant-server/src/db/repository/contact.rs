//! Contact Message Repository

use crate::db::{CONTACTS_TABLE, Storage, StorageResult};
use shared::models::ContactMessage;

#[derive(Clone)]
pub struct ContactRepository {
    storage: Storage,
}

impl ContactRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, message: &ContactMessage) -> StorageResult<()> {
        self.storage.insert(CONTACTS_TABLE, &message.id, message, &[])
    }
}
