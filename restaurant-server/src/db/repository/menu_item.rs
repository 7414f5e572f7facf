//! Menu Item Repository

use crate::db::{MENU_ITEMS_TABLE, Storage, StorageResult};
use shared::models::MenuItem;

use super::sort_newest_first;

#[derive(Clone)]
pub struct MenuItemRepository {
    storage: Storage,
}

impl MenuItemRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn find_by_id(&self, id: &str) -> StorageResult<Option<MenuItem>> {
        self.storage.get(MENU_ITEMS_TABLE, id)
    }

    /// Items of one owner, newest first
    pub fn find_by_owner(&self, owner_id: &str) -> StorageResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self
            .storage
            .scan::<MenuItem>(MENU_ITEMS_TABLE)?
            .into_iter()
            .filter(|item| item.owner_id == owner_id)
            .collect();
        sort_newest_first(&mut items, |item| (item.created_at, item.id.as_str()));
        Ok(items)
    }

    pub fn create(&self, item: &MenuItem) -> StorageResult<()> {
        self.storage.insert(MENU_ITEMS_TABLE, &item.id, item, &[])
    }

    pub fn save(&self, item: &MenuItem) -> StorageResult<()> {
        self.storage.replace(MENU_ITEMS_TABLE, &item.id, item, &[], &[])
    }

    pub fn delete(&self, id: &str) -> StorageResult<bool> {
        self.storage.remove(MENU_ITEMS_TABLE, id, &[])
    }
}
