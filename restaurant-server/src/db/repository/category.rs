//! Category Repository

use crate::db::{
    CATEGORIES_TABLE, CATEGORY_NAME_INDEX, Storage, StorageError, StorageResult, UniqueKey,
    normalize_key,
};
use shared::models::Category;

#[derive(Clone)]
pub struct CategoryRepository {
    storage: Storage,
}

impl CategoryRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// All categories ordered by name
    pub fn find_all(&self) -> StorageResult<Vec<Category>> {
        let mut categories: Vec<Category> = self.storage.scan(CATEGORIES_TABLE)?;
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(categories)
    }

    /// Find category by name (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> StorageResult<Option<Category>> {
        match self.storage.lookup(CATEGORY_NAME_INDEX, &normalize_key(name))? {
            Some(id) => self.storage.get(CATEGORIES_TABLE, &id),
            None => Ok(None),
        }
    }

    /// Create a category; a taken name fails with `Duplicate("name")`
    pub fn create(&self, name: &str) -> StorageResult<Category> {
        let category = Category {
            id: shared::util::new_id(),
            name: name.trim().to_string(),
        };
        self.storage.insert(
            CATEGORIES_TABLE,
            &category.id,
            &category,
            &[UniqueKey::new(CATEGORY_NAME_INDEX, normalize_key(name), "name")],
        )?;
        Ok(category)
    }

    /// Find by name or create on demand (used during owner signup)
    pub fn find_or_create(&self, name: &str) -> StorageResult<Category> {
        if let Some(existing) = self.find_by_name(name)? {
            return Ok(existing);
        }
        match self.create(name) {
            Ok(category) => Ok(category),
            // Lost a race with a concurrent signup: the winner's row is what we want
            Err(StorageError::Duplicate(_)) => self
                .find_by_name(name)?
                .ok_or_else(|| StorageError::Duplicate("name".to_string())),
            Err(e) => Err(e),
        }
    }
}
