//! Restaurant Repository

use crate::db::{
    RESTAURANT_NAME_INDEX, RESTAURANT_OWNER_INDEX, RESTAURANTS_TABLE, Storage, StorageResult,
    UniqueKey, normalize_key,
};
use shared::models::Restaurant;

#[derive(Clone)]
pub struct RestaurantRepository {
    storage: Storage,
}

impl RestaurantRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn find_all(&self) -> StorageResult<Vec<Restaurant>> {
        let mut restaurants: Vec<Restaurant> = self.storage.scan(RESTAURANTS_TABLE)?;
        restaurants.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(restaurants)
    }

    pub fn find_by_id(&self, id: &str) -> StorageResult<Option<Restaurant>> {
        self.storage.get(RESTAURANTS_TABLE, id)
    }

    /// Case-insensitive name lookup
    pub fn find_by_name(&self, name: &str) -> StorageResult<Option<Restaurant>> {
        match self.storage.lookup(RESTAURANT_NAME_INDEX, &normalize_key(name))? {
            Some(id) => self.find_by_id(&id),
            None => Ok(None),
        }
    }

    pub fn find_by_owner(&self, owner_id: &str) -> StorageResult<Option<Restaurant>> {
        match self.storage.lookup(RESTAURANT_OWNER_INDEX, owner_id)? {
            Some(id) => self.find_by_id(&id),
            None => Ok(None),
        }
    }

    /// Create a restaurant; fails with `Duplicate` on a taken name or a second restaurant per owner
    pub fn create(&self, restaurant: &Restaurant) -> StorageResult<()> {
        self.storage.insert(
            RESTAURANTS_TABLE,
            &restaurant.id,
            restaurant,
            &[
                UniqueKey::new(RESTAURANT_NAME_INDEX, normalize_key(&restaurant.name), "name"),
                UniqueKey::new(RESTAURANT_OWNER_INDEX, &restaurant.owner_id, "ownerId"),
            ],
        )
    }

    /// Save a restaurant whose name and owner are unchanged (e.g. a new image)
    pub fn save(&self, restaurant: &Restaurant) -> StorageResult<()> {
        self.storage
            .replace(RESTAURANTS_TABLE, &restaurant.id, restaurant, &[], &[])
    }
}
