//! User Repository

use crate::db::models::UserRecord;
use crate::db::{
    RESTAURANT_NAME_INDEX, RESTAURANT_OWNER_INDEX, RESTAURANTS_TABLE, Storage, StorageResult,
    USER_EMAIL_INDEX, USERS_TABLE, UniqueKey, normalize_key,
};
use shared::models::Restaurant;

#[derive(Clone)]
pub struct UserRepository {
    storage: Storage,
}

impl UserRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    fn email_key(email: &str) -> UniqueKey {
        UniqueKey::new(USER_EMAIL_INDEX, normalize_key(email), "email")
    }

    pub fn find_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>> {
        self.storage.get(USERS_TABLE, id)
    }

    /// Case-insensitive email lookup
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        match self.storage.lookup(USER_EMAIL_INDEX, &normalize_key(email))? {
            Some(id) => self.find_by_id(&id),
            None => Ok(None),
        }
    }

    /// Create a user; a taken email fails with `Duplicate("email")`
    pub fn create(&self, user: &UserRecord) -> StorageResult<()> {
        self.storage
            .insert(USERS_TABLE, &user.id, user, &[Self::email_key(&user.email)])
    }

    /// Save changes to an existing user, moving the email index when it changed
    pub fn update(&self, previous_email: &str, user: &UserRecord) -> StorageResult<()> {
        self.storage.replace(
            USERS_TABLE,
            &user.id,
            user,
            &[Self::email_key(previous_email)],
            &[Self::email_key(&user.email)],
        )
    }

    /// Delete a user together with the restaurant they own (if any)
    pub fn delete(&self, user: &UserRecord) -> StorageResult<bool> {
        if let Some(restaurant_id) = self.storage.lookup(RESTAURANT_OWNER_INDEX, &user.id)?
            && let Some(restaurant) = self.storage.get::<Restaurant>(RESTAURANTS_TABLE, &restaurant_id)?
        {
            self.storage.remove(
                RESTAURANTS_TABLE,
                &restaurant.id,
                &[
                    UniqueKey::new(RESTAURANT_NAME_INDEX, normalize_key(&restaurant.name), "name"),
                    UniqueKey::new(RESTAURANT_OWNER_INDEX, &restaurant.owner_id, "ownerId"),
                ],
            )?;
        }
        self.storage
            .remove(USERS_TABLE, &user.id, &[Self::email_key(&user.email)])
    }
}
