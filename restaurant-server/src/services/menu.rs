//! Menu Service
//!
//! Owner-scoped menu items with an optional picture. Uploads are sniffed
//! and validated before any record is written; the picture itself is written
//! after the record (two steps, not atomic). Listings embed the picture as
//! base64 read from the image store at response time.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shared::Notification;
use shared::models::{MenuItem, MenuItemFields, MenuItemView, Role};
use shared::util::{new_id, now_millis};

use crate::auth::CurrentUser;
use crate::db::Storage;
use crate::db::repository::{MenuItemRepository, RestaurantRepository, UserRepository};
use crate::services::image_store::{AcceptedImage, ImageStore};
use crate::services::NotificationBus;
use crate::utils::AppResult;
use crate::utils::error::AppError;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, parse_amount, require_text};

#[derive(Clone)]
pub struct MenuService {
    items: MenuItemRepository,
    restaurants: RestaurantRepository,
    users: UserRepository,
    images: ImageStore,
    bus: NotificationBus,
}

impl MenuService {
    pub fn new(storage: Storage, images: ImageStore, bus: NotificationBus) -> Self {
        Self {
            items: MenuItemRepository::new(storage.clone()),
            restaurants: RestaurantRepository::new(storage.clone()),
            users: UserRepository::new(storage),
            images,
            bus,
        }
    }

    /// Create a menu item for the calling owner
    pub async fn create_menu_item(
        &self,
        user: &CurrentUser,
        fields: MenuItemFields,
        image: Option<Vec<u8>>,
    ) -> AppResult<MenuItem> {
        user.require_role(Role::Owner)?;

        let item_name = require_text(fields.item_name, "itemName", MAX_NAME_LEN)?;
        let carbs_price = require_text(fields.carbs_price, "carbsPrice", MAX_SHORT_TEXT_LEN)?;
        let carbs_price = parse_amount(&carbs_price, "carbsPrice")?;
        let protein_type = require_text(fields.protein_type, "proteinType", MAX_SHORT_TEXT_LEN)?;
        let proteins_price =
            require_text(fields.proteins_price, "proteinsPrice", MAX_SHORT_TEXT_LEN)?;
        let proteins_price = parse_amount(&proteins_price, "proteinsPrice")?;
        let base_fat = require_text(fields.base_fat, "baseFat", MAX_SHORT_TEXT_LEN)?;
        let base_fat = parse_amount(&base_fat, "baseFat")?;

        let accepted = self.inspect(image.as_deref())?;

        let id = new_id();
        let now = now_millis();
        let item = MenuItem {
            item_picture: accepted.map(|a| crate::services::image_store::file_name(&id, a.extension)),
            id,
            item_name,
            carbs_price,
            protein_type,
            proteins_price,
            base_fat,
            owner_id: user.id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.items.create(&item)?;

        if let (Some(accepted), Some(bytes)) = (accepted, image.as_deref()) {
            self.images.store(&item.id, accepted, bytes).await?;
        }

        tracing::info!(item_id = %item.id, owner_id = %item.owner_id, "Menu item created");
        self.bus.publish(Notification::ItemAdded { item: item.clone() });
        Ok(item)
    }

    /// Merge present fields; a new picture replaces the stored one
    pub async fn update_menu_item(
        &self,
        user: &CurrentUser,
        id: &str,
        fields: MenuItemFields,
        image: Option<Vec<u8>>,
    ) -> AppResult<MenuItem> {
        let mut item = self.load_owned(user, id)?;
        let accepted = self.inspect(image.as_deref())?;
        if fields.is_empty() && accepted.is_none() {
            tracing::debug!(item_id = %id, "Menu item update carries no changes");
            return Ok(item);
        }

        if let Some(item_name) = fields.item_name {
            item.item_name = require_text(Some(item_name), "itemName", MAX_NAME_LEN)?;
        }
        if let Some(carbs_price) = fields.carbs_price {
            item.carbs_price = parse_amount(&carbs_price, "carbsPrice")?;
        }
        if let Some(protein_type) = fields.protein_type {
            item.protein_type = require_text(Some(protein_type), "proteinType", MAX_SHORT_TEXT_LEN)?;
        }
        if let Some(proteins_price) = fields.proteins_price {
            item.proteins_price = parse_amount(&proteins_price, "proteinsPrice")?;
        }
        if let Some(base_fat) = fields.base_fat {
            item.base_fat = parse_amount(&base_fat, "baseFat")?;
        }
        if let Some(accepted) = accepted {
            item.item_picture = Some(crate::services::image_store::file_name(
                &item.id,
                accepted.extension,
            ));
        }
        item.updated_at = now_millis();
        self.items.save(&item)?;

        if let (Some(accepted), Some(bytes)) = (accepted, image.as_deref()) {
            self.images.store(&item.id, accepted, bytes).await?;
        }

        tracing::info!(item_id = %item.id, "Menu item updated");
        self.bus.publish(Notification::ItemUpdated { item: item.clone() });
        Ok(item)
    }

    /// Items of the calling owner with embedded pictures
    pub async fn list_menu_items(&self, user: &CurrentUser) -> AppResult<Vec<MenuItemView>> {
        user.require_role(Role::Owner)?;
        let items = self.items.find_by_owner(&user.id)?;
        self.enrich_all(items).await
    }

    pub async fn get_menu_item(&self, user: &CurrentUser, id: &str) -> AppResult<MenuItemView> {
        let item = self.load_owned(user, id)?;
        self.enrich(item).await
    }

    /// Remove the record and its picture
    pub async fn delete_menu_item(&self, user: &CurrentUser, id: &str) -> AppResult<()> {
        let item = self.load_owned(user, id)?;
        self.items.delete(&item.id)?;
        self.images.remove(&item.id).await?;

        tracing::info!(item_id = %item.id, "Menu item deleted");
        self.bus.publish(Notification::ItemDeleted { item_id: item.id });
        Ok(())
    }

    /// Public listing for a restaurant id, or directly for an owner id
    pub async fn list_menu_items_by_restaurant(
        &self,
        restaurant_id: &str,
    ) -> AppResult<Vec<MenuItemView>> {
        let owner_id = match self.restaurants.find_by_id(restaurant_id)? {
            Some(restaurant) => restaurant.owner_id,
            None => match self.users.find_by_id(restaurant_id)? {
                Some(user) if user.role == Role::Owner => user.id,
                _ => {
                    return Err(AppError::not_found(format!(
                        "Restaurant {restaurant_id} not found"
                    )));
                }
            },
        };
        let items = self.items.find_by_owner(&owner_id)?;
        self.enrich_all(items).await
    }

    fn inspect(&self, image: Option<&[u8]>) -> AppResult<Option<AcceptedImage>> {
        Ok(image.map(|bytes| self.images.inspect(bytes)).transpose()?)
    }

    fn load_owned(&self, user: &CurrentUser, id: &str) -> AppResult<MenuItem> {
        user.require_role(Role::Owner)?;
        let item = self
            .items
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found(format!("Menu item {id} not found")))?;
        user.ensure_owner(&item.owner_id)?;
        Ok(item)
    }

    async fn enrich(&self, item: MenuItem) -> AppResult<MenuItemView> {
        let (image, image_extension) = match self.images.load(&item.id).await? {
            Some(stored) => (Some(STANDARD.encode(&stored.bytes)), Some(stored.extension)),
            None => (None, None),
        };
        Ok(MenuItemView {
            item,
            image,
            image_extension,
        })
    }

    async fn enrich_all(&self, items: Vec<MenuItem>) -> AppResult<Vec<MenuItemView>> {
        let mut views = Vec::with_capacity(items.len());
        for item in items {
            views.push(self.enrich(item).await?);
        }
        Ok(views)
    }
}
