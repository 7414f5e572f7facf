//! Restaurant API Module
//!
//! Reads are public; creating a restaurant or uploading its picture needs
//! an owner session.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use shared::models::Restaurant;
use shared::util::{new_id, now_millis};

use crate::core::ServerState;
use crate::db::Storage;
use crate::db::repository::{CategoryRepository, RestaurantRepository};
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/restaurants", get(handler::list).post(handler::create))
        .route("/restaurants/{id}", get(handler::get_by_id))
        .route("/restaurants/{id}/menu-items", get(handler::menu_items))
        .route("/restaurants/{id}/image", post(handler::upload_image))
        .route("/restaurants/name/{name}", get(handler::get_by_name))
}

/// Category used when an owner does not name one
const DEFAULT_CATEGORY: &str = "Other";

/// Open the restaurant of `owner_id`, creating its category on demand
///
/// Shared by `POST /restaurants` and owner signup. A taken name or a second
/// restaurant for the same owner is a `Conflict`.
pub(crate) fn open_restaurant(
    storage: &Storage,
    owner_id: &str,
    name: String,
    category: Option<String>,
) -> AppResult<Restaurant> {
    let category = category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let category = CategoryRepository::new(storage.clone()).find_or_create(&category)?;

    let restaurant = Restaurant {
        id: new_id(),
        name,
        category: category.name,
        owner_id: owner_id.to_string(),
        image: None,
        created_at: now_millis(),
    };
    RestaurantRepository::new(storage.clone()).create(&restaurant)?;

    tracing::info!(
        restaurant_id = %restaurant.id,
        owner_id = %restaurant.owner_id,
        name = %restaurant.name,
        "Restaurant created"
    );
    Ok(restaurant)
}
