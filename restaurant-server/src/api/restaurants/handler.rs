//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use shared::models::{MenuItemView, Restaurant, RestaurantCreate, Role};

use super::open_restaurant;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::RestaurantRepository;
use crate::utils::AppResult;
use crate::utils::error::AppError;
use crate::utils::validation::{MAX_NAME_LEN, require_text};

/// Form field names accepted for the picture
const IMAGE_FIELDS: &[&str] = &["image", "file"];

/// GET /restaurants - 所有餐厅 (按名称排序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = RestaurantRepository::new(state.storage.clone()).find_all()?;
    Ok(Json(restaurants))
}

/// POST /restaurants - 店主创建自己的餐厅 (每个店主一家)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    payload: Result<Json<RestaurantCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    current_user.require_role(Role::Owner)?;
    let Json(payload) = payload?;
    let name = require_text(payload.name, "name", MAX_NAME_LEN)?;

    let restaurant = open_restaurant(&state.storage, &current_user.id, name, payload.category)?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// GET /restaurants/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = RestaurantRepository::new(state.storage.clone())
        .find_by_id(&id)?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {id} not found")))?;
    Ok(Json(restaurant))
}

/// GET /restaurants/name/{name} - 名称不区分大小写
pub async fn get_by_name(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = RestaurantRepository::new(state.storage.clone())
        .find_by_name(&name)?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {name} not found")))?;
    Ok(Json(restaurant))
}

/// GET /restaurants/{id}/menu-items
pub async fn menu_items(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<MenuItemView>>> {
    let items = state.menu().list_menu_items_by_restaurant(&id).await?;
    Ok(Json(items))
}

/// POST /restaurants/{id}/image - 上传餐厅图片 (替换旧图片)
pub async fn upload_image(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<Restaurant>> {
    current_user.require_role(Role::Owner)?;
    let restaurants = RestaurantRepository::new(state.storage.clone());
    let mut restaurant = restaurants
        .find_by_id(&id)?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {id} not found")))?;
    current_user.ensure_owner(&restaurant.owner_id)?;

    let mut data = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name().is_some_and(|n| IMAGE_FIELDS.contains(&n)) {
            data = Some(field.bytes().await?);
            break;
        }
    }
    let data = data.ok_or_else(|| {
        AppError::validation("No 'image' field found. Field name must be 'image'")
    })?;

    let accepted = state.images.inspect(&data)?;
    let filename = state.images.store(&restaurant.id, accepted, &data).await?;
    restaurant.image = Some(filename);
    restaurants.save(&restaurant)?;

    tracing::info!(
        restaurant_id = %restaurant.id,
        size = data.len(),
        extension = accepted.extension,
        "Restaurant image uploaded"
    );
    Ok(Json(restaurant))
}
