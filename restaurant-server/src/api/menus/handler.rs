//! Menu API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use shared::models::{MenuItem, MenuItemFields, MenuItemView};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok_with_message};

/// Form field names accepted for the picture
const PICTURE_FIELDS: &[&str] = &["itemPicture", "image"];

/// Collect the text fields and the (non-empty) picture of a menu item form
async fn read_form(mut multipart: Multipart) -> AppResult<(MenuItemFields, Option<Vec<u8>>)> {
    let mut fields = MenuItemFields::default();
    let mut picture = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if PICTURE_FIELDS.contains(&name.as_str()) {
            let bytes = field.bytes().await?;
            // Browsers send an empty part when no file was chosen
            if !bytes.is_empty() {
                picture = Some(bytes.to_vec());
            }
            continue;
        }

        let value = field.text().await?;
        if !fields.set(&name, value) {
            tracing::debug!(field = %name, "Ignoring unknown menu form field");
        }
    }

    Ok((fields, picture))
}

/// POST /menus
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    let (fields, picture) = read_form(multipart).await?;
    let item = state
        .menu()
        .create_menu_item(&current_user, fields, picture)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /menus - 当前店主的菜单 (内嵌图片)
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<MenuItemView>>> {
    let items = state.menu().list_menu_items(&current_user).await?;
    Ok(Json(items))
}

/// GET /menus/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItemView>> {
    let item = state.menu().get_menu_item(&current_user, &id).await?;
    Ok(Json(item))
}

/// PUT /menus/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<MenuItem>> {
    let (fields, picture) = read_form(multipart).await?;
    let item = state
        .menu()
        .update_menu_item(&current_user, &id, fields, picture)
        .await?;
    Ok(Json(item))
}

/// DELETE /menus/{id} - 同时删除图片
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    state.menu().delete_menu_item(&current_user, &id).await?;
    Ok(ok_with_message(true, "Menu item deleted"))
}

/// GET /menus/restaurant/{id} - 公共菜单 (餐厅 id 或店主 id)
pub async fn list_by_restaurant(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<MenuItemView>>> {
    let items = state.menu().list_menu_items_by_restaurant(&id).await?;
    Ok(Json(items))
}
