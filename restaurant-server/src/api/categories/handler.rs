//! Category API Handlers

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use shared::models::{Category, CategoryCreate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::CategoryRepository;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, require_text};

/// GET /categories - 获取所有分类 (按名称排序)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.storage.clone()).find_all()?;
    Ok(Json(categories))
}

/// POST /categories - 创建分类，名称重复返回 409
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    payload: Result<Json<CategoryCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let Json(payload) = payload?;
    let name = require_text(payload.name, "name", MAX_SHORT_TEXT_LEN)?;

    let category = CategoryRepository::new(state.storage.clone()).create(&name)?;
    tracing::info!(
        category_id = %category.id,
        name = %category.name,
        user_id = %current_user.id,
        "Category created"
    );
    Ok((StatusCode::CREATED, Json(category)))
}
