//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use shared::models::{Order, OrderCreate, OrderStatusUpdate, OrderUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok_with_message};

/// POST /orders - 顾客下单 (无需认证)
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<OrderCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let Json(payload) = payload?;
    let order = state.orders().place_order(payload)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders - 当前店主的订单 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders().list_orders(&current_user)?;
    Ok(Json(orders))
}

/// GET /orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders().get_order(&current_user, &id)?;
    Ok(Json(order))
}

/// PUT /orders/{id} - 合并更新字段
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<OrderUpdate>, JsonRejection>,
) -> AppResult<Json<Order>> {
    let Json(payload) = payload?;
    let order = state.orders().update_order(&current_user, &id, payload)?;
    Ok(Json(order))
}

/// PATCH /orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<OrderStatusUpdate>, JsonRejection>,
) -> AppResult<Json<Order>> {
    let Json(payload) = payload?;
    let order = state
        .orders()
        .change_status(&current_user, &id, payload.status)?;
    Ok(Json(order))
}

/// DELETE /orders/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    state.orders().delete_order(&current_user, &id)?;
    Ok(ok_with_message(true, "Order deleted"))
}
