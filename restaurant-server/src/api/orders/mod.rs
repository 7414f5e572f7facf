//! Order API Module
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /orders | POST | 无 (顾客下单) |
//! | /orders | GET | owner |
//! | /orders/{id} | GET / PUT / DELETE | owner + 所有权 |
//! | /orders/{id}/status | PATCH | owner + 所有权 |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list).post(handler::create))
        .route(
            "/orders/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/orders/{id}/status", patch(handler::update_status))
}
