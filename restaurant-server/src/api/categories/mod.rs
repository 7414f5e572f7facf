//! Category API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// `GET /categories` is public, creating one needs a session
pub fn router() -> Router<ServerState> {
    Router::new().route("/categories", get(handler::list).post(handler::create))
}
