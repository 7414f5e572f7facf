//! Contact form

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// `POST /contact` is public
pub fn router() -> Router<ServerState> {
    Router::new().route("/contact", post(handler::create))
}
