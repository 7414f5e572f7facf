//! Transaction API Module
//!
//! Owner bookkeeping records. Every route needs an owner session and the
//! per-record routes are ownership-checked.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/transactions", get(handler::list).post(handler::create))
        .route(
            "/transactions/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
