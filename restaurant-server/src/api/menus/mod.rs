//! Menu API Module
//!
//! Create and update take `multipart/form-data`: the text fields by wire
//! name plus an optional picture in `itemPicture` (or `image`).

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/menus", get(handler::list).post(handler::create))
        .route(
            "/menus/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        // Public listing for the customer-facing menu
        .route("/menus/restaurant/{id}", get(handler::list_by_restaurant))
}
