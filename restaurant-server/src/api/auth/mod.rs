//! Authentication Routes
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /signup | POST | 无 |
//! | /auth/login | POST | 无 |
//! | /auth/google-login | POST | 无 |
//! | /auth/logout | POST | 无 |
//! | /auth/role/{email} | GET | 无 |
//! | /auth/check | GET | 会话 |
//! | /auth/profile | PUT | 会话 |
//! | /auth/password | PUT | 会话 |
//! | /auth/delete-user | DELETE | 会话 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        // Public routes
        .route("/signup", post(handler::signup))
        .route("/auth/login", post(handler::login))
        .route("/auth/google-login", post(handler::google_login))
        .route("/auth/logout", post(handler::logout))
        .route("/auth/role/{email}", get(handler::role_by_email))
        // Session routes - CurrentUser extractor rejects missing/invalid tokens
        .route("/auth/check", get(handler::check))
        .route("/auth/profile", put(handler::update_profile))
        .route("/auth/password", put(handler::change_password))
        .route("/auth/delete-user", delete(handler::delete_user))
}
