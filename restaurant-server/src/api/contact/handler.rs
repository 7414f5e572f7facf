use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use shared::models::{ContactCreate, ContactMessage};
use shared::util::{new_id, now_millis};
use validator::ValidateEmail;

use crate::core::ServerState;
use crate::db::repository::ContactRepository;
use crate::utils::AppResult;
use crate::utils::error::AppError;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, require_text};

/// Store a contact message; every field is required
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ContactCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ContactMessage>)> {
    let Json(payload) = payload?;

    let name = require_text(payload.name, "name", MAX_NAME_LEN)?;
    let email = require_text(payload.email, "email", MAX_NAME_LEN)?;
    if !email.validate_email() {
        return Err(AppError::validation("email is not a valid address"));
    }
    let message = require_text(payload.message, "message", MAX_NOTE_LEN)?;

    let contact = ContactMessage {
        id: new_id(),
        name,
        email,
        message,
        created_at: now_millis(),
    };
    ContactRepository::new(state.storage.clone()).create(&contact)?;

    tracing::info!(contact_id = %contact.id, "Contact message received");
    Ok((StatusCode::CREATED, Json(contact)))
}
