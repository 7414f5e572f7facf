//! Authentication Handlers
//!
//! Handles signup, login (password and Google), session checks and
//! account maintenance. The session token is returned in the body and set
//! as an HTTP-only cookie.

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Response},
};
use shared::Notification;
use shared::client::{
    GoogleLoginRequest, LoginRequest, LoginResponse, PasswordChange, ProfileUpdate,
    RoleResponse, SignupRequest,
};
use shared::models::{Role, User};
use shared::util::{new_id, now_millis};

use crate::api::restaurants::open_restaurant;
use crate::auth::{CurrentUser, cookie};
use crate::core::ServerState;
use crate::db::models::UserRecord;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::error::AppError;
use crate::utils::validation::validate_payload;
use crate::utils::{AppResponse, AppResult, ok_with_message};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

fn hash_password(password: &str) -> AppResult<String> {
    UserRecord::hash_password(password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
}

/// Issue a token for `user` and answer with `{token, user}` plus the session cookie
fn session_response(state: &ServerState, user: User, status: StatusCode) -> AppResult<Response> {
    let token = state
        .jwt_service
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    let cookie = cookie::session_cookie(
        &state.config.cookie_name,
        &token,
        state.jwt_service.lifetime_seconds(),
        state.config.cookie_secure,
    );

    Ok((
        status,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse { token, user }),
    )
        .into_response())
}

/// Load the stored record behind a session; a deleted account is no longer a session
fn load_session_user(state: &ServerState, current_user: &CurrentUser) -> AppResult<UserRecord> {
    UserRepository::new(state.storage.clone())
        .find_by_id(&current_user.id)?
        .ok_or_else(AppError::unauthorized)
}

/// POST /signup
///
/// Owners may open their restaurant in the same call by passing
/// `restaurantName` (and optionally `category`).
pub async fn signup(
    State(state): State<ServerState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<User>)> {
    let Json(req) = payload?;
    validate_payload(&req)?;

    let restaurant_name = req
        .restaurant_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let record = UserRecord {
        id: new_id(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        role: req.role,
        password_hash: Some(hash_password(&req.password)?),
        google_id: None,
        created_at: now_millis(),
    };
    let users = UserRepository::new(state.storage.clone());
    users.create(&record)?;

    if let (Role::Owner, Some(name)) = (record.role, restaurant_name)
        && let Err(e) = open_restaurant(&state.storage, &record.id, name, req.category)
    {
        // Without its restaurant the signup did not happen
        users.delete(&record)?;
        return Err(e);
    }

    tracing::info!(user_id = %record.id, role = %record.role, "User signed up");
    Ok((StatusCode::CREATED, Json(record.to_user())))
}

/// POST /auth/login
///
/// Unknown email and wrong password produce the same error after the same delay.
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(req) = payload?;
    let record = UserRepository::new(state.storage.clone()).find_by_email(&req.email)?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let record = match record {
        Some(record) => {
            let password_valid = record
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                security_log!(
                    "WARN",
                    "login_failed",
                    email = req.email.as_str(),
                    reason = "invalid_credentials"
                );
                return Err(AppError::invalid_credentials());
            }
            record
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                email = req.email.as_str(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    tracing::info!(user_id = %record.id, role = %record.role, "User logged in successfully");
    session_response(&state, record.to_user(), StatusCode::OK)
}

/// POST /auth/google-login
///
/// A first Google sign-in creates a `client` account; an existing account
/// with the same email is linked to the Google id.
pub async fn google_login(
    State(state): State<ServerState>,
    payload: Result<Json<GoogleLoginRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(req) = payload?;
    let identity = state.google.verify(&req.credential).await?;
    let users = UserRepository::new(state.storage.clone());

    let record = match users.find_by_email(&identity.email)? {
        Some(mut record) => {
            if record.google_id.is_none() {
                record.google_id = Some(identity.subject.clone());
                users.update(&record.email, &record)?;
            }
            record
        }
        None => {
            let record = UserRecord {
                id: new_id(),
                name: identity.name,
                email: identity.email,
                role: Role::Client,
                password_hash: None,
                google_id: Some(identity.subject),
                created_at: now_millis(),
            };
            users.create(&record)?;
            tracing::info!(user_id = %record.id, "User signed up with Google");
            record
        }
    };

    tracing::info!(user_id = %record.id, "User logged in with Google");
    session_response(&state, record.to_user(), StatusCode::OK)
}

/// POST /auth/logout - 清除会话 Cookie
pub async fn logout(State(state): State<ServerState>) -> impl IntoResponse {
    let cookie = cookie::clear_cookie(&state.config.cookie_name, state.config.cookie_secure);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        ok_with_message(true, "Logged out"),
    )
}

/// GET /auth/check - 当前会话的用户
pub async fn check(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let record = load_session_user(&state, &current_user)?;
    Ok(Json(record.to_user()))
}

/// PUT /auth/profile
pub async fn update_profile(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> AppResult<Json<User>> {
    let Json(req) = payload?;
    validate_payload(&req)?;

    let mut record = load_session_user(&state, &current_user)?;
    let previous_email = record.email.clone();
    if let Some(name) = req.name {
        record.name = name.trim().to_string();
    }
    if let Some(email) = req.email {
        record.email = email.trim().to_string();
    }
    UserRepository::new(state.storage.clone()).update(&previous_email, &record)?;

    let user = record.to_user();
    tracing::info!(user_id = %user.id, "Profile updated");
    state
        .notifications
        .publish(Notification::ProfileUpdated { user: user.clone() });
    Ok(Json(user))
}

/// PUT /auth/password
pub async fn change_password(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    payload: Result<Json<PasswordChange>, JsonRejection>,
) -> AppResult<Json<AppResponse<bool>>> {
    let Json(req) = payload?;
    validate_payload(&req)?;

    let mut record = load_session_user(&state, &current_user)?;
    let current_valid = record
        .verify_password(&req.current_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !current_valid {
        security_log!("WARN", "password_change_denied", user_id = record.id.as_str());
        return Err(AppError::Invalid("Current password is incorrect".to_string()));
    }

    record.password_hash = Some(hash_password(&req.new_password)?);
    UserRepository::new(state.storage.clone()).update(&record.email, &record)?;

    tracing::info!(user_id = %record.id, "Password changed");
    Ok(ok_with_message(true, "Password updated"))
}

/// DELETE /auth/delete-user
///
/// Deletes the calling account (an owner's restaurant goes with it) and
/// clears the session cookie.
pub async fn delete_user(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Response> {
    let record = load_session_user(&state, &current_user)?;
    UserRepository::new(state.storage.clone()).delete(&record)?;

    security_log!("INFO", "account_deleted", user_id = record.id.as_str());
    let cookie = cookie::clear_cookie(&state.config.cookie_name, state.config.cookie_secure);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        ok_with_message(true, "Account deleted"),
    )
        .into_response())
}

/// GET /auth/role/{email}
pub async fn role_by_email(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> AppResult<Json<RoleResponse>> {
    let record = UserRepository::new(state.storage.clone())
        .find_by_email(&email)?
        .ok_or_else(|| AppError::not_found(format!("User {email} not found")))?;
    Ok(Json(RoleResponse { role: record.role }))
}
