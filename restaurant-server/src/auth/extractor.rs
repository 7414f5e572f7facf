//! JWT Extractor
//!
//! Custom extractor for automatically validating JWT tokens. The token is
//! read from the session cookie first, then from `Authorization: Bearer`.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService, cookie};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;

/// JWT Auth Extractor
///
/// Use this extractor in protected handlers to automatically validate JWT
/// and extract CurrentUser
///
/// 令牌主体必须仍是已存在的账户，已删除账户的令牌一律 401
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let from_cookie = cookie::read_cookie(&parts.headers, &state.config.cookie_name);
        let token = match from_cookie {
            Some(token) => token,
            None => {
                let auth_header = parts
                    .headers
                    .get(http::header::AUTHORIZATION)
                    .and_then(|h| h.to_str().ok());
                match auth_header {
                    Some(header) => JwtService::extract_from_header(header)
                        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?
                        .to_string(),
                    None => {
                        security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                        return Err(AppError::unauthorized());
                    }
                }
            }
        };

        // Validate token
        match state.jwt_service.validate_token(&token) {
            Ok(claims) => {
                let user = CurrentUser::try_from(claims)
                    .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;

                if UserRepository::new(state.storage.clone())
                    .find_by_id(&user.id)?
                    .is_none()
                {
                    security_log!("WARN", "auth_unknown_user", user_id = user.id.clone());
                    return Err(AppError::unauthorized());
                }

                // Store in extensions for potential reuse
                parts.extensions.insert(user.clone());

                Ok(user)
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{}", e),
                    uri = format!("{:?}", parts.uri)
                );

                match e {
                    JwtError::ExpiredToken => Err(AppError::token_expired()),
                    _ => Err(AppError::invalid_token("Invalid token")),
                }
            }
        }
    }
}
