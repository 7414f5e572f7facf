//! Request/response DTOs for the account API
//!
//! Shared between the server and the web clients.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Role, User};

/// Signup request
///
/// Owners may pass `restaurantName` (and `category`) to create their
/// restaurant in the same call.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6 to 128 characters"))]
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Google sign-in request carrying the ID token issued to the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleLoginRequest {
    pub credential: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Profile update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email is not a valid address"))]
    pub email: Option<String>,
}

/// Password change
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6 to 128 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: "Ana".into(),
            email: email.into(),
            password: password.into(),
            role: Role::Owner,
            restaurant_name: None,
            category: None,
        }
    }

    #[test]
    fn signup_validation() {
        assert!(signup("ana@example.com", "secret1").validate().is_ok());
        assert!(signup("not-an-email", "secret1").validate().is_err());
        assert!(signup("ana@example.com", "123").validate().is_err());
    }

    #[test]
    fn profile_update_fields_are_optional() {
        assert!(ProfileUpdate::default().validate().is_ok());
        let bad = ProfileUpdate {
            name: None,
            email: Some("nope".into()),
        };
        assert!(bad.validate().is_err());
    }
}
