//! Stored records that differ from their wire shape
//!
//! Most entities are stored exactly as the `shared::models` types. Users are
//! not: the record carries credentials that never leave the server.

use serde::{Deserialize, Serialize};
use shared::models::{Role, User};

/// Stored user (User + credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Argon2 PHC string; `None` for Google-only accounts
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub google_id: Option<String>,
    pub created_at: i64,
}

impl UserRecord {
    /// Verify password using argon2
    ///
    /// Accounts without a password never verify.
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let Some(hash) = self.password_hash.as_deref() else {
            return Ok(false);
        };
        let parsed_hash = PasswordHash::new(hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Public view (never includes credentials)
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: Option<String>) -> UserRecord {
        UserRecord {
            id: "u1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role: Role::Owner,
            password_hash: hash,
            google_id: None,
            created_at: 1,
        }
    }

    #[test]
    fn password_round_trip() {
        let hash = UserRecord::hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        let user = record(Some(hash));
        assert!(user.verify_password("secret1").unwrap());
        assert!(!user.verify_password("secret2").unwrap());
    }

    #[test]
    fn google_only_account_has_no_password() {
        assert!(!record(None).verify_password("anything").unwrap());
    }

    #[test]
    fn public_view_drops_credentials() {
        let json = serde_json::to_value(record(Some("$argon2id$x".into())).to_user()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "owner");
    }
}
