//! Google sign-in
//!
//! Verifies a Google ID token by asking the tokeninfo endpoint to decode it,
//! then checks the audience against the configured client id.

use serde::Deserialize;
use serde_json::Value;

use crate::security_log;
use crate::utils::AppError;

/// Identity asserted by a verified Google ID token
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    /// Google account id (`sub`)
    pub subject: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    /// Google returns `"true"`; accept a JSON boolean too
    #[serde(default)]
    email_verified: Option<Value>,
    name: Option<String>,
}

/// Google ID token verifier
#[derive(Debug, Clone)]
pub struct GoogleVerifier {
    http: reqwest::Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl GoogleVerifier {
    pub fn new(http: reqwest::Client, tokeninfo_url: impl Into<String>, client_id: Option<String>) -> Self {
        Self {
            http,
            tokeninfo_url: tokeninfo_url.into(),
            client_id,
        }
    }

    /// Verify an ID token credential
    ///
    /// A rejected token, a foreign audience or an unverified email is
    /// `InvalidToken` (401); an unreachable endpoint is `Internal`.
    pub async fn verify(&self, credential: &str) -> Result<GoogleIdentity, AppError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::Invalid("Google sign-in is not configured".to_string()))?;

        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Google tokeninfo request failed: {e}")))?;

        if !response.status().is_success() {
            security_log!(
                "WARN",
                "google_token_rejected",
                status = response.status().as_u16()
            );
            return Err(AppError::invalid_token("Google credential was rejected"));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Malformed tokeninfo response: {e}")))?;

        if info.aud != client_id {
            security_log!("WARN", "google_audience_mismatch", aud = info.aud.as_str());
            return Err(AppError::invalid_token("Google credential was issued for another client"));
        }

        let verified = match &info.email_verified {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        };
        let email = match info.email {
            Some(email) if verified => email,
            _ => return Err(AppError::invalid_token("Google account email is not verified")),
        };

        let name = info
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        Ok(GoogleIdentity {
            subject: info.sub,
            email,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::Query, routing::get};
    use std::collections::HashMap;

    /// Local stand-in for the tokeninfo endpoint: `good` and `other-aud` are known tokens
    async fn spawn_tokeninfo() -> String {
        async fn tokeninfo(
            Query(params): Query<HashMap<String, String>>,
        ) -> Result<Json<Value>, http::StatusCode> {
            match params.get("id_token").map(String::as_str) {
                Some("good") => Ok(Json(serde_json::json!({
                    "aud": "client-1",
                    "sub": "g-123",
                    "email": "gina@example.com",
                    "email_verified": "true",
                    "name": "Gina"
                }))),
                Some("other-aud") => Ok(Json(serde_json::json!({
                    "aud": "client-2",
                    "sub": "g-9",
                    "email": "x@example.com",
                    "email_verified": true
                }))),
                _ => Err(http::StatusCode::BAD_REQUEST),
            }
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/tokeninfo", get(tokeninfo));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/tokeninfo")
    }

    #[tokio::test]
    async fn verifies_known_token() {
        let url = spawn_tokeninfo().await;
        let verifier = GoogleVerifier::new(reqwest::Client::new(), url, Some("client-1".into()));

        let identity = verifier.verify("good").await.unwrap();
        assert_eq!(identity.email, "gina@example.com");
        assert_eq!(identity.subject, "g-123");
        assert_eq!(identity.name, "Gina");

        assert!(matches!(
            verifier.verify("bogus").await,
            Err(AppError::InvalidToken(_))
        ));
        assert!(matches!(
            verifier.verify("other-aud").await,
            Err(AppError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn unconfigured_client_id() {
        let verifier = GoogleVerifier::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
        assert!(matches!(verifier.verify("good").await, Err(AppError::Invalid(_))));
    }
}
