//! Shared harness: an in-memory store, a temp uploads dir and the full router
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use restaurant_server::db::Storage;
use restaurant_server::{Config, ServerState, api};
use serde_json::{Value, json};
use shared::models::{Role, User};
use tower::ServiceExt;

pub const BOUNDARY: &str = "----restaurant-test-boundary";

/// PNG signature plus the start of an IHDR chunk
pub const PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R',
];

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_work_dir(dir.path().to_string_lossy().to_string()).unwrap();
        let state = ServerState::with_storage(&config, Storage::open_in_memory().unwrap())
            .await
            .unwrap();
        let router = api::build_router(state.clone());
        Self {
            state,
            router,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// JSON request with an optional Bearer token; returns status and parsed body
    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.send(request).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    /// Multipart request with text fields and an optional file part
    pub async fn multipart(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    /// Sign up through the API and return the user plus a token for it
    pub async fn signup(&self, email: &str, role: Role, restaurant: Option<&str>) -> (User, String) {
        let mut body = json!({
            "name": email.split('@').next().unwrap(),
            "email": email,
            "password": "secret-password",
            "role": role,
        });
        if let Some(name) = restaurant {
            body["restaurantName"] = json!(name);
            body["category"] = json!("Pizza");
        }
        let (status, body) = self.json("POST", "/signup", None, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        let user: User = serde_json::from_value(body).unwrap();
        let token = self.state.jwt_service.generate_token(&user).unwrap();
        (user, token)
    }

    pub async fn owner(&self, email: &str) -> (User, String) {
        self.signup(email, Role::Owner, None).await
    }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    // Plain-text bodies (e.g. image 404s) come back as a JSON string
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A complete place-order body for `owner_id`
pub fn order_body(owner_id: &str) -> Value {
    json!({
        "customerName": "Ana",
        "time": "12:30",
        "amount": 18.5,
        "paymentType": "Online",
        "status": "In Progress",
        "details": "no onions",
        "ownerId": owner_id,
    })
}
