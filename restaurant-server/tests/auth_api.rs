mod common;

use axum::body::Body;
use common::{TestApp, read_json};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use shared::Notification;
use shared::models::Role;

async fn login(app: &TestApp, email: &str, password: &str) -> (StatusCode, Option<String>, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"email": email, "password": password}).to_string()))
        .unwrap();
    let response = app.send(request).await;
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    (status, cookie, read_json(response).await)
}

/// `name=value` part of a Set-Cookie header
fn cookie_pair(set_cookie: &str) -> &str {
    set_cookie.split(';').next().unwrap()
}

#[tokio::test]
async fn signup_never_returns_credentials() {
    let app = TestApp::new().await;
    let (status, user) = app
        .json(
            "POST",
            "/signup",
            None,
            Some(json!({
                "name": "Ana",
                "email": "ana@example.com",
                "password": "secret-password",
                "role": "client"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "client");
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn signup_rejects_duplicates_and_bad_input() {
    let app = TestApp::new().await;
    app.owner("ana@example.com").await;

    let body = |email: &str, password: &str| {
        json!({"name": "Ana", "email": email, "password": password, "role": "owner"})
    };

    let (status, error) = app
        .json("POST", "/signup", None, Some(body("ANA@example.com", "secret-password")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "E0004");

    let (status, _) = app
        .json("POST", "/signup", None, Some(body("not-an-email", "secret-password")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .json("POST", "/signup", None, Some(body("short@example.com", "123")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn owner_signup_opens_the_restaurant() {
    let app = TestApp::new().await;
    let (owner, _) = app
        .signup("owner@example.com", Role::Owner, Some("Luigi's"))
        .await;

    let (status, restaurant) = app.json("GET", "/restaurants/name/LUIGI's", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restaurant["ownerId"], owner.id.as_str());
    assert_eq!(restaurant["category"], "Pizza");

    let (_, categories) = app.json("GET", "/categories", None, None).await;
    assert_eq!(categories, json!([{"id": categories[0]["id"], "name": "Pizza"}]));

    // A second owner cannot take the same restaurant name, and is not created
    let (status, _) = app
        .json(
            "POST",
            "/signup",
            None,
            Some(json!({
                "name": "Other",
                "email": "other@example.com",
                "password": "secret-password",
                "role": "owner",
                "restaurantName": "luigi's"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = app.json("GET", "/auth/role/other@example.com", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_sets_a_session_cookie() {
    let app = TestApp::new().await;
    let (user, _) = app.owner("ana@example.com").await;

    let (status, set_cookie, body) = login(&app, "ana@example.com", "secret-password").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user.id.as_str());
    let set_cookie = set_cookie.unwrap();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    // The cookie alone authenticates
    let request = Request::builder()
        .uri("/auth/check")
        .header(header::COOKIE, cookie_pair(&set_cookie))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["email"], "ana@example.com");
}

#[tokio::test]
async fn bad_credentials_get_one_generic_error() {
    let app = TestApp::new().await;
    app.owner("ana@example.com").await;

    let (status, cookie, wrong_password) = login(&app, "ana@example.com", "nope-nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(cookie.is_none());

    let (status, _, unknown_user) = login(&app, "ghost@example.com", "secret-password").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn check_requires_a_session() {
    let app = TestApp::new().await;
    let (status, error) = app.json("GET", "/auth/check", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["code"], "E3001");
}

#[tokio::test]
async fn profile_update_is_broadcast() {
    let app = TestApp::new().await;
    let (user, token) = app.owner("ana@example.com").await;
    let mut subscription = app.state.notifications.subscribe();

    let (status, updated) = app
        .json(
            "PUT",
            "/auth/profile",
            Some(&token),
            Some(json!({"name": "Ana Maria", "email": "ana.maria@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ana Maria");

    match subscription.receiver.try_recv().unwrap().as_ref() {
        Notification::ProfileUpdated { user: changed } => {
            assert_eq!(changed.id, user.id);
            assert_eq!(changed.email, "ana.maria@example.com");
        }
        other => panic!("unexpected event {other:?}"),
    }

    // The old email is free again, the new one resolves
    let (status, _) = app.json("GET", "/auth/role/ana@example.com", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, role) = app
        .json("GET", "/auth/role/ana.maria@example.com", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(role, json!({"role": "owner"}));
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
    let app = TestApp::new().await;
    let (_, token) = app.owner("ana@example.com").await;

    let (status, _) = app
        .json(
            "PUT",
            "/auth/password",
            Some(&token),
            Some(json!({"currentPassword": "wrong-one", "newPassword": "another-secret"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .json(
            "PUT",
            "/auth/password",
            Some(&token),
            Some(json!({"currentPassword": "secret-password", "newPassword": "another-secret"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = login(&app, "ana@example.com", "another-secret").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleted_account_loses_its_session_and_restaurant() {
    let app = TestApp::new().await;
    let (_, token) = app
        .signup("owner@example.com", Role::Owner, Some("Luigi's"))
        .await;

    let (status, _) = app.json("DELETE", "/auth/delete-user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.json("GET", "/auth/check", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.json("GET", "/restaurants/name/luigi's", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Email and restaurant name can be used again
    app.signup("owner@example.com", Role::Owner, Some("Luigi's"))
        .await;
}

#[tokio::test]
async fn deleted_account_token_is_refused_everywhere() {
    let app = TestApp::new().await;
    let (_, token) = app.owner("gone@example.com").await;
    let (status, _) = app.json("DELETE", "/auth/delete-user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    for uri in ["/orders", "/menus", "/transactions"] {
        let (status, body) = app.json("GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}: {body}");
        assert_eq!(body["code"], "E3001");
    }

    let (status, _) = app
        .multipart("POST", "/menus", &token, &[("itemName", "Ghost bowl")], None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .json(
            "POST",
            "/transactions",
            Some(&token),
            Some(json!({"customerName": "Ana", "date": "2024-05-01", "time": "12:30", "amount": 10})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn google_login_without_client_id_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .json(
            "POST",
            "/auth/google-login",
            None,
            Some(json!({"credential": "anything"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
