mod common;

use axum::body::Body;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::{PNG, TestApp};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;

const FIELDS: &[(&str, &str)] = &[
    ("itemName", "Chicken Bowl"),
    ("carbsPrice", "2.5"),
    ("proteinType", "Chicken"),
    ("proteinsPrice", "4"),
    ("baseFat", "12"),
];

#[tokio::test]
async fn picture_round_trips_as_base64() {
    let app = TestApp::new().await;
    let (_, token) = app.owner("owner@example.com").await;

    let (status, item) = app
        .multipart("POST", "/menus", &token, FIELDS, Some(("itemPicture", PNG)))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{item}");
    assert_eq!(item["carbsPrice"], 2.5);
    let id = item["id"].as_str().unwrap();
    assert_eq!(item["itemPicture"], format!("{id}.png"));

    let (status, fetched) = app.json("GET", &format!("/menus/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["imageExtension"], "png");
    let decoded = STANDARD
        .decode(fetched["image"].as_str().unwrap())
        .unwrap();
    assert_eq!(decoded, PNG);

    let (_, listed) = app.json("GET", "/menus", Some(&token), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["image"], fetched["image"]);
}

#[tokio::test]
async fn disallowed_type_mutates_nothing() {
    let app = TestApp::new().await;
    let (_, token) = app.owner("owner@example.com").await;

    // Declared as an image by name, but the bytes are text
    let (status, error) = app
        .multipart("POST", "/menus", &token, FIELDS, Some(("itemPicture", b"#!/bin/sh\necho hi\n".as_slice())))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "E0007");

    let (_, listed) = app.json("GET", "/menus", Some(&token), None).await;
    assert!(listed.as_array().unwrap().is_empty());

    // Same on update: the stored item keeps its fields
    let (_, item) = app.multipart("POST", "/menus", &token, FIELDS, None).await;
    let uri = format!("/menus/{}", item["id"].as_str().unwrap());
    let (status, _) = app
        .multipart(
            "PUT",
            &uri,
            &token,
            &[("itemName", "Renamed")],
            Some(("image", b"plain text".as_slice())),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, fetched) = app.json("GET", &uri, Some(&token), None).await;
    assert_eq!(fetched["itemName"], "Chicken Bowl");
    assert!(fetched["image"].is_null());
}

#[tokio::test]
async fn numeric_fields_must_parse() {
    let app = TestApp::new().await;
    let (_, token) = app.owner("owner@example.com").await;

    let mut fields = FIELDS.to_vec();
    fields[1] = ("carbsPrice", "cheap");
    let (status, error) = app.multipart("POST", "/menus", &token, &fields, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "carbsPrice must be a number");

    let (status, error) = app
        .multipart("POST", "/menus", &token, &FIELDS[..4], None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Missing required field: baseFat");
}

#[tokio::test]
async fn other_owners_cannot_reach_an_item() {
    let app = TestApp::new().await;
    let (_, token_a) = app.owner("a@example.com").await;
    let (_, token_b) = app.owner("b@example.com").await;

    let (_, item) = app
        .multipart("POST", "/menus", &token_a, FIELDS, Some(("itemPicture", PNG)))
        .await;
    let uri = format!("/menus/{}", item["id"].as_str().unwrap());

    let (status, _) = app.json("GET", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .multipart("PUT", &uri, &token_b, &[("itemName", "Stolen")], None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.json("DELETE", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, listed) = app.json("GET", "/menus", Some(&token_b), None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_record_and_picture() {
    let app = TestApp::new().await;
    let (_, token) = app.owner("owner@example.com").await;

    let (_, item) = app
        .multipart("POST", "/menus", &token, FIELDS, Some(("itemPicture", PNG)))
        .await;
    let id = item["id"].as_str().unwrap().to_string();
    let picture = app.state.images.dir().join(format!("{id}.png"));
    assert!(picture.exists());

    let (status, _) = app.json("DELETE", &format!("/menus/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!picture.exists());

    let (status, _) = app.json("GET", &format!("/menus/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.json("GET", &format!("/images/{id}.png"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_listing_by_restaurant_or_owner() {
    let app = TestApp::new().await;
    let (owner, token) = app
        .signup("owner@example.com", shared::models::Role::Owner, Some("Luigi's"))
        .await;
    app.multipart("POST", "/menus", &token, FIELDS, Some(("itemPicture", PNG)))
        .await;

    let (_, restaurant) = app.json("GET", "/restaurants/name/luigi's", None, None).await;
    let restaurant_id = restaurant["id"].as_str().unwrap();

    for uri in [
        format!("/menus/restaurant/{restaurant_id}"),
        format!("/menus/restaurant/{}", owner.id),
        format!("/restaurants/{restaurant_id}/menu-items"),
    ] {
        let (status, items) = app.json("GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(items.as_array().unwrap().len(), 1, "{uri}");
        assert_eq!(items[0]["imageExtension"], "png");
    }

    let (status, _) = app.json("GET", "/menus/restaurant/unknown", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stored_picture_is_served_with_its_mime_type() {
    let app = TestApp::new().await;
    let (_, token) = app.owner("owner@example.com").await;
    let (_, item) = app
        .multipart("POST", "/menus", &token, FIELDS, Some(("itemPicture", PNG)))
        .await;
    let filename = item["itemPicture"].as_str().unwrap();

    let response = app
        .send(
            Request::builder()
                .uri(format!("/images/{filename}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], PNG);

    let response = app
        .send(
            Request::builder()
                .uri("/images/..%2F..%2Fdata%2Frestaurant.redb")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
