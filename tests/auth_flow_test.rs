mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use cineplex::api::create_routes;

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn register_request(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap()
}

/// Registration issues a token, never leaks the password, and rejects
/// duplicate username/email with a conflict.
#[tokio::test]
async fn test_registration_and_duplicate_conflicts() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let app = create_routes(db, common::test_config());

    let suffix = common::unique_suffix();
    let username = format!("alice_{suffix}");
    let email = format!("alice_{suffix}@example.com");
    let payload = json!({
        "username": username,
        "full_name": "Alice Example",
        "email": email,
        "password": "pw123",
    });

    let response = app.clone().oneshot(register_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert!(body["access_token"].as_str().is_some());
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["username"], username.as_str());

    let user = body["user"].as_object().unwrap();
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("password_hash"));

    // Same email, different username: conflict, nothing created.
    let duplicate_email = json!({
        "username": format!("bob_{suffix}"),
        "full_name": "Bob Example",
        "email": email,
        "password": "pw456",
    });
    let response = app
        .clone()
        .oneshot(register_request(&duplicate_email))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Same username, different email: conflict as well.
    let duplicate_username = json!({
        "username": username,
        "full_name": "Mallory Example",
        "email": format!("mallory_{suffix}@example.com"),
        "password": "pw456",
    });
    let response = app
        .clone()
        .oneshot(register_request(&duplicate_username))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The duplicate attempts must not have logged anyone in under bob's name.
    let response = app
        .oneshot(login_request(&format!("bob_{suffix}"), "pw456"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_email_fails_before_persistence() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let app = create_routes(db, common::test_config());

    let suffix = common::unique_suffix();
    let payload = json!({
        "username": format!("carol_{suffix}"),
        "full_name": "Carol Example",
        "email": "not-an-email",
        "password": "pw123",
    });

    let response = app.clone().oneshot(register_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["details"]["email"].is_array());

    // Nothing was stored: the username remains free.
    let mut valid = payload.clone();
    valid["email"] = json!(format!("carol_{suffix}@example.com"));
    let response = app.oneshot(register_request(&valid)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Login accepts username or email; wrong password is unauthorized with no
/// token issued.
#[tokio::test]
async fn test_login_and_token_resolution() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let app = create_routes(db, common::test_config());

    let suffix = common::unique_suffix();
    let username = format!("dave_{suffix}");
    let email = format!("dave_{suffix}@example.com");
    let payload = json!({
        "username": username,
        "full_name": "Dave Example",
        "email": email,
        "password": "pw123",
    });

    let response = app.clone().oneshot(register_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Wrong password: unauthorized, no token in the body.
    let response = app
        .clone()
        .oneshot(login_request(&username, "wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert!(body.get("access_token").is_none());

    // Login by username.
    let response = app
        .clone()
        .oneshot(login_request(&username, "pw123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let token = response_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    // Login by email works through the same field.
    let response = app
        .clone()
        .oneshot(login_request(&email, "pw123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The token resolves back to the user.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["username"], username.as_str());
    assert!(!body.as_object().unwrap().contains_key("password"));

    // A garbage token does not.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
