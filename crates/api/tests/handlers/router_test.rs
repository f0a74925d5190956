use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::test_server;

#[test_log::test(tokio::test)]
async fn test_health_and_version() {
    let server = test_server();

    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>(), json!({ "status": "ok" }));

    let version = server.get("/version").await;
    version.assert_status_ok();
    assert_eq!(version.json::<Value>()["name"], "courtside-api");
    assert_eq!(version.json::<Value>()["version"], env!("CARGO_PKG_VERSION"));
}

#[test_log::test(tokio::test)]
async fn test_protected_routes_require_a_token() {
    let server = test_server();

    let profile = server.get("/api/auth/profile").await;
    profile.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        profile.json::<Value>(),
        json!({ "error": "Authentication error: Authentication required" })
    );

    server
        .post("/api/rooms")
        .json(&json!({ "name": "Pickup", "sport": "Futsal", "date": "2030-01-01T10:00", "max_participants": 10 }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .post("/api/rooms/abcdEFGH/join")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .get("/api/admin/statistics")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .post("/api/courts")
        .json(&json!({ "name": "Quadra 2", "hourly_price": 80.0 }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_non_bearer_authorization_is_rejected() {
    let server = test_server();

    server
        .post("/api/auth/logout")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_register_validates_before_touching_the_database() {
    let server = test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "novo",
            "email": "novo@example.com",
            "name": "Novo Jogador",
            "password": "secret1",
            "confirm_password": "secret2"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Validation error: Passwords must match" })
    );
}

#[test_log::test(tokio::test)]
async fn test_unknown_route_is_not_found() {
    let server = test_server();

    server
        .get("/api/tournaments")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
