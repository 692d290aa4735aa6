//! Integration tests for user management endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    cleanup_company, cleanup_user, create_admin, create_client, create_test_app,
    create_test_company, create_test_pool, create_viewer, empty_request, get_request,
    json_request, login, send, unique_suffix,
};
use serde_json::json;

#[tokio::test]
async fn test_client_creates_user_in_own_company() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let client = create_client(&app, &pool, company_id).await;

    let username = format!("operator_{}", unique_suffix());
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/users",
            json!({
                "username": username,
                "password": "plant-floor-42",
                "role": "viewer",
                "full_name": "Turno Noche"
            }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["company_id"], company_id.to_string());
    assert_eq!(body["role"], "viewer");
    assert!(body.get("password_hash").is_none());

    let token = login(&app, &username, "plant-floor-42").await;
    assert!(!token.is_empty());

    cleanup_company(&pool, company_id).await;
}

#[tokio::test]
async fn test_client_cannot_escalate() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let own = create_test_company(&pool).await;
    let other = create_test_company(&pool).await;
    let client = create_client(&app, &pool, own).await;

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/users",
            json!({
                "username": format!("root_{}", unique_suffix()),
                "password": "plant-floor-42",
                "role": "admin"
            }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/users",
            json!({
                "username": format!("spy_{}", unique_suffix()),
                "password": "plant-floor-42",
                "role": "client",
                "company_id": other
            }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/v1/users/{}", client.id),
            json!({ "role": "admin" }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    cleanup_company(&pool, own).await;
    cleanup_company(&pool, other).await;
}

#[tokio::test]
async fn test_viewer_is_read_only() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let client = create_client(&app, &pool, company_id).await;
    let viewer = create_viewer(&app, &pool, company_id).await;

    let (status, body) = send(&app, get_request("/api/v1/users", Some(&viewer.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/v1/users/{}", client.id),
            json!({ "full_name": "Renamed" }),
            Some(&viewer.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Read-only account");

    cleanup_company(&pool, company_id).await;
}

#[tokio::test]
async fn test_admin_role_scope_and_duplicates() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let admin = create_admin(&app, &pool).await;
    let company_id = create_test_company(&pool).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/users",
            json!({
                "username": format!("floating_{}", unique_suffix()),
                "password": "plant-floor-42",
                "role": "client"
            }),
            Some(&admin.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let username = format!("dup_{}", unique_suffix());
    let payload = json!({
        "username": username,
        "password": "plant-floor-42",
        "role": "client",
        "company_id": company_id
    });
    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/v1/users", payload.clone(), Some(&admin.token)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/v1/users", payload, Some(&admin.token)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/v1/users?company_id={}", company_id),
            Some(&admin.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["username"], username);

    cleanup_company(&pool, company_id).await;
    cleanup_user(&pool, admin.id).await;
}

#[tokio::test]
async fn test_password_change_and_self_protection() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let client = create_client(&app, &pool, company_id).await;

    let uri = format!("/api/v1/users/{}", client.id);
    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            &uri,
            json!({ "password": "a-brand-new-secret" }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    login(&app, &client.username, "a-brand-new-secret").await;

    let (status, _) = send(
        &app,
        json_request(Method::PUT, &uri, json!({ "active": false }), Some(&client.token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, empty_request(Method::DELETE, &uri, Some(&client.token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    cleanup_company(&pool, company_id).await;
}

#[tokio::test]
async fn test_users_of_other_companies_are_hidden() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let own = create_test_company(&pool).await;
    let other = create_test_company(&pool).await;
    let client = create_client(&app, &pool, own).await;
    let stranger = create_client(&app, &pool, other).await;

    let uri = format!("/api/v1/users/{}", stranger.id);
    let (status, _) = send(&app, get_request(&uri, Some(&client.token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, empty_request(Method::DELETE, &uri, Some(&client.token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        get_request(&format!("/api/v1/users?company_id={}", other), Some(&client.token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_company(&pool, own).await;
    cleanup_company(&pool, other).await;
}
