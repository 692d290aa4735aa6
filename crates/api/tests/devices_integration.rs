//! Integration tests for device management endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    cleanup_company, cleanup_user, create_admin, create_client, create_test_app,
    create_test_company, create_test_device, create_test_pool, create_viewer, empty_request,
    get_request, json_request, send, unique_mac,
};
use serde_json::json;

#[tokio::test]
async fn test_client_registers_device_in_own_company() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let client = create_client(&app, &pool, company_id).await;
    let mac = unique_mac();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/devices",
            json!({
                "name": "Estanque Sur",
                "mac_address": mac,
                "sensor_type": "level",
                "unit": "%",
                "thresholds": { "min": 10.0, "max": 90.0 }
            }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["company_id"], company_id.to_string());
    assert_eq!(body["mac_address"], mac);
    assert_eq!(body["status"], "offline");
    assert_eq!(body["value"], 0.0);
    assert_eq!(body["thresholds"], json!({ "min": 10.0, "max": 90.0 }));
    assert_eq!(body["alarm"], false);

    let (status, body) = send(&app, get_request("/api/v1/devices", Some(&client.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    cleanup_company(&pool, company_id).await;
}

#[tokio::test]
async fn test_duplicate_mac_conflicts() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let client = create_client(&app, &pool, company_id).await;
    let existing = create_test_device(&pool, company_id).await;

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/devices",
            json!({ "name": "Copia", "mac_address": existing.mac, "sensor_type": "level" }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    cleanup_company(&pool, company_id).await;
}

#[tokio::test]
async fn test_admin_must_name_company() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let admin = create_admin(&app, &pool).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/devices",
            json!({ "name": "Huerfano", "mac_address": unique_mac(), "sensor_type": "flow" }),
            Some(&admin.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "company_id is required");

    cleanup_user(&pool, admin.id).await;
}

#[tokio::test]
async fn test_invalid_thresholds_rejected() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let client = create_client(&app, &pool, company_id).await;
    let device = create_test_device(&pool, company_id).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/v1/devices/{}/thresholds", device.id),
            json!({ "min": 80.0, "max": 20.0 }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Threshold min must be lower than max");

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/v1/devices/{}/thresholds", device.id),
            json!({ "min": 20.0, "max": 80.0 }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["thresholds"], json!({ "min": 20.0, "max": 80.0 }));

    cleanup_company(&pool, company_id).await;
}

#[tokio::test]
async fn test_alarm_reflects_latest_reading() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let client = create_client(&app, &pool, company_id).await;
    let device = create_test_device(&pool, company_id).await;
    let uri = format!("/api/v1/devices/{}", device.id);

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("{}/thresholds", uri),
            json!({ "min": 20.0, "max": 80.0 }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    send(
        &app,
        json_request(
            Method::POST,
            "/api/iot_backend.php",
            json!({ "mac": device.mac, "value": 95.0 }),
            None,
        ),
    )
    .await;

    let (status, body) = send(&app, get_request(&uri, Some(&client.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], 95.0);
    assert_eq!(body["alarm"], true);

    cleanup_company(&pool, company_id).await;
}

#[tokio::test]
async fn test_update_and_delete_device() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let client = create_client(&app, &pool, company_id).await;
    let device = create_test_device(&pool, company_id).await;
    let uri = format!("/api/v1/devices/{}", device.id);

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &uri,
            json!({ "name": "Estanque Renombrado", "status": "maintenance" }),
            Some(&client.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Estanque Renombrado");
    assert_eq!(body["status"], "maintenance");
    assert_eq!(body["mac_address"], device.mac);

    let (status, _) = send(&app, empty_request(Method::DELETE, &uri, Some(&client.token))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get_request(&uri, Some(&client.token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_company(&pool, company_id).await;
}

#[tokio::test]
async fn test_cross_company_access_is_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let own = create_test_company(&pool).await;
    let other = create_test_company(&pool).await;
    let client = create_client(&app, &pool, own).await;
    let foreign = create_test_device(&pool, other).await;
    let uri = format!("/api/v1/devices/{}", foreign.id);

    let (status, _) = send(&app, get_request(&uri, Some(&client.token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(Method::PUT, &uri, json!({ "name": "Mine now" }), Some(&client.token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, empty_request(Method::DELETE, &uri, Some(&client.token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        get_request(&format!("{}/measurements", uri), Some(&client.token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_company(&pool, own).await;
    cleanup_company(&pool, other).await;
}

#[tokio::test]
async fn test_viewer_cannot_modify_devices() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let viewer = create_viewer(&app, &pool, company_id).await;
    let device = create_test_device(&pool, company_id).await;

    let (status, _) = send(
        &app,
        get_request(&format!("/api/v1/devices/{}", device.id), Some(&viewer.token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/devices",
            json!({ "name": "Nope", "mac_address": unique_mac(), "sensor_type": "level" }),
            Some(&viewer.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        empty_request(
            Method::DELETE,
            &format!("/api/v1/devices/{}", device.id),
            Some(&viewer.token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    cleanup_company(&pool, company_id).await;
}

#[tokio::test]
async fn test_measurements_limit() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company_id = create_test_company(&pool).await;
    let client = create_client(&app, &pool, company_id).await;
    let device = create_test_device(&pool, company_id).await;

    for value in 1..=5 {
        send(
            &app,
            json_request(
                Method::POST,
                "/api/v1/ingest",
                json!({ "mac": device.mac, "value": value }),
                None,
            ),
        )
        .await;
    }

    let base = format!("/api/v1/devices/{}/measurements", device.id);
    let (status, body) = send(&app, get_request(&format!("{}?limit=2", base), Some(&client.token))).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["value"], 5.0);
    assert_eq!(data[0]["device_key"], device.mac);

    let (status, body) = send(&app, get_request(&base, Some(&client.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(5));

    for limit in ["0", "501"] {
        let (status, body) = send(
            &app,
            get_request(&format!("{}?limit={}", base, limit), Some(&client.token)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "limit must be between 1 and 500");
    }

    cleanup_company(&pool, company_id).await;
}
