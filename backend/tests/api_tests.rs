//! Catalogue API tests: materials, products, suppliers and alerts

mod common;

use axum::http::{Method, StatusCode};
use common::{code, id, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Materials and products
// ============================================================================

#[tokio::test]
async fn test_material_crud() {
    let app = TestApp::new();
    let token = app.user("ana").await;

    let created = app.material(&token, "Tempered glass", 0, 4).await;
    assert_eq!(created["type"], "glass");
    assert_eq!(created["color"], "clear");
    app.material(&token, "Aluminium profile", 10, 2).await;

    let (status, body) = app.get("/api/v1/materials", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Aluminium profile", "Tempered glass"]);

    let (status, body) = app.get(&format!("/api/v1/materials/{}", id(&created)), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, body) = app
        .put(
            &format!("/api/v1/materials/{}", id(&created)),
            &token,
            json!({ "name": "Tempered glass 8mm", "color": "bronze" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Tempered glass 8mm");
    assert_eq!(body["color"], "bronze");
    assert_eq!(body["min_stock"], 4);

    let (status, body) = app.get(&format!("/api/v1/materials/{}", Uuid::new_v4()), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_material_validation() {
    let app = TestApp::new();
    let token = app.user("ana").await;

    let (status, body) = app
        .post("/api/v1/materials", &token, json!({ "name": "", "type": "glass" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "name");

    let (status, body) = app
        .post("/api/v1/materials", &token, json!({ "name": "Glass", "type": "glass", "stock": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "stock");
}

#[tokio::test]
async fn test_product_crud() {
    let app = TestApp::new();
    let token = app.user("ana").await;

    let created = app.product(&token, "Shower screen", 3, 1).await;
    assert_eq!(created["sale_price"], "120.50");
    assert_eq!(created["type"], "window");

    let (status, body) = app.get("/api/v1/products", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Shower screen"]);

    let (status, body) = app
        .put(&format!("/api/v1/products/{}", id(&created)), &token, json!({ "min_stock": 5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["min_stock"], 5);
    assert_eq!(body["stock"], 3);
}

// ============================================================================
// Suppliers
// ============================================================================

#[tokio::test]
async fn test_supplier_crud() {
    let app = TestApp::new();
    let token = app.user("ana").await;
    let glass = id(&app.material(&token, "Glass", 0, 0).await);
    let frame = id(&app.material(&token, "Frame", 0, 0).await);

    let created = app.supplier(&token, "Cristalería Andina", &glass).await;
    assert_eq!(created["material_name"], "Glass");
    let supplier_id = id(&created);

    let (status, body) = app.get(&format!("/api/v1/suppliers/{}", supplier_id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contact_person"], "Lucía");

    let (status, body) = app
        .put(
            &format!("/api/v1/suppliers/{}", supplier_id),
            &token,
            json!({ "material_id": frame, "email": "pedidos@andina.example" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["material_name"], "Frame");
    assert_eq!(body["email"], "pedidos@andina.example");

    let (_, body) = app.get(&format!("/api/v1/materials/{}/suppliers", frame), &token).await;
    assert_eq!(names(&body), vec!["Cristalería Andina"]);
    let (_, body) = app.get(&format!("/api/v1/suppliers/by-material/{}", glass), &token).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/suppliers/{}", supplier_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = app.get(&format!("/api/v1/suppliers/{}", supplier_id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_supplier_rules() {
    let app = TestApp::new();
    let token = app.user("ana").await;
    let glass = id(&app.material(&token, "Glass", 0, 0).await);

    app.supplier(&token, "Vidrios Norte", &glass).await;
    let second = app.supplier(&token, "Vidrios Sur", &glass).await;

    let (status, body) = app
        .post("/api/v1/suppliers", &token, json!({ "name": "Vidrios Norte", "material_id": glass }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(code(&body), "DUPLICATE_NAME");

    let (status, body) = app
        .put(&format!("/api/v1/suppliers/{}", id(&second)), &token, json!({ "name": "Vidrios Norte" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(code(&body), "DUPLICATE_NAME");

    let (status, _) = app
        .post("/api/v1/suppliers", &token, json!({ "name": "Nuevo", "material_id": Uuid::new_v4() }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post(
            "/api/v1/suppliers",
            &token,
            json!({ "name": "Nuevo", "email": "not-an-email", "material_id": glass }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "email");

    let (status, _) = app
        .get(&format!("/api/v1/suppliers/by-material/{}", Uuid::new_v4()), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/v1/suppliers", &token).await;
    assert_eq!(names(&body), vec!["Vidrios Norte", "Vidrios Sur"]);
}

// ============================================================================
// Inventory alerts
// ============================================================================

#[tokio::test]
async fn test_low_stock_alerts() {
    let app = TestApp::new();
    let token = app.user("ana").await;

    let low = id(&app.material(&token, "Low glass", 1, 5).await);
    app.material(&token, "Exact glass", 5, 5).await;
    app.product(&token, "Low door", 0, 1).await;
    app.product(&token, "Stocked door", 9, 1).await;

    let (status, body) = app.get("/api/v1/inventory/alerts/materials", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Low glass"]);

    let (_, body) = app.get("/api/v1/inventory/alerts/products", &token).await;
    assert_eq!(names(&body), vec!["Low door"]);

    // Receiving stock clears the alert
    app.post(&format!("/api/v1/materials/{}/add?quantity=4", low), &token, json!({}))
        .await;
    let (_, body) = app.get("/api/v1/inventory/alerts/materials", &token).await;
    assert!(body.as_array().unwrap().is_empty());
}

// ============================================================================
// Malformed requests
// ============================================================================

#[tokio::test]
async fn test_unreadable_requests_use_error_shape() {
    let app = TestApp::new();
    let token = app.user("ana").await;
    let material_id = id(&app.material(&token, "Glass", 3, 0).await);

    let (status, body) = app
        .raw(Method::POST, "/api/v1/materials", &token, r#"{"name": "Glass""#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(code(&body), "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "body");

    // Well-formed JSON that misses a required field
    let (status, body) = app
        .post("/api/v1/materials", &token, json!({ "name": "Glass" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"]["field"], "body");

    let (status, body) = app
        .post(&format!("/api/v1/materials/{}/add?quantity=abc", material_id), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(code(&body), "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "query");

    let (status, body) = app.get("/api/v1/materials/not-a-uuid", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(code(&body), "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "path");

    let (_, material) = app.get(&format!("/api/v1/materials/{}", material_id), &token).await;
    assert_eq!(material["stock"], 3);
}
