//! Shared helpers for the HTTP integration tests
//!
//! Each test builds its own router over a fresh in-memory store and drives
//! it in-process with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use glass_stock::{create_app, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::for_memory(TEST_SECRET))
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            router: create_app(AppState::in_memory(config)),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Send a body verbatim, for requests the JSON helpers cannot express
    pub async fn raw(&self, method: Method, uri: &str, token: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={}&password={}", username, password)))
            .unwrap();

        self.send(request).await
    }

    /// Register a user and return a bearer token for it
    pub async fn user(&self, username: &str) -> String {
        let (status, _) = self
            .request(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "username": username, "password": "glass-pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self.login(username, "glass-pass").await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn material(&self, token: &str, name: &str, stock: i32, min_stock: i32) -> Value {
        let (status, body) = self
            .post(
                "/api/v1/materials",
                token,
                json!({ "name": name, "type": "glass", "color": "clear", "stock": stock, "min_stock": min_stock }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body
    }

    pub async fn product(&self, token: &str, name: &str, stock: i32, min_stock: i32) -> Value {
        let (status, body) = self
            .post(
                "/api/v1/products",
                token,
                json!({ "name": name, "type": "window", "stock": stock, "min_stock": min_stock, "sale_price": "120.50" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body
    }

    pub async fn supplier(&self, token: &str, name: &str, material_id: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/v1/suppliers",
                token,
                json!({ "name": name, "contact_person": "Lucía", "material_id": material_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }
}

/// Id field of a JSON record
pub fn id(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

/// Error code of an error response
pub fn code(value: &Value) -> &str {
    value["error"]["code"].as_str().unwrap_or_default()
}
