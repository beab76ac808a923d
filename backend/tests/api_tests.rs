//! HTTP contract tests for the CropSage API

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use cropsage_backend::{
    config::AuthConfig,
    create_app,
    ml::{ModelStore, TrainingSettings},
    services::{AuthService, InMemoryUserDirectory, PredictionService},
    AppState, Config,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn test_settings() -> TrainingSettings {
    TrainingSettings {
        sample_count: 300,
        n_estimators: 8,
        ..TrainingSettings::default()
    }
}

fn test_app(dir: &TempDir) -> Router {
    let store = Arc::new(ModelStore::new(dir.path(), test_settings()));

    let auth_config = AuthConfig {
        bcrypt_cost: 4,
        ..AuthConfig::default()
    };
    let directory = InMemoryUserDirectory::from_config(&auth_config).unwrap();

    create_app(AppState {
        config: Arc::new(Config::default()),
        prediction: PredictionService::new(store),
        auth: AuthService::new(Arc::new(directory)),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// =============================================================================
// Root and health
// =============================================================================

#[tokio::test]
async fn root_welcomes() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(test_app(&dir), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Welcome to CropSage API" }));
}

#[tokio::test]
async fn health_reports_model_state() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "development");
    assert_eq!(body["models"], "not_loaded");

    let observation = json!({
        "fieldName": "North",
        "cropType": "rice",
        "soilType": "clay",
        "fieldSize": 3.0,
        "soilPH": 6.0,
        "nitrogenLevel": 50.0,
        "phosphorusLevel": 40.0,
        "potassiumLevel": 40.0,
        "irrigationSystem": "flood"
    });
    let (status, _) = send(app.clone(), post_json("/api/predict", observation)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app, get("/health")).await;
    assert_eq!(body["models"], "ready");
}

// =============================================================================
// Prediction
// =============================================================================

#[tokio::test]
async fn predict_returns_camel_case_result() {
    let dir = tempfile::tempdir().unwrap();
    let observation = json!({
        "fieldName": "River Plot",
        "cropType": "Corn",
        "soilType": "Loamy",
        "fieldSize": 10,
        "soilPH": 6.5,
        "nitrogenLevel": 40,
        "phosphorusLevel": 30,
        "potassiumLevel": 30,
        "irrigationSystem": null
    });

    let (status, body) = send(test_app(&dir), post_json("/api/predict", observation)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["yieldPrediction"].as_f64().unwrap() > 0.0);
    let health = body["healthScore"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&health));
    assert_eq!(
        body["recommendations"],
        json!([shared::IRRIGATION_RECOMMENDATION])
    );
    assert_eq!(body["riskFactors"], json!([shared::NO_RISK_FACTORS]));
}

#[tokio::test]
async fn predict_reports_training_failure() {
    let dir = tempfile::tempdir().unwrap();
    // A file where the model directory should be makes training fail
    let blocked = dir.path().join("models");
    std::fs::write(&blocked, b"not a directory").unwrap();

    let store = Arc::new(ModelStore::new(&blocked, test_settings()));
    let app = create_app(AppState {
        config: Arc::new(Config::default()),
        prediction: PredictionService::new(store),
        auth: AuthService::new(Arc::new(InMemoryUserDirectory::new())),
    });

    let observation = json!({
        "fieldName": "North",
        "cropType": "wheat",
        "soilType": "silt",
        "fieldSize": 1.0,
        "soilPH": 7.0,
        "nitrogenLevel": 10.0,
        "phosphorusLevel": 10.0,
        "potassiumLevel": 10.0
    });
    let (status, body) = send(app, post_json("/api/predict", observation)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "PREDICTION_FAILED");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Prediction error: "), "{}", detail);
    assert!(detail.contains("model training failed"), "{}", detail);
}

#[tokio::test]
async fn predict_rejects_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        test_app(&dir),
        post_json("/api/predict", json!({ "cropType": "corn" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_BODY");
    assert!(body["detail"].as_str().unwrap().contains("fieldName"));
}

#[tokio::test]
async fn predict_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(test_app(&dir), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_BODY");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn login_accepts_demo_user() {
    let dir = tempfile::tempdir().unwrap();
    let credentials = json!({ "email": "demo@cropsage.com", "password": "password123" });

    let (status, body) = send(test_app(&dir), post_json("/api/login", credentials)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "user": { "email": "demo@cropsage.com", "name": "Demo Farmer" }
        })
    );
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let dir = tempfile::tempdir().unwrap();
    let credentials = json!({ "email": "demo@cropsage.com", "password": "hunter2" });

    let (status, body) = send(test_app(&dir), post_json("/api/login", credentials)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid credentials");
}

#[tokio::test]
async fn login_rejects_malformed_email() {
    let dir = tempfile::tempdir().unwrap();
    let credentials = json!({ "email": "demo-at-cropsage", "password": "password123" });

    let (status, body) = send(test_app(&dir), post_json("/api/login", credentials)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
}

#[tokio::test]
async fn login_without_password_gets_error_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let credentials = json!({ "email": "demo@cropsage.com" });

    let (status, body) = send(test_app(&dir), post_json("/api/login", credentials)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_BODY");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = test_app(&dir).oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
