//! End-to-end tests over the assembled router.
//! Run: cargo test --test site_flow

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use maison_server::auth::{JwtConfig, JwtService};
use maison_server::cart::{CartManager, CartStorage};
use maison_server::core::{Config, ServerState, server::build_app};
use maison_server::db;
use maison_server::db::models::AdminUserCreate;
use maison_server::db::repository::AdminUserRepository;
use maison_server::realtime::ChangeFeed;
use maison_server::services::{EmailConfig, EmailService, ImageStore};

async fn test_state() -> ServerState {
    let config = Config {
        work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        http_port: 0,
        admin_allowed_ips: String::new(),
        jwt: JwtConfig {
            secret: "integration-test-secret-integration".into(),
            expiration_minutes: 60,
            issuer: "maison-server".into(),
            audience: "maison-admin".into(),
        },
        email: EmailConfig {
            api_url: None,
            api_key: None,
            from_address: None,
        },
        environment: "test".into(),
    };

    let db = db::connect_memory().await.unwrap();
    let images_dir = tempfile::tempdir().unwrap().keep();

    ServerState {
        config: config.clone(),
        db,
        carts: CartManager::with_storage(CartStorage::open_in_memory().unwrap()),
        jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
        images: ImageStore::open(images_dir).unwrap(),
        email: EmailService::new(config.email.clone()),
        feed: Arc::new(ChangeFeed::new()),
    }
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = build_app(test_state().await);
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cart_checkout_clears_the_cart() {
    let app = build_app(test_state().await);

    // Two plates of the same dish, one of another
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/cart/visitor-1/items",
                serde_json::json!({"id": 1, "name": "Coq au vin", "unit_price": "24.50"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/visitor-1/items",
            serde_json::json!({"id": 2, "name": "Tarte tatin", "unit_price": "9.00"}),
        ))
        .await
        .unwrap();

    let view = body_json(
        app.clone()
            .oneshot(Request::get("/api/cart/visitor-1").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(view["count"], 3);
    assert_eq!(view["total"], "58.00");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            serde_json::json!({
                "cart_id": "visitor-1",
                "name": "Alex",
                "email": "alex@example.com",
                "phone": "0600000000",
                "address": "1 rue de la Paix, Paris"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    assert_eq!(result["success"], true);
    assert!(result["id"].as_str().unwrap().starts_with("order:"));

    let view = body_json(
        app.oneshot(Request::get("/api/cart/visitor-1").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(view["count"], 0);
}

#[tokio::test]
async fn checkout_with_empty_cart_is_refused() {
    let app = build_app(test_state().await);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/orders",
            serde_json::json!({
                "cart_id": "nobody",
                "name": "Alex",
                "email": "alex@example.com",
                "phone": "0600000000",
                "address": "1 rue de la Paix"
            }),
        ))
        .await
        .unwrap();
    let result = body_json(response).await;
    assert_eq!(result["success"], false);
}

#[tokio::test]
async fn booking_form_reports_field_errors() {
    let app = build_app(test_state().await);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/bookings",
            serde_json::json!({
                "date": "not-a-date",
                "time": "19:30",
                "party_size": 0,
                "name": "",
                "email": "nope",
                "phone": ""
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    assert_eq!(result["success"], false);
    let fields: Vec<&str> = result["field_errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"date"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"party_size"));
    assert!(fields.contains(&"name"));
}

#[tokio::test]
async fn booking_submission_returns_the_generated_id() {
    let app = build_app(test_state().await);
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/bookings",
            serde_json::json!({
                "date": "2030-05-20",
                "time": "19:30",
                "party_size": 4,
                "name": "Camille",
                "email": "camille@example.com",
                "phone": "0611111111",
                "requests": "Table near the window"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = body_json(response).await;
    assert_eq!(result["success"], true);
    assert!(result["id"].as_str().unwrap().starts_with("booking:"));
}

#[tokio::test]
async fn menu_create_rejects_invalid_payload() {
    let state = test_state().await;
    let app = build_app(state.clone());
    let cookie = admin_session(&state, &app).await;

    for payload in [
        serde_json::json!({"name": "", "price": "12.00", "category": "mains"}),
        serde_json::json!({"name": "Bouillabaisse", "price": "-1.00", "category": "mains"}),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin/api/menu")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::COOKIE, &cookie)
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn review_lifecycle_public_to_approved() {
    let state = test_state().await;
    let app = build_app(state.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/reviews",
            serde_json::json!({"name": "Camille", "rating": 5, "comment": "Superbe"}),
        ))
        .await
        .unwrap();
    let result = body_json(response).await;
    assert_eq!(result["success"], true);
    let id = result["id"].as_str().unwrap().to_string();

    // Pending reviews are not public
    let public = body_json(
        app.clone()
            .oneshot(Request::get("/api/reviews").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(public.as_array().unwrap().len(), 0);

    // Approve through the admin API with a real session
    let cookie = admin_session(&state, &app).await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/admin/api/reviews/{id}/status"))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, &cookie)
                .body(Body::from(
                    serde_json::json!({"status": "approved"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let public = body_json(
        app.oneshot(Request::get("/api/reviews").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(public.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_api_requires_a_session() {
    let app = build_app(test_state().await);

    let response = app
        .clone()
        .oneshot(Request::get("/admin/api/bookings").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Admin pages redirect to the login page instead
    let response = app
        .oneshot(Request::get("/admin").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()["location"], "/login");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let state = test_state().await;
    seed_admin(&state).await;
    let app = build_app(state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({"username": "patron", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

async fn seed_admin(state: &ServerState) {
    AdminUserRepository::new(state.get_db())
        .create(AdminUserCreate {
            username: "patron".into(),
            password: "maison-pass".into(),
            display_name: Some("Patron".into()),
        })
        .await
        .unwrap();
}

async fn admin_session(state: &ServerState, app: &axum::Router) -> String {
    seed_admin(state).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({"username": "patron", "password": "maison-pass"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}
