//! Router-level tests against the in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use caregiver_hub::AppState;
use caregiver_hub::api::routes::create_router;
use caregiver_hub::auth::JwtSubjectVerifier;
use caregiver_hub::config::JwtConfig;
use caregiver_hub::events::{EventKind, RecordingPublisher};
use caregiver_hub::repositories::Repositories;
use caregiver_hub::utils::jwt::{Claims, generate_token};

const SECRET: &str = "integration-test-secret-0123456789";

struct TestApp {
    router: Router,
    events: Arc<RecordingPublisher>,
}

impl TestApp {
    fn new() -> Self {
        let events = Arc::new(RecordingPublisher::new());
        let jwt = JwtConfig {
            secret: SECRET.to_string(),
            access_token_expiration: 1,
        };
        let state = AppState::from_parts(
            Repositories::in_memory(),
            events.clone(),
            Arc::new(JwtSubjectVerifier::new(&jwt)),
            "caregiver-hub-test",
        );
        Self {
            router: create_router(state),
            events,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn create(&self, external_auth_id: &str, role: &str, phone: Option<&str>) -> Value {
        let (status, body) = self
            .json(
                "POST",
                "/api/users",
                json!({
                    "externalAuthId": external_auth_id,
                    "email": format!("{external_auth_id}@example.com"),
                    "role": role,
                    "phone": phone,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body
    }
}

fn bearer(subject: &str, email: &str, name: Option<&str>) -> String {
    let claims = Claims::new(subject, email, name.map(str::to_string), 1);
    format!("Bearer {}", generate_token(&claims, SECRET).unwrap())
}

#[tokio::test]
async fn create_profile_scores_and_publishes_event() {
    let app = TestApp::new();

    let body = app.create("auth-li", "CAREGIVER", Some("+8613800000000")).await;
    assert_eq!(body["role"], "CAREGIVER");
    assert_eq!(body["primaryPhone"], "+8613800000000");
    assert_eq!(body["profileCompletionPercentage"], 24);
    assert_eq!(body["country"], "China");

    let events = app.events.wait_for(1).await;
    assert_eq!(events.len(), 1);
    let (kind, payload) = &events[0];
    assert_eq!(*kind, EventKind::UserCreated);
    assert_eq!(payload["userId"], body["id"]);
    assert_eq!(payload["userEmail"], "auth-li@example.com");
    assert_eq!(payload["userType"], "CAREGIVER");
    assert_eq!(payload["source"], "caregiver-hub-test");
}

#[tokio::test]
async fn duplicate_identity_is_rejected() {
    let app = TestApp::new();
    app.create("auth-dup", "CLIENT", None).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/users",
            json!({
                "externalAuthId": "auth-dup",
                "email": "someone-else@example.com",
                "role": "CLIENT"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_IDENTITY");
    assert_eq!(app.events.wait_for(1).await.len(), 1);
}

#[tokio::test]
async fn create_validates_body() {
    let app = TestApp::new();

    let (status, body) = app
        .json(
            "POST",
            "/api/users",
            json!({ "externalAuthId": "auth-x", "email": "not-an-email", "role": "CAREGIVER" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn parent_role_alias_is_stored_as_client() {
    let app = TestApp::new();
    let body = app.create("auth-parent", "PARENT", None).await;
    assert_eq!(body["role"], "CLIENT");

    let (status, listed) = app.get("/api/users/role/client").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, body) = app.get("/api/users/role/NURSE").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn lookups_report_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/users/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app.get("/api/users/external/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/users/external/nobody/profile/completion").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn field_update_dispatches_by_name() {
    let app = TestApp::new();
    app.create("auth-wang", "CAREGIVER", None).await;

    let (status, body) = app
        .json(
            "PATCH",
            "/api/users/external/auth-wang/profile/YEARSOFEXPERIENCE",
            json!({ "value": 7 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["yearsOfExperience"], 7);
    assert!(body["profileCompletionPercentage"].as_i64().unwrap() > 18);

    let (status, body) = app
        .json(
            "PATCH",
            "/api/users/external/auth-wang/profile/favouriteColour",
            json!({ "value": "blue" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNKNOWN_FIELD");

    let (status, body) = app
        .json(
            "PATCH",
            "/api/users/external/auth-wang/profile/age",
            json!({ "value": "forty" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "TYPE_MISMATCH");

    let (_, body) = app.get("/api/users/external/auth-wang").await;
    assert!(body["age"].is_null());
}

#[tokio::test]
async fn bulk_update_applies_present_fields_only() {
    let app = TestApp::new();
    let created = app.create("auth-zhao", "CAREGIVER", Some("13800000000")).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .json(
            "PUT",
            &format!("/api/users/{id}/profile"),
            json!({ "city": "Hangzhou", "province": "Zhejiang", "hourlyRate": 12.3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hourlyRate"], "12.30");
    assert_eq!(body["city"], "Hangzhou");
    assert_eq!(body["province"], "Zhejiang");
    assert_eq!(body["primaryPhone"], "13800000000");

    let (status, body) = app
        .json(
            "PUT",
            "/api/users/external/auth-zhao/profile",
            json!({ "age": 12 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn completion_lists_missing_fields() {
    let app = TestApp::new();
    app.create("auth-client", "CLIENT", None).await;

    let (status, body) = app
        .get("/api/users/external/auth-client/profile/completion")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["percentage"], 27);
    assert_eq!(body["missingFields"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn search_filters_ranks_and_paginates() {
    let app = TestApp::new();
    let plain = app.create("cg-1", "CAREGIVER", None).await;
    let with_phone = app.create("cg-2", "CAREGIVER", Some("13800000001")).await;
    let other = app.create("cg-3", "CAREGIVER", None).await;
    app.create("client-1", "CLIENT", None).await;

    for ext in ["cg-1", "cg-2"] {
        app.json(
            "PATCH",
            &format!("/api/users/external/{ext}/profile/province"),
            json!({ "value": "Sichuan" }),
        )
        .await;
    }

    let (status, body) = app.get("/api/users/search/caregivers?size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["size"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let (_, body) = app.get("/api/users/search/caregivers?size=2&page=1").await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (_, body) = app.get("/api/users/search/caregivers?province=Sichuan").await;
    let ids: Vec<&Value> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| &item["id"])
        .collect();
    assert_eq!(ids, vec![&with_phone["id"], &plain["id"]]);
    assert!(!ids.contains(&&other["id"]));

    let (status, body) = app
        .get("/api/users/search/caregivers?sort=favouriteColour,desc")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SORT");
}

#[tokio::test]
async fn list_all_returns_every_role_by_id() {
    let app = TestApp::new();
    app.create("all-cg", "CAREGIVER", None).await;
    app.create("all-client", "CLIENT", None).await;
    app.create("all-parent", "PARENT", None).await;

    let (status, body) = app.get("/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let roles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["CAREGIVER", "CLIENT", "CLIENT"]);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn caregiver_listings_exclude_clients() {
    let app = TestApp::new();
    app.create("cg-a", "CAREGIVER", None).await;
    app.create("client-a", "CLIENT", None).await;

    let (_, all) = app.get("/api/users/caregivers").await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (_, featured) = app.get("/api/users/caregivers/featured").await;
    assert!(featured.as_array().unwrap().is_empty());

    let (_, verified) = app.get("/api/users/caregivers/verified").await;
    assert!(verified.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn me_routes_require_a_bearer_token() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app
        .send(
            Request::get("/api/me")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_registers_and_updates_the_caller() {
    let app = TestApp::new();
    let token = bearer("idp|chen", "chen@example.com", Some("Chen Jing"));

    let (status, _) = app
        .send(
            Request::get("/api/me")
                .header(header::AUTHORIZATION, &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(
            Request::post("/api/me")
                .header(header::AUTHORIZATION, &token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "role": "CAREGIVER" }).to_string()))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["externalAuthId"], "idp|chen");
    assert_eq!(body["email"], "chen@example.com");
    assert_eq!(body["displayName"], "Chen Jing");

    let (status, body) = app
        .send(
            Request::patch("/api/me/profile/city")
                .header(header::AUTHORIZATION, &token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "value": "Chengdu" }).to_string()))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Chengdu");

    let (status, body) = app
        .send(
            Request::get("/api/me/profile/completion")
                .header(header::AUTHORIZATION, &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        !body["missingFields"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f == "city")
    );
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["status"], "healthy");

    let (status, openapi) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(openapi["paths"]["/api/users/search/caregivers"].is_object());
    assert!(openapi["components"]["securitySchemes"]["bearerAuth"].is_object());
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/health/live")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-123");
}
