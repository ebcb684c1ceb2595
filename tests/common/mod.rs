//! In-process mock backend for integration tests
//!
//! Serves the handful of routes the client exercises and counts every hit so
//! tests can assert how many network calls actually happened.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const VALID_TOKEN: &str = "valid-token";

#[derive(Default)]
pub struct MockState {
    pub programs_hits: AtomicUsize,
    pub program_detail_hits: AtomicUsize,
    pub news_hits: AtomicUsize,
    pub events_hits: AtomicUsize,
    pub partnerships_hits: AtomicUsize,
    pub create_hits: AtomicUsize,
    pub search_hits: AtomicUsize,
    pub upload_hits: AtomicUsize,
    pub gallery_hits: AtomicUsize,
    pub last_auth_header: Mutex<Option<String>>,
    pub last_content_type: Mutex<Option<String>>,
    pub last_created_body: Mutex<Option<Value>>,
    pub last_search_query: Mutex<Option<String>>,
}

impl MockState {
    fn record_headers(&self, headers: &HeaderMap) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        if let Ok(mut guard) = self.last_auth_header.lock() {
            *guard = auth;
        }
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        if let Ok(mut guard) = self.last_content_type.lock() {
            *guard = content_type;
        }
    }

    pub fn last_auth(&self) -> Option<String> {
        self.last_auth_header.lock().ok().and_then(|g| g.clone())
    }

    pub fn last_content_type(&self) -> Option<String> {
        self.last_content_type.lock().ok().and_then(|g| g.clone())
    }

    pub fn last_created(&self) -> Option<Value> {
        self.last_created_body.lock().ok().and_then(|g| g.clone())
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_search_query.lock().ok().and_then(|g| g.clone())
    }
}

pub fn sample_program(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Exchange MIT",
        "partnerUniversity": "MIT",
        "duration": "1 Semester",
        "deadline": "2025-01-01",
        "applicationLink": "https://mit.edu/apply",
        "active": true
    })
}

async fn list_programs(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.programs_hits.fetch_add(1, Ordering::SeqCst);
    state.record_headers(&headers);
    Json(json!({"items": [sample_program("p-1")], "totalPages": 1}))
}

async fn program_detail(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> Json<Value> {
    state.program_detail_hits.fetch_add(1, Ordering::SeqCst);
    Json(sample_program(&id))
}

async fn create_program(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.create_hits.fetch_add(1, Ordering::SeqCst);
    state.record_headers(&headers);
    if let Ok(mut guard) = state.last_created_body.lock() {
        *guard = Some(body.clone());
    }

    if body.get("title").and_then(Value::as_str) == Some("boom") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "database exploded"})),
        );
    }
    if body.get("applicationLink").is_none() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "detail": [{"loc": ["body", "applicationLink"], "msg": "field required"}]
            })),
        );
    }
    if body.get("title").and_then(Value::as_str).map(|t| t.len() > 200) == Some(true) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "detail": [{"loc": ["body", "title"], "msg": "too long"}]
            })),
        );
    }

    let mut created = body;
    created["id"] = json!("p-99");
    (StatusCode::CREATED, Json(created))
}

async fn update_program(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.create_hits.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut guard) = state.last_created_body.lock() {
        *guard = Some(body.clone());
    }
    let mut updated = body;
    updated["id"] = json!(id);
    Json(updated)
}

async fn delete_program(State(state): State<Arc<MockState>>) -> StatusCode {
    state.create_hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

async fn list_news(State(state): State<Arc<MockState>>) -> Json<Value> {
    state.news_hits.fetch_add(1, Ordering::SeqCst);
    // Bare-array list shape
    Json(json!([
        {"id": "n-1", "title": "Fall fair", "content": "...", "category": "events"}
    ]))
}

/// 500 on the first hit, healthy afterwards; exercises the single read retry
async fn list_events(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    let hit = state.events_hits.fetch_add(1, Ordering::SeqCst);
    if hit == 0 {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "warming up"})),
        )
    } else {
        (StatusCode::OK, Json(json!({"items": [], "totalPages": 0})))
    }
}

/// Always 500; exercises retry giving up after one attempt
async fn list_partnerships(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    state.partnerships_hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": "still broken"})),
    )
}

/// Requires the valid bearer token
async fn list_gallery(State(state): State<Arc<MockState>>, headers: HeaderMap) -> impl IntoResponse {
    state.gallery_hits.fetch_add(1, Ordering::SeqCst);
    state.record_headers(&headers);
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", VALID_TOKEN))
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Not authenticated"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"items": [], "totalPages": 0})),
    )
}

async fn upload_gallery(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.upload_hits.fetch_add(1, Ordering::SeqCst);
    state.record_headers(&headers);
    Json(json!({
        "id": "g-1",
        "title": "Campus in spring",
        "imageUrl": "https://cdn.example.edu/g-1.jpg",
        "order": 0
    }))
}

async fn search(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.search_hits.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut guard) = state.last_search_query.lock() {
        *guard = params.get("q").cloned();
    }
    Json(json!({
        "items": [{"id": "n-1", "type": "news", "title": "University fair"}],
        "totalPages": 1
    }))
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body.get("password").and_then(Value::as_str) == Some("secret") {
        (StatusCode::OK, Json(json!({"token": VALID_TOKEN})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Bad credentials"})),
        )
    }
}

async fn broken_shape() -> Json<Value> {
    Json(json!({"totally": "unexpected"}))
}

/// Spawn the mock backend on an ephemeral port; returns its base URL and the
/// shared counters.
pub async fn spawn_backend() -> (String, Arc<MockState>) {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/programs", get(list_programs).post(create_program))
        .route(
            "/programs/:id",
            get(program_detail).put(update_program).delete(delete_program),
        )
        .route("/news", get(list_news))
        .route("/events", get(list_events))
        .route("/partnerships", get(list_partnerships))
        .route("/gallery", get(list_gallery))
        .route("/gallery/upload", axum::routing::post(upload_gallery))
        .route("/search", get(search))
        .route("/auth/login", axum::routing::post(login))
        .route("/broken", get(broken_shape))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock backend");
    });

    (format!("http://{}", addr), state)
}
