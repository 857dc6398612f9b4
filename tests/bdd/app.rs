//! Minimal axum application the scenarios run against. It exercises the
//! interception points stagehand provides: JSON payloads, headers, cookies,
//! redirects, outbound mail and warning/error logs.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Json;
use serde_json::{Value, json};

use stagehand::clock::TestClock;
use stagehand::mailer::{Attachment, Email, TestTransport};

/// Test doubles shared with the handlers.
#[derive(Clone)]
pub struct AppState {
    pub transport: TestTransport,
    pub clock: TestClock,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/hello", get(hello))
        .route("/old-home", get(old_home))
        .route("/api/books", get(list_books))
        .route("/api/books/{id}", get(show_book))
        .route("/api/orders", post(create_order))
        .route("/api/fail", get(fail))
        .with_state(state)
}

async fn index() -> &'static str {
    "Welcome to the demo bookstore"
}

async fn hello() -> impl IntoResponse {
    (
        AppendHeaders([
            (header::SET_COOKIE.as_str(), "session=abc123; Path=/; HttpOnly"),
            ("x-demo-version", "1.4.2"),
        ]),
        "Hello World",
    )
}

async fn old_home() -> Redirect {
    Redirect::to("/")
}

fn books() -> Value {
    json!([
        {"id": 1, "title": "The Crab Book", "author": "Ferris", "tags": ["rust", "systems"]},
        {"id": 2, "title": "Gherkin Garden", "author": "Cuke", "tags": ["bdd"]},
    ])
}

async fn list_books() -> Json<Value> {
    Json(books())
}

async fn show_book(Path(id): Path<u64>) -> Response {
    let found = books()
        .as_array()
        .and_then(|all| all.iter().find(|book| book["id"] == json!(id)).cloned());
    match found {
        Some(book) => Json(book).into_response(),
        None => (StatusCode::NOT_FOUND, "no such book").into_response(),
    }
}

async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(order): Json<Value>,
) -> Response {
    let customer = order["customer"].as_str().unwrap_or("guest").to_string();
    let email = order["email"].as_str().unwrap_or("guest@example.com").to_string();
    let placed_at = state.clock.now();

    state.transport.send(
        Email::new("Order confirmation")
            .sender("shop@example.com")
            .to(email)
            .to("archive@example.com")
            .html(format!("<p>Thanks {customer}, your order is in.</p>"))
            .attach(Attachment {
                file_name: "receipt.txt".to_string(),
                content_type: "text/plain".to_string(),
                body: b"total: 0.00".to_vec(),
            }),
    );
    tracing::warn!(customer = %customer, "order placed without payment verification");

    let mut extra = Vec::new();
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        extra.push(("x-request-id", id.to_string()));
    }
    (
        StatusCode::CREATED,
        AppendHeaders(extra),
        Json(json!({
            "status": "created",
            "placed_at": placed_at.to_rfc3339(),
        })),
    )
        .into_response()
}

async fn fail() -> impl IntoResponse {
    let detail = json!({"code": 500, "retryable": false});
    tracing::error!(path = "/api/fail", detail = %detail, "upstream gateway timed out");
    (StatusCode::INTERNAL_SERVER_ERROR, "gateway timed out")
}
