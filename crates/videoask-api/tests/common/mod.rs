//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use videoask_graph::domain::node::{Node, NodeGraph, Question};
use videoask_playback::config::PlaybackConfig;

use videoask_api::routes;
use videoask_api::state::AppState;

/// Two clips: `intro` offers `details`, a dangling `ghost` and a way out;
/// `details` only ends.
pub fn test_graph() -> NodeGraph {
    NodeGraph::new(vec![
        Node::new(
            "intro",
            "Intro",
            "https://cdn.example.com/intro.mp4",
            vec![
                Question::to_node("Tell me more", "details"),
                Question::to_node("Broken link", "ghost"),
                Question::terminal("No thanks"),
            ],
        ),
        Node::new(
            "details",
            "Details",
            "https://cdn.example.com/details.mp4",
            vec![Question::terminal("Done")],
        ),
    ])
    .unwrap()
}

/// Build the full app router on a freshly launched session. Uses the same
/// route structure as `main.rs`.
pub fn build_test_app() -> (Router, JoinHandle<()>) {
    let (app_state, driver) = AppState::launch(test_graph(), PlaybackConfig::default());
    (routes::router().with_state(app_state), driver)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with no body and return the response.
pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
