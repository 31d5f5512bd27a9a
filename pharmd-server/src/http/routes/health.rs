//! Health check endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Hello response for environment verification
#[derive(Serialize)]
pub struct HelloResponse {
    pub message: &'static str,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /hello
async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello World! Backend is running",
    })
}

/// Health routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/hello", get(hello))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn hello_returns_message() {
        let Json(body) = hello().await;
        assert_eq!(body.message, "Hello World! Backend is running");
    }
}
