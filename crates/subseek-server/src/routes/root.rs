use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// GET /
pub async fn index() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "subseek subtitle search API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec!["/search", "/stats", "/generate_audio", "/generate_video"],
    })
}

/// GET /health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
