use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Class Assistant API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Keyword search over classroom announcements",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "auth": "/auth/login",
            "schools": "/api/schools",
            "classes": "/api/classes",
            "search": "/api/classes/:school/:section/search?q=",
            "announcements": "/api/announcements"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
