//! HTTP middleware (404 handler)

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;

const MAX_404_BODY_LOG: usize = 64 * 1024; // 64KB limit for logging

/// Handle 404 Not Found with logging
pub async fn handle_404(req: Request) -> impl IntoResponse {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return StatusCode::NOT_FOUND;
    }

    let method = req.method().clone();
    let uri = req.uri().clone();
    let headers = req.headers().clone();

    let body_bytes = match to_bytes(req.into_body(), MAX_404_BODY_LOG).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::debug!("[404] {} {} (failed to read body)", method, uri);
            return StatusCode::NOT_FOUND;
        }
    };

    let mut headers_map = serde_json::Map::new();
    for (name, value) in headers.iter() {
        if let Ok(value_str) = value.to_str() {
            headers_map.insert(
                name.to_string(),
                serde_json::Value::String(value_str.to_string()),
            );
        }
    }

    let body_value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
            String::from_utf8(body_bytes.to_vec())
                .map(serde_json::Value::String)
                .unwrap_or_else(|_| {
                    serde_json::Value::String(format!("<binary {} bytes>", body_bytes.len()))
                })
        })
    };

    let log_entry = serde_json::json!({
        "status": 404,
        "method": method.to_string(),
        "url": uri.to_string(),
        "headers": headers_map,
        "body": body_value,
    });

    if let Ok(pretty) = serde_json::to_string_pretty(&log_entry) {
        tracing::debug!("[404]\n{}", pretty);
    }

    StatusCode::NOT_FOUND
}
