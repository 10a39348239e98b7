use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Request fields worth pointing at in a rejection detail.
const KNOWN_FIELDS: [&str; 2] = ["question", "product_id"];

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    KNOWN_FIELDS
        .iter()
        .find(|key| msg.contains(*key))
        .map(|key| key.to_string())
}

fn hint_from_serde_msg(msg: &str) -> Option<String> {
    if msg.contains("missing field") {
        Some("Both `question` and `product_id` are required strings.".into())
    } else if msg.contains("expected a string") || msg.contains("invalid type") {
        Some("Expected a JSON string here (e.g. \"value\").".into())
    } else if msg.contains("Content-Type") {
        Some("Send the body with `Content-Type: application/json`.".into())
    } else if msg.contains("expected") || msg.contains("EOF") {
        Some("Expected a JSON object (e.g. { \"question\": \"...\", \"product_id\": \"...\" }).".into())
    } else {
        None
    }
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(value) = HeaderValue::from_str(&id) {
        parts.headers.insert(REQUEST_ID_HEADER, value);
    }
    id
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Normalizes body rejections (400, 415, 422) into a 400 error envelope and
/// stamps a request id. Responses that are already JSON only get the id.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNSUPPORTED_MEDIA_TYPE | StatusCode::UNPROCESSABLE_ENTITY
    ) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    let req_id = ensure_request_id(&mut parts);

    if is_json(&parts) {
        return Response::from_parts(parts, Body::from(bytes));
    }

    let original = String::from_utf8_lossy(&bytes);
    debug!(request_id = %req_id, %status, rejection = %original.trim(), "request body rejected");

    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: hint_from_serde_msg(&original),
    };
    let details = if detail.path.is_none() && detail.hint.is_none() {
        Vec::new()
    } else {
        vec![detail]
    };

    let envelope = ApiResponse::<()>::error("BAD_REQUEST", original.trim(), details);

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.status = StatusCode::BAD_REQUEST;
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Response::from_parts(parts, Body::from(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_at_the_offending_field() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `product_id` at line 1 column 20";
        assert_eq!(guess_path_from_serde_msg(msg).as_deref(), Some("product_id"));
        assert!(hint_from_serde_msg(msg).is_some());
        assert_eq!(guess_path_from_serde_msg("EOF while parsing"), None);
    }
}
