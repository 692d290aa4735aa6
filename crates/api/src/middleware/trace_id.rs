//! Request correlation IDs.
//!
//! Every request gets an `X-Request-ID`: the caller's value when it is a sane
//! token, otherwise a fresh UUID. The ID is stored in request extensions, wrapped
//! around the handler as a tracing span and echoed on the response.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation ID for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn accept_incoming(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn resolve_request_id(req: &Request<Body>) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| accept_incoming(v))
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = resolve_request_id(&req);
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = Instant::now();
    let mut response = async move {
        let response = next.run(req).await;
        tracing::debug!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(value: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/health");
        if let Some(v) = value {
            builder = builder.header(REQUEST_ID_HEADER, v);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_incoming_id_is_kept() {
        assert_eq!(resolve_request_id(&request_with(Some("abc-123"))), "abc-123");
    }

    #[test]
    fn test_missing_id_generates_uuid() {
        let id = resolve_request_id(&request_with(None));
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_hostile_id_is_replaced() {
        let id = resolve_request_id(&request_with(Some("a b<script>")));
        assert!(Uuid::parse_str(&id).is_ok());

        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let id = resolve_request_id(&request_with(Some(&long)));
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
