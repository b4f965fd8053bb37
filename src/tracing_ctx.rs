//! Request-scoped tracing context.
//!
//! Every request carries a `RequestId` that flows into log lines, response
//! metadata, and error bodies. The id is held in a tokio task-local so
//! services and error mappers can read it without threading it through
//! every signature.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::cell::RefCell;
use std::future::Future;
use tower_http::{
    classify::{SharedClassifier, StatusInRangeAsFailures},
    trace::TraceLayer,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl Default for RequestId {
    fn default() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

impl RequestId {
    pub fn new(value: impl Into<String>) -> Self {
        RequestId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

tokio::task_local! {
    static CURRENT_REQUEST_ID: RefCell<Option<RequestId>>;
}

pub async fn scope_request_id<Fut, R>(request_id: RequestId, future: Fut) -> R
where
    Fut: Future<Output = R>,
{
    CURRENT_REQUEST_ID
        .scope(RefCell::new(Some(request_id)), future)
        .await
}

pub fn current_request_id() -> Option<RequestId> {
    CURRENT_REQUEST_ID
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
}

/// Middleware that ensures every request carries a request id.
///
/// An inbound `x-request-id` header is honored; otherwise a fresh UUID is
/// generated. The id is scoped into the task-local for downstream readers
/// and echoed back on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(RequestId::new)
        .unwrap_or_default();

    request.extensions_mut().insert(request_id.clone());

    let header_value = HeaderValue::from_str(request_id.as_str()).ok();
    let mut response = scope_request_id(request_id, next.run(request)).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// HTTP trace layer classifying 4xx/5xx as failures.
pub fn configure_http_tracing() -> TraceLayer<SharedClassifier<StatusInRangeAsFailures>> {
    TraceLayer::new(StatusInRangeAsFailures::new(400..=599).into_make_classifier())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_id_is_visible_inside_scope() {
        let seen = scope_request_id(RequestId::new("req-42"), async {
            current_request_id().map(|rid| rid.as_str().to_string())
        })
        .await;
        assert_eq!(seen.as_deref(), Some("req-42"));
    }

    #[tokio::test]
    async fn request_id_is_absent_outside_scope() {
        assert!(current_request_id().is_none());
    }
}
