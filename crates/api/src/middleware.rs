//! Middleware stack applied to every request.
//!
//! Layers run in a fixed order from the outside in:
//! request logging, panic recovery, request-id tagging, request timeout.
//!
//! The id assigned by the tagging layer is also written into a slot owned by
//! a layer outside panic recovery, so a 500 built from a caught panic still
//! carries it.

use std::any::Any;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::{MatchedPath, Request};
use axum::http::{self, HeaderValue, StatusCode};
use axum::middleware::{self as axum_middleware, Next};
use axum::response::{IntoResponse, Response};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{MakeSpan, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::ApiError;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generates a UUID v4 correlation id for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Opens one `http_request` span per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &http::Request<B>) -> Span {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = tracing::field::Empty,
        )
    }
}

/// Logs status, latency and correlation id once the response is ready.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResponse;

impl<B> OnResponse<B> for LogResponse {
    fn on_response(self, response: &http::Response<B>, latency: Duration, _span: &Span) {
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = latency.as_millis() as u64,
            request_id,
            "request completed"
        );
    }
}

/// Correlation id of the current request, filled in by the tagging layer.
#[derive(Debug, Clone, Default)]
pub struct RequestIdSlot(Arc<OnceLock<HeaderValue>>);

impl RequestIdSlot {
    pub fn get(&self) -> Option<&HeaderValue> {
        self.0.get()
    }
}

/// Puts the tagged id on responses that bypassed the tagging layer.
///
/// Sits outside panic recovery; only panic responses lack the header here.
pub async fn stamp_request_id(mut request: Request, next: Next) -> Response {
    let slot = RequestIdSlot::default();
    request.extensions_mut().insert(slot.clone());

    let mut response = next.run(request).await;

    if !response.headers().contains_key(REQUEST_ID_HEADER) {
        if let Some(id) = slot.get() {
            response.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
        }
    }
    response
}

/// Publishes the assigned id to the slot and the request span.
pub async fn record_request_id(request: Request, next: Next) -> Response {
    if let Some(id) = request.headers().get(REQUEST_ID_HEADER) {
        if let Some(slot) = request.extensions().get::<RequestIdSlot>() {
            let _ = slot.0.set(id.clone());
        }
        if let Ok(id) = id.to_str() {
            Span::current().record("request_id", id);
        }
    }
    next.run(request).await
}

/// Records request count and latency, labelled by method, route and status.
///
/// Requests that matched no route share the `unmatched` path label.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = request.method().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let labels = [("method", method), ("path", path), ("status", status)];
    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());

    response
}

/// Converts a caught handler panic into a 500 response.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else {
        "non-string panic payload"
    };
    tracing::error!(panic = %detail, "handler panicked");
    ApiError::Internal("internal server error".to_string()).into_response()
}

/// Wraps every route of `router`, including the fallback, in the middleware stack.
pub fn apply(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(RequestSpan)
                    .on_response(LogResponse),
            )
            .layer(axum_middleware::from_fn(track_metrics))
            .layer(axum_middleware::from_fn(stamp_request_id))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(axum_middleware::from_fn(record_request_id))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                request_timeout,
            )),
    )
}
