use axum::extract::{FromRequestParts, MatchedPath, Request};
use axum::http::{Method, Version};
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;
use axum_extra::headers::{Header, UserAgent};
use axum_extra::TypedHeader;
use chrono::Utc;
use std::time::Instant;
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use tracing::field::{debug as debug_field, display, Empty};
use tracing::{debug, Instrument, Span};
use uuid::Uuid;

use crate::headers::XRequestId;

/// Gives every request a time-ordered UUID unless the caller sent one.
#[doc(hidden)]
#[derive(Default, Clone)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        Uuid::now_v7().to_string().parse().ok().map(RequestId::new)
    }
}

#[must_use]
pub fn set_request_id_layer() -> SetRequestIdLayer<RequestIdGenerator> {
    SetRequestIdLayer::new(XRequestId::name().clone(), RequestIdGenerator)
}

#[doc(hidden)]
#[derive(FromRequestParts)]
pub struct RequestMetadata {
    route: Option<Extension<MatchedPath>>,
    request_id: Option<TypedHeader<XRequestId>>,
    user_agent: Option<TypedHeader<UserAgent>>,
}

impl RequestMetadata {
    fn span(&self, method: &Method, version: Version, target: &str) -> Span {
        tracing::info_span!(
            "http.request",
            engagement.kind = Empty,
            http.method = %method,
            http.status_code = Empty,
            http.target = %target,
            http.user_agent = %self.user_agent.as_ref().map(|v| v.as_str()).unwrap_or_default(),
            http.version = ?version,
            request.duration = Empty,
            request.id = %self.request_id.as_ref().map(|v| v.as_str()).unwrap_or_default(),
            request.timestamp = %Utc::now(),
        )
    }
}

/// Tells which relation or comment a request acts on, from its
/// matched route and the actual path.
fn engagement_of<'a>(route: &str, path: &'a str) -> Option<&'a str> {
    match route {
        "/api/v1/relations/:kind/:target" => path.split('/').filter(|v| !v.is_empty()).nth(3),
        "/api/v1/users/:name/follow" => Some("follow"),
        "/api/v1/comments" => Some("comment"),
        _ => None,
    }
}

pub async fn trace_request(metadata: RequestMetadata, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let version = request.version();
    let path = request.uri().path().to_string();
    let target = metadata
        .route
        .as_ref()
        .map_or(path.as_str(), |v| v.as_str())
        .to_string();

    let span = metadata.span(&method, version, &target);
    if let Some(kind) = engagement_of(&target, &path) {
        span.record("engagement.kind", kind);
    }
    span.in_scope(|| debug!("Processing request: {target}"));

    let start = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let elapsed = start.elapsed();

    let status = response.status();
    span.record("http.status_code", display(status.as_u16()));
    span.record("request.duration", debug_field(elapsed));
    span.in_scope(|| debug!("{method} {path} -> {status} ({elapsed:?})"));

    response
}
