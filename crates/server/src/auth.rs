//! Shared-key guard for the decision API.
//!
//! The key may arrive either as the `x-api-key` header or as a `?key=` query
//! parameter. With no key configured every request passes.

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use fyndy_core::{config::AccessConfig, ApplicationError};
use serde::Deserialize;
use tracing::warn;

use crate::error::{new_correlation_id, ApiError};

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Default, Deserialize)]
struct KeyParam {
    key: Option<String>,
}

pub async fn require_api_key(
    State(access): State<AccessConfig>,
    request: Request,
    next: Next,
) -> Response {
    let header_key = request.headers().get(API_KEY_HEADER).and_then(|value| value.to_str().ok());
    let query_key =
        Query::<KeyParam>::try_from_uri(request.uri()).ok().and_then(|Query(param)| param.key);

    if access.accepts([header_key, query_key.as_deref()]) {
        return next.run(request).await;
    }

    let correlation_id = new_correlation_id();
    warn!(
        event_name = "access.denied",
        correlation_id = %correlation_id,
        path = %request.uri().path(),
        header_present = request.headers().contains_key(API_KEY_HEADER),
        query_present = query_key.is_some(),
        "request rejected: api key missing or mismatched"
    );

    ApiError(
        ApplicationError::AccessDenied("api key missing or mismatched".to_string())
            .into_interface(correlation_id),
    )
    .into_response()
}
