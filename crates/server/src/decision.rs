//! `GET|POST /api/decision` - runs the decision engine for a single query.

use std::fmt::Display;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use fyndy_core::{ApplicationError, DecisionError};
use serde::Deserialize;
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::{new_correlation_id, ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct DecisionParams {
    pub q: Option<String>,
}

pub async fn get_decision(
    State(state): State<AppState>,
    params: Result<Query<DecisionParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    match params {
        Ok(Query(params)) => respond(&state, params.q.as_deref()),
        Err(rejection) => Err(malformed(rejection)),
    }
}

pub async fn post_decision(
    State(state): State<AppState>,
    body: Result<Json<DecisionParams>, JsonRejection>,
) -> Result<Response, ApiError> {
    match body {
        Ok(Json(body)) => respond(&state, body.q.as_deref()),
        Err(rejection) => Err(malformed(rejection)),
    }
}

/// Unreadable parameters are reported the same way as a missing `q`.
fn malformed(rejection: impl Display) -> ApiError {
    let correlation_id = new_correlation_id();
    warn!(
        event_name = "decision.request.rejected",
        correlation_id = %correlation_id,
        error = %rejection,
        "decision parameters could not be read"
    );
    ApiError(ApplicationError::from(DecisionError::InvalidInput).into_interface(correlation_id))
}

fn respond(state: &AppState, raw_query: Option<&str>) -> Result<Response, ApiError> {
    let correlation_id = new_correlation_id();

    match state.engine.decide(raw_query.unwrap_or_default()) {
        Ok(decision) => {
            info!(
                event_name = "decision.request.completed",
                correlation_id = %correlation_id,
                precision = decision.verdict.as_str(),
                price = decision.result.price,
                risk = decision.trust.manipulation_risk.as_str(),
                "decision computed"
            );
            Ok(Json(decision.payload()).into_response())
        }
        Err(error) => {
            warn!(
                event_name = "decision.request.rejected",
                correlation_id = %correlation_id,
                error = %error,
                "decision request rejected"
            );
            Err(ApiError(ApplicationError::from(error).into_interface(correlation_id)))
        }
    }
}
