use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fyndy_core::InterfaceError;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: &'static str,
    pub correlation_id: String,
}

/// HTTP rendering of an [`InterfaceError`].
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InterfaceError> for ApiError {
    fn from(value: InterfaceError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            ok: false,
            error: self.0.user_message(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub fn new_correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}
