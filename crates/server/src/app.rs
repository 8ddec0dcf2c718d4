use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use fyndy_core::{config::AccessConfig, DecisionEngine, DeterministicDecisionEngine};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, decision, health};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn DecisionEngine>,
    pub access: AccessConfig,
    pub port: u16,
}

impl AppState {
    pub fn new(access: AccessConfig, port: u16) -> Self {
        Self { engine: Arc::new(DeterministicDecisionEngine::default()), access, port }
    }
}

/// `/health` stays public; everything under `/api` passes the key guard.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/decision", get(decision::get_decision).post(decision::post_decision))
        .route_layer(middleware::from_fn_with_state(state.access.clone(), auth::require_api_key))
        .with_state(state.clone());

    Router::new()
        .merge(health::router(state.port))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
impl AppState {
    pub fn open(port: u16) -> Self {
        Self::new(AccessConfig::default(), port)
    }

    pub fn guarded(port: u16, key: &str) -> Self {
        Self::new(AccessConfig { api_key: Some(key.to_string().into()) }, port)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{router, AppState};

    async fn send(state: AppState, request: Request<Body>) -> Response {
        router(state).oneshot(request).await.expect("router should respond")
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn health_is_public_even_when_key_is_required() {
        let response = send(AppState::guarded(4100, "k-1"), get("/health")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["ok"], true);
        assert_eq!(payload["service"], "fyndy-api");
        assert_eq!(payload["port"], 4100);
    }

    #[tokio::test]
    async fn decision_without_key_is_unauthorized_when_key_is_required() {
        let response =
            send(AppState::guarded(3333, "k-1"), get("/api/decision?q=Grohe%20S240")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let payload = body_json(response).await;
        assert_eq!(payload["ok"], false);
        assert_eq!(payload["error"], "Clé API invalide");
        assert!(payload["correlation_id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn wrong_key_is_unauthorized() {
        let request = Request::builder()
            .uri("/api/decision?q=chaise")
            .header("x-api-key", "wrong")
            .body(Body::empty())
            .expect("request");
        let response = send(AppState::guarded(3333, "k-1"), request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn key_is_accepted_from_header_or_query_parameter() {
        let request = Request::builder()
            .uri("/api/decision?q=Grohe%20S240")
            .header("x-api-key", "k-1")
            .body(Body::empty())
            .expect("request");
        let via_header = send(AppState::guarded(3333, "k-1"), request).await;
        assert_eq!(via_header.status(), StatusCode::OK);

        let via_query =
            send(AppState::guarded(3333, "k-1"), get("/api/decision?q=Grohe%20S240&key=k-1"))
                .await;
        assert_eq!(via_query.status(), StatusCode::OK);
        let payload = body_json(via_query).await;
        assert_eq!(payload["query"], "Grohe S240");
        assert_eq!(payload["decision"]["merchant"], "Marchand certifié");
    }

    #[tokio::test]
    async fn open_mode_rejects_missing_query_with_bad_request() {
        let response = send(AppState::open(3333), get("/api/decision")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = body_json(response).await;
        assert_eq!(payload["ok"], false);
        assert_eq!(payload["error"], "Paramètre q manquant");
    }

    #[tokio::test]
    async fn post_with_json_body_is_supported() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/decision")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"q":"table basse bois"}"#))
            .expect("request");
        let response = send(AppState::open(3333), request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["precision"], "precise");
        assert_eq!(payload["decision"]["price"], 88);
    }

    #[tokio::test]
    async fn unreadable_post_bodies_get_the_missing_query_envelope() {
        let without_content_type = Request::builder()
            .method(Method::POST)
            .uri("/api/decision")
            .body(Body::empty())
            .expect("request");
        let empty_json = Request::builder()
            .method(Method::POST)
            .uri("/api/decision")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .expect("request");

        for request in [without_content_type, empty_json] {
            let response = send(AppState::open(3333), request).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let payload = body_json(response).await;
            assert_eq!(payload["ok"], false);
            assert_eq!(payload["error"], "Paramètre q manquant");
            assert!(payload["correlation_id"].as_str().is_some_and(|id| !id.is_empty()));
        }
    }

    #[tokio::test]
    async fn duplicated_query_parameter_gets_the_missing_query_envelope() {
        let response = send(AppState::open(3333), get("/api/decision?q=a&q=b")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = body_json(response).await;
        assert_eq!(payload["ok"], false);
        assert_eq!(payload["error"], "Paramètre q manquant");
    }

    #[tokio::test]
    async fn responses_carry_permissive_cors_headers() {
        let request = Request::builder()
            .uri("/api/decision?q=chaise")
            .header(header::ORIGIN, "chrome-extension://fyndy")
            .body(Body::empty())
            .expect("request");
        let response = send(AppState::open(3333), request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
    }
}
