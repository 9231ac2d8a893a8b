//! Main application router.

use crate::{
    controllers::{contact_controller, health_controller},
    middleware::logging_middleware,
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    Router,
};
use caravel_config::ServerConfig;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let api_router = contact_controller::router()
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(server_config.max_body_size))
        .with_state(state);

    let router = Router::new()
        .merge(health_controller::router())
        .merge(api_router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with contact endpoints under /v1/contact");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        async_trait,
        body::Body,
        http::{
            header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ORIGIN},
            HeaderMap, Request, StatusCode,
        },
    };
    use bytes::Bytes;
    use caravel_core::{
        encode_response, upstream_response, BoxResponse, CaravelError, CaravelResult, RequestContext,
        Response, ResponseSink,
    };
    use caravel_service::DataSource;
    use http_body_util::BodyExt;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;

    const CONTACT: &[u8] = br#"{"contact_id":"c-5","name":"Edsger"}"#;

    #[derive(Debug)]
    struct Broken;

    impl Response for Broken {
        fn write_to(&self, _sink: &mut dyn ResponseSink) -> CaravelResult<()> {
            Err(CaravelError::Sink("broken pipe".to_string()))
        }
    }

    #[derive(Clone, Copy)]
    enum Outcome {
        Contact,
        NotFound,
        Refused,
        Broken,
    }

    /// Records calls and answers every one with the same outcome.
    struct FakeSource {
        outcome: Outcome,
        calls: Mutex<Vec<(String, String, Bytes)>>,
        seen_headers: Mutex<Option<HeaderMap>>,
    }

    impl FakeSource {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
                seen_headers: Mutex::new(None),
            })
        }

        fn answer(&self, ctx: &RequestContext, op: &str, arg: String, body: Bytes) -> CaravelResult<BoxResponse> {
            self.calls.lock().unwrap().push((op.to_string(), arg, body));
            *self.seen_headers.lock().unwrap() = Some(ctx.headers().clone());

            match self.outcome {
                Outcome::Contact => Ok(encode_response(CONTACT)),
                Outcome::NotFound => Err(CaravelError::UpstreamStatus {
                    code: 404,
                    reason: "Not Found".to_string(),
                    response: Some(Box::new(upstream_response(
                        StatusCode::NOT_FOUND,
                        HeaderMap::new(),
                        r#"{"error":"no such contact"}"#,
                    ))),
                }),
                Outcome::Refused => Err(CaravelError::upstream("connection refused")),
                Outcome::Broken => Ok(Box::new(Broken)),
            }
        }
    }

    #[async_trait]
    impl DataSource for FakeSource {
        async fn get(&self, ctx: &RequestContext, key: &str) -> CaravelResult<BoxResponse> {
            self.answer(ctx, "get", key.to_string(), Bytes::new())
        }

        async fn create(&self, ctx: &RequestContext, body: Bytes) -> CaravelResult<BoxResponse> {
            self.answer(ctx, "create", String::new(), body)
        }

        async fn update(&self, ctx: &RequestContext, body: Bytes) -> CaravelResult<BoxResponse> {
            self.answer(ctx, "update", String::new(), body)
        }
    }

    fn app(source: Arc<FakeSource>) -> Router {
        let config = ServerConfig {
            max_body_size: 64,
            ..ServerConfig::default()
        };
        create_router(AppState::new(source, Some(Duration::from_secs(5))), &config)
    }

    async fn body_bytes(response: axum::response::Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_ping() {
        let response = app(FakeSource::new(Outcome::Contact))
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_bytes(response).await;
        assert!(String::from_utf8_lossy(&body).starts_with("Health check at: "));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(FakeSource::new(Outcome::Contact))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_get_contact() {
        let source = FakeSource::new(Outcome::Contact);
        let response = app(source.clone())
            .oneshot(
                Request::get("/v1/contact/c-5")
                    .header("authorization", "Bearer t")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(response.headers().get("x-request-id").is_some());
        assert_eq!(&body_bytes(response).await[..], CONTACT);

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "get");
        assert_eq!(calls[0].1, "c-5");

        let headers = source.seen_headers.lock().unwrap().clone().unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "Bearer t");
    }

    #[tokio::test]
    async fn test_post_and_put_route_to_create_and_update() {
        let source = FakeSource::new(Outcome::Contact);
        let router = app(source.clone());

        let created = router
            .clone()
            .oneshot(
                Request::post("/v1/contact")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(CONTACT))
                    .unwrap(),
            )
            .await
            .unwrap();
        let updated = router
            .oneshot(Request::put("/v1/contact").body(Body::from(CONTACT)).unwrap())
            .await
            .unwrap();

        assert_eq!(created.status(), StatusCode::OK);
        assert_eq!(updated.status(), StatusCode::OK);

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls[0].0, "create");
        assert_eq!(&calls[0].2[..], CONTACT);
        assert_eq!(calls[1].0, "update");
    }

    #[tokio::test]
    async fn test_upstream_error_response_is_forwarded() {
        let response = app(FakeSource::new(Outcome::NotFound))
            .oneshot(Request::get("/v1/contact/c-404").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(&body_bytes(response).await[..], br#"{"error":"no such contact"}"#);
    }

    #[tokio::test]
    async fn test_error_without_response_is_json_error() {
        let response = app(FakeSource::new(Outcome::Refused))
            .oneshot(
                Request::get("/v1/contact/c-5")
                    .header("x-request-id", "req-77")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-77");

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["code"], "UPSTREAM_ERROR");
        assert_eq!(json["trace_id"], "req-77");
    }

    #[tokio::test]
    async fn test_write_failure_is_500() {
        let response = app(FakeSource::new(Outcome::Broken))
            .oneshot(Request::get("/v1/contact/c-5").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let source = FakeSource::new(Outcome::Contact);
        let response = app(source.clone())
            .oneshot(Request::post("/v1/contact").body(Body::from(vec![b'x'; 1024])).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app(FakeSource::new(Outcome::Contact))
            .oneshot(Request::get("/v1/contacts").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn allowed_origin(config: ServerConfig, origin: &'static str) -> Option<HeaderValue> {
        let router = create_router(AppState::new(FakeSource::new(Outcome::Contact), None), &config);
        let response = router
            .oneshot(Request::get("/ping").header(ORIGIN, origin).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).cloned()
    }

    #[tokio::test]
    async fn test_cors_disabled_sends_no_allow_origin() {
        let config = ServerConfig {
            cors_enabled: false,
            ..ServerConfig::default()
        };
        assert!(allowed_origin(config, "https://app.example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_cors_wildcard_allows_any_origin() {
        let config = ServerConfig {
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
            ..ServerConfig::default()
        };
        assert_eq!(allowed_origin(config, "https://anywhere.example").await.unwrap(), "*");
    }

    #[tokio::test]
    async fn test_cors_origin_list_skips_invalid_entries() {
        let config = ServerConfig {
            cors_enabled: true,
            cors_origins: vec!["https://app.example.com".to_string(), "bad\norigin".to_string()],
            ..ServerConfig::default()
        };

        let listed = allowed_origin(config.clone(), "https://app.example.com").await;
        assert_eq!(listed.unwrap(), "https://app.example.com");
        assert!(allowed_origin(config, "https://evil.example").await.is_none());
    }
}
