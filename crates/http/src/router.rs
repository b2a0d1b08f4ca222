//! Router builder for the Bookstall HTTP server

use axum::{
    extract::Request,
    http::{HeaderValue, Uri},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use bookstall_kernel::ModuleRegistry;

use crate::error::AppError;

/// Prefix every module router is nested under
pub const API_PREFIX: &str = "/api/v1";

/// Builder for constructing the main HTTP router.
///
/// Middleware is recorded and applied in [`RouterBuilder::build`] so it wraps
/// every route regardless of the order builder methods are called in.
pub struct RouterBuilder {
    router: Router,
    api: Router,
    tracing: bool,
    cors: bool,
    request_id: bool,
    timeout: Option<Duration>,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            api: Router::new(),
            tracing: false,
            cors: false,
            request_id: false,
            timeout: None,
        }
    }

    /// Add a route outside the API prefix
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/api/v1/{mount_path}`. An empty mount
    /// path merges the module's routes into the API root.
    pub fn mount_module(mut self, mount_path: &str, module_router: Router) -> Self {
        let mount_path = mount_path.trim_matches('/');
        if mount_path.is_empty() {
            self.api = self.api.merge(module_router);
        } else {
            self.api = self.api.nest(&format!("/{}", mount_path), module_router);
        }
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Add request ID middleware; the id is echoed back on the response
    pub fn with_request_id(mut self) -> Self {
        self.request_id = true;
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Serve the merged OpenAPI document and Swagger UI
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let openapi_spec = crate::openapi::merged_spec(registry);

        // Fall back to an empty document if a module fragment does not parse
        let openapi_obj: utoipa::openapi::OpenApi = serde_json::from_value(openapi_spec.clone())
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "merged OpenAPI document is invalid");
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title(crate::openapi::API_TITLE)
                            .version("1.0.0")
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Raw JSON for external consumers
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router with the API nested under [`API_PREFIX`]
    pub fn build(self) -> Router {
        let mut router = Router::new()
            .nest(API_PREFIX, self.api)
            .merge(self.router)
            .fallback(unmatched_route);

        // Innermost first: the request id is assigned outside the trace span
        // and copied onto the response inside it.
        if self.request_id {
            router = router.layer(PropagateRequestIdLayer::x_request_id());
        }
        if let Some(timeout) = self.timeout {
            router = router.layer(TimeoutLayer::new(timeout));
        }
        if self.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(false))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }
        if self.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }
        if self.request_id {
            router = router.layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        }

        router
    }
}

async fn unmatched_route(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Request ID generator producing time-ordered UUIDs
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    async fn get_text(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_module_mounting() {
        let module_router = Router::new()
            .route("/", get(|| async { "list" }))
            .route("/{id}", get(|| async { "one" }));

        let router = RouterBuilder::new()
            .mount_module("books", module_router)
            .build();

        assert_eq!(
            get_text(router.clone(), "/api/v1/books").await,
            (StatusCode::OK, "list".to_string())
        );
        assert_eq!(
            get_text(router, "/api/v1/books/7").await,
            (StatusCode::OK, "one".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_mount_path_merges_at_api_root() {
        let module_router = Router::new().route("/token", get(|| async { "token" }));

        let router = RouterBuilder::new().mount_module("", module_router).build();

        assert_eq!(
            get_text(router, "/api/v1/token").await,
            (StatusCode::OK, "token".to_string())
        );
    }

    #[tokio::test]
    async fn test_unmatched_route_returns_error_body() {
        let module_router = Router::new().route("/", get(|| async { "list" }));
        let router = RouterBuilder::new()
            .mount_module("books", module_router)
            .build();

        for uri in ["/nowhere", "/api/v1/nowhere"] {
            let (status, body) = get_text(router.clone(), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            let body: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(body["error"]["code"], "not_found");
        }
    }

    #[tokio::test]
    async fn test_middleware_chain_sets_request_id() {
        let router = RouterBuilder::new()
            .route("/healthz", get(|| async { "ok" }))
            .with_tracing()
            .with_cors()
            .with_request_id()
            .with_timeout(5000)
            .build();

        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response.headers().get("x-request-id").unwrap();
        assert!(Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
    }
}
