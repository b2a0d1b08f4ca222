#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use bookstall_kernel::settings::{DatabaseSettings, Settings};
use bookstall_kernel::InitCtx;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Fresh application over a private in-memory database.
    pub async fn spawn() -> Self {
        let mut settings = Settings::default();
        settings.database = DatabaseSettings::in_memory();
        settings.auth.bcrypt_cost = 4;

        let registry = bookstall_app::registry();
        let pool = bookstall_app::prepare_database(&settings, &registry)
            .await
            .expect("database prepared");

        let ctx = InitCtx {
            settings: &settings,
            db: &pool,
        };
        registry.init_modules(&ctx).await.expect("modules init");
        let router = bookstall_http::build_router(&registry, &ctx);

        Self { router, pool }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.json(Method::GET, uri, None, token).await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        let form = format!("username={}&password={}", email, password);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .expect("valid request");
        self.send(request).await
    }

    /// Register a seller and return its id.
    pub async fn register(&self, first_name: &str, email: &str, password: &str) -> i64 {
        let response = self
            .json(
                Method::POST,
                "/api/v1/seller",
                Some(json!({
                    "first_name": first_name,
                    "last_name": "Tester",
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().expect("seller id")
    }

    /// Register a seller and log in; returns `(id, token)`.
    pub async fn seller_with_token(&self, first_name: &str, email: &str) -> (i64, String) {
        let id = self.register(first_name, email, "secret123").await;
        let response = self.login(email, "secret123").await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        let token = response.body["access_token"]
            .as_str()
            .expect("access token")
            .to_string();
        (id, token)
    }

    pub async fn create_book(&self, token: &str, title: &str, year: i64) -> TestResponse {
        self.json(
            Method::POST,
            "/api/v1/books",
            Some(json!({
                "title": title,
                "author": "Jane Writer",
                "year": year,
                "pages": 320,
            })),
            Some(token),
        )
        .await
    }
}
