//! HTTP server facade for Bookstall with Axum, error handling, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Router};

use bookstall_kernel::{InitCtx, ModuleRegistry};

pub mod error;
pub mod openapi;
pub mod router;

pub use error::AppError;
use router::RouterBuilder;

/// Start the HTTP server and serve until Ctrl-C or SIGTERM
pub async fn start_server(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
    let server = &ctx.settings.server;
    let app = build_router(registry, ctx);

    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port))
        .await
        .with_context(|| format!("failed to bind to {}:{}", server.host, server.port))?;

    tracing::info!(
        "HTTP server listening on http://{}",
        listener.local_addr().context("listener has no local address")?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted under `/api/v1`
pub fn build_router(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> Router {
    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(ctx.settings.server.request_timeout_ms)
        .route("/healthz", get(health_check));

    if registry.is_empty() {
        tracing::warn!("no modules registered; serving health and docs only");
    }

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under {}/{}",
            router::API_PREFIX,
            module.mount_path()
        );
        router_builder = router_builder.mount_module(module.mount_path(), module.routes(ctx));
    }

    router_builder.with_openapi(registry).build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
