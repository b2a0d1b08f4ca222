//! Bookstall application library
//!
//! Wires the seller, book and auth modules into the kernel registry and runs
//! them behind the HTTP facade.

pub mod error;
pub mod extract;
pub mod modules;
pub mod state;

use anyhow::Context;
use sqlx::SqlitePool;

use bookstall_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::register_all;

/// Registry holding every application module
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry);
    registry
}

/// Connect to the configured database and apply pending migrations
pub async fn prepare_database(
    settings: &Settings,
    registry: &ModuleRegistry,
) -> anyhow::Result<SqlitePool> {
    let pool = bookstall_db::connect(&settings.database).await?;
    let applied = bookstall_db::apply_migrations(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "database schema up to date");
    Ok(pool)
}

/// Run the service until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry();
    let pool = prepare_database(&settings, &registry).await?;
    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };

    tracing::info!(modules = registry.len(), "starting bookstall");
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookstall_http::start_server(&registry, &ctx).await;

    registry.stop_modules().await?;
    pool.close().await;
    served
}
