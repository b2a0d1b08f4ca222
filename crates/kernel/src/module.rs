use async_trait::async_trait;
use axum::Router;
use sqlx::SqlitePool;

/// Context provided to modules during initialization and route construction
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a SqlitePool,
}

/// Migration definition for modules
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Core module trait that all Bookstall modules must implement
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Path segment the module's router is mounted under, relative to the API root.
    /// An empty string merges the routes directly into the API root.
    fn mount_path(&self) -> &'static str {
        self.name()
    }

    /// Initialize the module with the provided context
    /// Called during application startup after migrations
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes, with state already applied
    fn routes(&self, _ctx: &InitCtx<'_>) -> Router {
        Router::new()
    }

    /// Return OpenAPI specification fragment for this module as JSON
    /// Paths are relative to the module's mount path
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Return migrations contributed by this module
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Start background tasks for this module
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources
    /// Called during application shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
