use anyhow::Context;
use std::sync::Arc;

use crate::module::{InitCtx, Migration, Module};

/// Module registry that drives the module lifecycle in registration order
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module. Modules another module depends on must come first.
    pub fn register(&mut self, module: Arc<dyn Module>) {
        tracing::debug!(module = module.name(), "registering module");
        self.modules.push(module);
    }

    /// Get all registered modules in registration order
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Initialize modules in registration order
    pub async fn init_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("initializing {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "initializing module");

            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Start modules in registration order
    pub async fn start_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        for module in &self.modules {
            tracing::info!(module = module.name(), "starting module");

            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Stop modules in reverse registration order
    pub async fn stop_modules(&self) -> anyhow::Result<()> {
        tracing::info!("stopping {} modules", self.modules.len());

        for module in self.modules.iter().rev() {
            tracing::info!(module = module.name(), "stopping module");

            module
                .stop()
                .await
                .with_context(|| format!("failed to stop module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Collect all migrations, grouped by module in registration order and
    /// sorted by id within each module.
    pub fn collect_migrations(&self) -> Vec<(String, Migration)> {
        let mut migrations = Vec::new();

        for module in &self.modules {
            let mut own = module.migrations();
            own.sort_by(|a, b| a.id.cmp(b.id));
            migrations.extend(own.into_iter().map(|m| (module.name().to_string(), m)));
        }

        migrations
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::sync::Mutex;

    struct TestModule {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl Module for TestModule {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("init:{}", self.name));
            Ok(())
        }

        async fn stop(&self) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("stop:{}", self.name));
            Ok(())
        }

        fn migrations(&self) -> Vec<Migration> {
            vec![
                Migration {
                    id: "002_index",
                    up: "CREATE INDEX test_idx ON test(id);",
                },
                Migration {
                    id: "001_init",
                    up: "CREATE TABLE test (id INTEGER);",
                },
            ]
        }
    }

    fn module(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Module> {
        Arc::new(TestModule {
            name,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn test_module_registry_creation() {
        let registry = ModuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.collect_migrations().is_empty());
    }

    #[test]
    fn test_migrations_keep_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register(module("zeta", &log));
        registry.register(module("alpha", &log));

        let order: Vec<(String, &str)> = registry
            .collect_migrations()
            .into_iter()
            .map(|(name, m)| (name, m.id))
            .collect();

        assert_eq!(
            order,
            vec![
                ("zeta".to_string(), "001_init"),
                ("zeta".to_string(), "002_index"),
                ("alpha".to_string(), "001_init"),
                ("alpha".to_string(), "002_index"),
            ]
        );
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_module_lifecycle() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register(module("first", &log));
        registry.register(module("second", &log));

        let settings = Settings::default();
        let pool = sqlx::SqlitePool::connect_lazy("sqlite::memory:").unwrap();
        let ctx = InitCtx {
            settings: &settings,
            db: &pool,
        };

        registry.init_modules(&ctx).await.unwrap();
        registry.start_modules(&ctx).await.unwrap();
        registry.stop_modules().await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["init:first", "init:second", "stop:second", "stop:first"]
        );
    }
}
