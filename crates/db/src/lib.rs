//! SQLite pool factory and migration runner.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use bookstall_kernel::settings::DatabaseSettings;
use bookstall_kernel::Migration;

const MIGRATIONS_TABLE: &str = "_bookstall_migrations";

/// Open a connection pool for the configured database.
///
/// Foreign keys are enforced on every connection. In-memory databases live
/// only as long as their connection, so they are pinned to a single
/// connection that is never recycled.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if settings.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(settings.max_connections.max(1))
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to '{}'", settings.url))?;

    tracing::info!(target: "bookstall-db", url = %settings.url, "database pool ready");
    Ok(pool)
}

/// Apply every migration that has not been recorded yet, each in its own
/// transaction. Returns the number of migrations applied.
pub async fn apply_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    sqlx::raw_sql(&format!(
        "CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (
            module     TEXT NOT NULL,
            id         TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (module, id)
        )"
    ))
    .execute(pool)
    .await
    .context("failed to create migrations table")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let seen: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT 1 FROM {MIGRATIONS_TABLE} WHERE module = ? AND id = ?"
        ))
        .bind(module)
        .bind(migration.id)
        .fetch_optional(pool)
        .await?;

        if seen.is_some() {
            tracing::debug!(target: "bookstall-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        sqlx::query(&format!(
            "INSERT INTO {MIGRATIONS_TABLE} (module, id) VALUES (?, ?)"
        ))
        .bind(module)
        .bind(migration.id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(target: "bookstall-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
