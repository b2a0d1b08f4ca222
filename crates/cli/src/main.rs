//! Operator entrypoint for Bookstall: run the server, apply migrations, or
//! inspect the effective configuration.

use anyhow::Context;
use clap::{Parser, Subcommand};

use bookstall_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "bookstall-cli")]
#[command(about = "Operate a Bookstall seller and book catalogue")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Migrate the database and serve the HTTP API
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Print the effective settings without secrets
    CheckConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Bookstall settings")?;

    match cli.command {
        Command::CheckConfig => {
            print_settings(&settings);
            Ok(())
        }
        Command::Serve => {
            bookstall_telemetry::init(&settings.telemetry)?;
            runtime()?.block_on(bookstall_app::run(settings))
        }
        Command::Migrate => {
            bookstall_telemetry::init(&settings.telemetry)?;
            runtime()?.block_on(migrate(settings))
        }
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")
}

async fn migrate(settings: Settings) -> anyhow::Result<()> {
    let registry = bookstall_app::registry();
    let pool = bookstall_app::prepare_database(&settings, &registry).await?;
    pool.close().await;
    tracing::info!(db = %settings.database.url, "migrations complete");
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("environment = {:?}", settings.environment);
    println!("server.host = {}", settings.server.host);
    println!("server.port = {}", settings.server.port);
    println!("server.request_timeout_ms = {}", settings.server.request_timeout_ms);
    println!("database.url = {}", settings.database.url);
    println!("database.max_connections = {}", settings.database.max_connections);
    println!("telemetry.log_format = {:?}", settings.telemetry.log_format);
    println!("telemetry.filter = {}", settings.telemetry.filter);
    println!(
        "auth.access_token_ttl_minutes = {}",
        settings.auth.access_token_ttl_minutes
    );
    println!("auth.bcrypt_cost = {}", settings.auth.bcrypt_cost);
    println!(
        "auth.jwt_secret = {}",
        if settings.auth.jwt_secret == bookstall_kernel::settings::DEV_JWT_SECRET {
            "<development default>"
        } else {
            "<set>"
        }
    );
}
