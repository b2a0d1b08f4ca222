use anyhow::Context;
use bookstall_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookstall settings")?;
    bookstall_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookstall bootstrap starting"
    );

    bookstall_app::run(settings).await
}
