use anyhow::Context;

use formgate::config::AppConfig;
use formgate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SMTP_*, ADMIN_API_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting formgate in {:?} mode", config.environment);

    std::fs::create_dir_all(&config.upload.dir).with_context(|| {
        format!("failed to create upload dir {}", config.upload.dir.display())
    })?;

    let port = config.port;
    let state = AppState::new(config)?;

    // Probe the SMTP transport at startup. A failure is logged, not fatal:
    // the store-backed routes keep working without mail.
    match state.mailer.verify().await {
        Ok(()) => tracing::info!("SMTP transport verified"),
        Err(e) => tracing::warn!("SMTP verification failed: {}", e),
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("formgate listening on http://{}", bind_addr);

    axum::serve(listener, formgate::app(state))
        .await
        .context("server error")?;

    Ok(())
}
