use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use coalition_api::config::AppConfig;
use coalition_api::notifier::{Notifier, OutboxNotifier, TracingNotifier};
use coalition_api::rasterizer::{HtmlRasterizer, Rasterizer};
use coalition_api::rasterizer_command::CommandRasterizer;
use coalition_api::state::AppState;
use coalition_api::store_pg::PgEvaluationStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    // --- Postgres ---
    let pg_pool = PgPool::connect(&cfg.database_url)
        .await
        .context("Failed to connect to Postgres")?;

    sqlx::migrate!("./migrations")
        .run(&pg_pool)
        .await
        .context("Failed to run migrations")?;

    check_postgres(&pg_pool).await?;
    info!("postgres: ok");

    // --- Rasterizer ---
    let rasterizer: Arc<dyn Rasterizer> = match &cfg.rasterizer_cmd {
        Some(cmd) => Arc::new(CommandRasterizer::from_template(cmd)?),
        None => Arc::new(HtmlRasterizer),
    };
    let info = rasterizer.info();
    info!(rasterizer=%info.name, content_type=%info.content_type, "rasterizer: configured");

    // --- Notifications ---
    let notifier: Arc<dyn Notifier> = match (&cfg.webhook_url, &cfg.webhook_secret) {
        (Some(url), Some(secret)) => {
            tokio::spawn(coalition_api::webhooks::run_notification_dispatcher(
                pg_pool.clone(),
                url.clone(),
                secret.clone(),
            ));
            Arc::new(OutboxNotifier::new(pg_pool.clone()))
        }
        _ => {
            info!("notification_dispatcher: disabled (no NOTIFY_WEBHOOK_URL)");
            Arc::new(TracingNotifier)
        }
    };

    let settings = cfg.report_settings();
    info!(
        role=%settings.filter.role,
        leader_type=?settings.filter.leader_type,
        page_size=%settings.context.page.size,
        "report scope"
    );

    let store = Arc::new(PgEvaluationStore::new(pg_pool));
    let app_state = Arc::new(AppState::new(store, rasterizer, notifier, settings));
    let app = coalition_api::router(app_state);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("coalition-api listening on http://{addr}");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

async fn check_postgres(pg_pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pg_pool)
        .await
        .context("Postgres ping failed")?;
    Ok(())
}
