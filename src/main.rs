//! Service entry point: config, database bootstrap, router, serve.

use registrar::{ensure_database_exists, ensure_tables, router, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("registrar=info".parse()?))
        .init();

    let config = AppConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    ensure_tables(&pool).await?;

    let app = router(AppState { pool });
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
