use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod forms;
mod media;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;
mod views;

use common::database::{DatabaseConfig, init_pool};
use tokio::net::TcpListener;

use crate::{config::ServiceConfig, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting recipes service");

    let config = ServiceConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let bind_address = config.bind_address.clone();
    let app_state = AppState::postgres(config, pool);
    info!(
        "Storing uploaded images under {}",
        app_state.images.root().display()
    );

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Recipes service listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
