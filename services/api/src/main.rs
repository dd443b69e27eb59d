use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod dto;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;

use auth::jwt::{JwtConfig, JwtService};
use common::database::{DatabaseConfig, init_pool};
use common::error::DatabaseError;

use crate::repositories::{MediaGroupRepository, MediaItemRepository};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Database migrations applied");

    // The JWT service is built once and injected through application state
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(&jwt_config);

    // Initialize repositories
    let media_item_repository = MediaItemRepository::new(pool.clone());
    let media_group_repository = MediaGroupRepository::new(pool);

    let app_state = AppState {
        media_item_repository,
        media_group_repository,
        jwt_service,
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
    info!("API service listening on 0.0.0.0:3001");

    axum::serve(listener, app).await?;

    Ok(())
}
