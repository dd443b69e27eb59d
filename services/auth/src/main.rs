use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use auth::{
    AppState,
    jwt::{JwtConfig, JwtService},
    routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting authentication service");

    // The JWT service is built once and injected through application state
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(&jwt_config);

    let app_state = AppState { jwt_service };

    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Authentication service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
