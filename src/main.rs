use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skillscribe::{
    app::create_router,
    app_state::AppState,
    config, db,
    db::repositories::Stores,
    storage::LocalBlobStorage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let env = config::init()?.clone();

    let pool = db::init_pool().await.context("Failed to initialize database")?;
    let stores = Stores::postgres(pool.clone());
    let blobs = Arc::new(LocalBlobStorage::new(&env.app.static_dir, "/static"));

    let state = AppState::new(Some(pool), env.clone(), stores, blobs);
    let app = create_router(state);

    let addr = env.server_addr();
    info!("{} listening on {}", env.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
