use pollchat::{app, config::Config, store::MessageStore, AppState};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store = MessageStore::connect(&config.database.url, config.database.max_connections).await?;
    store.migrate().await?;

    let app_state = AppState::new(&config, store.clone());
    let app = app(app_state, config.server.cors_origin.as_deref())?;

    let listener = TcpListener::bind(config.server.bind).await?;
    info!(addr = %config.server.bind, title = %config.chat.title, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(?e, "failed to install Ctrl+C handler");
    }
    info!("shutting down");
}
