mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use harvest_api::AppStateInner;
use harvest_api::credentials::CredentialStore;
use harvest_chat::ChatProxy;
use harvest_db::Database;
use harvest_pages::PageAssembler;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "harvest=debug,harvest_api=debug,harvest_db=info,harvest_chat=debug,tower_http=debug"
                    .into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Arc::new(Database::open(&config.db_path)?);

    let session_ttl = chrono::Duration::try_hours(config.session_hours)
        .context("HARVEST_SESSION_HOURS is out of range")?;

    // Shared state
    let state = Arc::new(AppStateInner {
        credentials: CredentialStore::new(db)?,
        pages: PageAssembler::load(&config.template_dir),
        chat: ChatProxy::new(config.chat.clone())?,
        jwt_secret: config.jwt_secret.clone(),
        session_ttl,
    });

    let app = harvest_api::router(state, &config.static_dir)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Harvest portal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
