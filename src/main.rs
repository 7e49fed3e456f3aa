use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;

use sse_bridge::{config::Config, create_app, logging::init_logging, AppState, SessionRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded_dotenv = dotenv().is_ok();

    let config = Config::from_env()?;
    init_logging(&config)?;

    if loaded_dotenv {
        info!("✅ Loaded .env file");
    }
    config.log_summary();

    let app_state = AppState::new(config.clone());
    let sessions = Arc::clone(&app_state.sessions);
    let app = create_app(app_state)?;

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;

    info!("🚀 Server started successfully on {}", config.bind_address());
    info!("📡 Event stream: http://{}/sse", config.bind_address());
    info!("📊 Health check: http://{}/health", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sessions))
        .await?;

    info!("👋 Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM after closing every open session, so the
/// event streams finish and the graceful shutdown can complete.
async fn shutdown_signal(sessions: Arc<SessionRegistry>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("❌ Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("❌ Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
    sessions.close_all();
}
