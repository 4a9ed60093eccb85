use anyhow::Result;
use dian_edi::{create_app_router, state::AppState};
use shared::Config;
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
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
                warn!("failed to install signal handler: {}", e);
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

    info!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Carga las variables de entorno desde el archivo .env. Falla silenciosamente si no existe.
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Configura el subscriber de tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(&config.app.log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if config.company.api_key.is_none() {
        warn!("⚠️ DIAN_API_KEY not set. Submissions will fail until a token is configured.");
    }
    info!(
        "🧾 DIAN API at {} ({})",
        config.company.api_url,
        if config.company.is_not_test { "producción" } else { "habilitación" }
    );

    let port = config.app.port;
    let app_state = AppState::new(config)?;
    info!("🚀 Application state initialized");

    // Crea el router de la aplicación
    let app = create_app_router(Arc::new(app_state));

    // Inicia el servidor
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
