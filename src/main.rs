use std::net::SocketAddr;
use std::time::Duration;

use internship_portal_backend::{
    build_app,
    config::Config,
    database::{
        bootstrap::ensure_default_admin,
        pool::{create_pool, run_migrations},
    },
    services::mailer::Mailer,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;
    ensure_default_admin(&pool, &config).await?;

    let mailer = Mailer::from_config(&config)?;
    let address = config.server_address.clone();
    let app_state = AppState::new(pool.clone(), config, mailer);

    {
        let notifications = app_state.notification_service.clone();
        tokio::spawn(async move {
            loop {
                match notifications.run_once().await {
                    Ok(true) => {}
                    Ok(false) => {
                        tokio::time::sleep(Duration::from_millis(1000)).await;
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, "email outbox worker error");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        });
    }

    let app = build_app(app_state);
    let listener = TcpListener::bind(&address).await?;
    info!("Server is running on {}", address);
    info!("Health check: http://{}/api/health", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received, shutting down gracefully");
}
