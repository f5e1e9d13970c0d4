//! 用户 CRUD 服务入口

use std::sync::Arc;
use tokio::{net::TcpListener, sync::Notify};
use tracing::{debug, error, info, warn};
use user_crud::{
    infrastructure::{config::load_env_file, Logger},
    AppContext, Settings,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 先加载 .env，再读取配置并初始化日志
    let env_file = load_env_file();
    let settings = Settings::from_env();
    Logger::init(&settings.log_filter);

    match env_file {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => debug!("No .env file found, using process environment"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let ctx = AppContext::initialize(settings).await.map_err(|e| {
        error!("Failed to open database connection: {}", e);
        e
    })?;

    let app = ctx.router();
    let listener = TcpListener::bind(("0.0.0.0", ctx.settings.port)).await?;
    info!("Server is running on {}", listener.local_addr()?);

    let shutdown = Arc::new(Notify::new());
    let mut server = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.notified().await })
                .await
        }
    });

    tokio::select! {
        result = &mut server => {
            // 服务器在收到关闭信号前就退出了
            ctx.database.close().await;
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    error!("Server error: {}", e);
                    Err(e.into())
                }
                Err(e) => Err(e.into()),
            };
        }
        _ = shutdown_signal() => {
            info!(
                "Shutdown signal received, waiting up to {:?} for in-flight requests",
                ctx.settings.shutdown_timeout
            );
            shutdown.notify_one();
        }
    }

    match tokio::time::timeout(ctx.settings.shutdown_timeout, &mut server).await {
        Ok(Ok(Ok(()))) => info!("Server stopped"),
        Ok(Ok(Err(e))) => error!("Server error during shutdown: {}", e),
        Ok(Err(e)) => error!("Server task failed: {}", e),
        Err(_) => {
            warn!("Shutdown timed out, aborting in-flight requests");
            server.abort();
        }
    }

    ctx.database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
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
}
