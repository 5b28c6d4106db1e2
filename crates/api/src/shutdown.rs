use tokio::signal;

/// Resolve when the process is asked to stop (Ctrl+C, SIGTERM).
///
/// Used as the graceful-shutdown trigger: in-flight requests finish, new
/// connections are refused.
pub async fn wait_for_shutdown() {
    tokio::select! {
        () = wait_ctrl_c() => {},
        () = wait_sigterm() => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}

async fn wait_ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(%e, "error handling Ctrl+C signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn wait_sigterm() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut handler) => {
            handler.recv().await;
        }
        Err(e) => {
            tracing::error!(%e, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_sigterm() {
    std::future::pending::<()>().await
}
