use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c};

/// Resolves once the process is asked to stop
pub async fn shutdown_signal() {
    wait_for_signal().await;
    info!("Stopping availability server");
}

/// Wait forever; used when a handler cannot be installed
async fn never(what: &str, e: std::io::Error) {
    error!("Failed to create {} signal handler: {}", what, e);
    std::future::pending::<()>().await
}

/// Platform-specific signal handling implementation
#[cfg(unix)]
async fn wait_for_signal() {
    // Handle SIGTERM (sent by container runtimes when stopping)
    let sigterm = async {
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => never("SIGTERM", e).await,
        }
    };
    // Handle SIGINT (Ctrl+C)
    let sigint = async {
        match signal(SignalKind::interrupt()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => never("SIGINT", e).await,
        }
    };

    tokio::select! {
        _ = sigterm => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        }
        _ = sigint => {
            info!("Received SIGINT signal, initiating graceful shutdown");
        }
    }
}

/// Platform-specific signal handling implementation
#[cfg(windows)]
async fn wait_for_signal() {
    // Handle Ctrl+C
    let ctrlc = async {
        match ctrl_c() {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => never("Ctrl+C", e).await,
        }
    };
    // Handle Ctrl+Break
    let ctrlbreak = async {
        match ctrl_break() {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => never("Ctrl+Break", e).await,
        }
    };

    tokio::select! {
        _ = ctrlc => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        }
        _ = ctrlbreak => {
            info!("Received Ctrl+Break signal, initiating graceful shutdown");
        }
    }
}
