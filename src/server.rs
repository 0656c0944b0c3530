//! axumサーバー起動・シャットダウンハンドリング

use crate::config;
use crate::shutdown::{ShutdownCoordinator, ShutdownReason};
use crate::AppState;
use tracing::{info, warn};

/// axumサーバーを起動し、シャットダウン開始まで稼働する
pub async fn run(state: AppState, bind_addr: &str) {
    let shutdown = state.shutdown.clone();

    let app = crate::api::create_app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind to address");

    info!("canaryd listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .expect("Server error");

    info!("Server shutdown complete");
}

async fn interrupt() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for Ctrl+C");
}

#[cfg(unix)]
async fn terminate() {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("failed to listen for SIGTERM")
        .recv()
        .await;
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await
}

/// シャットダウン開始を待つ
///
/// OSシグナルとHTTP経由の要求を一つの理由に解決し、`begin()` に集約する
/// （チェックスケジューラの停止もその中で起きる）。復帰後、処理中の
/// レスポンスには猶予時間を与え、超過したら強制終了する。
async fn wait_for_shutdown(shutdown: ShutdownCoordinator) {
    let reason = tokio::select! {
        _ = interrupt() => ShutdownReason::Interrupt,
        _ = terminate() => ShutdownReason::Terminate,
        _ = shutdown.begun() => shutdown.reason().unwrap_or(ShutdownReason::HttpRequest),
    };
    shutdown.begin(reason);

    info!(
        reason = reason.as_str(),
        "shutdown began, draining in-flight requests"
    );

    let grace = config::shutdown_grace_period();
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        warn!("grace period of {:?} elapsed, exiting", grace);
        std::process::exit(1);
    });
}
