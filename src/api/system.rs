//! 運用エンドポイント（シャットダウン・メトリクス公開）

use crate::shutdown::ShutdownReason;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::info;

/// POST /shutdown — シャットダウンを開始する
///
/// 調整役の `begin()` がチェックスケジューラの停止とプロセス終了を
/// まとめて引き起こす。破壊的かつ復帰不能。応答は202を返すが、
/// プロセスは直後にドレインへ入るため本文は保証されない。
pub async fn shutdown(State(state): State<AppState>) -> StatusCode {
    info!("shutdown requested via HTTP");
    state.shutdown.begin(ShutdownReason::HttpRequest);
    StatusCode::ACCEPTED
}

/// GET /metrics — Prometheusテキスト形式でチェックテレメトリを公開
pub async fn metrics() -> Response {
    match crate::metrics::gather() {
        Ok((format, body)) => ([(header::CONTENT_TYPE, format)], body).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
