//! REST APIハンドラー
//!
//! axumルーターの構築。公開するのはヘルスチェックの集約/個別
//! エンドポイント、シャットダウントリガー、メトリクス公開のみ。

pub mod health;
pub mod system;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// アプリケーションルーターを構築する
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::aggregate))
        .route("/health/:name", get(health::single))
        .route("/shutdown", post(system::shutdown))
        .route("/metrics", get(system::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
