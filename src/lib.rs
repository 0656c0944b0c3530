//! canaryd
//!
//! 依存サービスのヘルスチェックを独立したスケジュールで定期実行し、
//! 集約結果と個別結果をHTTPで公開するアグリゲーター

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// チェックプラグイン（S3到達性チェック等）
pub mod checks;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// エラー型定義
pub mod error;

/// ヘルスチェックのコアエンジン
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// チェックテレメトリ（Prometheus）
pub mod metrics;

/// サーバー起動・シャットダウンハンドリング
pub mod server;

/// Shutdown coordination (HTTP- and signal-triggered termination)
pub mod shutdown;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// 構成済みチェックの集合（起動後は読み取り専用）
    pub checks: Arc<health::CheckSet>,
    /// シャットダウン調整役（スケジューラ停止ハンドルを内包する）
    pub shutdown: shutdown::ShutdownCoordinator,
}
