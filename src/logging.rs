//! ロギング初期化ユーティリティ
//!
//! tracing-subscriberを`CANARYD_LOG_LEVEL`（未設定時は`RUST_LOG`、
//! どちらも無ければ`info`）で初期化する。

use tracing_subscriber::EnvFilter;

/// グローバルのtracingサブスクライバを初期化する
///
/// 2回目以降の呼び出しはエラーを返す（テストから複数回呼ばれても
/// パニックさせないため）。
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = if let Ok(level) = std::env::var("CANARYD_LOG_LEVEL") {
        EnvFilter::try_new(level)?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()?;
    Ok(())
}
