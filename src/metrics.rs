//! チェックテレメトリ（Prometheus）
//!
//! 個々のチェック実装が自分の成否を記録するためのカウンター/ゲージ。
//! コアエンジン（スケジューラ・アグリゲート実行）はここに一切書き込まない。

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter_vec, register_int_gauge_vec, Encoder, IntCounterVec, IntGaugeVec,
    TextEncoder,
};

/// 直近のチェック結果（1 = 成功, 0 = 失敗）
pub static CHECK_UP: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "canaryd_check_up",
        "Whether the last run of the check succeeded (1) or failed (0).",
        &["check"]
    )
    .expect("failed to register canaryd_check_up")
});

/// チェック実行回数（outcome = success | failure）
pub static CHECK_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "canaryd_check_runs_total",
        "Number of check runs by outcome.",
        &["check", "outcome"]
    )
    .expect("failed to register canaryd_check_runs_total")
});

/// チェック成功を記録する
pub fn record_success(check: &str) {
    CHECK_UP.with_label_values(&[check]).set(1);
    CHECK_RUNS.with_label_values(&[check, "success"]).inc();
}

/// チェック失敗を記録する
pub fn record_failure(check: &str) {
    CHECK_UP.with_label_values(&[check]).set(0);
    CHECK_RUNS.with_label_values(&[check, "failure"]).inc();
}

/// 既定レジストリをPrometheusテキスト形式にエンコードする
pub fn gather() -> Result<(String, Vec<u8>), prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok((encoder.format_type().to_string(), buffer))
}
