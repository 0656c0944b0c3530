//! チェックごとのバックグラウンドスケジューラ
//!
//! スケジュールごとに独立したタイマーループを1本起動し、tickごとに
//! チェックの実行を切り離して（detached）spawnする。遅いチェックが
//! 次のtickを遅らせることはない。その代償として同一チェックの実行が
//! 重なり得るが、これは意図した設計であり維持する。

use crate::health::checker::{CheckSchedule, CheckSet};
use std::sync::Arc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// 稼働中のスケジューラループを止めるためのハンドル
///
/// `cancel` は何度呼んでも安全（冪等）。キャンセル後、ループは
/// タイマーを解放して終了するが、実行中の切り離された呼び出しは
/// 自然に完了するまで走り続ける。
#[derive(Clone, Debug)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// 配下の全スケジューラループを停止する
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// すでにキャンセル済みかどうか
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// 1スケジュールのループ本体
async fn schedule_loop(schedule: CheckSchedule, cancel: CancellationToken) {
    let mut timer = interval(schedule.interval);
    // interval() は最初のtickを即時に返す。初回実行は1間隔後に
    // 揃えたいので読み捨てる。
    timer.tick().await;

    info!(
        check = schedule.name(),
        interval_ms = schedule.interval.as_millis() as u64,
        "check scheduler started"
    );

    loop {
        tokio::select! {
            _ = timer.tick() => {
                let checker = Arc::clone(&schedule.checker);
                // tickごとに切り離して実行する。結果はここでは扱わない:
                // 失敗のログ・メトリクス記録はチェック実装自身の責務。
                tokio::spawn(async move {
                    let _ = checker.check().await;
                });
            }
            _ = cancel.cancelled() => {
                debug!(check = schedule.name(), "check scheduler stopped");
                break;
            }
        }
    }
}

/// 1つのチェックを間隔ごとに永久に実行する
pub fn run_check_forever(schedule: CheckSchedule) -> CancelHandle {
    let token = CancellationToken::new();
    tokio::spawn(schedule_loop(schedule, token.clone()));
    CancelHandle { token }
}

/// 集合内の全チェックをそれぞれの間隔で永久に実行する
///
/// 返るハンドル1つで全ループをまとめて停止できる。
pub fn run_checks_forever(set: &CheckSet) -> CancelHandle {
    let token = CancellationToken::new();
    for schedule in set.schedules() {
        tokio::spawn(schedule_loop(schedule.clone(), token.child_token()));
    }
    CancelHandle { token }
}
