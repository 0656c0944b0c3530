//! アグリゲート実行エンジン（fan-out / fan-in）
//!
//! 渡された全スケジュールのチェックを同時に起動し、共有期限
//! （集合内で最長のタイムアウト）までに届いた結果を集約する。
//! 期限までに完了しなかったチェックは省略せず、タイムアウト失敗
//! としてスナップショットに必ず載せる。

use crate::error::{CheckError, CheckResult};
use crate::health::checker::CheckSchedule;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// 1回のアグリゲート実行の結果: チェック名 → 結果
///
/// キー集合は入力スケジュールの名前集合と常に一致する。
/// リクエストごとに作られ、シリアライズ後は破棄される。
pub type CheckSnapshot = BTreeMap<String, CheckResult>;

fn longest_timeout(schedules: &[CheckSchedule]) -> Duration {
    schedules
        .iter()
        .map(|s| s.timeout)
        .max()
        .unwrap_or(Duration::ZERO)
}

/// 全スケジュールのチェックを同時実行し、スナップショットを返す
///
/// 次のいずれか早い方で復帰する:
/// - 全チェックの完了
/// - 共有期限（最長タイムアウト）の経過
/// - `cancel` の外部キャンセル（リクエスト中断など）
///
/// 未完了のチェックは強制終了しない。待つのをやめるだけで、切り離された
/// 呼び出しは自然完了まで走る（1リクエストあたり高々スケジュール数）。
/// リトライはしない: 1スケジュールにつき1呼び出し。エンジン自身は
/// テレメトリを出さない。
pub async fn run_checks(schedules: &[CheckSchedule], cancel: &CancellationToken) -> CheckSnapshot {
    let (tx, mut rx) = mpsc::channel::<(String, CheckResult)>(schedules.len().max(1));
    for schedule in schedules {
        let checker = Arc::clone(&schedule.checker);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = checker.check().await;
            // 期限後は受信側が閉じているので送信失敗は無視する
            let _ = tx.send((checker.name().to_owned(), outcome)).await;
        });
    }
    drop(tx);

    let mut results = CheckSnapshot::new();
    let deadline = tokio::time::sleep(longest_timeout(schedules));
    tokio::pin!(deadline);

    while results.len() < schedules.len() {
        tokio::select! {
            received = rx.recv() => match received {
                Some((name, outcome)) => {
                    results.insert(name, outcome);
                }
                None => break,
            },
            _ = &mut deadline => break,
            _ = cancel.cancelled() => break,
        }
    }

    // 期限・キャンセルまでに届かなかった分はタイムアウト失敗で埋める
    for schedule in schedules {
        results
            .entry(schedule.name().to_owned())
            .or_insert(Err(CheckError::TimedOut));
    }
    results
}
