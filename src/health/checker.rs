//! チェックの契約とスケジュール定義
//!
//! コアは `Checker` トレイトにのみ依存する。具体的なプローブ手段
//! （S3ダウンロード等）はプラグイン側の責務。

use crate::error::{CheckResult, SetupError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// 名前付きヘルスチェック1単位
///
/// 実装はスレッド間で共有されるため `Send + Sync` を要求する。
/// 失敗時のログ・メトリクス記録はチェック実装自身の責務であり、
/// コア（スケジューラ・実行エンジン）は結果を転送するだけ。
#[async_trait]
pub trait Checker: Send + Sync {
    /// チェック名（構成済みインスタンスごとに一意・不変）
    fn name(&self) -> &str;

    /// プローブを1回実行する
    async fn check(&self) -> CheckResult;
}

/// チェックと実行間隔・タイムアウトの組
///
/// 起動時に構成から作られ、以後変更されない。バックグラウンド
/// スケジューラとアグリゲート実行エンジンが読み取り専用で共有する。
#[derive(Clone)]
pub struct CheckSchedule {
    /// 実行対象のチェック
    pub checker: Arc<dyn Checker>,
    /// バックグラウンド実行の間隔
    pub interval: Duration,
    /// 1回の実行に許すタイムアウト
    pub timeout: Duration,
}

impl CheckSchedule {
    /// 新しいスケジュールを作成
    pub fn new(checker: Arc<dyn Checker>, interval: Duration, timeout: Duration) -> Self {
        Self {
            checker,
            interval,
            timeout,
        }
    }

    /// チェック名へのショートカット
    pub fn name(&self) -> &str {
        self.checker.name()
    }
}

impl std::fmt::Debug for CheckSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckSchedule")
            .field("name", &self.name())
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// 検証済みのスケジュール集合
///
/// チェック名はスナップショットのマップキーになるため、構築時に
/// 重複を拒否する。ゼロ間隔・ゼロタイムアウトも構成ミスとして拒否。
#[derive(Debug, Clone, Default)]
pub struct CheckSet {
    schedules: Vec<CheckSchedule>,
}

impl CheckSet {
    /// スケジュール集合を検証して作成
    pub fn new(schedules: Vec<CheckSchedule>) -> Result<Self, SetupError> {
        let mut seen = HashSet::new();
        for schedule in &schedules {
            let name = schedule.name();
            if !seen.insert(name.to_owned()) {
                return Err(SetupError::DuplicateCheck(name.to_owned()));
            }
            if schedule.interval.is_zero() {
                return Err(SetupError::ZeroInterval(name.to_owned()));
            }
            if schedule.timeout.is_zero() {
                return Err(SetupError::ZeroTimeout(name.to_owned()));
            }
        }
        Ok(Self { schedules })
    }

    /// 全スケジュール
    pub fn schedules(&self) -> &[CheckSchedule] {
        &self.schedules
    }

    /// 名前でスケジュールを引く
    pub fn get(&self, name: &str) -> Option<&CheckSchedule> {
        self.schedules.iter().find(|s| s.name() == name)
    }

    /// 登録チェック数
    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}
