//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! チェック実行時のエラー（`CheckError`）と起動時の構成エラー
//! （`SetupError`）を分離する。`CheckError::TimedOut` はアグリゲート
//! 実行エンジンが期限超過と判定した場合にのみ使われ、チェック自身の
//! 失敗理由とは文字列レベルで区別できる。

use thiserror::Error;

/// 1回のチェック実行が失敗したときのエラー
#[derive(Debug, Error)]
pub enum CheckError {
    /// チェックが共有期限内に応答しなかった（実行エンジンが付与する）
    #[error("check timed out")]
    TimedOut,

    /// チェック自身が失敗と判定した（理由はそのまま公開される）
    #[error("{0}")]
    Failed(String),

    /// プローブのHTTPリクエストが失敗した
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl CheckError {
    /// Returns true if this error is the runner's timeout classification
    /// rather than a failure reported by the check itself.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// 起動時のチェック構成エラー
///
/// セットアップでのみ発生し、起動後は発生しない。
#[derive(Debug, Error)]
pub enum SetupError {
    /// 同名のチェックが複数登録された（スナップショットのキー衝突を防ぐ）
    #[error("duplicate check name: {0}")]
    DuplicateCheck(String),

    /// 実行間隔がゼロ
    #[error("check {0} has a zero interval")]
    ZeroInterval(String),

    /// タイムアウトがゼロ
    #[error("check {0} has a zero timeout")]
    ZeroTimeout(String),

    /// HTTPクライアントの構築に失敗した
    #[error("cannot create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Result type alias (check execution)
pub type CheckResult = Result<(), CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_out_display() {
        assert_eq!(CheckError::TimedOut.to_string(), "check timed out");
        assert!(CheckError::TimedOut.is_timeout());
    }

    #[test]
    fn test_failed_display_is_verbatim() {
        let error = CheckError::Failed("boom!".to_string());
        assert_eq!(error.to_string(), "boom!");
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_setup_error_display() {
        let error = SetupError::DuplicateCheck("s3".to_string());
        assert_eq!(error.to_string(), "duplicate check name: s3");
    }
}
