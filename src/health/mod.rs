//! ヘルスチェックのコアエンジン
//!
//! チェックの契約（`Checker`）、スケジュール定義、チェックごとの
//! バックグラウンドスケジューラ、アグリゲート実行エンジンを提供する。
//! 個々のプローブの中身はプラグイン側（`crate::checks`）の責務。

pub mod checker;
pub mod runner;
pub mod scheduler;

pub use checker::{CheckSchedule, CheckSet, Checker};
pub use runner::{run_checks, CheckSnapshot};
pub use scheduler::{run_check_forever, run_checks_forever, CancelHandle};
