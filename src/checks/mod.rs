//! チェックプラグイン
//!
//! `crate::health::Checker` を実装する具体的なプローブ群。
//! コアはここへの依存を持たない（`main.rs`の配線でのみ結合する）。

pub mod s3;

pub use s3::S3Check;
