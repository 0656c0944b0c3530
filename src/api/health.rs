//! ヘルスチェックエンドポイント
//!
//! リクエストごとにアグリゲート実行エンジンを同期的に呼び出し、
//! スナップショットを固定のJSON形に整形する。ステータスコードは
//! 全成功なら200、1つでも失敗/タイムアウトなら503。シリアライズ
//! 失敗のみ500（本文は素のエラー文字列）。

use crate::error::{CheckError, CheckResult};
use crate::health::{run_checks, CheckSnapshot};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// 全レスポンスに付ける固定Content-Type
const CONTENT_TYPE_JSON_UTF8: &str = "application/json; charset=utf-8";

/// 1チェックのワイヤ表現
///
/// `error` は `ok` がfalseのときのみ非空。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckStatus {
    /// 直近の実行が成功したか
    pub ok: bool,
    /// 失敗理由（成功時は空文字列）
    pub error: String,
}

impl From<&CheckResult> for CheckStatus {
    fn from(result: &CheckResult) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                error: String::new(),
            },
            Err(err) => Self {
                ok: false,
                error: err.to_string(),
            },
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, payload: &T) -> Response {
    match serde_json::to_vec(payload) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, CONTENT_TYPE_JSON_UTF8)],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

fn overall_status(snapshot: &CheckSnapshot) -> StatusCode {
    if snapshot.values().all(|result| result.is_ok()) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health — 構成済み全チェックの集約実行
pub async fn aggregate(State(state): State<AppState>) -> Response {
    let snapshot = run_checks(state.checks.schedules(), &CancellationToken::new()).await;
    let statuses: BTreeMap<&String, CheckStatus> = snapshot
        .iter()
        .map(|(name, result)| (name, CheckStatus::from(result)))
        .collect();
    json_response(overall_status(&snapshot), &statuses)
}

/// GET /health/:name — 指定チェック1件の実行
///
/// 未構成の名前は404（本文はJSONのエラーオブジェクト）。
pub async fn single(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let Some(schedule) = state.checks.get(&name) else {
        return json_response(
            StatusCode::NOT_FOUND,
            &serde_json::json!({ "error": format!("unknown check: {name}") }),
        );
    };

    let mut snapshot = run_checks(std::slice::from_ref(schedule), &CancellationToken::new()).await;
    let status = overall_status(&snapshot);
    let result = snapshot.remove(&name).unwrap_or(Err(CheckError::TimedOut));
    json_response(status, &CheckStatus::from(&result))
}
