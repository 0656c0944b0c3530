//! Health API の Contract Tests
//!
//! 集約/個別エンドポイントのステータスコード・ボディ形状と、
//! シャットダウントリガーの配線を検証する。

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use canaryd::error::{CheckError, CheckResult};
use canaryd::health::{run_checks_forever, CancelHandle, CheckSchedule, CheckSet, Checker};
use canaryd::shutdown::{ShutdownCoordinator, ShutdownReason};
use canaryd::AppState;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct PredictableCheck {
    name: &'static str,
    error: Option<&'static str>,
    delay: Option<Duration>,
}

#[async_trait]
impl Checker for PredictableCheck {
    fn name(&self) -> &str {
        self.name
    }

    async fn check(&self) -> CheckResult {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.error {
            Some(reason) => Err(CheckError::Failed(reason.to_string())),
            None => Ok(()),
        }
    }
}

fn passing(name: &'static str, timeout: Duration) -> CheckSchedule {
    CheckSchedule::new(
        Arc::new(PredictableCheck {
            name,
            error: None,
            delay: None,
        }),
        Duration::from_millis(100),
        timeout,
    )
}

fn failing(name: &'static str, reason: &'static str, timeout: Duration) -> CheckSchedule {
    CheckSchedule::new(
        Arc::new(PredictableCheck {
            name,
            error: Some(reason),
            delay: None,
        }),
        Duration::from_millis(100),
        timeout,
    )
}

fn sleeping(name: &'static str, delay: Duration, timeout: Duration) -> CheckSchedule {
    CheckSchedule::new(
        Arc::new(PredictableCheck {
            name,
            error: None,
            delay: Some(delay),
        }),
        Duration::from_millis(100),
        timeout,
    )
}

/// バックグラウンドスケジューラなしでルーターを組む
fn build_app(schedules: Vec<CheckSchedule>) -> (Router, CancelHandle, ShutdownCoordinator) {
    let checks = CheckSet::new(schedules).expect("valid check set");
    // ハンドラーに注入する停止ハンドルは空集合のループでよい
    let scheduler = run_checks_forever(&CheckSet::default());
    let shutdown = ShutdownCoordinator::new(scheduler.clone());
    let state = AppState {
        checks: Arc::new(checks),
        shutdown: shutdown.clone(),
    };
    (canaryd::api::create_app(state), scheduler, shutdown)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, content_type, json)
}

/// シナリオA: 全チェック成功 → 200、ok=true・error空
#[tokio::test]
async fn aggregate_all_passing_returns_200() {
    let (app, _scheduler, _shutdown) =
        build_app(vec![passing("ok-check", Duration::from_millis(100))]);

    let (status, content_type, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("application/json; charset=utf-8")
    );
    assert_eq!(body["ok-check"]["ok"], true);
    assert_eq!(body["ok-check"]["error"], "");
}

/// シナリオB: 失敗チェック → 503、理由がそのまま載る
#[tokio::test]
async fn aggregate_failing_check_returns_503_with_reason() {
    let (app, _scheduler, _shutdown) =
        build_app(vec![failing("broken", "boom!", Duration::from_millis(100))]);

    let (status, _content_type, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["broken"]["ok"], false);
    assert!(
        body["broken"]["error"].as_str().unwrap().contains("boom!"),
        "error should carry the check's reason: {body}"
    );
}

/// シナリオC: ハングするチェックは最長タイムアウトで打ち切られ、
/// タイムアウト分類で報告される。他のチェックは通常どおり報告される。
#[tokio::test(start_paused = true)]
async fn aggregate_bounds_wait_to_longest_timeout() {
    let (app, _scheduler, _shutdown) = build_app(vec![
        sleeping(
            "slow",
            Duration::from_millis(300),
            Duration::from_millis(100),
        ),
        passing("fast", Duration::from_millis(200)),
    ]);

    let started = tokio::time::Instant::now();
    let (status, _content_type, body) = get(app, "/health").await;
    let elapsed = started.elapsed();

    assert!(
        elapsed < Duration::from_millis(300),
        "response took {elapsed:?}, should be bounded by the 200ms timeout"
    );
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["fast"]["ok"], true);
    assert_eq!(body["slow"]["ok"], false);
    assert_eq!(body["slow"]["error"], "check timed out");
}

/// タイムアウトの理由文字列はチェック自身の失敗と区別できる
#[tokio::test(start_paused = true)]
async fn timeout_reason_is_distinguishable_from_failure_reason() {
    let (app, _scheduler, _shutdown) = build_app(vec![
        sleeping("hung", Duration::from_secs(60), Duration::from_millis(100)),
        failing("denied", "access denied", Duration::from_millis(100)),
    ]);

    let (_status, _content_type, body) = get(app, "/health").await;

    assert_eq!(body["hung"]["error"], "check timed out");
    let denied = body["denied"]["error"].as_str().unwrap();
    assert!(denied.contains("access denied"));
    assert_ne!(denied, "check timed out");
}

/// スナップショットのキー集合は常に入力と一致する（全ハングでも）
#[tokio::test(start_paused = true)]
async fn aggregate_reports_every_configured_check() {
    let (app, _scheduler, _shutdown) = build_app(vec![
        sleeping("hung-a", Duration::from_secs(60), Duration::from_millis(50)),
        sleeping("hung-b", Duration::from_secs(60), Duration::from_millis(50)),
        passing("alive", Duration::from_millis(50)),
    ]);

    let (_status, _content_type, body) = get(app, "/health").await;

    let keys = body.as_object().unwrap().keys().collect::<Vec<_>>();
    assert_eq!(keys.len(), 3);
    assert!(body.get("hung-a").is_some());
    assert!(body.get("hung-b").is_some());
    assert!(body.get("alive").is_some());
}

/// 同じ状態で繰り返し呼んでも構造は同一
#[tokio::test]
async fn aggregate_is_idempotent_in_shape() {
    let (app, _scheduler, _shutdown) = build_app(vec![
        passing("ok-check", Duration::from_millis(100)),
        failing("broken", "boom!", Duration::from_millis(100)),
    ]);

    let (first_status, _, first) = get(app.clone(), "/health").await;
    let (second_status, _, second) = get(app, "/health").await;

    assert_eq!(first_status, second_status);
    assert_eq!(first, second);
}

/// 個別エンドポイント: 成功チェック → 200、名前ラッパーなしの単一オブジェクト
#[tokio::test]
async fn single_check_returns_bare_status_object() {
    let (app, _scheduler, _shutdown) = build_app(vec![
        passing("ok-check", Duration::from_millis(100)),
        failing("broken", "boom!", Duration::from_millis(100)),
    ]);

    let (status, content_type, body) = get(app, "/health/ok-check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("application/json; charset=utf-8")
    );
    assert_eq!(body["ok"], true);
    assert_eq!(body["error"], "");
    assert!(body.get("ok-check").is_none(), "no name wrapper expected");
}

/// 個別エンドポイント: 失敗チェックは503
#[tokio::test]
async fn single_check_failing_returns_503() {
    let (app, _scheduler, _shutdown) = build_app(vec![
        passing("ok-check", Duration::from_millis(100)),
        failing("broken", "boom!", Duration::from_millis(100)),
    ]);

    let (status, _content_type, body) = get(app, "/health/broken").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().contains("boom!"));
}

/// シナリオD: 未構成の名前は404
#[tokio::test]
async fn single_check_unknown_name_returns_404() {
    let (app, _scheduler, _shutdown) =
        build_app(vec![passing("ok-check", Duration::from_millis(100))]);

    let (status, content_type, body) = get(app, "/health/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        content_type.as_deref(),
        Some("application/json; charset=utf-8")
    );
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

/// 慢性的なタイムアウト下でも集約呼び出しは毎回完了する
#[tokio::test(start_paused = true)]
async fn repeated_calls_with_hung_check_always_complete() {
    let (app, _scheduler, _shutdown) = build_app(vec![sleeping(
        "hung",
        Duration::from_secs(3600),
        Duration::from_millis(50),
    )]);

    for _ in 0..5 {
        let (status, _content_type, body) = get(app.clone(), "/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["hung"]["error"], "check timed out");
    }
}

/// POST /shutdown はスケジューラ停止とシャットダウン開始を一括で起こす
#[tokio::test]
async fn shutdown_endpoint_cancels_schedulers_and_begins_shutdown() {
    let (app, scheduler, shutdown) =
        build_app(vec![passing("ok-check", Duration::from_millis(100))]);

    assert!(!scheduler.is_cancelled());
    assert!(!shutdown.is_shutting_down());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/shutdown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(scheduler.is_cancelled());
    assert_eq!(shutdown.reason(), Some(ShutdownReason::HttpRequest));
}

/// GET /metrics はPrometheusテキスト形式を返す
#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_text() {
    let (app, _scheduler, _shutdown) =
        build_app(vec![passing("ok-check", Duration::from_millis(100))]);

    canaryd::metrics::record_success("contract-metrics");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("canaryd_check_up"));
}
