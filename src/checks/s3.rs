//! S3到達性チェック
//!
//! 構成されたオブジェクトを `GET {endpoint}/{bucket}/{key}` で
//! ダウンロードできるかを確認する。結果のログとメトリクス記録は
//! このチェック自身が行う（コアは行わない）。

use crate::config;
use crate::error::{CheckError, CheckResult, SetupError};
use crate::health::Checker;
use crate::metrics;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const ENV_BUCKET: &str = "BUCKET";
const ENV_KEY: &str = "KEY";
const ENV_ENDPOINT: &str = "ENDPOINT";

const DEFAULT_BUCKET: &str = "canaryd";
const DEFAULT_KEY: &str = "check";
const DEFAULT_ENDPOINT: &str = "https://s3.us-east-1.amazonaws.com";

/// HTTPクライアント自体の安全弁。実行期限の本体はアグリゲート実行
/// エンジン側のタイムアウトで、これはハングしたコネクションが
/// バックグラウンド実行で残り続けないための上限。
const CLIENT_TIMEOUT_SECS: u64 = 10;

/// S3オブジェクトのダウンロード可否を確認するチェック
///
/// `CANARYD_<NAME>_BUCKET` / `_KEY` / `_ENDPOINT` で自己構成する。
pub struct S3Check {
    name: String,
    client: Client,
    endpoint: String,
    bucket: String,
    key: String,
}

impl S3Check {
    /// 環境変数から構成してチェックを作成
    pub fn new(name: &str) -> Result<Self, SetupError> {
        let cfg = config::check_config_from_env(
            name,
            &[
                (ENV_BUCKET, DEFAULT_BUCKET),
                (ENV_KEY, DEFAULT_KEY),
                (ENV_ENDPOINT, DEFAULT_ENDPOINT),
            ],
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()
            .map_err(SetupError::HttpClient)?;

        Ok(Self {
            name: name.to_string(),
            client,
            endpoint: cfg[ENV_ENDPOINT].clone(),
            bucket: cfg[ENV_BUCKET].clone(),
            key: cfg[ENV_KEY].clone(),
        })
    }

    /// HTTPクライアントを差し替える（テスト用モックサーバー向け）
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// エンドポイントURLを差し替える
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn object_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            self.key
        )
    }

    async fn download(&self) -> CheckResult {
        let response = self.client.get(self.object_url()).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(CheckError::Failed(format!(
                "{} download check failed, bucket={}, key={}: HTTP {}",
                self.name,
                self.bucket,
                self.key,
                response.status()
            )))
        }
    }
}

#[async_trait]
impl Checker for S3Check {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> CheckResult {
        let result = self.download().await;
        match &result {
            Ok(()) => {
                metrics::record_success(&self.name);
                debug!(check = %self.name, bucket = %self.bucket, key = %self.key, "download check succeeded");
            }
            Err(err) => {
                metrics::record_failure(&self.name);
                warn!(check = %self.name, bucket = %self.bucket, key = %self.key, error = %err, "download check failed");
            }
        }
        result
    }
}
