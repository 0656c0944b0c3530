//! Configuration management via environment variables
//!
//! All configuration is read once at startup. Check plugins self-configure
//! through `check_config_from_env`, which resolves `CANARYD_<CHECK>_<KEY>`
//! variables against plugin-supplied defaults; the core itself only takes
//! intervals and timeouts.

use std::collections::HashMap;
use std::time::Duration;

/// Prefix required by any check configuration environment variable.
pub const CHECK_CONFIG_ENV_PREFIX: &str = "CANARYD_";

/// Resolve a check plugin's configuration from the environment.
///
/// For each `(key, default)` pair, the variable
/// `CANARYD_<NAME>_<KEY>` (upper-cased) overrides the default when set.
/// Resolved once at setup; never re-read at runtime.
///
/// # Example
/// ```
/// use canaryd::config::check_config_from_env;
///
/// let cfg = check_config_from_env("s3", &[("BUCKET", "canaryd"), ("KEY", "check")]);
/// assert_eq!(cfg["KEY"], "check");
/// ```
pub fn check_config_from_env(name: &str, defaults: &[(&str, &str)]) -> HashMap<String, String> {
    defaults
        .iter()
        .map(|(key, default)| {
            let var = format!("{}{}_{}", CHECK_CONFIG_ENV_PREFIX, name, key).to_uppercase();
            let value = std::env::var(var).unwrap_or_else(|_| (*default).to_string());
            ((*key).to_string(), value)
        })
        .collect()
}

/// Get an environment variable, falling back to a default value.
pub fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed to a specific type.
///
/// Returns the default if the variable is unset or fails to parse.
pub fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// シャットダウン時の猶予時間を取得
///
/// グレースフルシャットダウン開始後、処理中のレスポンス書き込みに
/// 許す上限。環境変数 `CANARYD_SHUTDOWN_GRACE_SECS`（デフォルト60秒）。
pub fn shutdown_grace_period() -> Duration {
    Duration::from_secs(env_parse("CANARYD_SHUTDOWN_GRACE_SECS", 60u64))
}
