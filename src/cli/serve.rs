//! serve サブコマンド
//!
//! ヘルスチェックアグリゲーターサーバーを起動します。

use clap::Args;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value = "10002", env = "CANARYD_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "CANARYD_HOST")]
    pub host: String,
}
