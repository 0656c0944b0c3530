//! canaryd Server Entry Point

use canaryd::checks::S3Check;
use canaryd::cli::{Cli, Commands};
use canaryd::config::{env_or, env_parse};
use canaryd::error::SetupError;
use canaryd::health::{run_checks_forever, CheckSchedule, CheckSet};
use canaryd::shutdown::ShutdownCoordinator;
use canaryd::{logging, server, AppState};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = env_or("CANARYD_HOST", "0.0.0.0");
        let port = env_parse("CANARYD_PORT", 10002);
        Self { host, port }
    }

    fn from_args(host: String, port: u16) -> Self {
        Self { host, port }
    }

    fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn setup_s3_check() -> Result<CheckSchedule, SetupError> {
    let interval = Duration::from_secs(env_parse("CANARYD_S3_INTERVAL_SECS", 3u64));
    let timeout = Duration::from_secs(env_parse("CANARYD_S3_TIMEOUT_SECS", 2u64));
    let check = S3Check::new("s3")?;
    Ok(CheckSchedule::new(Arc::new(check), interval, timeout))
}

fn setup_checks() -> Result<CheckSet, SetupError> {
    CheckSet::new(vec![setup_s3_check()?])
}

async fn run_server(config: ServerConfig) {
    info!("canaryd v{}", env!("CARGO_PKG_VERSION"));

    let checks = match setup_checks() {
        Ok(checks) => checks,
        Err(e) => {
            eprintln!("Error: cannot set up checks: {}", e);
            std::process::exit(1);
        }
    };
    info!("Configured {} check(s)", checks.len());

    // バックグラウンドスケジューラを開始（チェックごとに独立したループ）。
    // 停止ハンドルはシャットダウン調整役に渡し、begin()で一括停止させる。
    let scheduler = run_checks_forever(&checks);

    let state = AppState {
        checks: Arc::new(checks),
        shutdown: ShutdownCoordinator::new(scheduler),
    };

    server::run(state, &config.bind_addr()).await;
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => {
            logging::init().expect("failed to initialize logging");
            run_server(ServerConfig::from_args(args.host, args.port)).await;
        }
        None => {
            // No subcommand - default to serve
            logging::init().expect("failed to initialize logging");
            run_server(ServerConfig::from_env()).await;
        }
    }
}
