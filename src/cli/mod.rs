//! CLI module for canaryd
//!
//! Provides the command-line interface for the health-check aggregator.

pub mod serve;

use clap::{Parser, Subcommand};

/// canaryd - Periodic health-check aggregator with an HTTP status surface
#[derive(Parser, Debug)]
#[command(name = "canaryd")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    CANARYD_HOST                 Bind address (default: 0.0.0.0)
    CANARYD_PORT                 Listen port (default: 10002)
    CANARYD_LOG_LEVEL            Log level (default: info)
    CANARYD_S3_INTERVAL_SECS     S3 check interval (default: 3)
    CANARYD_S3_TIMEOUT_SECS      S3 check timeout (default: 2)
    CANARYD_S3_BUCKET            S3 check bucket (default: canaryd)
    CANARYD_S3_KEY               S3 check object key (default: check)
    CANARYD_S3_ENDPOINT          S3 endpoint URL
    CANARYD_SHUTDOWN_GRACE_SECS  Grace period for in-flight responses (default: 60)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the health-check aggregator server
    Serve(serve::ServeArgs),
}
