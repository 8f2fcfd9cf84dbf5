// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `suiterun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "suiterun",
    version,
    about = "Run test suites on a remote cluster under a deadline and email the results.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the test-suite config file (tab-separated label/command lines).
    #[arg(long, value_name = "PATH")]
    pub suite_config: PathBuf,

    /// Path to the cluster config file, passed through to the cluster tool.
    #[arg(long, value_name = "PATH")]
    pub cluster_config: PathBuf,

    /// Path to the recipients file (one email address per line).
    #[arg(long, value_name = "PATH")]
    pub recipients: PathBuf,

    /// Path to the email settings file (tab-separated key/value lines).
    #[arg(long, value_name = "PATH")]
    pub email_settings: PathBuf,

    /// User to run the test suites as on the remote cluster.
    #[arg(long, value_name = "NAME")]
    pub user: String,

    /// Cluster tag used when creating (and terminating) the remote cluster.
    #[arg(long, value_name = "TAG")]
    pub cluster_tag: String,

    /// Cluster template to use; the cluster tool's default if omitted.
    #[arg(long, value_name = "NAME")]
    pub cluster_template: Option<String>,

    /// Minutes allowed for cluster setup (fractions allowed).
    #[arg(long, value_name = "MINUTES", default_value_t = 20.0)]
    pub setup_timeout: f64,

    /// Minutes allowed for *all* test suites collectively (fractions allowed).
    #[arg(long, value_name = "MINUTES", default_value_t = 240.0)]
    pub test_suites_timeout: f64,

    /// Minutes allowed for cluster teardown (fractions allowed).
    #[arg(long, value_name = "MINUTES", default_value_t = 20.0)]
    pub teardown_timeout: f64,

    /// Path to the cluster executable.
    #[arg(long, value_name = "PATH", default_value = "starcluster")]
    pub cluster_exe: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SUITERUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the command plan, but don't execute or email.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
