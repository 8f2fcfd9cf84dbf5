// src/cluster.rs

//! Builds the command strings executed in each phase of a run: starting the
//! remote cluster, running each test suite on its master over ssh, and
//! terminating the cluster.

use std::path::PathBuf;

use crate::config::TestSuite;

/// How to reach the cluster tool.
#[derive(Debug, Clone)]
pub struct ClusterOptions {
    /// Path to the cluster tool's own config file.
    pub config_path: PathBuf,
    /// User the test suites run as on the cluster master.
    pub user: String,
    /// Tag naming the cluster instance to create and terminate.
    pub tag: String,
    /// Cluster template; the tool's default template if `None`.
    pub template: Option<String>,
    /// Path to the cluster executable.
    pub exe: String,
}

/// The three ordered command batches of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub setup: Vec<String>,
    pub test_suites: Vec<String>,
    pub teardown: Vec<String>,
}

/// Build the command plan for the given suites and cluster options.
///
/// Running the ssh commands non-interactively requires the local user to have
/// `StrictHostKeyChecking no` in their ssh config for the cluster hosts.
pub fn build_command_plan(suites: &[TestSuite], opts: &ClusterOptions) -> CommandPlan {
    let config = opts.config_path.display();

    let mut start = format!("{} -c {} start ", opts.exe, config);
    if let Some(template) = &opts.template {
        start.push_str(&format!("-c {template} "));
    }
    start.push_str(&opts.tag);

    let test_suites = suites
        .iter()
        .map(|suite| {
            format!(
                "{} -c {} sshmaster -u {} {} '{}'",
                opts.exe, config, opts.user, opts.tag, suite.command
            )
        })
        .collect();

    // The second -c tells the cluster tool not to prompt for termination
    // confirmation.
    let terminate = format!("{} -c {} terminate -c {}", opts.exe, config, opts.tag);

    CommandPlan {
        setup: vec![start],
        test_suites,
        teardown: vec![terminate],
    }
}
