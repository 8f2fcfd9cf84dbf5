// src/lib.rs

pub mod cli;
pub mod cluster;
pub mod config;
pub mod email;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod report;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::cluster::{ClusterOptions, CommandPlan, build_command_plan};
use crate::config::{load_email_settings, load_recipients, load_test_suites};
use crate::report::{PhaseTimeouts, execute_and_build_report};

/// Subject line of the results email.
const EMAIL_SUBJECT: &str = "Test suite results [automated testing system]";

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - parsing of the three input files (suites, recipients, email settings)
/// - command-plan building
/// - the three execution phases (setup, test suites, teardown)
/// - emailing the report
pub async fn run(args: CliArgs) -> Result<()> {
    // Parse every input file up front so format problems surface before any
    // command runs.
    let suites = load_test_suites(&args.suite_config)?;
    let recipients = load_recipients(&args.recipients)?;
    let email_settings = load_email_settings(&args.email_settings)?;

    let opts = ClusterOptions {
        config_path: args.cluster_config.clone(),
        user: args.user.clone(),
        tag: args.cluster_tag.clone(),
        template: args.cluster_template.clone(),
        exe: args.cluster_exe.clone(),
    };
    let plan = build_command_plan(&suites, &opts);

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    let timeouts = PhaseTimeouts {
        setup: args.setup_timeout,
        test_suites: args.test_suites_timeout,
        teardown: args.teardown_timeout,
    };

    let report = execute_and_build_report(&suites, &plan, timeouts, &args.cluster_tag).await?;

    email::send_results_email(
        &email_settings,
        &recipients,
        EMAIL_SUBJECT,
        &report.body,
        &report.attachments,
    )
    .await?;

    info!("run complete");
    Ok(())
}

/// Simple dry-run output: print the command plan phase by phase.
fn print_dry_run(plan: &CommandPlan) {
    println!("suiterun dry-run");
    println!("setup ({}):", plan.setup.len());
    for cmd in &plan.setup {
        println!("  {cmd}");
    }
    println!("test suites ({}):", plan.test_suites.len());
    for cmd in &plan.test_suites {
        println!("  {cmd}");
    }
    println!("teardown ({}):", plan.teardown.len());
    for cmd in &plan.teardown {
        println!("  {cmd}");
    }
}
