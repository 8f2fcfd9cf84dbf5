// src/report/mod.rs

//! Result aggregation and the three-phase workflow that produces the email
//! report.
//!
//! [`build_summary`] is the pure Pass/Fail aggregation;
//! [`execute_and_build_report`] drives cluster setup, the test suites, and
//! cluster teardown through one reused [`BatchExecutor`] and composes the
//! email body plus its attachments.

use std::fmt::Write as _;

use tracing::info;

use crate::cluster::CommandPlan;
use crate::config::TestSuite;
use crate::errors::Result;
use crate::exec::{BatchExecutor, BatchOutcome, SharedLog};

/// Filename the combined log is attached under.
pub const COMBINED_LOG_NAME: &str = "suiterun_log.txt";

/// Wall-clock budgets (in minutes) for the three phases of a run.
#[derive(Debug, Clone, Copy)]
pub struct PhaseTimeouts {
    pub setup: f64,
    pub test_suites: f64,
    pub teardown: f64,
}

/// The finished report: email body plus (filename, contents) attachments.
#[derive(Debug)]
pub struct Report {
    pub body: String,
    pub attachments: Vec<(String, String)>,
}

/// Pass/Fail summary for the suites that produced a result.
///
/// Deterministic and order-preserving: one `<label>: Pass|Fail` line per
/// input pair (pass means an exit code of exactly zero), followed by a single
/// blank separator line when the input is non-empty.
pub fn build_summary(statuses: &[(String, Option<i32>)]) -> String {
    let mut summary = String::new();
    for (label, exit_code) in statuses {
        let verdict = if *exit_code == Some(0) { "Pass" } else { "Fail" };
        let _ = writeln!(summary, "{label}: {verdict}");
    }
    if !summary.is_empty() {
        summary.push('\n');
    }
    summary
}

/// Run setup, test suites, and teardown, and compose the report.
///
/// The shared log is reused across all three phases so the combined
/// attachment covers the whole run in execution order. Teardown always runs,
/// even when setup or the suites went wrong, and a teardown problem adds a
/// manual-termination warning naming the cluster tag.
pub async fn execute_and_build_report(
    suites: &[TestSuite],
    plan: &CommandPlan,
    timeouts: PhaseTimeouts,
    cluster_tag: &str,
) -> Result<Report> {
    let mut body = String::new();
    let mut attachments = Vec::new();

    let log = SharedLog::new()?;
    let mut executor = BatchExecutor::new(plan.setup.clone(), log.clone(), true);

    info!(commands = plan.setup.len(), "running cluster setup");
    let setup = executor.run(timeouts.setup).await?;

    match setup.outcome {
        BatchOutcome::TimedOut => {
            let _ = write!(
                body,
                "The maximum allowable cluster setup time of {} minute(s) was exceeded.\n\n",
                timeouts.setup
            );
        }
        BatchOutcome::SomeFailed => {
            body.push_str(
                "There were problems in starting the remote cluster while preparing to \
                 execute the test suite(s). Please check the attached log for more \
                 details.\n\n",
            );
        }
        BatchOutcome::AllSucceeded => {
            executor.cmds = plan.test_suites.clone();
            executor.stop_on_first_failure = false;
            executor.log_individual_cmds = true;

            info!(suites = suites.len(), "running test suites");
            let mut run = executor.run(timeouts.test_suites).await?;

            let statuses: Vec<(String, Option<i32>)> = suites
                .iter()
                .zip(run.results.iter())
                .map(|(suite, result)| (suite.label.clone(), result.exit_code))
                .collect();
            body.push_str(&build_summary(&statuses));

            // Individual logs cover every suite that started, including one
            // the deadline killed mid-flight; its partial output is attached.
            for (suite, individual) in suites.iter().zip(run.individual_logs.iter_mut()) {
                attachments.push((
                    format!("{}_results.txt", suite.label),
                    individual.read_to_string()?,
                ));
            }

            if run.outcome == BatchOutcome::TimedOut {
                if let Some(timed_out) = suites.get(run.results.len()) {
                    let _ = write!(
                        body,
                        "The maximum allowable time of {} minute(s) for all test suites \
                         to run was exceeded. The timeout occurred while running the {} \
                         test suite.",
                        timeouts.test_suites, timed_out.label
                    );
                }
                let untested: Vec<&str> = suites
                    .iter()
                    .skip(run.results.len() + 1)
                    .map(|suite| suite.label.as_str())
                    .collect();
                if untested.is_empty() {
                    body.push_str("\n\n");
                } else {
                    let _ = write!(
                        body,
                        " The following test suites were not tested: {}\n\n",
                        untested.join(", ")
                    );
                }
            }
        }
    }

    executor.cmds = plan.teardown.clone();
    executor.stop_on_first_failure = false;
    executor.log_individual_cmds = false;

    info!(commands = plan.teardown.len(), "running cluster teardown");
    let teardown = executor.run(timeouts.teardown).await?;

    let termination_warning = format!(
        "IMPORTANT: You should check that the cluster labelled with the tag \
         '{cluster_tag}' was properly terminated. If not, you should manually \
         terminate it.\n\n"
    );
    match teardown.outcome {
        BatchOutcome::TimedOut => {
            let _ = write!(
                body,
                "The maximum allowable cluster termination time of {} minute(s) was \
                 exceeded.\n\n{termination_warning}",
                timeouts.teardown
            );
        }
        BatchOutcome::SomeFailed => {
            let _ = write!(
                body,
                "There were problems in terminating the remote cluster. Please check \
                 the attached log for more details.\n\n{termination_warning}"
            );
        }
        BatchOutcome::AllSucceeded => {}
    }

    attachments.insert(0, (COMBINED_LOG_NAME.to_string(), log.read_to_string()?));

    Ok(Report { body, attachments })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn status(label: &str, exit_code: Option<i32>) -> (String, Option<i32>) {
        (label.to_string(), exit_code)
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        assert_eq!(build_summary(&[]), "");
    }

    #[test]
    fn single_failure_summary() {
        assert_eq!(build_summary(&[status("A", Some(1))]), "A: Fail\n\n");
    }

    #[test]
    fn mixed_results_keep_input_order() {
        let statuses = [
            status("unit", Some(0)),
            status("smoke", Some(2)),
            status("perf", Some(0)),
        ];
        assert_eq!(
            build_summary(&statuses),
            "unit: Pass\nsmoke: Fail\nperf: Pass\n\n"
        );
    }

    #[test]
    fn absent_exit_code_counts_as_fail() {
        assert_eq!(build_summary(&[status("A", None)]), "A: Fail\n\n");
    }

    proptest! {
        #[test]
        fn summary_is_deterministic_and_order_preserving(
            labels in proptest::collection::vec("[a-z]{1,8}", 0..8),
            codes in proptest::collection::vec(proptest::option::of(-2i32..3), 0..8),
        ) {
            let statuses: Vec<(String, Option<i32>)> =
                labels.into_iter().zip(codes).collect();

            let first = build_summary(&statuses);
            let second = build_summary(&statuses);
            prop_assert_eq!(&first, &second);

            let lines: Vec<&str> = first.lines().filter(|l| !l.is_empty()).collect();
            prop_assert_eq!(lines.len(), statuses.len());
            for (line, (label, code)) in lines.iter().zip(&statuses) {
                let verdict = if *code == Some(0) { "Pass" } else { "Fail" };
                prop_assert_eq!(line.to_string(), format!("{label}: {verdict}"));
            }

            // Reversing the input reverses the lines: order is preserved, not
            // sorted.
            let mut reversed = statuses.clone();
            reversed.reverse();
            let reversed_lines: Vec<String> = build_summary(&reversed)
                .lines()
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();
            let mut expected: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
            expected.reverse();
            prop_assert_eq!(reversed_lines, expected);
        }
    }
}
