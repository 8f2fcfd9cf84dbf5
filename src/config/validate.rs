// src/config/validate.rs

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::model::TestSuite;
use crate::errors::{Result, SuiterunError};

/// Loose address shape: something without whitespace, an `@`, something
/// without whitespace. Deliverability is the SMTP server's problem.
fn address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("address regex is valid"))
}

/// Suite labels must be unique (they name report attachments) and at least
/// one suite must be configured.
pub fn validate_suites(suites: &[TestSuite]) -> Result<()> {
    if suites.is_empty() {
        return Err(SuiterunError::ConfigError(
            "the suite config must contain at least one test suite to run".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for suite in suites {
        if !seen.insert(suite.label.as_str()) {
            return Err(SuiterunError::ConfigError(format!(
                "the test suite label '{}' has already been used; each label must be unique",
                suite.label
            )));
        }
    }
    Ok(())
}

pub fn validate_recipients(recipients: &[String]) -> Result<()> {
    if recipients.is_empty() {
        return Err(SuiterunError::ConfigError(
            "there are no email addresses to send the test suite results to".to_string(),
        ));
    }
    for address in recipients {
        if !address_regex().is_match(address) {
            return Err(SuiterunError::ConfigError(format!(
                "'{address}' doesn't look like a valid email address"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite(label: &str) -> TestSuite {
        TestSuite {
            label: label.to_string(),
            command: "true".to_string(),
        }
    }

    #[test]
    fn unique_labels_pass() {
        assert!(validate_suites(&[suite("a"), suite("b")]).is_ok());
    }

    #[test]
    fn duplicate_labels_fail() {
        assert!(validate_suites(&[suite("a"), suite("a")]).is_err());
    }

    #[test]
    fn address_shape_check() {
        assert!(validate_recipients(&["dev@example.com".to_string()]).is_ok());
        assert!(validate_recipients(&["missing-at-sign".to_string()]).is_err());
        assert!(validate_recipients(&["@no-local-part".to_string()]).is_err());
        assert!(validate_recipients(&["spaces in@it".to_string()]).is_err());
    }
}
