// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{EmailSettings, TestSuite};
use crate::config::validate::{validate_recipients, validate_suites};
use crate::errors::{Result, SuiterunError};

/// Returns true for lines carrying no content (blank or `#` comment).
fn can_ignore(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse the test-suite config: one suite per line, exactly two tab-separated
/// fields (label, command string).
pub fn parse_test_suites(contents: &str) -> Result<Vec<TestSuite>> {
    let mut suites = Vec::new();
    for line in contents.lines() {
        if can_ignore(line) {
            continue;
        }
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() != 2 {
            return Err(SuiterunError::ConfigError(format!(
                "each line in the suite config must contain exactly two fields \
                 separated by a tab (offending line: '{}')",
                line.trim()
            )));
        }
        suites.push(TestSuite {
            label: fields[0].to_string(),
            command: fields[1].to_string(),
        });
    }
    validate_suites(&suites)?;
    Ok(suites)
}

/// Parse the recipients file: one email address per line.
pub fn parse_recipients(contents: &str) -> Result<Vec<String>> {
    let recipients: Vec<String> = contents
        .lines()
        .filter(|line| !can_ignore(line))
        .map(|line| line.trim().to_string())
        .collect();
    validate_recipients(&recipients)?;
    Ok(recipients)
}

const REQUIRED_EMAIL_FIELDS: [&str; 4] = ["smtp_server", "smtp_port", "sender", "password"];

/// Parse the email settings file: tab-separated `key\tvalue` lines covering
/// exactly the fields in [`REQUIRED_EMAIL_FIELDS`].
pub fn parse_email_settings(contents: &str) -> Result<EmailSettings> {
    let mut smtp_server = None;
    let mut smtp_port = None;
    let mut sender = None;
    let mut password = None;

    for line in contents.lines() {
        if can_ignore(line) {
            continue;
        }
        let Some((key, value)) = line.trim().split_once('\t') else {
            return Err(SuiterunError::ConfigError(format!(
                "the line '{}' in the email settings file must have exactly two \
                 fields separated by a tab",
                line.trim()
            )));
        };
        match key {
            "smtp_server" => smtp_server = Some(value.to_string()),
            "smtp_port" => {
                let port: u16 = value.trim().parse().map_err(|_| {
                    SuiterunError::ConfigError(format!(
                        "smtp_port must be an integer port number (got '{value}')"
                    ))
                })?;
                smtp_port = Some(port);
            }
            "sender" => sender = Some(value.to_string()),
            "password" => password = Some(value.to_string()),
            other => {
                return Err(SuiterunError::ConfigError(format!(
                    "unrecognized setting '{other}' in email settings file; \
                     valid settings are {REQUIRED_EMAIL_FIELDS:?}"
                )));
            }
        }
    }

    match (smtp_server, smtp_port, sender, password) {
        (Some(smtp_server), Some(smtp_port), Some(sender), Some(password)) => Ok(EmailSettings {
            smtp_server,
            smtp_port,
            sender,
            password,
        }),
        _ => Err(SuiterunError::ConfigError(format!(
            "the email settings file does not contain one or more of the \
             following required fields: {REQUIRED_EMAIL_FIELDS:?}"
        ))),
    }
}

/// Load and validate the test-suite config from a path.
pub fn load_test_suites(path: impl AsRef<Path>) -> Result<Vec<TestSuite>> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_test_suites(&contents)
}

/// Load and validate the recipients file from a path.
pub fn load_recipients(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_recipients(&contents)
}

/// Load and validate the email settings file from a path.
pub fn load_email_settings(path: impl AsRef<Path>) -> Result<EmailSettings> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_email_settings(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suites_parse_in_order_skipping_comments() {
        let contents = "# test suites\n\nunit\tpython tests.py\nsmoke\tmake smoke\n";
        let suites = parse_test_suites(contents).unwrap();
        assert_eq!(
            suites,
            vec![
                TestSuite {
                    label: "unit".to_string(),
                    command: "python tests.py".to_string(),
                },
                TestSuite {
                    label: "smoke".to_string(),
                    command: "make smoke".to_string(),
                },
            ]
        );
    }

    #[test]
    fn suite_line_with_wrong_field_count_is_rejected() {
        let err = parse_test_suites("unit\tcmd\textra\n").unwrap_err();
        assert!(err.to_string().contains("exactly two fields"));
        let err = parse_test_suites("just-a-label\n").unwrap_err();
        assert!(err.to_string().contains("exactly two fields"));
    }

    #[test]
    fn duplicate_suite_labels_are_rejected() {
        let err = parse_test_suites("unit\ta\nunit\tb\n").unwrap_err();
        assert!(err.to_string().contains("unit"));
    }

    #[test]
    fn empty_suite_config_is_rejected() {
        assert!(parse_test_suites("# nothing here\n\n").is_err());
    }

    #[test]
    fn recipients_parse_and_validate() {
        let recipients = parse_recipients("# team\nalice@example.com\n\nbob@example.com\n").unwrap();
        assert_eq!(recipients, vec!["alice@example.com", "bob@example.com"]);
    }

    #[test]
    fn bad_recipient_address_is_rejected() {
        assert!(parse_recipients("not-an-address\n").is_err());
    }

    #[test]
    fn empty_recipients_file_is_rejected() {
        assert!(parse_recipients("# no one\n").is_err());
    }

    #[test]
    fn email_settings_parse_completely() {
        let contents =
            "smtp_server\tsmtp.example.com\nsmtp_port\t587\nsender\tci@example.com\npassword\thunter2\n";
        let settings = parse_email_settings(contents).unwrap();
        assert_eq!(
            settings,
            EmailSettings {
                smtp_server: "smtp.example.com".to_string(),
                smtp_port: 587,
                sender: "ci@example.com".to_string(),
                password: "hunter2".to_string(),
            }
        );
    }

    #[test]
    fn missing_email_setting_is_rejected() {
        let err = parse_email_settings("smtp_server\tsmtp.example.com\n").unwrap_err();
        assert!(err.to_string().contains("required fields"));
    }

    #[test]
    fn unknown_email_setting_is_rejected() {
        let err = parse_email_settings("smtp_host\tsmtp.example.com\n").unwrap_err();
        assert!(err.to_string().contains("smtp_host"));
    }

    #[test]
    fn email_setting_line_without_tab_is_rejected() {
        assert!(parse_email_settings("smtp_server smtp.example.com\n").is_err());
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let contents =
            "smtp_server\ts\nsmtp_port\tnot-a-port\nsender\tci@example.com\npassword\tp\n";
        assert!(parse_email_settings(contents).is_err());
    }
}
