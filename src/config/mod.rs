// src/config/mod.rs

//! Parsing and validation of the three plain-text input files:
//! the test-suite config, the recipients list, and the email settings.
//!
//! All three formats ignore blank lines and `#` comments. Parsing is split
//! into pure `parse_*` string functions (unit-testable) with `load_*` path
//! wrappers on top.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    load_email_settings, load_recipients, load_test_suites, parse_email_settings,
    parse_recipients, parse_test_suites,
};
pub use model::{EmailSettings, TestSuite};
