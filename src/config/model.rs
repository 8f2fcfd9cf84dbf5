// src/config/model.rs

/// One test suite: a unique label and the command string that runs it.
///
/// The command is opaque here; it is executed on the cluster master over ssh
/// and never parsed by this tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuite {
    pub label: String,
    pub command: String,
}

/// SMTP settings parsed from the email settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    /// Sender address; also used as the SMTP login user.
    pub sender: String,
    pub password: String,
}
