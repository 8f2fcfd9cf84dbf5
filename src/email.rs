// src/email.rs

//! Composes and sends the results email over SMTP.
//!
//! Message building is separated from transport so composition can be tested
//! without a server. The transport uses STARTTLS and logs in as the sender.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::EmailSettings;
use crate::errors::{Result, SuiterunError};

/// Build the multipart message: a plain-text body followed by one text
/// attachment per (filename, contents) pair.
pub fn build_message(
    sender: &str,
    recipients: &[String],
    subject: &str,
    body: &str,
    attachments: &[(String, String)],
) -> Result<Message> {
    let mut builder = Message::builder()
        .from(sender.parse::<Mailbox>()?)
        .subject(subject)
        .date_now();
    for recipient in recipients {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }

    let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));
    for (filename, contents) in attachments {
        multipart = multipart.singlepart(
            Attachment::new(filename.clone()).body(contents.clone(), ContentType::TEXT_PLAIN),
        );
    }

    builder
        .multipart(multipart)
        .map_err(|err| SuiterunError::EmailBuild(err.to_string()))
}

/// Send the results email to every recipient.
pub async fn send_results_email(
    settings: &EmailSettings,
    recipients: &[String],
    subject: &str,
    body: &str,
    attachments: &[(String, String)],
) -> Result<()> {
    let message = build_message(&settings.sender, recipients, subject, body, attachments)?;

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_server)?
        .port(settings.smtp_port)
        .credentials(Credentials::new(
            settings.sender.clone(),
            settings.password.clone(),
        ))
        .build();

    mailer.send(message).await?;
    info!(recipients = recipients.len(), "results email sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_includes_subject_and_attachments() {
        let message = build_message(
            "ci@example.com",
            &["dev@example.com".to_string()],
            "Test suite results [automated testing system]",
            "unit: Pass\n\n",
            &[("unit_results.txt".to_string(), "Command:\n...\n".to_string())],
        )
        .unwrap();

        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("Subject: Test suite results [automated testing system]"));
        assert!(rendered.contains("To: dev@example.com"));
        assert!(rendered.contains("unit_results.txt"));
    }

    #[test]
    fn multiple_recipients_are_all_addressed() {
        let message = build_message(
            "ci@example.com",
            &["a@example.com".to_string(), "b@example.com".to_string()],
            "s",
            "b",
            &[],
        )
        .unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("a@example.com"));
        assert!(rendered.contains("b@example.com"));
    }

    #[test]
    fn invalid_recipient_is_rejected() {
        let err = build_message(
            "ci@example.com",
            &["not an address".to_string()],
            "s",
            "b",
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, SuiterunError::Address(_)));
    }
}
