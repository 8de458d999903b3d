//! OTP delivery adapters.
//!
//! [`SmtpOtpMailer`] sends through an authenticated STARTTLS relay.
//! [`LoggingOtpMailer`] stands in when no relay is configured; it writes the
//! code to the log only when built to reveal it.

use async_trait::async_trait;
use chrono::Duration;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::domain::ports::OtpMailer;
use crate::domain::{Email, OtpCode, OTP_TTL_MINUTES};

const SUBJECT: &str = "Your RoadGuard OTP";

/// Relay settings for [`SmtpOtpMailer`].
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("invalid sender address '{address}': {message}")]
    Sender { address: String, message: String },
    #[error("failed to configure SMTP relay {host}: {message}")]
    Relay { host: String, message: String },
}

fn body(code: &OtpCode, ttl: Duration) -> String {
    format!(
        "Your OTP is: {}\nIt expires in {} minutes.",
        code.as_str(),
        ttl.num_minutes()
    )
}

pub struct SmtpOtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    ttl: Duration,
}

impl SmtpOtpMailer {
    /// Build the transport. No connection is opened until the first send.
    pub fn new(settings: SmtpSettings) -> Result<Self, MailerError> {
        let from: Mailbox = settings.from.parse().map_err(|err: lettre::address::AddressError| {
            MailerError::Sender {
                address: settings.from.clone(),
                message: err.to_string(),
            }
        })?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|err| MailerError::Relay {
                host: settings.host.clone(),
                message: err.to_string(),
            })?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .build();
        Ok(Self {
            transport,
            from,
            ttl: Duration::minutes(OTP_TTL_MINUTES),
        })
    }

    /// Lifetime quoted in the message body; match the issuing service.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn message(&self, to: &Email, code: &OtpCode) -> Option<Message> {
        let recipient: Mailbox = match to.as_ref().parse() {
            Ok(recipient) => recipient,
            Err(error) => {
                warn!(%error, "recipient rejected by mail builder");
                return None;
            }
        };
        match Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(body(code, self.ttl))
        {
            Ok(message) => Some(message),
            Err(error) => {
                warn!(%error, "failed to build OTP message");
                None
            }
        }
    }
}

#[async_trait]
impl OtpMailer for SmtpOtpMailer {
    async fn send(&self, to: &Email, code: &OtpCode) -> bool {
        let Some(message) = self.message(to, code) else {
            return false;
        };
        match self.transport.send(message).await {
            Ok(_) => true,
            Err(error) => {
                warn!(%error, "SMTP delivery failed");
                false
            }
        }
    }
}

/// Mailer used when SMTP is not configured. Always reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingOtpMailer {
    reveal_codes: bool,
}

impl LoggingOtpMailer {
    /// Log issued codes verbatim when `reveal_codes` is set, so a local
    /// instance can complete registration without a relay.
    pub fn new(reveal_codes: bool) -> Self {
        Self { reveal_codes }
    }
}

#[async_trait]
impl OtpMailer for LoggingOtpMailer {
    async fn send(&self, to: &Email, code: &OtpCode) -> bool {
        if self.reveal_codes {
            info!(recipient = %to, code = code.as_str(), "SMTP not configured; OTP logged");
        } else {
            info!(recipient = %to, "SMTP not configured; OTP not delivered");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use rstest::rstest;

    use super::*;

    /// Log sink shared with a scoped subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    async fn logged_send(mailer: LoggingOtpMailer) -> String {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);
        let to = Email::new("asha@example.com").expect("email");
        assert!(mailer.send(&to, &OtpCode::from_input("424242")).await);
        captured.text()
    }

    fn settings(from: &str) -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".to_owned(),
            port: 587,
            username: "mailer".to_owned(),
            password: "secret".to_owned(),
            from: from.to_owned(),
        }
    }

    #[rstest]
    #[case(Duration::minutes(5), "5 minutes")]
    #[case(Duration::minutes(15), "15 minutes")]
    fn body_names_code_and_expiry(#[case] ttl: Duration, #[case] expiry: &str) {
        let text = body(&OtpCode::from_input("123456"), ttl);
        assert!(text.contains("123456"));
        assert!(text.contains(expiry));
    }

    #[rstest]
    fn malformed_sender_is_rejected() {
        let err = SmtpOtpMailer::new(settings("not an address"))
            .err()
            .expect("sender error");
        assert!(matches!(err, MailerError::Sender { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn messages_are_addressed_to_the_recipient() {
        let mailer = SmtpOtpMailer::new(settings("RoadGuard <no-reply@roadguard.local>"))
            .expect("valid settings");
        let to = Email::new("asha@example.com").expect("email");
        let message = mailer
            .message(&to, &OtpCode::from_input("654321"))
            .expect("message");
        let raw = String::from_utf8(message.formatted()).expect("utf8");
        assert!(raw.contains("To: asha@example.com"));
        assert!(raw.contains("Subject: Your RoadGuard OTP"));
    }

    #[rstest]
    #[tokio::test]
    async fn message_body_quotes_configured_ttl() {
        let mailer = SmtpOtpMailer::new(settings("no-reply@roadguard.local"))
            .expect("valid settings")
            .with_ttl(Duration::minutes(10));
        let to = Email::new("asha@example.com").expect("email");
        let message = mailer
            .message(&to, &OtpCode::from_input("654321"))
            .expect("message");
        let raw = String::from_utf8(message.formatted()).expect("utf8");
        assert!(raw.contains("expires in 10 minutes"));
    }

    #[rstest]
    #[tokio::test]
    async fn revealing_mailer_logs_the_code() {
        let logs = logged_send(LoggingOtpMailer::new(true)).await;
        assert!(logs.contains("424242"), "{logs}");
    }

    #[rstest]
    #[tokio::test]
    async fn quiet_mailer_keeps_the_code_out_of_logs() {
        let logs = logged_send(LoggingOtpMailer::default()).await;
        assert!(logs.contains("OTP not delivered"), "{logs}");
        assert!(!logs.contains("424242"));
    }
}
