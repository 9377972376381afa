//! Contracts for sending the rendered week by email.
//!
//! Concrete SMTP, keyring and `mail(1)` backends live with the front ends;
//! this module only assembles the message and applies the fallback order.

use crate::config::EmailSettings;
use crate::render::{Artifacts, RenderOptions};
use std::fmt;
use tracing::{info, warn};

/// Credential store service name the SMTP password is filed under.
pub const CREDENTIAL_SERVICE: &str = "schedule_maker_email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    MissingSettings(Vec<&'static str>),
    MissingSecret { account: String },
    Credentials(String),
    Transport(String),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::MissingSettings(fields) => {
                write!(f, "email settings incomplete: {}", fields.join(", "))
            }
            DeliveryError::MissingSecret { account } => {
                write!(f, "no stored password for {account}")
            }
            DeliveryError::Credentials(msg) => write!(f, "credential store error: {msg}"),
            DeliveryError::Transport(msg) => write!(f, "mail transport error: {msg}"),
        }
    }
}

impl std::error::Error for DeliveryError {}

pub trait CredentialStore {
    fn get(&self, service: &str, account: &str) -> Option<String>;
    fn set(&mut self, service: &str, account: &str, secret: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpLogin {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

pub trait MailTransport {
    fn send(&self, login: &SmtpLogin, message: &MailMessage) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryRoute {
    Primary,
    Fallback,
}

pub fn build_message(
    settings: &EmailSettings,
    artifacts: &Artifacts,
    options: &RenderOptions,
) -> MailMessage {
    let attachments = [
        ("schedule.txt", &artifacts.text),
        ("schedule_reminders.txt", &artifacts.reminders),
        ("schedule_email.html", &artifacts.html),
    ]
    .into_iter()
    .map(|(file_name, content)| Attachment {
        file_name: file_name.to_string(),
        content: content.as_bytes().to_vec(),
    })
    .collect();

    MailMessage {
        to: settings.email_to.clone(),
        from: format!("Schedule Maker <{}>", settings.email_from),
        subject: format!("Weekly Schedule - {}", options.date_label()),
        text_body: artifacts.text.clone(),
        html_body: artifacts.html.clone(),
        attachments,
    }
}

/// Files the SMTP password for `settings.smtp_user` in the credential store.
pub fn store_password(
    credentials: &mut dyn CredentialStore,
    settings: &EmailSettings,
    password: &str,
) -> Result<(), DeliveryError> {
    if settings.smtp_user.trim().is_empty() {
        return Err(DeliveryError::MissingSettings(vec!["smtp_user"]));
    }
    if password.trim().is_empty() {
        return Err(DeliveryError::Credentials("password is empty".to_string()));
    }
    credentials.set(CREDENTIAL_SERVICE, &settings.smtp_user, password)?;
    info!(account = %settings.smtp_user, "stored smtp password");
    Ok(())
}

/// Sends through `primary`, then through `fallback` if one is given and the
/// primary transport fails.
pub fn deliver(
    settings: &EmailSettings,
    credentials: &dyn CredentialStore,
    message: &MailMessage,
    primary: &dyn MailTransport,
    fallback: Option<&dyn MailTransport>,
) -> Result<DeliveryRoute, DeliveryError> {
    let missing = settings.missing_fields();
    if !missing.is_empty() {
        return Err(DeliveryError::MissingSettings(missing));
    }
    let password = credentials
        .get(CREDENTIAL_SERVICE, &settings.smtp_user)
        .ok_or_else(|| DeliveryError::MissingSecret {
            account: settings.smtp_user.clone(),
        })?;
    let login = SmtpLogin {
        server: settings.smtp_server.clone(),
        port: settings.smtp_port,
        user: settings.smtp_user.clone(),
        password,
    };

    match primary.send(&login, message) {
        Ok(()) => {
            info!(to = %message.to, "schedule email sent");
            Ok(DeliveryRoute::Primary)
        }
        Err(err) => {
            let Some(fallback) = fallback else {
                return Err(err);
            };
            warn!(%err, "primary transport failed; trying fallback");
            fallback.send(&login, message)?;
            info!(to = %message.to, "schedule email sent through fallback");
            Ok(DeliveryRoute::Fallback)
        }
    }
}
