use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ANSWERS_DIR: &str = "PA";
const ANSWERS_FILE: &str = "previous_answers.sh";
const BACKUP_FILE: &str = "previous_answers.sh.bak";
const NOTES_FILE: &str = "schedule_notes.txt";
const ARTIFACTS_DIR: &str = "Schedules";
const TEXT_FILE: &str = "schedule.txt";
const REMINDERS_FILE: &str = "schedule_reminders.txt";
const HTML_FILE: &str = "schedule_email.html";
const EMAIL_SETTINGS_FILE: &str = "email_settings.json";

/// Every path the store and artifact writer touch, derived from one
/// configuration root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.schedule_config`, or `None` when no home directory is known.
    #[cfg(feature = "cli")]
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".schedule_config"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn answers_dir(&self) -> PathBuf {
        self.root.join(ANSWERS_DIR)
    }

    pub fn answers_file(&self) -> PathBuf {
        self.answers_dir().join(ANSWERS_FILE)
    }

    pub fn backup_file(&self) -> PathBuf {
        self.answers_dir().join(BACKUP_FILE)
    }

    pub fn notes_file(&self) -> PathBuf {
        self.root.join(NOTES_FILE)
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join(ARTIFACTS_DIR)
    }

    pub fn text_file(&self) -> PathBuf {
        self.artifacts_dir().join(TEXT_FILE)
    }

    pub fn reminders_file(&self) -> PathBuf {
        self.artifacts_dir().join(REMINDERS_FILE)
    }

    pub fn html_file(&self) -> PathBuf {
        self.root.join(HTML_FILE)
    }

    pub fn email_settings_file(&self) -> PathBuf {
        self.root.join(EMAIL_SETTINGS_FILE)
    }
}

/// Non-secret mail settings. The SMTP password lives in the credential
/// store, keyed by `smtp_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub email_to: String,
    pub email_from: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            email_to: String::new(),
            email_from: String::new(),
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_user: String::new(),
        }
    }
}

impl EmailSettings {
    /// Fields that must be set before anything can be sent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email_to.trim().is_empty() {
            missing.push("email_to");
        }
        if self.email_from.trim().is_empty() {
            missing.push("email_from");
        }
        if self.smtp_server.trim().is_empty() {
            missing.push("smtp_server");
        }
        if self.smtp_user.trim().is_empty() {
            missing.push("smtp_user");
        }
        missing
    }
}
