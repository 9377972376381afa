use crate::schedule::{Schedule, day_name};
use chrono::Weekday;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    /// The configuration directory or answers file cannot be read or created.
    StorageUnavailable { path: PathBuf, source: io::Error },
    /// One day's stored value could not be decoded.
    RecordCorrupt { day: Weekday, reason: String },
    BackupFailed { path: PathBuf, source: io::Error },
    WriteFailed { path: PathBuf, source: io::Error },
    Serialization(SerdeJsonError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::StorageUnavailable { path, source } => {
                write!(f, "storage unavailable at {}: {source}", path.display())
            }
            StoreError::RecordCorrupt { day, reason } => {
                write!(f, "corrupt record for {}: {reason}", day_name(*day))
            }
            StoreError::BackupFailed { path, source } => {
                write!(f, "backup to {} failed: {source}", path.display())
            }
            StoreError::WriteFailed { path, source } => {
                write!(f, "write to {} failed: {source}", path.display())
            }
            StoreError::Serialization(err) => write!(f, "serialization error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::StorageUnavailable { source, .. }
            | StoreError::BackupFailed { source, .. }
            | StoreError::WriteFailed { source, .. } => Some(source),
            StoreError::Serialization(err) => Some(err),
            StoreError::RecordCorrupt { .. } => None,
        }
    }
}

impl From<SerdeJsonError> for StoreError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Non-fatal conditions met while loading, one per affected day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    /// The day could not be decoded and was loaded empty.
    Corrupt { day: Weekday, reason: String },
    /// A legacy record was upgraded to the plan-list shape.
    Migrated { day: Weekday },
    /// Legacy fields sat next to a plan list; both were kept.
    MigrationAmbiguous { day: Weekday },
}

impl RecordIssue {
    pub fn day(&self) -> Weekday {
        match self {
            RecordIssue::Corrupt { day, .. }
            | RecordIssue::Migrated { day }
            | RecordIssue::MigrationAmbiguous { day } => *day,
        }
    }

    /// The recoverable error this issue stands for, if it is one.
    pub fn as_error(&self) -> Option<StoreError> {
        match self {
            RecordIssue::Corrupt { day, reason } => Some(StoreError::RecordCorrupt {
                day: *day,
                reason: reason.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub schedule: Schedule,
    pub issues: Vec<RecordIssue>,
}

impl LoadReport {
    pub fn has_corruption(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, RecordIssue::Corrupt { .. }))
    }
}

pub trait ScheduleStore {
    fn save_schedule(&self, schedule: &Schedule) -> StoreResult<()>;
    fn load_schedule(&self) -> StoreResult<Schedule>;
}

pub mod file;
pub mod record;

pub use file::FileScheduleStore;
pub use record::{
    PLAN_SENTINEL, decode_day, encode_day, parse_answers, parse_answers_bytes, write_answers,
};
