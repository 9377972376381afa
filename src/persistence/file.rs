use super::record::{decode_day, parse_answers_bytes, write_answers};
use super::{LoadReport, RecordIssue, ScheduleStore, StoreError, StoreResult};
use crate::config::{EmailSettings, StoreLayout};
use crate::migration::migrate;
use crate::schedule::{Schedule, WEEK, day_name};
use chrono::{Local, NaiveDate};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info, warn};

const DIR_MODE: u32 = 0o700;
const FILE_MODE: u32 = 0o600;

/// Answers-file store rooted at a [`StoreLayout`].
///
/// Saves copy the previous answers file to the backup path, then replace it
/// through a temporary file and a rename, so a crash leaves either the old
/// or the new content in place.
#[derive(Debug, Clone)]
pub struct FileScheduleStore {
    layout: StoreLayout,
    saved_on: Option<NaiveDate>,
}

impl FileScheduleStore {
    pub fn new(layout: StoreLayout) -> Self {
        Self {
            layout,
            saved_on: None,
        }
    }

    /// Pins the date written into the answers file header.
    pub fn with_save_date(mut self, date: NaiveDate) -> Self {
        self.saved_on = Some(date);
        self
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Loads the week, migrating legacy records and substituting an empty day
    /// for any record that fails to decode. Only an unreadable store fails.
    pub fn load(&self) -> StoreResult<LoadReport> {
        let path = self.layout.answers_file();
        let mut report = LoadReport::default();

        match fs::read(&path) {
            Ok(bytes) => self.load_days(&bytes, &mut report),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no answers file; starting from an empty week");
            }
            Err(source) => return Err(StoreError::StorageUnavailable { path, source }),
        }

        report.schedule.set_notes(self.load_notes()?);
        Ok(report)
    }

    fn load_days(&self, content: &[u8], report: &mut LoadReport) {
        let fields = parse_answers_bytes(content);
        for (weekday, day_fields) in WEEK.into_iter().zip(fields.iter()) {
            if !day_fields.is_present() {
                debug!(day = day_name(weekday), "no stored record");
                continue;
            }
            let raw = match decode_day(day_fields) {
                Ok(raw) => raw,
                Err(reason) => {
                    warn!(day = day_name(weekday), %reason, "corrupt day record; loading it empty");
                    report.issues.push(RecordIssue::Corrupt {
                        day: weekday,
                        reason,
                    });
                    continue;
                }
            };
            if raw.is_ambiguous() {
                warn!(
                    day = day_name(weekday),
                    "record has both a plan list and legacy fields; keeping both"
                );
                report
                    .issues
                    .push(RecordIssue::MigrationAmbiguous { day: weekday });
            } else if raw.is_legacy() {
                info!(day = day_name(weekday), "migrating legacy day record");
                report.issues.push(RecordIssue::Migrated { day: weekday });
            }
            report.schedule.set_day(weekday, migrate(raw));
        }
    }

    /// Writes the notes file, then the answers file. A failed notes write
    /// leaves the answers file and its backup untouched.
    pub fn save(&self, schedule: &Schedule) -> StoreResult<()> {
        let saved_on = self
            .saved_on
            .unwrap_or_else(|| Local::now().date_naive());
        let content = write_answers(schedule, saved_on)?;

        let answers_dir = self.layout.answers_dir();
        ensure_private_dir(self.layout.root())?;
        ensure_private_dir(&answers_dir)?;
        self.save_notes(schedule.notes())?;

        let path = self.layout.answers_file();
        if path.exists() {
            let backup = self.layout.backup_file();
            fs::copy(&path, &backup)
                .and_then(|_| restrict_permissions(&backup, FILE_MODE))
                .map_err(|source| StoreError::BackupFailed {
                    path: backup.clone(),
                    source,
                })?;
            debug!(backup = %backup.display(), "backed up previous answers file");
        }

        atomic_write(&path, &content)
            .map_err(|source| StoreError::WriteFailed { path, source })?;
        debug!("schedule saved");
        Ok(())
    }

    pub fn load_notes(&self) -> StoreResult<String> {
        let path = self.layout.notes_file();
        match fs::read(&path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(StoreError::StorageUnavailable { path, source }),
        }
    }

    pub fn save_notes(&self, notes: &str) -> StoreResult<()> {
        ensure_private_dir(self.layout.root())?;
        let path = self.layout.notes_file();
        atomic_write(&path, notes).map_err(|source| StoreError::WriteFailed { path, source })
    }

    /// Mail settings from the root; defaults when none were saved yet.
    pub fn load_email_settings(&self) -> StoreResult<EmailSettings> {
        let path = self.layout.email_settings_file();
        match fs::read(&path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(EmailSettings::default()),
            Err(source) => Err(StoreError::StorageUnavailable { path, source }),
        }
    }

    pub fn save_email_settings(&self, settings: &EmailSettings) -> StoreResult<()> {
        ensure_private_dir(self.layout.root())?;
        let content = serde_json::to_string_pretty(settings)?;
        let path = self.layout.email_settings_file();
        atomic_write(&path, &content).map_err(|source| StoreError::WriteFailed { path, source })
    }
}

impl ScheduleStore for FileScheduleStore {
    fn save_schedule(&self, schedule: &Schedule) -> StoreResult<()> {
        self.save(schedule)
    }

    fn load_schedule(&self) -> StoreResult<Schedule> {
        self.load().map(|report| report.schedule)
    }
}

/// Creates `dir` if needed and restricts it to the owner.
pub(crate) fn ensure_private_dir(dir: &Path) -> StoreResult<()> {
    fs::create_dir_all(dir)
        .and_then(|_| restrict_permissions(dir, DIR_MODE))
        .map_err(|source| StoreError::StorageUnavailable {
            path: dir.to_path_buf(),
            source,
        })
}

/// Writes through a sibling temp file and renames it over `path`.
/// The temp name carries the pid to keep concurrent runs apart.
pub(crate) fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp.{}", std::process::id()));

    let written = write_private(&tmp_path, content).and_then(|_| fs::rename(&tmp_path, path));
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    restrict_permissions(path, FILE_MODE)
}

fn write_private(path: &Path, content: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
