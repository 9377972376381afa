use chrono::{NaiveDate, Weekday};
use schedule_maker::{
    Day, EmailSettings, FileScheduleStore, Plan, RecordIssue, Schedule, ScheduleStore, StoreError, StoreLayout,
    WEEK, persistence::PLAN_SENTINEL,
};
use std::fs;
use tempfile::TempDir;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store_in(dir: &TempDir) -> FileScheduleStore {
    FileScheduleStore::new(StoreLayout::new(dir.path())).with_save_date(d(2025, 3, 3))
}

fn write_answers(dir: &TempDir, content: &str) {
    let layout = StoreLayout::new(dir.path());
    fs::create_dir_all(layout.answers_dir()).unwrap();
    fs::write(layout.answers_file(), content).unwrap();
}

fn build_sample_schedule() -> Schedule {
    let mut schedule = Schedule::new();
    schedule.set_day(
        Weekday::Mon,
        Day::new("11:00-3:00", "Study calculus").with_plans(vec![
            Plan::new("Work", "Dollar General 2-6pm"),
            Plan::new("Lunch", ""),
        ]),
    );
    schedule.set_day(
        Weekday::Wed,
        Day::new("", "Finish \"essay\" draft").with_plans(vec![Plan::new(
            "Café ☕",
            "naïve unicode ✓ and a \\ backslash",
        )]),
    );
    schedule.set_day(
        Weekday::Sun,
        Day::new(format!("12:00{PLAN_SENTINEL}2:00"), "a|b||c\nline two").with_plans(vec![
            Plan::new(PLAN_SENTINEL, "details with ||PLANS|| inside"),
        ]),
    );
    schedule.set_notes("Remember $HOME and `backticks`\nsecond line");
    schedule
}

#[test]
fn missing_store_loads_an_empty_week() {
    let dir = TempDir::new().unwrap();
    let report = store_in(&dir).load().unwrap();

    assert_eq!(report.schedule, Schedule::new());
    assert!(report.issues.is_empty());
    for weekday in WEEK {
        assert!(report.schedule.day(weekday).is_empty());
    }
}

#[test]
fn save_then_load_round_trips_exactly() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let schedule = build_sample_schedule();

    store.save_schedule(&schedule).unwrap();
    let loaded = store.load_schedule().unwrap();

    assert_eq!(loaded, schedule);
}

#[test]
fn empty_schedule_round_trips_to_absence() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.save(&Schedule::new()).unwrap();
    let report = store.load().unwrap();

    assert_eq!(report.schedule, Schedule::new());
    assert!(report.issues.is_empty());
}

#[test]
fn answers_file_keeps_the_shell_layout() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut schedule = Schedule::new();
    schedule.set_day(
        Weekday::Mon,
        Day::new("11:00-3:00", "Study calculus")
            .with_plans(vec![Plan::new("Work", "Dollar General 2-6pm")]),
    );

    store.save(&schedule).unwrap();
    let content = fs::read_to_string(store.layout().answers_file()).unwrap();

    assert!(content.starts_with("# Schedule data saved on 2025-03-03\n"));
    assert!(content.contains("declare -A schedule\n"));
    assert!(content.contains(
        r#"schedule[Monday]="11:00-3:00|Study calculus||PLANS||[{\"name\":\"Work\",\"details\":\"Dollar General 2-6pm\"}]""#
    ));
    assert!(content.contains(r#"schedule[Tuesday]="|||PLANS||[]""#));
}

#[test]
fn second_save_keeps_a_backup_of_the_first() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut schedule = Schedule::new();
    schedule.set_day(Weekday::Fri, Day::new("9:00-10:00", "first"));
    store.save(&schedule).unwrap();
    let first = fs::read_to_string(store.layout().answers_file()).unwrap();

    schedule.set_day(Weekday::Fri, Day::new("9:00-10:00", "second"));
    store.save(&schedule).unwrap();

    let backup = fs::read_to_string(store.layout().backup_file()).unwrap();
    assert_eq!(backup, first);
    assert_eq!(
        store.load_schedule().unwrap().day(Weekday::Fri).goal(),
        Some("second")
    );
}

#[test]
fn corrupt_day_is_loaded_empty_without_losing_the_week() {
    let dir = TempDir::new().unwrap();
    write_answers(
        &dir,
        concat!(
            "declare -A schedule\n",
            "schedule[Monday]=\"9-5|ok||PLANS||[]\"\n",
            "schedule[Tuesday]=\"9-5|bad||PLANS||[{\\\"name\\\":\"\n",
            "schedule[Wednesday]=\"unterminated\n",
        ),
    );

    let report = store_in(&dir).load().unwrap();

    assert_eq!(report.schedule.day(Weekday::Mon).goal(), Some("ok"));
    assert!(report.schedule.day(Weekday::Tue).is_empty());
    assert!(report.schedule.day(Weekday::Wed).is_empty());
    assert!(report.has_corruption());
    let corrupt_days: Vec<Weekday> = report
        .issues
        .iter()
        .filter(|issue| matches!(issue, RecordIssue::Corrupt { .. }))
        .map(RecordIssue::day)
        .collect();
    assert_eq!(corrupt_days, vec![Weekday::Tue, Weekday::Wed]);
    assert!(matches!(
        report.issues[0].as_error(),
        Some(StoreError::RecordCorrupt { day: Weekday::Tue, .. })
    ));
}

#[test]
fn keyed_legacy_records_are_migrated_on_load() {
    let dir = TempDir::new().unwrap();
    write_answers(
        &dir,
        concat!(
            "declare -A schedule\n",
            "schedule[Tues]=\"11:00-3:00|Read chapter 4\"\n",
            "workSchedule[Tues]=\"Dollar General 2-6pm\"\n",
            "dayNote[Tues]=\"Pick up groceries\"\n",
        ),
    );

    let report = store_in(&dir).load().unwrap();
    let tuesday = report.schedule.day(Weekday::Tue);

    assert_eq!(tuesday.study_time(), Some("11:00-3:00"));
    assert_eq!(tuesday.goal(), Some("Read chapter 4"));
    assert_eq!(
        tuesday.plans(),
        &[
            Plan::new("Work Schedule", "Dollar General 2-6pm"),
            Plan::new("Note", "Pick up groceries"),
        ]
    );
    assert_eq!(report.issues, vec![RecordIssue::Migrated { day: Weekday::Tue }]);
}

#[test]
fn positional_legacy_records_are_migrated_on_load() {
    let dir = TempDir::new().unwrap();
    write_answers(
        &dir,
        "schedule[Thur]=\"11:00-3:00|yes|2-6pm|yes|7-10pm|Essay|Dentist at 9\"\n",
    );

    let report = store_in(&dir).load().unwrap();
    let thursday = report.schedule.day(Weekday::Thu);

    assert_eq!(thursday.goal(), Some("Essay"));
    assert_eq!(
        thursday.plans(),
        &[
            Plan::new("Work Schedule", "Dollar General 2-6pm; JJ Pizza 7-10pm"),
            Plan::new("Note", "Dentist at 9"),
        ]
    );
}

#[test]
fn mixed_records_keep_plans_and_append_legacy_fields() {
    let dir = TempDir::new().unwrap();
    write_answers(
        &dir,
        concat!(
            "schedule[Saturday]=\"|Rest||PLANS||[{\\\"name\\\":\\\"Gym\\\",\\\"details\\\":\\\"9am\\\"}]\"\n",
            "dayNote[Saturday]=\"Call grandma\"\n",
        ),
    );

    let report = store_in(&dir).load().unwrap();

    assert_eq!(
        report.schedule.day(Weekday::Sat).plans(),
        &[Plan::new("Gym", "9am"), Plan::new("Note", "Call grandma")]
    );
    assert_eq!(
        report.issues,
        vec![RecordIssue::MigrationAmbiguous { day: Weekday::Sat }]
    );
}

#[test]
fn migrated_week_saves_in_the_current_format() {
    let dir = TempDir::new().unwrap();
    write_answers(
        &dir,
        "schedule[Monday]=\"8-9|Plan\"\nworkSchedule[Monday]=\"Shift 1-5\"\n",
    );
    let store = store_in(&dir);
    let migrated = store.load_schedule().unwrap();

    store.save(&migrated).unwrap();
    let report = store.load().unwrap();

    assert_eq!(report.schedule, migrated);
    assert!(report.issues.is_empty());
    let content = fs::read_to_string(store.layout().answers_file()).unwrap();
    assert!(!content.contains("workSchedule["));
}

#[test]
fn notes_are_stored_beside_the_answers_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut schedule = Schedule::new();
    schedule.set_notes("Exam on Friday");

    store.save(&schedule).unwrap();

    assert_eq!(
        fs::read_to_string(store.layout().notes_file()).unwrap(),
        "Exam on Friday"
    );
    assert_eq!(store.load_notes().unwrap(), "Exam on Friday");
}

#[cfg(unix)]
#[test]
fn saved_files_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&build_sample_schedule()).unwrap();
    store.save(&build_sample_schedule()).unwrap();

    let layout = store.layout();
    for file in [layout.answers_file(), layout.backup_file(), layout.notes_file()] {
        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "{}", file.display());
    }
    let mode = fs::metadata(layout.answers_dir()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o700);
}

#[test]
fn unwritable_root_is_storage_unavailable() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();
    let store = FileScheduleStore::new(StoreLayout::new(&blocker));

    let err = store.save(&Schedule::new()).unwrap_err();

    assert!(matches!(err, StoreError::StorageUnavailable { .. }));
}

#[test]
fn positional_record_keeps_only_jobs_flagged_yes() {
    let dir = TempDir::new().unwrap();
    write_answers(
        &dir,
        "schedule[Sat]=\"|no|9-1|yes|5-9pm|Rest|\"\n",
    );

    let report = store_in(&dir).load().unwrap();

    assert_eq!(
        report.schedule.day(Weekday::Sat).plans(),
        &[Plan::new("Work Schedule", "JJ Pizza 5-9pm")]
    );
}

#[test]
fn invalid_utf8_day_is_reported_and_loaded_empty() {
    let dir = TempDir::new().unwrap();
    let layout = StoreLayout::new(dir.path());
    fs::create_dir_all(layout.answers_dir()).unwrap();
    fs::write(
        layout.answers_file(),
        b"schedule[Monday]=\"9-5|ok\xff||PLANS||[]\"\nschedule[Friday]=\"1-2|fine||PLANS||[]\"\n",
    )
    .unwrap();

    let report = store_in(&dir).load().unwrap();

    assert!(report.schedule.day(Weekday::Mon).is_empty());
    assert_eq!(report.schedule.day(Weekday::Fri).goal(), Some("fine"));
    assert_eq!(report.issues.len(), 1);
    assert!(matches!(
        &report.issues[0],
        RecordIssue::Corrupt { day: Weekday::Mon, reason } if reason.contains("UTF-8")
    ));
}

#[test]
fn failed_backup_leaves_the_answers_file_alone() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut schedule = Schedule::new();
    schedule.set_day(Weekday::Mon, Day::new("9-10", "first"));
    store.save(&schedule).unwrap();
    let before = fs::read_to_string(store.layout().answers_file()).unwrap();
    fs::create_dir(store.layout().backup_file()).unwrap();

    schedule.set_day(Weekday::Mon, Day::new("9-10", "second"));
    let err = store.save(&schedule).unwrap_err();

    assert!(matches!(err, StoreError::BackupFailed { .. }));
    assert_eq!(fs::read_to_string(store.layout().answers_file()).unwrap(), before);
}

#[test]
fn failed_notes_write_happens_before_the_answers_change() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut schedule = Schedule::new();
    schedule.set_day(Weekday::Mon, Day::new("9-10", "first"));
    store.save(&schedule).unwrap();
    let before = fs::read_to_string(store.layout().answers_file()).unwrap();
    fs::remove_file(store.layout().notes_file()).unwrap();
    fs::create_dir(store.layout().notes_file()).unwrap();

    schedule.set_day(Weekday::Mon, Day::new("9-10", "second"));
    schedule.set_notes("new notes");
    let err = store.save(&schedule).unwrap_err();

    assert!(matches!(err, StoreError::WriteFailed { .. }));
    assert_eq!(fs::read_to_string(store.layout().answers_file()).unwrap(), before);
    assert!(!store.layout().backup_file().exists());
}

#[test]
fn email_settings_round_trip_and_default_when_missing() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert_eq!(store.load_email_settings().unwrap(), EmailSettings::default());

    let settings = EmailSettings {
        email_to: "me@example.com".to_string(),
        smtp_port: 465,
        ..EmailSettings::default()
    };
    store.save_email_settings(&settings).unwrap();

    assert_eq!(store.load_email_settings().unwrap(), settings);
}
