//! Upgrades day records written before plan lists existed.
//!
//! Older answer files stored a single work schedule string and a single day
//! note next to the study time and goal. Both become ordinary plans, appended
//! after any plans the record already carries, so no user text is dropped.

use crate::schedule::{Day, Plan};

pub const WORK_SCHEDULE_PLAN: &str = "Work Schedule";
pub const NOTE_PLAN: &str = "Note";

/// Pre-plan-list shape of a day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyDayRecord {
    pub study_time: String,
    pub goal: String,
    pub work_schedule: String,
    pub day_note: String,
    /// Plan list found alongside the legacy fields, if the record had one.
    pub plans: Option<Vec<Plan>>,
}

impl LegacyDayRecord {
    /// A record carrying both a plan list and legacy fields.
    pub fn is_ambiguous(&self) -> bool {
        self.plans.is_some()
    }
}

/// A decoded day record, classified once at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    Current(Day),
    Legacy(LegacyDayRecord),
}

impl RawRecord {
    /// Classifies the fields found for one day. Legacy fields that are
    /// present but empty carry nothing to migrate and do not make a record
    /// legacy.
    pub fn classify(
        study_time: String,
        goal: String,
        plans: Option<Vec<Plan>>,
        work_schedule: Option<String>,
        day_note: Option<String>,
    ) -> Self {
        let work_schedule = work_schedule.unwrap_or_default();
        let day_note = day_note.unwrap_or_default();
        if work_schedule.is_empty() && day_note.is_empty() {
            let day = Day::new(study_time, goal).with_plans(plans.unwrap_or_default());
            return RawRecord::Current(day);
        }
        RawRecord::Legacy(LegacyDayRecord {
            study_time,
            goal,
            work_schedule,
            day_note,
            plans,
        })
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, RawRecord::Legacy(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        match self {
            RawRecord::Legacy(record) => record.is_ambiguous(),
            RawRecord::Current(_) => false,
        }
    }
}

impl From<Day> for RawRecord {
    fn from(day: Day) -> Self {
        RawRecord::Current(day)
    }
}

/// Converts any record into the current `Day` shape. Current records pass
/// through untouched.
pub fn migrate(record: RawRecord) -> Day {
    match record {
        RawRecord::Current(day) => day,
        RawRecord::Legacy(legacy) => {
            let mut plans = legacy.plans.unwrap_or_default();
            if !legacy.work_schedule.is_empty() {
                plans.push(Plan::new(WORK_SCHEDULE_PLAN, legacy.work_schedule));
            }
            if !legacy.day_note.is_empty() {
                plans.push(Plan::new(NOTE_PLAN, legacy.day_note));
            }
            Day::new(legacy.study_time, legacy.goal).with_plans(plans)
        }
    }
}
