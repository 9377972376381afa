use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Calendar order used for every walk over the week, independent of the
/// order days were stored in.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full weekday name used as the storage key and display label.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses a storage key. Full names are canonical; the abbreviations older
/// answer files used are accepted as well. Matching is case-sensitive.
pub fn parse_day_name(key: &str) -> Option<Weekday> {
    let day = match key {
        "Monday" | "Mon" => Weekday::Mon,
        "Tuesday" | "Tues" | "Tue" => Weekday::Tue,
        "Wednesday" | "Wed" => Weekday::Wed,
        "Thursday" | "Thur" | "Thu" => Weekday::Thu,
        "Friday" | "Fri" => Weekday::Fri,
        "Saturday" | "Sat" => Weekday::Sat,
        "Sunday" | "Sun" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    #[serde(default)]
    pub details: String,
}

impl Plan {
    pub fn new(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: details.into(),
        }
    }

    /// Renderers skip plans without details.
    pub fn is_visible(&self) -> bool {
        !self.details.trim().is_empty()
    }
}

/// One weekday's study window, goal and plans.
///
/// Empty strings are stored as absence, so a day with nothing set compares
/// equal to `Day::default()` both before and after a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Day {
    study_time: Option<String>,
    goal: Option<String>,
    plans: Vec<Plan>,
}

impl Day {
    pub fn new(study_time: impl Into<String>, goal: impl Into<String>) -> Self {
        let mut day = Self::default();
        day.set_study_time(study_time);
        day.set_goal(goal);
        day
    }

    pub fn with_plans(mut self, plans: Vec<Plan>) -> Self {
        self.plans = plans;
        self
    }

    pub fn study_time(&self) -> Option<&str> {
        self.study_time.as_deref()
    }

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn set_study_time(&mut self, study_time: impl Into<String>) {
        self.study_time = non_empty(study_time.into());
    }

    pub fn set_goal(&mut self, goal: impl Into<String>) {
        self.goal = non_empty(goal.into());
    }

    pub fn visible_plans(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter().filter(|plan| plan.is_visible())
    }

    pub fn is_empty(&self) -> bool {
        self.study_time.is_none() && self.goal.is_none() && self.plans.is_empty()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// A single week: seven days in calendar order plus free-text notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    days: [Day; 7],
    notes: String,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self, weekday: Weekday) -> &Day {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut Day {
        &mut self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn set_day(&mut self, weekday: Weekday, day: Day) {
        *self.day_mut(weekday) = day;
    }

    /// Days in calendar order, Monday first.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &Day)> {
        WEEK.iter().map(move |weekday| (*weekday, self.day(*weekday)))
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.days.iter().all(Day::is_empty)
    }
}
