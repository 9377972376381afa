//! Keyword buckets for the reminders artifact.
//!
//! Categories are tried in [`Category::PRIORITY`] order and the first one
//! with a trigger contained in the lower-cased plan name wins, so a name like
//! "Study break" lands in `Break`.

use crate::schedule::{Plan, Schedule};
use chrono::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Work,
    Appointment,
    Meal,
    Media,
    Sleep,
    Worship,
    Break,
    Study,
    Play,
    Other,
}

impl Category {
    /// Matching and display order. `Other` has no triggers and comes last.
    pub const PRIORITY: [Category; 10] = [
        Category::Work,
        Category::Appointment,
        Category::Meal,
        Category::Media,
        Category::Sleep,
        Category::Worship,
        Category::Break,
        Category::Study,
        Category::Play,
        Category::Other,
    ];

    pub fn triggers(self) -> &'static [&'static str] {
        match self {
            Category::Work => &["work", "dollar general", "jj", "job", "shift"],
            Category::Appointment => &["appointment", "appt", "meeting", "doctor", "dentist"],
            Category::Meal => &["eat", "meal", "lunch", "dinner", "breakfast"],
            Category::Media => &["youtube", "video", "watch", "movie"],
            Category::Sleep => &["sleep", "nap", "bedtime", "night", "rest"],
            Category::Worship => &["pray", "worship", "rosary", "meditation", "church"],
            Category::Break => &["break", "relax", "chill"],
            Category::Study => &["study", "homework", "assignment", "revision", "research"],
            Category::Play => &["play", "game", "gaming", "fun", "outside"],
            Category::Other => &[],
        }
    }

    /// Heading used in the reminders text.
    pub fn label(self) -> &'static str {
        match self {
            Category::Work => "🤯 WORK SCHEDULE",
            Category::Appointment => "📬 APPOINTMENTS",
            Category::Meal => "🍽️ EATING PLANS",
            Category::Media => "📺 YOUTUBE & MEDIA",
            Category::Sleep => "😪 SLEEPING",
            Category::Worship => "🙏 PRAYING & WORSHIP",
            Category::Break => "🛌 BREAKS & RELAXATION",
            Category::Study => "📚 STUDY PLANS",
            Category::Play => "🎮 PLAY PLANS",
            Category::Other => "📌 OTHER ACTIVITIES",
        }
    }
}

pub fn categorize(name: &str) -> Category {
    let name = name.to_lowercase();
    Category::PRIORITY
        .into_iter()
        .find(|category| {
            category
                .triggers()
                .iter()
                .any(|trigger| name.contains(trigger))
        })
        .unwrap_or(Category::Other)
}

/// A plan with the day it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPlan<'a> {
    pub day: Weekday,
    pub plan: &'a Plan,
}

/// Non-empty categories in priority order, each holding its plans in
/// calendar order.
pub type CategoryGroups<'a> = Vec<(Category, Vec<DayPlan<'a>>)>;

/// Buckets every visible plan of the week.
pub fn group_by_category(schedule: &Schedule) -> CategoryGroups<'_> {
    let mut buckets: Vec<Vec<DayPlan<'_>>> = vec![Vec::new(); Category::PRIORITY.len()];
    for (day, entry) in schedule.days() {
        for plan in entry.visible_plans() {
            let category = categorize(&plan.name);
            let slot = Category::PRIORITY
                .iter()
                .position(|candidate| *candidate == category)
                .unwrap_or(Category::PRIORITY.len() - 1);
            buckets[slot].push(DayPlan { day, plan });
        }
    }

    Category::PRIORITY
        .into_iter()
        .zip(buckets)
        .filter(|(_, plans)| !plans.is_empty())
        .collect()
}
