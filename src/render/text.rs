use super::{
    RenderOptions, banner, blank, boxed, centered, rule, section_bottom, section_top, wrap,
};
use crate::schedule::{Day, Schedule, day_name};

const GOAL_WRAP: usize = 60;
const DETAILS_WRAP: usize = 57;

/// The full week as boxed text. Every day is printed, empty ones with a
/// placeholder.
pub fn render_text(schedule: &Schedule, options: &RenderOptions) -> String {
    let mut out = banner("WEEKLY SCHEDULE", options);

    for (index, (weekday, day)) in schedule.days().enumerate() {
        out.push(section_top(&day_name(weekday).to_uppercase(), index == 0));
        push_day(&mut out, day);
    }
    out.push(section_bottom());
    out.push(String::new());

    push_summary(&mut out, schedule);

    out.push(rule('─'));
    out.push(format!(
        "Generated on {} • Schedule Maker",
        options.date_label()
    ));
    out.push(rule('─'));
    out.join("\n")
}

fn push_day(out: &mut Vec<String>, day: &Day) {
    let visible: Vec<_> = day.visible_plans().collect();
    if day.study_time().is_none() && day.goal().is_none() && visible.is_empty() {
        out.push(blank());
        out.push(boxed(&centered("No schedule set")));
        out.push(blank());
        return;
    }

    if let Some(study_time) = day.study_time() {
        out.push(blank());
        out.push(boxed("  📚 STUDY TIME"));
        for line in wrap(study_time, GOAL_WRAP) {
            out.push(boxed(&format!("     {line}")));
        }
    }

    if let Some(goal) = day.goal() {
        out.push(blank());
        out.push(boxed("  🎯 GOALS"));
        for line in wrap(goal, GOAL_WRAP) {
            out.push(boxed(&format!("     {line}")));
        }
    }

    if !visible.is_empty() {
        out.push(blank());
        out.push(boxed("  📋 PLANS & ACTIVITIES"));
        for plan in &visible {
            for (index, line) in wrap(&plan.name, DETAILS_WRAP).into_iter().enumerate() {
                let bullet = if index == 0 { "•" } else { " " };
                out.push(boxed(&format!("     {bullet} {line}")));
            }
            for line in wrap(&plan.details, DETAILS_WRAP) {
                out.push(boxed(&format!("       {line}")));
            }
        }
        if visible.len() > 1 {
            out.push(blank());
        }
    }

    if day.goal().is_none() && visible.is_empty() {
        out.push(blank());
    }
}

fn push_summary(out: &mut Vec<String>, schedule: &Schedule) {
    let mut study_hours = 0.0;
    let mut plan_count = 0;
    let mut goal_days = 0;
    for (_, day) in schedule.days() {
        study_hours += day.study_time().and_then(study_hours_in).unwrap_or(0.0);
        plan_count += day.visible_plans().count();
        if day.goal().is_some() {
            goal_days += 1;
        }
    }

    out.push(rule('═'));
    out.push(centered("WEEK SUMMARY"));
    out.push(rule('═'));
    out.push(String::new());
    out.push(format!(
        "  📊 Total Study Hours Scheduled: {study_hours:.1} hours"
    ));
    out.push(format!("  📋 Total Plans/Activities: {plan_count}"));
    out.push(format!("  🎯 Days with Goals Set: {goal_days}/7"));
    out.push(String::new());
}

/// Hours in an `H:MM-H:MM` range. An end earlier than the start is read as
/// the afternoon, so `11:00-3:00` is four hours.
pub fn study_hours_in(range: &str) -> Option<f64> {
    let (start, end) = range.trim().split_once('-')?;
    let (start_hour, start_min) = parse_clock(start)?;
    let (mut end_hour, end_min) = parse_clock(end)?;
    if end_hour < start_hour {
        end_hour += 12;
    }
    let start = f64::from(start_hour) + f64::from(start_min) / 60.0;
    let end = f64::from(end_hour) + f64::from(end_min) / 60.0;
    Some(end - start)
}

/// Leading `H:MM`; anything after the minutes (`pm`, spaces) is ignored.
fn parse_clock(value: &str) -> Option<(u32, u32)> {
    let (hour, rest) = value.trim().split_once(':')?;
    let minutes: String = rest.chars().take_while(char::is_ascii_digit).collect();
    Some((hour.parse().ok()?, minutes.parse().ok()?))
}
