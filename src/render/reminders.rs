use super::{RenderOptions, banner, blank, boxed, centered, rule, section_bottom, section_top, wrap};
use crate::categorize::{CategoryGroups, group_by_category};
use crate::schedule::{Schedule, day_name};

const GOAL_WIDTH: usize = 54;
const NAME_WIDTH: usize = 25;
const DETAILS_WIDTH: usize = 23;

/// Goals, then plans grouped by category. Categories without plans are left
/// out.
pub fn render_reminders(schedule: &Schedule, options: &RenderOptions) -> String {
    let mut out = banner("WEEKLY GOALS & REMINDERS", options);

    let goals: Vec<_> = schedule
        .days()
        .filter_map(|(weekday, day)| day.goal().map(|goal| (weekday, goal)))
        .collect();
    let groups = group_by_category(schedule);

    if goals.is_empty() && groups.is_empty() {
        out.push(format!("┌{}┐", rule('─')));
        out.push(blank());
        out.push(boxed(&centered("No specific goals or plans set for this week")));
        out.push(blank());
        out.push(section_bottom());
    } else {
        if !goals.is_empty() {
            out.push(section_top("🎯 WEEKLY GOALS", true));
            out.push(blank());
            for (weekday, goal) in goals {
                for (index, line) in wrap(goal, GOAL_WIDTH).into_iter().enumerate() {
                    let label = if index == 0 { day_name(weekday) } else { "" };
                    out.push(boxed(&format!("  {label:<12} {line}")));
                }
                out.push(blank());
            }
            out.push(section_bottom());
            out.push(String::new());
        }
        if !groups.is_empty() {
            push_plans(&mut out, &groups);
        }
    }

    out.push(String::new());
    out.push(rule('═'));
    out.join("\n")
}

fn push_plans(out: &mut Vec<String>, groups: &CategoryGroups<'_>) {
    out.push(section_top("📋 WEEKLY PLANS", true));
    out.push(blank());
    for (category, plans) in groups {
        let label = category.label();
        out.push(boxed(&format!("  {label}")));
        let underline: String = std::iter::repeat_n('─', label.chars().count()).collect();
        out.push(boxed(&format!("  {underline}")));
        for entry in plans {
            let name: String = entry.plan.name.chars().take(NAME_WIDTH).collect();
            let details: String = entry.plan.details.chars().take(DETAILS_WIDTH).collect();
            out.push(boxed(&format!(
                "  • {:<10} {name:<NAME_WIDTH$} {details}",
                day_name(entry.day)
            )));
        }
        out.push(blank());
    }
    out.push(section_bottom());
}
