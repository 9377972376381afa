//! HTML email body.
//!
//! Markup is table based and styled through a `<style>` block. The finished
//! document then goes through a CSS inlining pass so clients that strip
//! `<style>` still see the layout.

use super::{RenderError, RenderOptions};
use crate::schedule::{Day, Schedule, WEEK, day_name};
use chrono::Weekday;
use css_inline::CSSInliner;
use tracing::{debug, error};

const DAYS_PER_ROW: usize = 3;

/// Fixed accent colour for each weekday.
pub fn day_color(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "#3b82f6",
        Weekday::Tue => "#8b5cf6",
        Weekday::Wed => "#10b981",
        Weekday::Thu => "#f59e0b",
        Weekday::Fri => "#ef4444",
        Weekday::Sat => "#6366f1",
        Weekday::Sun => "#ec4899",
    }
}

fn day_class(day: Weekday) -> String {
    format!("day-{}", day_name(day).to_lowercase())
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Rendered email with CSS inlined. If inlining fails the un-inlined markup
/// is returned instead.
pub fn render_html(schedule: &Schedule, options: &RenderOptions) -> String {
    inline_or_fallback(render_html_markup(schedule, options), inline_css)
}

pub(crate) fn inline_or_fallback(
    markup: String,
    inline: impl FnOnce(&str) -> Result<String, RenderError>,
) -> String {
    match inline(&markup) {
        Ok(inlined) => {
            debug!("inlined email css");
            inlined
        }
        Err(err) => {
            error!(%err, "falling back to html without inlined css");
            markup
        }
    }
}

/// Moves stylesheet rules onto the elements they select. `<style>` blocks
/// are kept for clients that honour media queries.
pub fn inline_css(html: &str) -> Result<String, RenderError> {
    let inliner = CSSInliner::options()
        .keep_style_tags(true)
        .load_remote_stylesheets(false)
        .build();
    inliner
        .inline(html)
        .map_err(|err| RenderError::InlineFailed(err.to_string()))
}

/// The email markup before inlining.
pub fn render_html_markup(schedule: &Schedule, options: &RenderOptions) -> String {
    let date = options.date_label();
    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Weekly Schedule - {date}</title>
<style type="text/css">
{css}
</style>
</head>
<body>
<table class="wrapper" cellpadding="0" cellspacing="0" border="0" width="100%">
<tr><td class="wrapper-cell" align="center">
<table class="container" cellpadding="0" cellspacing="0" border="0" width="100%">
<tr><td class="header">
<h1 class="title">My Weekly Schedule</h1>
<p class="subtitle">{date}</p>
</td></tr>
<tr><td class="content">
<table class="grid" cellpadding="0" cellspacing="0" border="0" width="100%">
"#,
        css = stylesheet()
    ));

    for (row_index, row) in WEEK.chunks(DAYS_PER_ROW).enumerate() {
        if row_index > 0 {
            html.push_str("<tr><td class=\"row-gap\" colspan=\"3\"></td></tr>\n");
        }
        html.push_str("<tr>\n");
        for weekday in row {
            push_day(&mut html, *weekday, schedule.day(*weekday));
        }
        for _ in row.len()..DAYS_PER_ROW {
            html.push_str("<td class=\"day-column\" width=\"33%\"></td>\n");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");

    let notes = schedule.notes().trim();
    if !notes.is_empty() {
        html.push_str(&format!(
            r#"<table class="notes" cellpadding="0" cellspacing="0" border="0" width="100%">
<tr><td class="notes-cell">
<h3 class="notes-title">Additional Notes</h3>
<pre class="notes-body">{}</pre>
</td></tr>
</table>
"#,
            escape_html(notes)
        ));
    }

    html.push_str(&format!(
        r#"</td></tr>
<tr><td class="footer"><p class="footer-text">Schedule generated on {date}</p></td></tr>
</table>
</td></tr>
</table>
</body>
</html>
"#
    ));
    html
}

fn push_day(html: &mut String, weekday: Weekday, day: &Day) {
    let class = day_class(weekday);
    html.push_str(&format!(
        r#"<td class="day-column" width="33%" valign="top">
<table class="day-table" cellpadding="0" cellspacing="0" border="0" width="100%">
<tr><td class="day-header {class}-header"><h3 class="day-name">{name}</h3></td></tr>
<tr><td class="day-body">
"#,
        name = day_name(weekday)
    ));

    let mut entries: Vec<(&str, &str)> = Vec::new();
    if let Some(study_time) = day.study_time() {
        entries.push(("Study Time", study_time));
    }
    if let Some(goal) = day.goal() {
        entries.push(("Goals", goal));
    }
    for plan in day.visible_plans() {
        entries.push((plan.name.as_str(), plan.details.as_str()));
    }

    if entries.is_empty() {
        html.push_str("<p class=\"empty\">No schedule set</p>\n");
    }
    for (label, value) in entries {
        html.push_str(&format!(
            r#"<table class="entry" cellpadding="0" cellspacing="0" border="0" width="100%">
<tr><td class="entry-cell {class}-accent">
<p class="entry-label">{}</p>
<p class="entry-value">{}</p>
</td></tr>
</table>
"#,
            escape_html(label),
            escape_html(value)
        ));
    }

    html.push_str("</td></tr>\n</table>\n</td>\n");
}

fn stylesheet() -> String {
    let mut css = String::from(
        "body { margin: 0; padding: 0; background-color: #f6f9fc; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; }
table { border-collapse: collapse; }
.wrapper { background-color: #f6f9fc; }
.wrapper-cell { padding: 40px 20px; }
.container { max-width: 800px; background-color: #ffffff; border-radius: 8px; }
.header { padding: 40px 30px; text-align: center; background-color: #1a365d; border-radius: 8px 8px 0 0; }
.title { margin: 0; color: #ffffff; font-size: 28px; font-weight: 700; line-height: 1.2; }
.subtitle { margin: 10px 0 0 0; color: #e2e8f0; font-size: 16px; }
.content { padding: 30px; }
.row-gap { height: 10px; }
.day-column { padding: 0 5px 15px 5px; }
.day-table { background-color: #ffffff; border: 1px solid #e5e7eb; border-radius: 6px; }
.day-header { padding: 12px 15px; text-align: center; }
.day-name { margin: 0; color: #ffffff; font-size: 18px; font-weight: 600; }
.day-body { padding: 15px; }
.entry { margin-bottom: 12px; }
.entry-cell { padding-left: 12px; }
.entry-label { margin: 0 0 4px 0; color: #374151; font-size: 14px; font-weight: 600; }
.entry-value { margin: 0; color: #6b7280; font-size: 13px; }
.empty { margin: 0; padding: 8px 0; color: #9ca3af; font-size: 13px; font-style: italic; text-align: center; }
.notes { margin-top: 30px; }
.notes-cell { background-color: #f9fafb; border: 1px solid #e5e7eb; border-radius: 6px; padding: 20px; }
.notes-title { margin: 0 0 12px 0; color: #1f2937; font-size: 18px; font-weight: 600; }
.notes-body { margin: 0; color: #4b5563; font-size: 14px; white-space: pre-wrap; word-wrap: break-word; }
.footer { padding: 30px; text-align: center; border-top: 1px solid #e5e7eb; }
.footer-text { margin: 0; color: #6b7280; font-size: 13px; }
",
    );
    for weekday in WEEK {
        let class = day_class(weekday);
        let color = day_color(weekday);
        css.push_str(&format!(
            ".{class}-header {{ background-color: {color}; }}\n.{class}-accent {{ border-left: 3px solid {color}; }}\n"
        ));
    }
    css.push_str(
        "@media screen and (max-width: 600px) {
  .container { width: 100% !important; }
  .day-column { width: 100% !important; display: block !important; }
}",
    );
    css
}
