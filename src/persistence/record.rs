//! Codec for the answers file.
//!
//! The file is a bash fragment: one `schedule[Day]="..."` assignment per day.
//! Each value packs `studyTime|goal||PLANS||[json plans]`. Two layers of
//! escaping keep that packing lossless:
//!
//! * fields: `\` and `|` inside study time and goal are backslash-escaped,
//!   so neither the separator nor the sentinel can appear in user text;
//! * quoting: `\`, `"`, newline and carriage return are escaped inside the
//!   double quotes, so every assignment stays on one line.
//!
//! Older files are read as well: keyed `workSchedule[Day]` / `dayNote[Day]`
//! assignments, and the positional
//! `studyTime|dgWork|dgHours|jjWork|jjHours|goal|dayNote` layout.

use super::StoreResult;
use crate::migration::RawRecord;
use crate::schedule::{Day, Plan, Schedule, WEEK, day_name, parse_day_name};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

pub const PLAN_SENTINEL: &str = "||PLANS||";
const FIELD_SEPARATOR: char = '|';

const SCHEDULE_KEY: &str = "schedule";
const WORK_SCHEDULE_KEY: &str = "workSchedule";
const DAY_NOTE_KEY: &str = "dayNote";

/// Raw assignments found for one day before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayFields {
    pub record: Option<String>,
    pub work_schedule: Option<String>,
    pub day_note: Option<String>,
    /// Set when one of the day's assignments could not be unquoted.
    pub error: Option<String>,
}

impl DayFields {
    pub fn is_present(&self) -> bool {
        self.record.is_some()
            || self.work_schedule.is_some()
            || self.day_note.is_some()
            || self.error.is_some()
    }
}

/// Encodes one day as the unquoted record value.
pub fn encode_day(day: &Day) -> StoreResult<String> {
    let study_time = day.study_time().unwrap_or_default();
    let goal = day.goal().unwrap_or_default();
    let plans = serde_json::to_string(day.plans())?;
    Ok(format!(
        "{}{FIELD_SEPARATOR}{}{PLAN_SENTINEL}{plans}",
        escape_field(study_time),
        escape_field(goal)
    ))
}

/// Decodes the assignments for one day into a classified record.
pub fn decode_day(fields: &DayFields) -> Result<RawRecord, String> {
    if let Some(err) = &fields.error {
        return Err(err.clone());
    }

    let record = fields.record.as_deref().unwrap_or_default();
    let (parts, plan_tail) = split_record(record);

    let mut work_schedule = fields.work_schedule.clone();
    let mut day_note = fields.day_note.clone();

    let (study_time, goal, plans) = match plan_tail {
        Some(tail) => {
            let (study_time, goal) = study_and_goal(parts);
            (study_time, goal, Some(decode_plans(tail)?))
        }
        None if parts.len() >= 7 => {
            let positional = PositionalRecord::from_parts(parts);
            if work_schedule.as_deref().is_none_or(str::is_empty) {
                work_schedule = Some(positional.work_schedule());
            }
            if day_note.as_deref().is_none_or(str::is_empty) {
                day_note = Some(positional.day_note);
            }
            (positional.study_time, positional.goal, None)
        }
        None => {
            let (study_time, goal) = study_and_goal(parts);
            (study_time, goal, None)
        }
    };

    Ok(RawRecord::classify(
        study_time,
        goal,
        plans,
        work_schedule,
        day_note,
    ))
}

fn study_and_goal(mut parts: Vec<String>) -> (String, String) {
    if parts.is_empty() {
        return (String::new(), String::new());
    }
    let study_time = parts.remove(0);
    // Files written before separators were escaped can hold a bare `|` in
    // the goal; keep it rather than dropping the tail.
    let goal = parts.join("|");
    (study_time, goal)
}

/// Employers of the two job slots in the positional layout, in field order.
const POSITIONAL_JOBS: [&str; 2] = ["Dollar General", "JJ Pizza"];

/// `studyTime|dgWork|dgHours|jjWork|jjHours|goal|dayNote`
struct PositionalRecord {
    study_time: String,
    jobs: [(String, String); 2],
    goal: String,
    day_note: String,
}

impl PositionalRecord {
    fn from_parts(mut parts: Vec<String>) -> Self {
        let day_note = parts.drain(6..).collect::<Vec<_>>().join("|");
        let mut fields = parts.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        let study_time = next();
        let jobs = [(next(), next()), (next(), next())];
        let goal = next();
        Self {
            study_time,
            jobs,
            goal,
            day_note,
        }
    }

    /// `Dollar General 2-6pm; JJ Pizza 7-10pm` for every job flagged `yes`.
    fn work_schedule(&self) -> String {
        POSITIONAL_JOBS
            .iter()
            .zip(&self.jobs)
            .filter(|(_, (flag, hours))| flag.trim() == "yes" && !hours.trim().is_empty())
            .map(|(employer, (_, hours))| format!("{employer} {}", hours.trim()))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn decode_plans(tail: &str) -> Result<Vec<Plan>, String> {
    let tail = tail.trim();
    if tail.is_empty() {
        return Ok(Vec::new());
    }
    let value: Value =
        serde_json::from_str(tail).map_err(|err| format!("invalid plans json: {err}"))?;
    let Value::Array(items) = value else {
        return Err("plans json is not an array".to_string());
    };

    let mut plans = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(map) = &item else {
            warn!(%item, "skipping non-object plan item");
            continue;
        };
        let name = map.get("name").and_then(Value::as_str).unwrap_or_default();
        if name.is_empty() {
            warn!(%item, "skipping plan item without a name");
            continue;
        }
        let details = map.get("details").and_then(Value::as_str).unwrap_or_default();
        plans.push(Plan::new(name, details));
    }
    Ok(plans)
}

/// Splits a record into its escaped `|`-separated fields and, if the plan
/// sentinel is present, the raw json tail after it.
fn split_record(record: &str) -> (Vec<String>, Option<&str>) {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = record.char_indices();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped)) => current.push(escaped),
                None => current.push('\\'),
            },
            FIELD_SEPARATOR => {
                if record[idx..].starts_with(PLAN_SENTINEL) {
                    parts.push(current);
                    return (parts, Some(&record[idx + PLAN_SENTINEL.len()..]));
                }
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    parts.push(current);
    (parts, None)
}

fn escape_field(value: &str) -> String {
    if value.contains(FIELD_SEPARATOR) {
        debug!("escaping reserved separator in stored text");
    }
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\\' || ch == FIELD_SEPARATOR {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Wraps a value in double quotes with bash-compatible escapes.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '$' => out.push_str("\\$"),
            '`' => out.push_str("\\`"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Reverses [`quote`]. Unknown escapes keep their backslash, as bash does
/// inside double quotes.
pub fn unquote(input: &str) -> Result<String, String> {
    let input = input.trim();
    let Some(body) = input.strip_prefix('"') else {
        return Err("value is not double-quoted".to_string());
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => {
                let rest = body[idx + 1..].trim();
                if !rest.is_empty() && !rest.starts_with('#') {
                    return Err(format!("unexpected text after closing quote: '{rest}'"));
                }
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, escaped @ ('\\' | '"' | '$' | '`'))) => out.push(escaped),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err("dangling escape at end of value".to_string()),
            },
            _ => out.push(ch),
        }
    }
    Err("missing closing quote".to_string())
}

/// Collects per-day assignments from an answers file, in calendar order.
/// Lines that are not day assignments are ignored.
pub fn parse_answers(content: &str) -> [DayFields; 7] {
    parse_answers_bytes(content.as_bytes())
}

/// Like [`parse_answers`], but decodes each line on its own. A line that is
/// not valid UTF-8 marks its day as unreadable instead of being repaired.
pub fn parse_answers_bytes(content: &[u8]) -> [DayFields; 7] {
    let mut days: [DayFields; 7] = Default::default();

    for raw in content.split(|byte| *byte == b'\n') {
        match std::str::from_utf8(raw) {
            Ok(line) => parse_line(&mut days, line),
            Err(err) => {
                // Names and keys are ASCII, so the assignment is still
                // identifiable from a lossy copy.
                let lossy = String::from_utf8_lossy(raw);
                let Some((name, key, _)) = split_assignment(&lossy) else {
                    warn!("skipping undecodable line");
                    continue;
                };
                let Some(weekday) = parse_day_name(key) else {
                    warn!(key, "skipping undecodable line for unknown day");
                    continue;
                };
                days[weekday.num_days_from_monday() as usize].error = Some(format!(
                    "{name}[{key}]: invalid UTF-8 after byte {}",
                    err.valid_up_to()
                ));
            }
        }
    }
    days
}

fn parse_line(days: &mut [DayFields; 7], line: &str) {
    let Some((name, key, value)) = split_assignment(line) else {
        return;
    };
    let Some(weekday) = parse_day_name(key) else {
        warn!(key, "ignoring assignment for unknown day");
        return;
    };
    let fields = &mut days[weekday.num_days_from_monday() as usize];
    let value = match unquote(value) {
        Ok(value) => value,
        Err(reason) => {
            fields.error = Some(format!("{name}[{key}]: {reason}"));
            return;
        }
    };
    match name {
        SCHEDULE_KEY => fields.record = Some(value),
        WORK_SCHEDULE_KEY => fields.work_schedule = Some(value),
        DAY_NOTE_KEY => fields.day_note = Some(value),
        _ => debug!(name, "ignoring unrelated assignment"),
    }
}

/// `name[Key]=value` → `(name, Key, value)`
fn split_assignment(line: &str) -> Option<(&str, &str, &str)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let (name, rest) = line.split_once('[')?;
    let (key, rest) = rest.split_once(']')?;
    let value = rest.strip_prefix('=')?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((name, key.trim(), value))
}

/// Renders the full answers file for a schedule.
pub fn write_answers(schedule: &Schedule, saved_on: NaiveDate) -> StoreResult<String> {
    let mut out = String::new();
    out.push_str(&format!(
        "# Schedule data saved on {}\n",
        saved_on.format("%Y-%m-%d")
    ));
    out.push_str("days=(\n");
    for weekday in WEEK {
        out.push_str(&format!("  \"{}\"\n", day_name(weekday)));
    }
    out.push_str(")\n\n");
    out.push_str("declare -A schedule\n");
    for (weekday, day) in schedule.days() {
        let record = encode_day(day)?;
        out.push_str(&format!(
            "{SCHEDULE_KEY}[{}]={}\n",
            day_name(weekday),
            quote(&record)
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::migrate;

    fn decode(record: &str) -> RawRecord {
        let fields = DayFields {
            record: Some(record.to_string()),
            ..DayFields::default()
        };
        decode_day(&fields).unwrap()
    }

    #[test]
    fn decodes_current_record() {
        let raw = decode(
            r#"11:00-3:00|Study calculus||PLANS||[{"name":"Work","details":"Dollar General 2-6pm"}]"#,
        );
        let RawRecord::Current(day) = raw else {
            panic!("expected current record");
        };
        assert_eq!(day.study_time(), Some("11:00-3:00"));
        assert_eq!(day.goal(), Some("Study calculus"));
        assert_eq!(day.plans(), &[Plan::new("Work", "Dollar General 2-6pm")]);
    }

    #[test]
    fn sentinel_inside_goal_survives() {
        let day = Day::new("a|b\\", "x||PLANS||y|");
        let encoded = encode_day(&day).unwrap();
        assert_eq!(migrate(decode(&encoded)), day);
    }

    #[test]
    fn quote_round_trips_control_and_shell_characters() {
        let value = "line one\nline \"two\"\r\\ $HOME `cmd`";
        let quoted = quote(value);
        assert!(!quoted.contains('\n'));
        assert_eq!(unquote(&quoted).unwrap(), value);
    }

    #[test]
    fn unquote_rejects_unterminated_values() {
        assert!(unquote("\"open").is_err());
        assert!(unquote("bare").is_err());
    }

    #[test]
    fn positional_legacy_record_becomes_legacy() {
        let raw = decode("11:00-3:00|yes|2-6pm|no||Finish essay|Call mom");
        let RawRecord::Legacy(legacy) = raw else {
            panic!("expected legacy record");
        };
        assert_eq!(legacy.study_time, "11:00-3:00");
        assert_eq!(legacy.goal, "Finish essay");
        assert_eq!(legacy.work_schedule, "Dollar General 2-6pm");
        assert_eq!(legacy.day_note, "Call mom");
        assert_eq!(legacy.plans, None);
    }

    #[test]
    fn invalid_utf8_marks_only_its_day() {
        let days = parse_answers_bytes(
            b"schedule[Monday]=\"9-5|ok\xff||PLANS||[]\"\nschedule[Tuesday]=\"9-5|fine||PLANS||[]\"\n",
        );
        assert!(days[0].error.is_some());
        assert_eq!(days[0].record, None);
        assert_eq!(days[1].record.as_deref(), Some("9-5|fine||PLANS||[]"));
    }

    #[test]
    fn malformed_plans_json_is_an_error() {
        let fields = DayFields {
            record: Some("9-5|goal||PLANS||[{\"name\":".to_string()),
            ..DayFields::default()
        };
        assert!(decode_day(&fields).is_err());
    }

    #[test]
    fn nameless_plan_items_are_skipped() {
        let raw = decode(r#"||PLANS||[{"name":"","details":"x"},3,{"name":"Gym"}]"#);
        assert_eq!(migrate(raw).plans(), &[Plan::new("Gym", "")]);
    }
}
