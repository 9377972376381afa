use crate::schedule::Schedule;
use chrono::NaiveDate;
use std::fmt;

pub mod html;
pub mod reminders;
pub mod text;

pub use html::{inline_css, render_html, render_html_markup};
pub use reminders::render_reminders;
pub use text::render_text;

/// Inner width of the boxed text layouts.
pub(crate) const BOX_WIDTH: usize = 71;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Date printed in headers and footers. Renderers never read the clock.
    pub generated_on: NaiveDate,
}

impl RenderOptions {
    pub fn new(generated_on: NaiveDate) -> Self {
        Self { generated_on }
    }

    pub(crate) fn date_label(&self) -> String {
        self.generated_on.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug)]
pub enum RenderError {
    InlineFailed(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InlineFailed(msg) => write!(f, "css inlining failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub text: String,
    pub reminders: String,
    pub html: String,
}

pub fn render_all(schedule: &Schedule, options: &RenderOptions) -> Artifacts {
    Artifacts {
        text: render_text(schedule, options),
        reminders: render_reminders(schedule, options),
        html: render_html(schedule, options),
    }
}

/// Greedy word wrap. Words longer than `width` are split.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

pub(crate) fn boxed(content: &str) -> String {
    format!("│{content:<BOX_WIDTH$}│")
}

pub(crate) fn blank() -> String {
    boxed("")
}

pub(crate) fn centered(content: &str) -> String {
    format!("{content:^BOX_WIDTH$}")
}

pub(crate) fn rule(fill: char) -> String {
    std::iter::repeat_n(fill, BOX_WIDTH).collect()
}

/// `┌──── TITLE ────┐`, or the `├`/`┤` variant between sections.
pub(crate) fn section_top(title: &str, first: bool) -> String {
    let (left, right) = if first { ('┌', '┐') } else { ('├', '┤') };
    format!("{left}{:─^BOX_WIDTH$}{right}", format!(" {title} "))
}

pub(crate) fn section_bottom() -> String {
    format!("└{}┘", rule('─'))
}

pub(crate) fn banner(title: &str, options: &RenderOptions) -> Vec<String> {
    vec![
        format!("╔{}╗", rule('═')),
        format!("║{}║", centered(title)),
        format!("║{}║", centered(&options.date_label())),
        format!("╚{}╝", rule('═')),
        String::new(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        assert_eq!(
            wrap("alpha beta gamma delta", 11),
            vec!["alpha beta", "gamma delta"]
        );
    }

    #[test]
    fn wrap_splits_overlong_words() {
        assert_eq!(wrap("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn boxed_lines_share_a_width() {
        let first = section_top("MONDAY", true);
        let bottom = section_bottom();
        assert_eq!(first.chars().count(), bottom.chars().count());
        assert_eq!(boxed("x").chars().count(), bottom.chars().count());
    }
}
