//! Transcript rendering for the terminal
//!
//! Each statement is shown as its listing line number, its source and, in a
//! column to the right, what it produced. Colors come from a fixed [`Theme`].

use crate::interpreter::EvalError;
use crate::memory::Value;
use crate::script::display::render_stmt;
use crate::script::{Line, Section};
use crate::transcript::{Entry, EntryKind, RunSummary};
use crossterm::style::{Color, Stylize};

pub struct Theme {
    pub fg: Color,
    pub line_number: Color,
    pub heading: Color,   // Blue
    pub value: Color,     // Orange
    pub type_name: Color, // Cyan
    pub output: Color,    // Yellow
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub comment: Color,   // Grey
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb { r: 205, g: 214, b: 244 },
    line_number: Color::Rgb { r: 108, g: 112, b: 134 },
    heading: Color::Rgb { r: 137, g: 180, b: 250 },
    value: Color::Rgb { r: 250, g: 179, b: 135 },
    type_name: Color::Rgb { r: 148, g: 226, b: 213 },
    output: Color::Rgb { r: 249, g: 226, b: 175 },
    success: Color::Rgb { r: 166, g: 227, b: 161 },
    error: Color::Rgb { r: 243, g: 139, b: 168 },
    comment: Color::Rgb { r: 108, g: 112, b: 134 },
};

const MAX_SOURCE_COLUMN: usize = 56;
const DEFAULT_WIDTH: usize = 100;

/// Turns executed lines into styled terminal rows
pub struct Renderer {
    theme: Option<&'static Theme>,
    source_width: usize,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(DEFAULT_WIDTH);
        Renderer {
            theme: color.then_some(&DEFAULT_THEME),
            source_width: (width / 2).min(MAX_SOURCE_COLUMN),
        }
    }

    fn paint(&self, text: &str, pick: fn(&Theme) -> Color) -> String {
        match self.theme {
            Some(theme) => text.with(pick(theme)).to_string(),
            None => text.to_string(),
        }
    }

    pub fn section_header(&self, section: &Section) -> String {
        let rule = "─".repeat(self.source_width);
        format!(
            "\n{}\n{}",
            self.paint(&format!("// {}", section.title), |t| t.heading),
            self.paint(&rule, |t| t.comment)
        )
    }

    /// Rows for one top-level line, given the entries it recorded
    pub fn line(&self, line: &Line, entries: &[Entry], outcome: &Result<(), EvalError>) -> Vec<String> {
        let first = line.stmt.location().line;
        let mut rows = Vec::new();

        for (offset, source) in render_stmt(&line.stmt).iter().enumerate() {
            let number = first + offset;
            let mut notes: Vec<String> = entries
                .iter()
                .filter(|e| e.location.line == number)
                .flat_map(|e| self.annotate(&e.kind, line.expects_failure))
                .collect();
            if notes.is_empty() {
                notes.push(String::new());
            }

            for (i, note) in notes.into_iter().enumerate() {
                let (num, src) = if i == 0 {
                    (format!("{:>4}", number), source.as_str())
                } else {
                    (" ".repeat(4), "")
                };
                let padded = format!("{:<width$}", src, width = self.source_width);
                let row = format!(
                    "{}  {}  {}",
                    self.paint(&num, |t| t.line_number),
                    self.paint(&padded, |t| t.fg),
                    note
                );
                rows.push(row.trim_end().to_string());
            }
        }

        // A line marked to fail that did not is worth pointing out
        if outcome.is_ok() && line.expects_failure {
            rows.push(format!(
                "      {}",
                self.paint("!! expected this line to fail", |t| t.error)
            ));
        }
        rows
    }

    fn annotate(&self, kind: &EntryKind, expects_failure: bool) -> Vec<String> {
        match kind {
            EntryKind::Value(value) => vec![self.typed_value(value)],
            EntryKind::Declared(names) => vec![names
                .iter()
                .map(|(name, value)| format!("{} = {}", name, self.typed_value(value)))
                .collect::<Vec<_>>()
                .join(", ")],
            EntryKind::Assigned { name, value } => {
                vec![format!("{} = {}", name, self.typed_value(value))]
            }
            EntryKind::Output(text) => text
                .lines()
                .map(|l| self.paint(&format!("> {}", l), |t| t.output))
                .collect(),
            EntryKind::Failure(err) if expects_failure => vec![format!(
                "{} {}",
                self.paint("error (expected):", |t| t.comment),
                self.paint(&err.to_string(), |t| t.comment)
            )],
            EntryKind::Failure(err) => vec![format!(
                "{} {}",
                self.paint("error:", |t| t.error),
                self.paint(&err.to_string(), |t| t.error)
            )],
        }
    }

    fn typed_value(&self, value: &Value) -> String {
        format!(
            "{} : {}",
            self.paint(&value.describe(), |t| t.value),
            self.paint(&value.value_type().to_string(), |t| t.type_name)
        )
    }

    pub fn summary(&self, summary: &RunSummary) -> String {
        let expected = summary.failures - summary.unexpected_failures.len();
        let text = format!(
            "{} statements, {} failed ({} expected)",
            summary.executed, summary.failures, expected
        );
        if summary.is_clean() {
            self.paint(&text, |t| t.success)
        } else {
            let mut out = self.paint(&text, |t| t.error);
            for location in &summary.unexpected_successes {
                out.push_str(&format!("\n  {} did not fail", location));
            }
            out
        }
    }
}
