// Transcript of evaluated statements

use crate::interpreter::errors::EvalError;
use crate::memory::Value;
use crate::script::ast::SourceLocation;
use crate::script::Line;

/// What a statement left behind
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    /// Result of an expression statement
    Value(Value),
    /// Names introduced by a declaration, in pattern order
    Declared(Vec<(String, Value)>),
    /// New value after an assignment, compound assignment
    Assigned { name: String, value: Value },
    /// Text written by `print`, one line per call
    Output(String),
    Failure(EvalError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub location: SourceLocation,
    pub kind: EntryKind,
}

/// Append-only record of everything the interpreter produced
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    muted: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// While muted, nothing is recorded
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn record(&mut self, location: SourceLocation, kind: EntryKind) {
        if !self.muted {
            self.entries.push(Entry { location, kind });
        }
    }

    /// Print a line; consecutive prints from the same source line share an entry
    pub fn print(&mut self, text: &str, location: SourceLocation) {
        if self.muted {
            return;
        }
        if let Some(Entry {
            location: last_location,
            kind: EntryKind::Output(buffer),
        }) = self.entries.last_mut()
        {
            if last_location.line == location.line {
                buffer.push_str(text);
                buffer.push('\n');
                return;
            }
        }
        self.entries.push(Entry {
            location,
            kind: EntryKind::Output(format!("{}\n", text)),
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Everything printed, one string per line
    pub fn output_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| match &e.kind {
                EntryKind::Output(text) => Some(text),
                _ => None,
            })
            .flat_map(|text| text.lines().map(str::to_string))
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EvalError> {
        self.entries.iter().filter_map(|e| match &e.kind {
            EntryKind::Failure(err) => Some(err),
            _ => None,
        })
    }

    /// Entries recorded for one listing line
    pub fn at_line(&self, line: usize) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |e| e.location.line == line)
    }
}

/// Tally of a run against the script's expectations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub executed: usize,
    pub failures: usize,
    /// Failures on lines not marked as expected to fail
    pub unexpected_failures: Vec<EvalError>,
    /// Lines expected to fail that succeeded
    pub unexpected_successes: Vec<SourceLocation>,
}

impl RunSummary {
    pub fn record(&mut self, line: &Line, outcome: &Result<(), EvalError>) {
        self.executed += 1;
        match (outcome, line.expects_failure) {
            (Err(err), expected) => {
                self.failures += 1;
                if !expected {
                    self.unexpected_failures.push(err.clone());
                }
            }
            (Ok(()), true) => self.unexpected_successes.push(line.stmt.location()),
            (Ok(()), false) => {}
        }
    }

    /// True when every line behaved as the script says it should
    pub fn is_clean(&self) -> bool {
        self.unexpected_failures.is_empty() && self.unexpected_successes.is_empty()
    }
}
