//! Playground scripts
//!
//! A [`Script`] is an ordered list of titled [`Section`]s, each holding the
//! top-level statements of one demonstration. Scripts are built in Rust rather
//! than parsed from text:
//!
//! - [`ast`]: expression and statement nodes
//! - [`build`]: constructors for expressions and the line-numbering [`ScriptBuilder`]
//! - [`display`]: renders nodes back to the playground's surface syntax
//! - [`playground`]: the built-in operator tour

pub mod ast;
pub mod build;
pub mod display;
pub mod playground;

pub use build::{BlockBuilder, ScriptBuilder};

use ast::Stmt;

/// A top-level statement and whether it is meant to fail
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub stmt: Stmt,
    pub expects_failure: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub first_line: usize,
    pub lines: Vec<Line>,
}

impl Section {
    /// Case-insensitive title match
    pub fn matches(&self, filter: &str) -> bool {
        self.title.to_lowercase().contains(&filter.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub sections: Vec<Section>,
}

impl Script {
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.sections.iter().flat_map(|s| s.lines.iter())
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}
