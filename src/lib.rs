//! # Introduction
//!
//! opplay evaluates a catalog of operator demonstrations over fixed-width
//! integers, doubles, characters, strings, booleans and ranges, recording what
//! each statement produces.  Standard arithmetic fails on overflow, the `&`
//! operators wrap, `&&`, `||` and `?:` evaluate only the operands they need,
//! and assignment produces no value.
//!
//! ## Execution pipeline
//!
//! ```text
//! ScriptBuilder → Script → check → Interpreter → Transcript → Renderer
//! ```
//!
//! 1. [`script`]: statement and expression nodes, the line-numbering builder,
//!    source rendering, and the built-in [`script::playground`] tour.
//! 2. [`interpreter`]: checks each statement, then evaluates it against the
//!    current bindings.
//! 3. [`memory`]: [`memory::FixedInt`] arithmetic, [`memory::RangeValue`],
//!    tagged [`memory::Value`]s and the [`memory::bindings::Bindings`]
//!    environment.
//! 4. [`transcript`]: per-line results, `print` output and failures, plus a
//!    [`transcript::RunSummary`] of expected versus unexpected failures.
//! 5. [`render`]: crossterm-styled rows for the `opplay` binary; not part of
//!    the stable library API.
//!
//! ## Supported operators
//!
//! Arithmetic `+ - * / %`, wrapping `&+ &- &* &/ &%`, comparison
//! `== != < <= > >=`, identity `=== !==`, logical `! && ||`, bitwise
//! `~ & | ^ << >>`, ranges `...` and `..<`, `?:`, prefix and postfix `++`/`--`,
//! unary `-`/`+`, assignment and compound assignment.

pub mod interpreter;
pub mod memory;
pub mod render;
pub mod script;
pub mod transcript;
