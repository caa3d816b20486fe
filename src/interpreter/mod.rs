//! Operator interpreter
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter with statement execution
//! - [`errors`]: Evaluation error types
//!
//! # Execution Model
//!
//! The interpreter runs statements one at a time against a single set of
//! bindings. Each statement is first checked (see `type_system`), then
//! executed; its result or failure is recorded in the
//! [`Transcript`](crate::transcript::Transcript). A failure ends only that
//! statement.
//!
//! # Built-in Functions
//!
//! `print` is implemented directly in the interpreter. Other functions are
//! supplied by the host through [`Interpreter::register_native`].

pub mod engine;
pub mod errors;

mod builtins;
mod expressions;
mod ops;
mod type_system;

pub use engine::{Interpreter, NativeFn};
pub use errors::EvalError;
