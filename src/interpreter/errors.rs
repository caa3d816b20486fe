//! Evaluation error types
//!
//! This module defines [`EvalError`], which represents every way a statement can
//! fail. Errors are local to the statement that raised it: the interpreter
//! records the failure and the next statement starts from the bindings as they
//! were left.
//!
//! [`EvalError::UseOfVoidResult`] and [`EvalError::BranchTypeMismatch`] are
//! static errors: the checker reports them before the statement runs, so a
//! rejected statement has no side effects at all.

use crate::script::ast::SourceLocation;
use thiserror::Error;

/// Errors that can occur while checking or evaluating a statement
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Standard arithmetic produced a value outside the operand type
    #[error("Arithmetic overflow in `{operation}` at {location}")]
    Overflow {
        operation: String,
        location: SourceLocation,
    },

    /// Standard integer division or remainder by zero
    #[error("{operation} at {location}")]
    DivideByZero {
        operation: String,
        location: SourceLocation,
    },

    /// Range whose lower bound exceeds its upper bound
    #[error("Invalid {kind} range `{range}`: lower bound exceeds upper bound at {location}")]
    InvalidRange {
        range: String,
        kind: &'static str,
        location: SourceLocation,
    },

    /// The value of an assignment was consumed
    #[error("Assignment `{expr}` produces no value and cannot be used as one at {location}")]
    UseOfVoidResult {
        expr: String,
        location: SourceLocation,
    },

    /// The two branches of a conditional have no common type
    #[error("Conditional branches have mismatched types {then_type} and {else_type} at {location}")]
    BranchTypeMismatch {
        then_type: String,
        else_type: String,
        location: SourceLocation,
    },

    /// Operator applied to unsupported or mismatched types
    #[error("Type error at {location}: expected {expected}, got {got}")]
    TypeMismatch {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    #[error("Undefined variable '{name}' at {location}")]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Assignment to a `let` binding
    #[error("Cannot assign to '{name}': it is a 'let' constant at {location}")]
    ConstModification {
        name: String,
        location: SourceLocation,
    },

    #[error("Index {index} out of range for array of length {len} at {location}")]
    IndexOutOfRange {
        index: i128,
        len: usize,
        location: SourceLocation,
    },

    #[error("Tuple of {arity} elements has no element {index} at {location}")]
    TupleIndexOutOfRange {
        index: usize,
        arity: usize,
        location: SourceLocation,
    },

    #[error("Undefined function '{name}' at {location}")]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    /// A host-provided function reported a failure
    #[error("Function '{function}' failed: {message} at {location}")]
    Native {
        function: String,
        message: String,
        location: SourceLocation,
    },
}

impl EvalError {
    pub fn location(&self) -> SourceLocation {
        match self {
            EvalError::Overflow { location, .. }
            | EvalError::DivideByZero { location, .. }
            | EvalError::InvalidRange { location, .. }
            | EvalError::UseOfVoidResult { location, .. }
            | EvalError::BranchTypeMismatch { location, .. }
            | EvalError::TypeMismatch { location, .. }
            | EvalError::UndefinedVariable { location, .. }
            | EvalError::ConstModification { location, .. }
            | EvalError::IndexOutOfRange { location, .. }
            | EvalError::TupleIndexOutOfRange { location, .. }
            | EvalError::UndefinedFunction { location, .. }
            | EvalError::Native { location, .. } => *location,
        }
    }

    /// Whether the error was found before the statement ran
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            EvalError::UseOfVoidResult { .. } | EvalError::BranchTypeMismatch { .. }
        )
    }

    /// Short name of the error kind, as shown in transcripts
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::Overflow { .. } => "overflow",
            EvalError::DivideByZero { .. } => "divide by zero",
            EvalError::InvalidRange { .. } => "invalid range",
            EvalError::UseOfVoidResult { .. } => "use of void result",
            EvalError::TypeMismatch { .. } | EvalError::BranchTypeMismatch { .. } => "type mismatch",
            EvalError::UndefinedVariable { .. } => "undefined variable",
            EvalError::ConstModification { .. } => "constant modification",
            EvalError::IndexOutOfRange { .. } | EvalError::TupleIndexOutOfRange { .. } => {
                "index out of range"
            }
            EvalError::UndefinedFunction { .. } => "undefined function",
            EvalError::Native { .. } => "native function",
        }
    }
}
