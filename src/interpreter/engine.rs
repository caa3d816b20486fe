// Execution engine for playground scripts

use crate::interpreter::errors::EvalError;
use crate::memory::bindings::{Binding, Bindings};
use crate::memory::{Value, ValueType};
use crate::script::ast::*;
use crate::script::{Line, Script};
use crate::transcript::{EntryKind, RunSummary, Transcript};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Host function callable from scripts
pub type NativeFn = Box<dyn FnMut(&[Value]) -> Result<Value, String>>;

pub(crate) struct NativeEntry {
    pub(crate) func: NativeFn,
    pub(crate) returns: ValueType,
}

/// Evaluates statements one at a time against a single set of bindings
pub struct Interpreter {
    /// Named values declared so far
    pub(crate) bindings: Bindings,

    /// Everything recorded while executing
    pub(crate) transcript: Transcript,

    /// Host functions by name
    pub(crate) natives: FxHashMap<String, NativeEntry>,

    /// Location of the statement being executed
    pub(crate) current_location: SourceLocation,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            bindings: Bindings::new(),
            transcript: Transcript::new(),
            natives: FxHashMap::default(),
            current_location: SourceLocation::new(1, 1),
        }
    }

    /// Make a host function callable as `name(args...)`.
    ///
    /// `returns` is the type the checker assumes for the call; a function that
    /// returns a value of another type fails the statement.
    pub fn register_native<F>(&mut self, name: &str, returns: ValueType, func: F)
    where
        F: FnMut(&[Value]) -> Result<Value, String> + 'static,
    {
        self.natives.insert(
            name.to_string(),
            NativeEntry {
                func: Box::new(func),
                returns,
            },
        );
    }

    /// Run every line of the script, top to bottom
    pub fn run(&mut self, script: &Script) -> RunSummary {
        let mut summary = RunSummary::default();
        for line in script.lines() {
            let outcome = self.execute(&line.stmt);
            summary.record(line, &outcome);
        }
        debug!(
            executed = summary.executed,
            failures = summary.failures,
            "script finished"
        );
        summary
    }

    /// Run one line and tally it
    pub fn run_line(&mut self, line: &Line, summary: &mut RunSummary) -> Result<(), EvalError> {
        let outcome = self.execute(&line.stmt);
        summary.record(line, &outcome);
        outcome
    }

    /// Check and execute one top-level statement, recording the outcome
    pub fn execute(&mut self, stmt: &Stmt) -> Result<(), EvalError> {
        let location = stmt.location();
        self.current_location = location;
        debug!(line = location.line, "executing statement");

        let outcome = self
            .check_statement(stmt)
            .and_then(|()| self.execute_statement(stmt));

        // Nested statements move current_location; entries belong to the top-level line
        match outcome {
            Ok(Some(kind)) => {
                self.transcript.record(location, kind);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                warn!(line = location.line, error = %err, "statement failed");
                self.transcript
                    .record(location, EntryKind::Failure(err.clone()));
                Err(err)
            }
        }
    }

    /// Check and evaluate an expression that must produce a value
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        self.check_value_expr(expr)?;
        self.evaluate_expr(expr)
    }

    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.bindings.value(name)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// Execute a statement; returns what the transcript should show for it
    fn execute_statement(&mut self, stmt: &Stmt) -> Result<Option<EntryKind>, EvalError> {
        self.current_location = stmt.location();

        match stmt {
            Stmt::Decl {
                pattern,
                mutable,
                annotation,
                init,
                ..
            } => {
                let declared = self.execute_declaration(pattern, *mutable, annotation.as_ref(), init)?;
                Ok(Some(EntryKind::Declared(declared)))
            }

            Stmt::Expr { expr, .. } => match expr {
                Expr::Assign { target, value } => {
                    let value = self.execute_assignment(target, value)?;
                    Ok(Some(EntryKind::Assigned {
                        name: target.clone(),
                        value,
                    }))
                }
                Expr::CompoundAssign { target, op, value } => {
                    let value = self.execute_compound_assignment(target, *op, value)?;
                    Ok(Some(EntryKind::Assigned {
                        name: target.clone(),
                        value,
                    }))
                }
                _ => {
                    let value = self.evaluate_expr(expr)?;
                    if value.is_void() {
                        Ok(None)
                    } else {
                        Ok(Some(EntryKind::Value(value)))
                    }
                }
            },

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                location,
            } => {
                let cond = self.evaluate_expr(condition)?;
                let taken = Self::value_to_bool(&cond, "if condition", *location)?;
                if taken {
                    self.execute_scoped_block(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute_scoped_block(else_branch)?;
                }
                Ok(None)
            }

            Stmt::ForIn {
                var,
                iterable,
                body,
                location,
            } => {
                self.execute_for_in(var, iterable, body, *location)?;
                Ok(None)
            }
        }
    }

    /// Nested statements record only their `print` output
    fn execute_block(&mut self, stmts: &[Stmt]) -> Result<(), EvalError> {
        for stmt in stmts {
            self.execute_statement(stmt)?;
        }
        Ok(())
    }

    fn execute_scoped_block(&mut self, stmts: &[Stmt]) -> Result<(), EvalError> {
        self.bindings.push_scope();
        let outcome = self.execute_block(stmts);
        self.bindings.pop_scope();
        outcome
    }

    fn execute_for_in(
        &mut self,
        var: &str,
        iterable: &Expr,
        body: &[Stmt],
        location: SourceLocation,
    ) -> Result<(), EvalError> {
        let items: Box<dyn Iterator<Item = Value>> = match self.evaluate_expr(iterable)? {
            Value::Range(range) => Box::new(range.iter().map(Value::Int)),
            Value::Array(items) => Box::new((0..items.len()).map(move |i| items[i].clone())),
            Value::Str(s) => Box::new(s.chars().collect::<Vec<_>>().into_iter().map(Value::Char)),
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: "range, array or string to iterate".to_string(),
                    got: other.value_type().to_string(),
                    location,
                })
            }
        };

        let mut iterations = 0usize;
        for item in items {
            let ty = item.value_type();
            self.bindings.push_scope();
            self.bindings.declare(var, Binding::new(item, ty, true));
            let outcome = self.execute_block(body);
            self.bindings.pop_scope();
            outcome?;
            iterations += 1;
        }
        debug!(var, iterations, "loop finished");
        Ok(())
    }

    /// Interpret a value as a condition
    pub(crate) fn value_to_bool(
        value: &Value,
        what: &str,
        location: SourceLocation,
    ) -> Result<bool, EvalError> {
        value.as_bool().ok_or_else(|| EvalError::TypeMismatch {
            expected: format!("Bool for {}", what),
            got: value.value_type().to_string(),
            location,
        })
    }
}
