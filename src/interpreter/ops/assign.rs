//! Declarations and assignment
//!
//! This module provides the operations that write bindings:
//!
//! - `let` / `var` declarations, including tuple decomposition
//! - Plain assignment `name = value`
//! - Compound assignment `name op= value`
//! - The shared variable store used by `++` and `--`
//!
//! # Typing
//!
//! A binding keeps the type it was declared with. The value written by any
//! later assignment must have exactly that type; integer literals on the right
//! adopt it, so `x = 300` into a `UInt8` is an overflow rather than a type
//! error.
//!
//! Assignment produces no value. Using one where a value is needed is rejected
//! before the statement runs (see the checker in `type_system`).

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::EvalError;
use crate::memory::bindings::Binding;
use crate::memory::{Value, ValueType};
use crate::script::ast::*;

impl Interpreter {
    /// Declare the names in `pattern`; returns them with their values
    pub(crate) fn execute_declaration(
        &mut self,
        pattern: &Pattern,
        mutable: bool,
        annotation: Option<&ValueType>,
        init: &Expr,
    ) -> Result<Vec<(String, Value)>, EvalError> {
        let location = self.current_location;
        let value = self.evaluate_with_hint(init, annotation)?;
        let value_type = value.value_type();

        if let Some(expected) = annotation {
            if *expected != value_type {
                return Err(EvalError::TypeMismatch {
                    expected: expected.to_string(),
                    got: value_type.to_string(),
                    location,
                });
            }
        }
        if value.is_void() {
            return Err(EvalError::TypeMismatch {
                expected: format!("a value to initialize '{}'", pattern),
                got: value_type.to_string(),
                location,
            });
        }

        let declared = match pattern {
            Pattern::Name(name) => vec![(name.clone(), value)],
            Pattern::Tuple(names) => match value {
                Value::Tuple(items) if items.len() == names.len() => {
                    names.iter().cloned().zip(items).collect()
                }
                other => {
                    return Err(EvalError::TypeMismatch {
                        expected: format!("tuple of {} elements", names.len()),
                        got: other.value_type().to_string(),
                        location,
                    })
                }
            },
        };

        for (name, value) in &declared {
            let ty = value.value_type();
            self.bindings
                .declare(name, Binding::new(value.clone(), ty, !mutable));
        }
        Ok(declared)
    }

    /// `target = value`; returns the stored value
    pub(crate) fn execute_assignment(
        &mut self,
        target: &str,
        value: &Expr,
    ) -> Result<Value, EvalError> {
        let declared_type = self.writable_binding(target)?.declared_type.clone();
        let new_val = self.evaluate_with_hint(value, Some(&declared_type))?;
        self.assign_to_variable(target, new_val.clone())?;
        Ok(new_val)
    }

    /// `target op= value`; returns the stored value
    pub(crate) fn execute_compound_assignment(
        &mut self,
        target: &str,
        op: BinOp,
        value: &Expr,
    ) -> Result<Value, EvalError> {
        let current_val = self.mutable_value(target)?;
        let hint = if op.is_shift() {
            None
        } else {
            Some(current_val.value_type())
        };
        let right_val = self.evaluate_with_hint(value, hint.as_ref())?;
        let result = self.apply_binary(op, &current_val, &right_val)?;
        self.assign_to_variable(target, result.clone())?;
        Ok(result)
    }

    /// Current value of a binding that may be reassigned
    pub(crate) fn mutable_value(&self, name: &str) -> Result<Value, EvalError> {
        self.writable_binding(name).map(|b| b.value.clone())
    }

    fn writable_binding(&self, name: &str) -> Result<&Binding, EvalError> {
        let location = self.current_location;
        let binding = self
            .bindings
            .get(name)
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: name.to_string(),
                location,
            })?;

        if binding.is_const {
            return Err(EvalError::ConstModification {
                name: name.to_string(),
                location,
            });
        }
        Ok(binding)
    }

    /// Store into an existing `var`, keeping its declared type
    pub(crate) fn assign_to_variable(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        let location = self.current_location;
        let var = self
            .bindings
            .get_mut(name)
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: name.to_string(),
                location,
            })?;

        if var.is_const {
            return Err(EvalError::ConstModification {
                name: name.to_string(),
                location,
            });
        }

        let got = value.value_type();
        if got != var.declared_type {
            return Err(EvalError::TypeMismatch {
                expected: var.declared_type.to_string(),
                got: got.to_string(),
                location,
            });
        }

        var.value = value;
        Ok(())
    }
}
