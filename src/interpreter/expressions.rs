//! Expression evaluation implementation
//!
//! This module handles evaluation of every expression kind, including:
//!
//! - Literals, whose type comes from context (see below)
//! - Variables and `Type.min` / `Type.max`
//! - Tuples, arrays, subscripts and `.count`
//! - Ternary conditionals (only the chosen branch is evaluated)
//! - Range construction
//!
//! Binary, unary and assignment operators live in [`super::ops`].
//!
//! # Literal Typing
//!
//! Evaluation carries an optional *hint*: the type the surrounding context
//! expects. Integer literals adopt an integer or `Double` hint, float literals a
//! `Double` hint; without one they default to `Int` and `Double`. For a binary
//! operator the hint for one operand is the type of the other, so in `x &+ 1`
//! the literal takes `x`'s type. When the left operand is built from literals
//! and the right is not, the right side's type is inferred without running it
//! and operands still evaluate left to right. Only a lone literal facing an
//! operand of undecidable type waits for the right side's value.
//!
//! Both branches of `c ? x : y` are evaluated against their common type, so
//! `flag ? 50 : 20.5` is a `Double` whichever branch runs.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::EvalError;
use crate::interpreter::type_system::StaticType;
use crate::memory::{FixedInt, IntType, RangeValue, Value, ValueType};
use crate::memory::range::RangeFault;
use crate::script::ast::*;
use std::rc::Rc;

/// Shape of a literal-only expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralKind {
    Int,
    Float,
}

impl LiteralKind {
    fn join(self, other: LiteralKind) -> LiteralKind {
        if self == LiteralKind::Float || other == LiteralKind::Float {
            LiteralKind::Float
        } else {
            LiteralKind::Int
        }
    }
}

/// A numeric literal, possibly signed or parenthesized
fn is_bare_literal(expr: &Expr) -> bool {
    match expr {
        Expr::IntLiteral(..) | Expr::FloatLiteral(_) => true,
        Expr::Group(inner) => is_bare_literal(inner),
        Expr::Unary {
            op: UnOp::Neg | UnOp::Plus,
            operand,
        } => is_bare_literal(operand),
        _ => false,
    }
}

/// Whether an expression is built only from numeric literals
pub(crate) fn literal_kind(expr: &Expr) -> Option<LiteralKind> {
    match expr {
        Expr::IntLiteral(..) => Some(LiteralKind::Int),
        Expr::FloatLiteral(_) => Some(LiteralKind::Float),
        Expr::Group(inner) => literal_kind(inner),
        Expr::Unary {
            op: UnOp::Neg | UnOp::Plus,
            operand,
        } => literal_kind(operand),
        Expr::Binary { op, left, right }
            if !op.is_comparison() && !op.is_logical() && !op.is_shift() =>
        {
            Some(literal_kind(left)?.join(literal_kind(right)?))
        }
        _ => None,
    }
}

/// Keep only hints a numeric literal can adopt
pub(crate) fn numeric_hint(hint: Option<&ValueType>) -> Option<&ValueType> {
    hint.filter(|h| h.is_numeric())
}

impl Interpreter {
    /// Evaluate an expression with no contextual type
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        self.evaluate_with_hint(expr, None)
    }

    /// Evaluate an expression, letting literals adopt `hint`
    pub(crate) fn evaluate_with_hint(
        &mut self,
        expr: &Expr,
        hint: Option<&ValueType>,
    ) -> Result<Value, EvalError> {
        let location = self.current_location;

        match expr {
            Expr::IntLiteral(n, _) => self.int_literal(*n, hint),

            Expr::FloatLiteral(x) => match hint {
                Some(ValueType::Int(ty)) => Err(EvalError::TypeMismatch {
                    expected: ty.to_string(),
                    got: format!("floating-point literal {:?}", x),
                    location,
                }),
                _ => Ok(Value::Double(*x)),
            },

            Expr::BoolLiteral(b) => Ok(Value::Bool(*b)),

            Expr::CharLiteral(c) => Ok(Value::Char(*c)),

            // Every evaluation allocates fresh storage
            Expr::StringLiteral(s) => Ok(Value::string(s)),

            Expr::Variable(name) => self
                .bindings
                .value(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable {
                    name: name.clone(),
                    location,
                }),

            Expr::IntMin(ty) => Ok(Value::Int(FixedInt::min(*ty))),

            Expr::IntMax(ty) => Ok(Value::Int(FixedInt::max(*ty))),

            Expr::Group(inner) => self.evaluate_with_hint(inner, hint),

            Expr::Tuple(items) => {
                let hints: Option<&Vec<ValueType>> = match hint {
                    Some(ValueType::Tuple(types)) if types.len() == items.len() => Some(types),
                    _ => None,
                };
                let mut values = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_hint = hints.map(|h| &h[i]);
                    values.push(self.evaluate_with_hint(item, item_hint)?);
                }
                Ok(Value::Tuple(values))
            }

            Expr::TupleField { tuple, index } => match self.evaluate_expr(tuple)? {
                Value::Tuple(mut items) => {
                    let arity = items.len();
                    if *index >= arity {
                        return Err(EvalError::TupleIndexOutOfRange {
                            index: *index,
                            arity,
                            location,
                        });
                    }
                    Ok(items.swap_remove(*index))
                }
                other => Err(EvalError::TypeMismatch {
                    expected: "tuple".to_string(),
                    got: other.value_type().to_string(),
                    location,
                }),
            },

            Expr::Array(items) => self.evaluate_array_literal(items, hint),

            Expr::Index { array, index } => self.evaluate_index(array, index),

            Expr::Count(of) => {
                let value = self.evaluate_expr(of)?;
                let count = match &value {
                    Value::Str(s) => s.chars().count() as i128,
                    Value::Array(items) => items.len() as i128,
                    Value::Range(r) => r.len() as i128,
                    other => {
                        return Err(EvalError::TypeMismatch {
                            expected: "string, array or range".to_string(),
                            got: other.value_type().to_string(),
                            location,
                        })
                    }
                };
                FixedInt::new(IntType::Int, count)
                    .map(Value::Int)
                    .ok_or_else(|| EvalError::Overflow {
                        operation: format!("{}.count", of),
                        location,
                    })
            }

            Expr::Binary { op, left, right } => self.evaluate_binary_op(*op, left, right, hint),

            Expr::Unary { op, operand } => self.evaluate_unary_op(*op, operand, hint),

            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                let cond_val = self.evaluate_expr(condition)?;
                let cond = Self::value_to_bool(&cond_val, "ternary condition", location)?;

                // Either branch yields the type both branches agree on
                let common = self.common_branch_type(then_expr, else_expr);
                let branch_hint = common.as_ref().or(hint);
                if cond {
                    self.evaluate_with_hint(then_expr, branch_hint)
                } else {
                    self.evaluate_with_hint(else_expr, branch_hint)
                }
            }

            Expr::Range { start, end, kind } => {
                let elem_hint = match hint {
                    Some(ValueType::Range { bound, .. }) => Some(ValueType::Int(*bound)),
                    _ => None,
                };
                let (lo, hi) = self.evaluate_operands(start, end, elem_hint.as_ref())?;
                let (lo, hi) = match (&lo, &hi) {
                    (Value::Int(a), Value::Int(b)) => (*a, *b),
                    _ => {
                        return Err(EvalError::TypeMismatch {
                            expected: "integer range bounds".to_string(),
                            got: format!("{} and {}", lo.value_type(), hi.value_type()),
                            location,
                        })
                    }
                };
                match RangeValue::new(lo, hi, *kind) {
                    Ok(range) => Ok(Value::Range(range)),
                    Err(RangeFault::Inverted) => Err(EvalError::InvalidRange {
                        range: format!("{}{}{}", lo, kind.symbol(), hi),
                        kind: kind.describe(),
                        location,
                    }),
                    Err(RangeFault::MixedTypes(a, b)) => Err(EvalError::TypeMismatch {
                        expected: format!("{} upper bound", a),
                        got: b.to_string(),
                        location,
                    }),
                }
            }

            // Only reachable as a whole statement; the checker rejects other uses
            Expr::Assign { target, value } => {
                self.execute_assignment(target, value)?;
                Ok(Value::Void)
            }

            Expr::CompoundAssign { target, op, value } => {
                self.execute_compound_assignment(target, *op, value)?;
                Ok(Value::Void)
            }

            Expr::Call { name, args } => self.execute_function_call(name, args),
        }
    }

    /// Give an integer literal its contextual type
    pub(crate) fn int_literal(&self, n: i128, hint: Option<&ValueType>) -> Result<Value, EvalError> {
        let ty = match hint {
            Some(ValueType::Double) => return Ok(Value::Double(n as f64)),
            Some(ValueType::Int(ty)) => *ty,
            _ => IntType::Int,
        };
        FixedInt::new(ty, n)
            .map(Value::Int)
            .ok_or_else(|| EvalError::Overflow {
                operation: format!("integer literal {} stored into {}", n, ty),
                location: self.current_location,
            })
    }

    /// Evaluate both operands of a binary operator, sharing literal types
    pub(crate) fn evaluate_operands(
        &mut self,
        left: &Expr,
        right: &Expr,
        hint: Option<&ValueType>,
    ) -> Result<(Value, Value), EvalError> {
        match (literal_kind(left), literal_kind(right)) {
            (Some(lk), Some(rk)) => {
                let double = ValueType::Double;
                let shared = if lk.join(rk) == LiteralKind::Float {
                    Some(&double)
                } else {
                    numeric_hint(hint)
                };
                let l = self.evaluate_with_hint(left, shared)?;
                let r = self.evaluate_with_hint(right, shared)?;
                Ok((l, r))
            }
            (Some(_), None) => match self.infer_static_type(right) {
                StaticType::Known(ty) => {
                    let l = self.evaluate_with_hint(left, Some(&ty))?;
                    let r = self.evaluate_expr(right)?;
                    Ok((l, r))
                }
                // A lone literal cannot fail before its type is known
                _ if is_bare_literal(left) => {
                    let r = self.evaluate_expr(right)?;
                    let l = self.evaluate_with_hint(left, Some(&r.value_type()))?;
                    Ok((l, r))
                }
                _ => {
                    let l = self.evaluate_with_hint(left, numeric_hint(hint))?;
                    let r = self.evaluate_with_hint(right, Some(&l.value_type()))?;
                    Ok((l, r))
                }
            },
            _ => {
                let l = self.evaluate_with_hint(left, numeric_hint(hint))?;
                let r = self.evaluate_with_hint(right, Some(&l.value_type()))?;
                Ok((l, r))
            }
        }
    }

    fn evaluate_array_literal(
        &mut self,
        items: &[Expr],
        hint: Option<&ValueType>,
    ) -> Result<Value, EvalError> {
        let location = self.current_location;
        if items.is_empty() {
            return Err(EvalError::TypeMismatch {
                expected: "non-empty array literal".to_string(),
                got: "[]".to_string(),
                location,
            });
        }

        let mut elem_type = match hint {
            Some(ValueType::Array(elem)) => Some(elem.as_ref().clone()),
            _ => None,
        };
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let value = self.evaluate_with_hint(item, elem_type.as_ref())?;
            let ty = value.value_type();
            match &elem_type {
                Some(expected) if *expected != ty => {
                    return Err(EvalError::TypeMismatch {
                        expected: format!("array element of type {}", expected),
                        got: ty.to_string(),
                        location,
                    });
                }
                Some(_) => {}
                None => elem_type = Some(ty),
            }
            values.push(value);
        }
        Ok(Value::Array(Rc::from(values)))
    }

    fn evaluate_index(&mut self, array: &Expr, index: &Expr) -> Result<Value, EvalError> {
        let location = self.current_location;
        let container = self.evaluate_expr(array)?;
        let index_val = self.evaluate_with_hint(index, Some(&ValueType::Int(IntType::Int)))?;

        let items = match &container {
            Value::Array(items) => items,
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: "array to subscript".to_string(),
                    got: other.value_type().to_string(),
                    location,
                })
            }
        };
        let i = index_val
            .as_int()
            .ok_or_else(|| EvalError::TypeMismatch {
                expected: "integer index".to_string(),
                got: index_val.value_type().to_string(),
                location,
            })?
            .value();

        usize::try_from(i)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .ok_or(EvalError::IndexOutOfRange {
                index: i,
                len: items.len(),
                location,
            })
    }
}
