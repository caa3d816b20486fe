use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::EvalError;
use crate::interpreter::expressions::numeric_hint;
use crate::memory::{FixedInt, Value, ValueType};
use crate::script::ast::{BinOp, Expr, SourceLocation};
use std::cmp::Ordering;
use tracing::trace;

fn type_error(expected: &str, left: &Value, op: BinOp, right: &Value, location: SourceLocation) -> EvalError {
    EvalError::TypeMismatch {
        expected: expected.to_string(),
        got: format!("{} {} {}", left.value_type(), op.symbol(), right.value_type()),
        location,
    }
}

/// Both operands as integers of one type
fn int_pair(
    left: &Value,
    right: &Value,
    op: BinOp,
    location: SourceLocation,
) -> Result<(FixedInt, FixedInt), EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) if a.ty() == b.ty() => Ok((*a, *b)),
        (Value::Int(_), Value::Int(_)) => Err(type_error(
            "operands of the same integer type",
            left,
            op,
            right,
            location,
        )),
        _ => Err(type_error("integer operands", left, op, right, location)),
    }
}

impl Interpreter {
    #[inline]
    pub(crate) fn checked_add_values(
        &self,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        let location = self.current_location;
        match (left, right) {
            (Value::Int(_), Value::Int(_)) => {
                let (a, b) = int_pair(left, right, BinOp::Add, location)?;
                a.checked_add(b)
                    .ok_or(EvalError::Overflow {
                        operation: format!("{} + {}", a, b),
                        location,
                    })
                    .map(Value::Int)
            }
            (Value::Double(a), Value::Double(b)) => Ok(Value::Double(a + b)),

            // Concatenation always allocates new storage
            (Value::Str(_) | Value::Char(_), Value::Str(_) | Value::Char(_)) => {
                Ok(Value::string(&format!("{}{}", left, right)))
            }

            _ => Err(type_error("numbers or text", left, BinOp::Add, right, location)),
        }
    }

    #[inline]
    pub(crate) fn checked_sub_values(
        &self,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        let location = self.current_location;
        match (left, right) {
            (Value::Double(a), Value::Double(b)) => Ok(Value::Double(a - b)),
            _ => {
                let (a, b) = int_pair(left, right, BinOp::Sub, location)?;
                a.checked_sub(b)
                    .ok_or(EvalError::Overflow {
                        operation: format!("{} - {}", a, b),
                        location,
                    })
                    .map(Value::Int)
            }
        }
    }

    #[inline]
    pub(crate) fn checked_mul_values(
        &self,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        let location = self.current_location;
        match (left, right) {
            (Value::Double(a), Value::Double(b)) => Ok(Value::Double(a * b)),
            _ => {
                let (a, b) = int_pair(left, right, BinOp::Mul, location)?;
                a.checked_mul(b)
                    .ok_or(EvalError::Overflow {
                        operation: format!("{} * {}", a, b),
                        location,
                    })
                    .map(Value::Int)
            }
        }
    }

    #[inline]
    pub(crate) fn checked_div_values(
        &self,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        let location = self.current_location;
        match (left, right) {
            (Value::Double(a), Value::Double(b)) => Ok(Value::Double(a / b)),
            _ => {
                let (a, b) = int_pair(left, right, BinOp::Div, location)?;
                if b.is_zero() {
                    return Err(EvalError::DivideByZero {
                        operation: "Division by zero".to_string(),
                        location,
                    });
                }
                a.checked_div(b)
                    .ok_or(EvalError::Overflow {
                        operation: format!("{} / {}", a, b),
                        location,
                    })
                    .map(Value::Int)
            }
        }
    }

    /// Remainder takes the sign of the dividend, for integers and doubles alike
    #[inline]
    pub(crate) fn checked_rem_values(
        &self,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        let location = self.current_location;
        match (left, right) {
            (Value::Double(a), Value::Double(b)) => Ok(Value::Double(a % b)),
            _ => {
                let (a, b) = int_pair(left, right, BinOp::Rem, location)?;
                if b.is_zero() {
                    return Err(EvalError::DivideByZero {
                        operation: "Remainder by zero".to_string(),
                        location,
                    });
                }
                a.checked_rem(b)
                    .ok_or(EvalError::Overflow {
                        operation: format!("{} % {}", a, b),
                        location,
                    })
                    .map(Value::Int)
            }
        }
    }

    /// `&+ &- &* &/ &%`: integers only, never fail
    #[inline]
    pub(crate) fn wrapping_op(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        let (a, b) = int_pair(left, right, op, self.current_location)?;
        let result = match op {
            BinOp::WrappingAdd => a.wrapping_add(b),
            BinOp::WrappingSub => a.wrapping_sub(b),
            BinOp::WrappingMul => a.wrapping_mul(b),
            BinOp::WrappingDiv => a.wrapping_div(b),
            BinOp::WrappingRem => a.wrapping_rem(b),
            _ => unreachable!("not a wrapping operator"),
        };
        Ok(Value::Int(result))
    }

    #[inline]
    pub(crate) fn compare_values<F>(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
        cmp: F,
    ) -> Result<Value, EvalError>
    where
        F: Fn(Ordering) -> bool,
    {
        let location = self.current_location;
        let ordering = match (left, right) {
            (Value::Int(_), Value::Int(_)) => {
                let (a, b) = int_pair(left, right, op, location)?;
                a.value().cmp(&b.value())
            }
            // NaN compares false against everything
            (Value::Double(a), Value::Double(b)) => match a.partial_cmp(b) {
                Some(ordering) => ordering,
                None => return Ok(Value::Bool(false)),
            },
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => return Err(type_error("comparable operands", left, op, right, location)),
        };
        Ok(Value::Bool(cmp(ordering)))
    }

    /// `==` and `!=` compare contents, never storage
    pub(crate) fn equality(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        if left.value_type() != right.value_type() {
            return Err(type_error(
                "operands of the same type",
                left,
                op,
                right,
                self.current_location,
            ));
        }
        let equal = left == right;
        Ok(Value::Bool(if op == BinOp::Eq { equal } else { !equal }))
    }

    /// `===` and `!==` compare storage
    pub(crate) fn identity(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        let same = left.is_identical(right).ok_or_else(|| {
            type_error(
                "operands with storage identity",
                left,
                op,
                right,
                self.current_location,
            )
        })?;
        Ok(Value::Bool(if op == BinOp::Identical { same } else { !same }))
    }

    #[inline]
    pub(crate) fn bitwise_op(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        let (a, b) = int_pair(left, right, op, self.current_location)?;
        let result = match op {
            BinOp::BitAnd => a.bit_and(b),
            BinOp::BitOr => a.bit_or(b),
            BinOp::BitXor => a.bit_xor(b),
            _ => unreachable!("not a bitwise operator"),
        };
        Ok(Value::Int(result))
    }

    /// The amount may be any integer type; the result has the left operand's type
    #[inline]
    pub(crate) fn shift_values(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        match (left, right) {
            (Value::Int(a), Value::Int(amount)) => Ok(Value::Int(match op {
                BinOp::Shl => a.shl(amount.value()),
                _ => a.shr(amount.value()),
            })),
            _ => Err(type_error(
                "integer operands",
                left,
                op,
                right,
                self.current_location,
            )),
        }
    }

    /// Apply a non-short-circuiting operator to evaluated operands
    pub(crate) fn apply_binary(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvalError> {
        use BinOp::*;

        match op {
            Add => self.checked_add_values(left, right),
            Sub => self.checked_sub_values(left, right),
            Mul => self.checked_mul_values(left, right),
            Div => self.checked_div_values(left, right),
            Rem => self.checked_rem_values(left, right),

            WrappingAdd | WrappingSub | WrappingMul | WrappingDiv | WrappingRem => {
                self.wrapping_op(op, left, right)
            }

            Eq | Ne => self.equality(op, left, right),
            Lt => self.compare_values(op, left, right, |o| o == Ordering::Less),
            Le => self.compare_values(op, left, right, |o| o != Ordering::Greater),
            Gt => self.compare_values(op, left, right, |o| o == Ordering::Greater),
            Ge => self.compare_values(op, left, right, |o| o != Ordering::Less),

            Identical | NotIdentical => self.identity(op, left, right),

            BitAnd | BitOr | BitXor => self.bitwise_op(op, left, right),
            Shl | Shr => self.shift_values(op, left, right),

            And | Or => {
                let location = self.current_location;
                let a = Self::value_to_bool(left, op.symbol(), location)?;
                let b = Self::value_to_bool(right, op.symbol(), location)?;
                Ok(Value::Bool(if op == And { a && b } else { a || b }))
            }
        }
    }

    pub(crate) fn evaluate_binary_op(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        hint: Option<&ValueType>,
    ) -> Result<Value, EvalError> {
        use BinOp::*;
        trace!(op = op.symbol(), "evaluating binary operator");

        match op {
            And | Or => self.evaluate_logical_op(op, left, right),

            Shl | Shr => {
                let left_val = self.evaluate_with_hint(left, numeric_hint(hint))?;
                let right_val = self.evaluate_expr(right)?;
                self.shift_values(op, &left_val, &right_val)
            }

            Eq | Ne | Lt | Le | Gt | Ge | Identical | NotIdentical => {
                let (left_val, right_val) = self.evaluate_operands(left, right, None)?;
                self.apply_binary(op, &left_val, &right_val)
            }

            _ => {
                let (left_val, right_val) = self.evaluate_operands(left, right, hint)?;
                self.apply_binary(op, &left_val, &right_val)
            }
        }
    }

    /// `&&` and `||` evaluate the right operand only when it decides the result
    fn evaluate_logical_op(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Value, EvalError> {
        let location = self.current_location;
        let left_val = self.evaluate_expr(left)?;
        let l = Self::value_to_bool(&left_val, op.symbol(), location)?;

        match (op, l) {
            (BinOp::And, false) => Ok(Value::Bool(false)),
            (BinOp::Or, true) => Ok(Value::Bool(true)),
            _ => {
                let right_val = self.evaluate_expr(right)?;
                let r = Self::value_to_bool(&right_val, op.symbol(), location)?;
                Ok(Value::Bool(r))
            }
        }
    }
}
