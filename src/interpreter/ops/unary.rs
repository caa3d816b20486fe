//! Unary operator evaluation

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::EvalError;
use crate::memory::{FixedInt, Value, ValueType};
use crate::script::ast::*;

impl Interpreter {
    pub(crate) fn evaluate_unary_op(
        &mut self,
        op: UnOp,
        operand: &Expr,
        hint: Option<&ValueType>,
    ) -> Result<Value, EvalError> {
        use UnOp::*;

        match op {
            Neg => self.evaluate_neg_op(operand, hint),
            Plus => self.evaluate_plus_op(operand, hint),
            Not => self.evaluate_not_op(operand),
            BitNot => self.evaluate_bitnot_op(operand, hint),
            PreInc | PreDec | PostInc | PostDec => self.evaluate_inc_dec_op(op, operand),
        }
    }

    fn evaluate_neg_op(
        &mut self,
        operand: &Expr,
        hint: Option<&ValueType>,
    ) -> Result<Value, EvalError> {
        let location = self.current_location;

        // `-128` is a literal in its own right, so `Int8` can hold it
        if let Expr::IntLiteral(n, _) = operand {
            return self.int_literal(-n, hint);
        }

        let val = self.evaluate_with_hint(operand, hint)?;
        match val {
            Value::Int(n) if !n.ty().is_signed() => Err(EvalError::TypeMismatch {
                expected: "signed operand for unary minus".to_string(),
                got: n.ty().to_string(),
                location,
            }),
            Value::Int(n) => n
                .checked_neg()
                .ok_or(EvalError::Overflow {
                    operation: format!("-({})", n),
                    location,
                })
                .map(Value::Int),
            Value::Double(d) => Ok(Value::Double(-d)),
            other => Err(EvalError::TypeMismatch {
                expected: "numeric operand".to_string(),
                got: other.value_type().to_string(),
                location,
            }),
        }
    }

    fn evaluate_plus_op(
        &mut self,
        operand: &Expr,
        hint: Option<&ValueType>,
    ) -> Result<Value, EvalError> {
        let val = self.evaluate_with_hint(operand, hint)?;
        match val {
            Value::Int(_) | Value::Double(_) => Ok(val),
            other => Err(EvalError::TypeMismatch {
                expected: "numeric operand".to_string(),
                got: other.value_type().to_string(),
                location: self.current_location,
            }),
        }
    }

    fn evaluate_not_op(&mut self, operand: &Expr) -> Result<Value, EvalError> {
        let val = self.evaluate_expr(operand)?;
        let b = Self::value_to_bool(&val, "logical NOT", self.current_location)?;
        Ok(Value::Bool(!b))
    }

    fn evaluate_bitnot_op(
        &mut self,
        operand: &Expr,
        hint: Option<&ValueType>,
    ) -> Result<Value, EvalError> {
        let val = self.evaluate_with_hint(operand, hint)?;
        match val {
            Value::Int(n) => Ok(Value::Int(n.bit_not())),
            other => Err(EvalError::TypeMismatch {
                expected: "integer operand".to_string(),
                got: other.value_type().to_string(),
                location: self.current_location,
            }),
        }
    }

    /// `++`/`--` on a variable; prefix yields the new value, postfix the old
    fn evaluate_inc_dec_op(&mut self, op: UnOp, operand: &Expr) -> Result<Value, EvalError> {
        use UnOp::*;
        let location = self.current_location;

        let name = match operand {
            Expr::Variable(name) => name,
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: format!("variable operand for {}", op.symbol()),
                    got: other.to_string(),
                    location,
                })
            }
        };

        let current_val = self.mutable_value(name)?;
        let increment = matches!(op, PreInc | PostInc);

        let new_val = match current_val {
            Value::Int(n) => {
                let one = FixedInt::new(n.ty(), 1).ok_or(EvalError::Overflow {
                    operation: format!("{}{}", name, op.symbol()),
                    location,
                })?;
                let stepped = if increment {
                    n.checked_add(one)
                } else {
                    n.checked_sub(one)
                };
                stepped
                    .ok_or(EvalError::Overflow {
                        operation: format!("{} {} 1", n, if increment { "+" } else { "-" }),
                        location,
                    })
                    .map(Value::Int)?
            }
            Value::Double(d) => Value::Double(if increment { d + 1.0 } else { d - 1.0 }),
            ref other => {
                return Err(EvalError::TypeMismatch {
                    expected: format!("numeric operand for {}", op.symbol()),
                    got: other.value_type().to_string(),
                    location,
                })
            }
        };

        self.assign_to_variable(name, new_val.clone())?;

        match op {
            PreInc | PreDec => Ok(new_val),
            _ => Ok(current_val),
        }
    }
}
