//! Static checks and type inference
//!
//! Every statement is checked before it runs. The checker rejects three things:
//!
//! - An assignment (`a = b`, `a += b`) whose result is consumed as a value.
//!   Assignment produces no value, so it may only stand as a whole statement.
//! - A conditional `c ? x : y` whose branches have no common type.
//! - A compound assignment for an operator that has none (`&&=`, `==`).
//!
//! Bodies of `if` and `for` are checked with their own declarations and the
//! loop variable in scope.
//!
//! # Type Inference Rules
//!
//! Inference here is deliberately partial: anything it cannot decide without
//! running code is [`StaticType::Unknown`] and passes the check.
//!
//! - Integer and float literals are *untyped* until context fixes them, so
//!   `flag ? 50 : 20.5` has a common type (`Double`) but `flag ? x : 2.5` with
//!   `x: Int` does not
//! - Variables have the type they were declared with
//! - Comparisons and logical operators are `Bool`
//! - Arithmetic takes the type of whichever operand has a known type
//! - Calls have the declared return type of the function (`print` is `()`)

use crate::interpreter::builtins::PRINT;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::EvalError;
use crate::memory::{IntType, ValueType};
use crate::script::ast::*;

/// Type of an expression as far as it can be known before evaluation
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StaticType {
    Known(ValueType),
    IntLiteral,
    FloatLiteral,
    Unknown,
}

impl StaticType {
    /// Common type of two branches, or `None` if they cannot agree
    fn unify(self, other: StaticType) -> Option<StaticType> {
        use StaticType::*;

        match (self, other) {
            (Unknown, _) | (_, Unknown) => Some(Unknown),
            (Known(a), Known(b)) => (a == b).then_some(Known(a)),
            (Known(ValueType::Int(ty)), IntLiteral) | (IntLiteral, Known(ValueType::Int(ty))) => {
                Some(Known(ValueType::Int(ty)))
            }
            (Known(ValueType::Double), IntLiteral | FloatLiteral)
            | (IntLiteral | FloatLiteral, Known(ValueType::Double)) => Some(Known(ValueType::Double)),
            (Known(_), _) | (_, Known(_)) => None,
            (IntLiteral, IntLiteral) => Some(IntLiteral),
            _ => Some(FloatLiteral),
        }
    }

    /// Type of an arithmetic result: a known operand type wins over literals
    fn arithmetic(self, other: StaticType) -> StaticType {
        use StaticType::*;

        match (self, other) {
            (Known(t), _) | (_, Known(t)) => Known(t),
            (Unknown, _) | (_, Unknown) => Unknown,
            (FloatLiteral, _) | (_, FloatLiteral) => FloatLiteral,
            _ => IntLiteral,
        }
    }

    /// The type a literal takes once nothing else constrains it
    fn settled(self) -> StaticType {
        match self {
            StaticType::IntLiteral => StaticType::Known(ValueType::Int(IntType::Int)),
            StaticType::FloatLiteral => StaticType::Known(ValueType::Double),
            other => other,
        }
    }

    /// A concrete type to evaluate against; plain integer literals have none
    fn concrete(self) -> Option<ValueType> {
        match self {
            StaticType::Known(ty) => Some(ty),
            StaticType::FloatLiteral => Some(ValueType::Double),
            StaticType::IntLiteral | StaticType::Unknown => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            StaticType::Known(ty) => ty.to_string(),
            StaticType::IntLiteral => "integer literal".to_string(),
            StaticType::FloatLiteral => "floating-point literal".to_string(),
            StaticType::Unknown => "unknown".to_string(),
        }
    }
}

/// Names declared inside the block being checked, innermost last
type LocalTypes = Vec<(String, StaticType)>;

impl Interpreter {
    /// Check a statement before running it
    pub(crate) fn check_statement(&self, stmt: &Stmt) -> Result<(), EvalError> {
        self.check_in_block(stmt, &mut LocalTypes::new())
    }

    fn check_in_block(&self, stmt: &Stmt, locals: &mut LocalTypes) -> Result<(), EvalError> {
        match stmt {
            Stmt::Decl {
                pattern,
                annotation,
                init,
                ..
            } => {
                self.check_value_in(init, locals)?;
                match pattern {
                    Pattern::Name(name) => {
                        let ty = match annotation {
                            Some(ty) => StaticType::Known(ty.clone()),
                            None => self.infer_in(init, locals).settled(),
                        };
                        locals.push((name.clone(), ty));
                    }
                    Pattern::Tuple(names) => {
                        locals.extend(names.iter().map(|n| (n.clone(), StaticType::Unknown)))
                    }
                }
                Ok(())
            }

            // A whole-statement assignment is the one place no value is needed
            Stmt::Expr { expr, .. } => match expr {
                Expr::CompoundAssign { op, .. } if !op.has_compound_form() => {
                    Err(EvalError::TypeMismatch {
                        expected: "an operator with a compound assignment form".to_string(),
                        got: format!("`{}`", expr),
                        location: self.current_location,
                    })
                }
                Expr::Assign { value, .. } | Expr::CompoundAssign { value, .. } => {
                    self.check_value_in(value, locals)
                }
                other => self.check_value_in(other, locals),
            },

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.check_value_in(condition, locals)?;
                for branch in std::iter::once(then_branch).chain(else_branch) {
                    self.check_nested(branch, locals)?;
                }
                Ok(())
            }

            Stmt::ForIn {
                var,
                iterable,
                body,
                ..
            } => {
                self.check_value_in(iterable, locals)?;
                let element = self.element_type(iterable, locals);
                let mark = locals.len();
                locals.push((var.clone(), element));
                let outcome = self.check_nested(body, locals);
                locals.truncate(mark);
                outcome
            }
        }
    }

    fn check_nested(&self, block: &[Stmt], locals: &mut LocalTypes) -> Result<(), EvalError> {
        let mark = locals.len();
        let outcome = block
            .iter()
            .try_for_each(|stmt| self.check_in_block(stmt, locals));
        locals.truncate(mark);
        outcome
    }

    /// Type of the loop variable when iterating `iterable`
    fn element_type(&self, iterable: &Expr, locals: &[(String, StaticType)]) -> StaticType {
        match iterable {
            Expr::Group(inner) => self.element_type(inner, locals),
            Expr::Range { start, end, .. } => {
                match self.infer_in(start, locals).arithmetic(self.infer_in(end, locals)) {
                    StaticType::IntLiteral => StaticType::Known(ValueType::Int(IntType::Int)),
                    StaticType::Known(ValueType::Int(ty)) => StaticType::Known(ValueType::Int(ty)),
                    _ => StaticType::Unknown,
                }
            }
            other => match self.infer_in(other, locals) {
                StaticType::Known(ValueType::Range { bound, .. }) => {
                    StaticType::Known(ValueType::Int(bound))
                }
                StaticType::Known(ValueType::Array(elem)) => StaticType::Known(*elem),
                StaticType::Known(ValueType::String) => StaticType::Known(ValueType::Character),
                _ => StaticType::Unknown,
            },
        }
    }

    /// Check an expression whose value is consumed
    pub(crate) fn check_value_expr(&self, expr: &Expr) -> Result<(), EvalError> {
        self.check_value_in(expr, &[])
    }

    fn check_value_in(&self, expr: &Expr, locals: &[(String, StaticType)]) -> Result<(), EvalError> {
        let location = self.current_location;

        match expr {
            Expr::Assign { .. } | Expr::CompoundAssign { .. } => Err(EvalError::UseOfVoidResult {
                expr: expr.to_string(),
                location,
            }),

            Expr::IntLiteral(..)
            | Expr::FloatLiteral(_)
            | Expr::BoolLiteral(_)
            | Expr::CharLiteral(_)
            | Expr::StringLiteral(_)
            | Expr::Variable(_)
            | Expr::IntMin(_)
            | Expr::IntMax(_) => Ok(()),

            Expr::Group(inner) | Expr::Count(inner) => self.check_value_in(inner, locals),
            Expr::TupleField { tuple, .. } => self.check_value_in(tuple, locals),
            Expr::Unary { operand, .. } => self.check_value_in(operand, locals),

            Expr::Tuple(items) | Expr::Array(items) | Expr::Call { args: items, .. } => items
                .iter()
                .try_for_each(|item| self.check_value_in(item, locals)),

            Expr::Index { array, index } => {
                self.check_value_in(array, locals)?;
                self.check_value_in(index, locals)
            }
            Expr::Binary { left, right, .. } => {
                self.check_value_in(left, locals)?;
                self.check_value_in(right, locals)
            }
            Expr::Range { start, end, .. } => {
                self.check_value_in(start, locals)?;
                self.check_value_in(end, locals)
            }

            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                self.check_value_in(condition, locals)?;
                self.check_value_in(then_expr, locals)?;
                self.check_value_in(else_expr, locals)?;

                let then_type = self.infer_in(then_expr, locals);
                let else_type = self.infer_in(else_expr, locals);
                match then_type.clone().unify(else_type.clone()) {
                    Some(_) => Ok(()),
                    None => Err(EvalError::BranchTypeMismatch {
                        then_type: then_type.describe(),
                        else_type: else_type.describe(),
                        location,
                    }),
                }
            }
        }
    }

    /// Infer the type of an expression without evaluating it
    pub(crate) fn infer_static_type(&self, expr: &Expr) -> StaticType {
        self.infer_in(expr, &[])
    }

    /// The type both branches of a conditional agree on, if it is concrete
    pub(crate) fn common_branch_type(&self, then_expr: &Expr, else_expr: &Expr) -> Option<ValueType> {
        self.infer_static_type(then_expr)
            .unify(self.infer_static_type(else_expr))
            .and_then(StaticType::concrete)
    }

    fn infer_in(&self, expr: &Expr, locals: &[(String, StaticType)]) -> StaticType {
        match expr {
            Expr::IntLiteral(..) => StaticType::IntLiteral,
            Expr::FloatLiteral(_) => StaticType::FloatLiteral,
            Expr::BoolLiteral(_) => StaticType::Known(ValueType::Bool),
            Expr::CharLiteral(_) => StaticType::Known(ValueType::Character),
            Expr::StringLiteral(_) => StaticType::Known(ValueType::String),

            Expr::Variable(name) => match locals.iter().rev().find(|(n, _)| n == name) {
                Some((_, ty)) => ty.clone(),
                None => self
                    .bindings
                    .get(name)
                    .map(|b| StaticType::Known(b.declared_type.clone()))
                    .unwrap_or(StaticType::Unknown),
            },

            Expr::IntMin(ty) | Expr::IntMax(ty) => StaticType::Known(ValueType::Int(*ty)),
            Expr::Count(_) => StaticType::Known(ValueType::Int(IntType::Int)),
            Expr::Group(inner) => self.infer_in(inner, locals),

            Expr::Unary { op, operand } => match op {
                UnOp::Not => StaticType::Known(ValueType::Bool),
                _ => self.infer_in(operand, locals),
            },

            Expr::Binary { op, left, right } => {
                if op.is_comparison() || op.is_logical() {
                    StaticType::Known(ValueType::Bool)
                } else if op.is_shift() {
                    self.infer_in(left, locals)
                } else {
                    self.infer_in(left, locals)
                        .arithmetic(self.infer_in(right, locals))
                }
            }

            Expr::Ternary {
                then_expr,
                else_expr,
                ..
            } => self
                .infer_in(then_expr, locals)
                .unify(self.infer_in(else_expr, locals))
                .unwrap_or(StaticType::Unknown),

            Expr::Assign { .. } | Expr::CompoundAssign { .. } => StaticType::Known(ValueType::Void),

            Expr::Call { name, .. } if name == PRINT => StaticType::Known(ValueType::Void),
            Expr::Call { name, .. } => self
                .natives
                .get(name)
                .map(|entry| StaticType::Known(entry.returns.clone()))
                .unwrap_or(StaticType::Unknown),

            Expr::Tuple(_)
            | Expr::TupleField { .. }
            | Expr::Array(_)
            | Expr::Index { .. }
            | Expr::Range { .. } => StaticType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unify_literals_with_known_types() {
        let int8 = StaticType::Known(ValueType::Int(IntType::Int8));
        assert_eq!(
            int8.clone().unify(StaticType::IntLiteral),
            Some(int8.clone())
        );
        assert_eq!(int8.unify(StaticType::FloatLiteral), None);
        assert_eq!(
            StaticType::IntLiteral.unify(StaticType::FloatLiteral),
            Some(StaticType::FloatLiteral)
        );
        assert_eq!(
            StaticType::Known(ValueType::String).unify(StaticType::Known(ValueType::Bool)),
            None
        );
    }

    #[test]
    fn test_nested_assignment_is_rejected() {
        let interp = Interpreter::new();
        let expr = Expr::assign("a", Expr::var("b"));
        assert!(matches!(
            interp.check_value_expr(&expr),
            Err(EvalError::UseOfVoidResult { .. })
        ));

        let stmt = Stmt::Expr {
            expr: Expr::assign("a", Expr::var("b")),
            location: SourceLocation::new(1, 1),
        };
        assert!(interp.check_statement(&stmt).is_ok());
    }

    #[test]
    fn test_ternary_branch_types() {
        let interp = Interpreter::new();
        let ok = Expr::ternary(Expr::bool(true), Expr::int(50), Expr::float(20.5));
        assert!(interp.check_value_expr(&ok).is_ok());

        let bad = Expr::ternary(Expr::bool(true), Expr::string("a"), Expr::int(1));
        assert!(matches!(
            interp.check_value_expr(&bad),
            Err(EvalError::BranchTypeMismatch { .. })
        ));
    }
}
