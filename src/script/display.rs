// Rendering of AST nodes in playground syntax

use super::ast::*;
use crate::memory::RangeKind;
use std::fmt::{self, Write};

// Binding strengths beyond the binary operator table
const PREC_TERNARY: u8 = 0;
const PREC_RANGE: u8 = 4;
const PREC_PREFIX: u8 = 8;
const PREC_POSTFIX: u8 = 9;

fn write_literal(f: &mut fmt::Formatter<'_>, value: i128, radix: Radix) -> fmt::Result {
    // Radix digits are the magnitude; the sign is written separately
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    match radix {
        Radix::Decimal => write!(f, "{}", value),
        Radix::Binary => write!(f, "{}0b{:08b}", sign, magnitude),
        Radix::Hex => write!(f, "{}0x{:06X}", sign, magnitude),
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_expr(f, item, PREC_TERNARY)?;
    }
    Ok(())
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, min_prec: u8) -> fmt::Result {
    match expr {
        Expr::IntLiteral(value, radix) => write_literal(f, *value, *radix),
        Expr::FloatLiteral(value) => write!(f, "{:?}", value),
        Expr::BoolLiteral(value) => write!(f, "{}", value),
        Expr::CharLiteral(c) => write!(f, "\"{}\"", c),
        Expr::StringLiteral(s) => write!(f, "{:?}", s),
        Expr::Variable(name) => f.write_str(name),
        Expr::IntMin(ty) => write!(f, "{}.min", ty),
        Expr::IntMax(ty) => write!(f, "{}.max", ty),
        Expr::Group(inner) => {
            f.write_str("(")?;
            write_expr(f, inner, PREC_TERNARY)?;
            f.write_str(")")
        }

        Expr::Tuple(items) => {
            f.write_str("(")?;
            write_list(f, items)?;
            f.write_str(")")
        }
        Expr::TupleField { tuple, index } => {
            write_expr(f, tuple, PREC_POSTFIX)?;
            write!(f, ".{}", index)
        }
        Expr::Array(items) => {
            f.write_str("[")?;
            write_list(f, items)?;
            f.write_str("]")
        }
        Expr::Index { array, index } => {
            write_expr(f, array, PREC_POSTFIX)?;
            f.write_str("[")?;
            write_expr(f, index, PREC_TERNARY)?;
            f.write_str("]")
        }
        Expr::Count(of) => {
            write_expr(f, of, PREC_POSTFIX)?;
            f.write_str(".count")
        }

        Expr::Binary { op, left, right } => {
            let prec = op.precedence();
            let paren = prec < min_prec;
            if paren {
                f.write_str("(")?;
            }
            // Comparisons do not chain, so neither side may be another comparison
            let left_min = if op.is_comparison() { prec + 1 } else { prec };
            write_expr(f, left, left_min)?;
            write!(f, " {} ", op.symbol())?;
            write_expr(f, right, prec + 1)?;
            if paren {
                f.write_str(")")?;
            }
            Ok(())
        }
        Expr::Unary { op, operand } => {
            if op.is_postfix() {
                write_expr(f, operand, PREC_POSTFIX)?;
                f.write_str(op.symbol())
            } else {
                f.write_str(op.symbol())?;
                // `-(-x)` must not render as the decrement `--x`
                let nested_prefix = matches!(
                    operand.as_ref(),
                    Expr::Unary { op: inner, .. } if !inner.is_postfix()
                );
                if nested_prefix {
                    f.write_str("(")?;
                    write_expr(f, operand, PREC_TERNARY)?;
                    f.write_str(")")
                } else {
                    write_expr(f, operand, PREC_PREFIX)
                }
            }
        }
        Expr::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            let paren = min_prec > PREC_TERNARY;
            if paren {
                f.write_str("(")?;
            }
            write_expr(f, condition, PREC_TERNARY + 1)?;
            f.write_str(" ? ")?;
            write_expr(f, then_expr, PREC_TERNARY)?;
            f.write_str(" : ")?;
            write_expr(f, else_expr, PREC_TERNARY)?;
            if paren {
                f.write_str(")")?;
            }
            Ok(())
        }
        Expr::Range { start, end, kind } => {
            let paren = min_prec > PREC_RANGE;
            if paren {
                f.write_str("(")?;
            }
            write_expr(f, start, PREC_RANGE + 1)?;
            f.write_str(kind.symbol())?;
            write_expr(f, end, PREC_RANGE + 1)?;
            if paren {
                f.write_str(")")?;
            }
            Ok(())
        }

        Expr::Assign { target, value } => {
            let paren = min_prec > PREC_TERNARY;
            if paren {
                f.write_str("(")?;
            }
            write!(f, "{} = ", target)?;
            write_expr(f, value, PREC_TERNARY)?;
            if paren {
                f.write_str(")")?;
            }
            Ok(())
        }
        Expr::CompoundAssign { target, op, value } => {
            let paren = min_prec > PREC_TERNARY;
            if paren {
                f.write_str("(")?;
            }
            write!(f, "{} {}= ", target, op.symbol())?;
            write_expr(f, value, PREC_TERNARY)?;
            if paren {
                f.write_str(")")?;
            }
            Ok(())
        }

        Expr::Call { name, args } => {
            write!(f, "{}(", name)?;
            write_list(f, args)?;
            f.write_str(")")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self, PREC_TERNARY)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Name(name) => f.write_str(name),
            Pattern::Tuple(names) => write!(f, "({})", names.join(", ")),
        }
    }
}

/// Render a statement as source lines, indented four spaces per level
pub fn render_stmt(stmt: &Stmt) -> Vec<String> {
    let mut out = Vec::new();
    render_into(stmt, 0, &mut out);
    out
}

fn render_block(stmts: &[Stmt], depth: usize, out: &mut Vec<String>) {
    for stmt in stmts {
        render_into(stmt, depth, out);
    }
}

fn render_into(stmt: &Stmt, depth: usize, out: &mut Vec<String>) {
    let indent = "    ".repeat(depth);
    match stmt {
        Stmt::Decl {
            pattern,
            mutable,
            annotation,
            init,
            ..
        } => {
            let mut line = format!("{}{} {}", indent, if *mutable { "var" } else { "let" }, pattern);
            if let Some(ty) = annotation {
                let _ = write!(line, ": {}", ty);
            }
            let _ = write!(line, " = {}", init);
            out.push(line);
        }
        Stmt::Expr { expr, .. } => out.push(format!("{}{}", indent, expr)),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            out.push(format!("{}if {} {{", indent, condition));
            render_block(then_branch, depth + 1, out);
            if let Some(else_branch) = else_branch {
                out.push(format!("{}}} else {{", indent));
                render_block(else_branch, depth + 1, out);
            }
            out.push(format!("{}}}", indent));
        }
        Stmt::ForIn {
            var, iterable, body, ..
        } => {
            out.push(format!("{}for {} in {} {{", indent, var, iterable));
            render_block(body, depth + 1, out);
            out.push(format!("{}}}", indent));
        }
    }
}

impl RangeKind {
    pub fn describe(self) -> &'static str {
        match self {
            RangeKind::Closed => "closed",
            RangeKind::HalfOpen => "half-open",
        }
    }
}
