//! Programmatic construction of scripts
//!
//! Expressions are built with the associated constructors on [`Expr`]; statements
//! are appended through a [`BlockBuilder`], which hands out listing line numbers
//! in order so every statement gets the location it would have in the rendered
//! source.
//!
//! ```
//! use opplay::script::{ScriptBuilder, ast::{BinOp, Expr}};
//!
//! let script = ScriptBuilder::new()
//!     .section("Overflow", |b| {
//!         b.var("x", Expr::int(250));
//!         b.expr(Expr::binary(BinOp::WrappingAdd, Expr::var("x"), Expr::int(10)));
//!     })
//!     .build();
//! assert_eq!(script.sections[0].lines.len(), 2);
//! ```

use super::ast::*;
use super::{Line, Script, Section};
use crate::memory::{IntType, RangeKind, ValueType};

impl Expr {
    pub fn int(value: i128) -> Self {
        Expr::IntLiteral(value, Radix::Decimal)
    }

    pub fn binary_literal(value: i128) -> Self {
        Expr::IntLiteral(value, Radix::Binary)
    }

    pub fn hex(value: i128) -> Self {
        Expr::IntLiteral(value, Radix::Hex)
    }

    pub fn float(value: f64) -> Self {
        Expr::FloatLiteral(value)
    }

    pub fn bool(value: bool) -> Self {
        Expr::BoolLiteral(value)
    }

    pub fn char(value: char) -> Self {
        Expr::CharLiteral(value)
    }

    pub fn string(value: &str) -> Self {
        Expr::StringLiteral(value.to_string())
    }

    pub fn var(name: &str) -> Self {
        Expr::Variable(name.to_string())
    }

    pub fn min_of(ty: IntType) -> Self {
        Expr::IntMin(ty)
    }

    pub fn max_of(ty: IntType) -> Self {
        Expr::IntMax(ty)
    }

    pub fn group(inner: Expr) -> Self {
        Expr::Group(Box::new(inner))
    }

    pub fn tuple(items: Vec<Expr>) -> Self {
        Expr::Tuple(items)
    }

    pub fn field(tuple: Expr, index: usize) -> Self {
        Expr::TupleField {
            tuple: Box::new(tuple),
            index,
        }
    }

    pub fn array(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }

    pub fn index(array: Expr, index: Expr) -> Self {
        Expr::Index {
            array: Box::new(array),
            index: Box::new(index),
        }
    }

    pub fn count(of: Expr) -> Self {
        Expr::Count(Box::new(of))
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn ternary(condition: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        Expr::Ternary {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    pub fn closed_range(start: Expr, end: Expr) -> Self {
        Expr::Range {
            start: Box::new(start),
            end: Box::new(end),
            kind: RangeKind::Closed,
        }
    }

    pub fn half_open_range(start: Expr, end: Expr) -> Self {
        Expr::Range {
            start: Box::new(start),
            end: Box::new(end),
            kind: RangeKind::HalfOpen,
        }
    }

    pub fn assign(target: &str, value: Expr) -> Self {
        Expr::Assign {
            target: target.to_string(),
            value: Box::new(value),
        }
    }

    pub fn compound(target: &str, op: BinOp, value: Expr) -> Self {
        Expr::CompoundAssign {
            target: target.to_string(),
            op,
            value: Box::new(value),
        }
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.to_string(),
            args,
        }
    }
}

/// Appends statements to one block, numbering lines as it goes
pub struct BlockBuilder<'a> {
    line: &'a mut usize,
    stmts: Vec<Stmt>,
    expected_failures: Vec<usize>,
}

impl<'a> BlockBuilder<'a> {
    fn new(line: &'a mut usize) -> Self {
        BlockBuilder {
            line,
            stmts: Vec::new(),
            expected_failures: Vec::new(),
        }
    }

    fn next_location(&mut self) -> SourceLocation {
        *self.line += 1;
        SourceLocation::new(*self.line, 1)
    }

    fn push(&mut self, stmt: Stmt) -> &mut Self {
        self.stmts.push(stmt);
        self
    }

    fn nested(&mut self, build: impl FnOnce(&mut BlockBuilder)) -> Vec<Stmt> {
        let mut inner = BlockBuilder::new(&mut *self.line);
        build(&mut inner);
        inner.stmts
    }

    fn decl(&mut self, name: &str, mutable: bool, annotation: Option<ValueType>, init: Expr) -> &mut Self {
        let location = self.next_location();
        self.push(Stmt::Decl {
            pattern: Pattern::Name(name.to_string()),
            mutable,
            annotation,
            init,
            location,
        })
    }

    /// `let name = init`
    pub fn let_(&mut self, name: &str, init: Expr) -> &mut Self {
        self.decl(name, false, None, init)
    }

    /// `var name = init`
    pub fn var(&mut self, name: &str, init: Expr) -> &mut Self {
        self.decl(name, true, None, init)
    }

    /// `let name: ty = init`
    pub fn let_typed(&mut self, name: &str, ty: ValueType, init: Expr) -> &mut Self {
        self.decl(name, false, Some(ty), init)
    }

    /// `var name: ty = init`
    pub fn var_typed(&mut self, name: &str, ty: ValueType, init: Expr) -> &mut Self {
        self.decl(name, true, Some(ty), init)
    }

    /// `let (a, b, ...) = init`
    pub fn let_tuple(&mut self, names: &[&str], init: Expr) -> &mut Self {
        let location = self.next_location();
        self.push(Stmt::Decl {
            pattern: Pattern::Tuple(names.iter().map(|n| n.to_string()).collect()),
            mutable: false,
            annotation: None,
            init,
            location,
        })
    }

    pub fn expr(&mut self, expr: Expr) -> &mut Self {
        let location = self.next_location();
        self.push(Stmt::Expr { expr, location })
    }

    pub fn if_(&mut self, condition: Expr, then: impl FnOnce(&mut BlockBuilder)) -> &mut Self {
        let location = self.next_location();
        let then_branch = self.nested(then);
        // closing brace
        self.next_location();
        self.push(Stmt::If {
            condition,
            then_branch,
            else_branch: None,
            location,
        })
    }

    pub fn if_else(
        &mut self,
        condition: Expr,
        then: impl FnOnce(&mut BlockBuilder),
        otherwise: impl FnOnce(&mut BlockBuilder),
    ) -> &mut Self {
        let location = self.next_location();
        let then_branch = self.nested(then);
        // `} else {`
        self.next_location();
        let else_branch = self.nested(otherwise);
        self.next_location();
        self.push(Stmt::If {
            condition,
            then_branch,
            else_branch: Some(else_branch),
            location,
        })
    }

    pub fn for_in(&mut self, var: &str, iterable: Expr, body: impl FnOnce(&mut BlockBuilder)) -> &mut Self {
        let location = self.next_location();
        let body = self.nested(body);
        self.next_location();
        self.push(Stmt::ForIn {
            var: var.to_string(),
            iterable,
            body,
            location,
        })
    }

    /// Mark the most recent statement as one that is meant to fail
    pub fn expect_failure(&mut self) -> &mut Self {
        if let Some(stmt) = self.stmts.last() {
            self.expected_failures.push(stmt.location().line);
        }
        self
    }

    /// Leave a blank line in the listing
    pub fn gap(&mut self) -> &mut Self {
        *self.line += 1;
        self
    }

    fn into_lines(self) -> Vec<Line> {
        let expected = self.expected_failures;
        self.stmts
            .into_iter()
            .map(|stmt| {
                let expects_failure = expected.contains(&stmt.location().line);
                Line {
                    stmt,
                    expects_failure,
                }
            })
            .collect()
    }
}

/// Builds a [`Script`] section by section
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    sections: Vec<Section>,
    line: usize,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, title: &str, build: impl FnOnce(&mut BlockBuilder)) -> Self {
        // the title comment and the blank line after it
        self.line += 2;
        let first_line = self.line + 1;
        let mut block = BlockBuilder::new(&mut self.line);
        build(&mut block);
        let lines = block.into_lines();
        self.line += 1;
        self.sections.push(Section {
            title: title.to_string(),
            first_line,
            lines,
        });
        self
    }

    pub fn build(self) -> Script {
        Script {
            sections: self.sections,
        }
    }
}
