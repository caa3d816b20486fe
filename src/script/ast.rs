// AST definitions for playground scripts

use crate::memory::{IntType, RangeKind, ValueType};

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}", self.line)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic (overflow is an error)
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    // Wrapping arithmetic
    WrappingAdd,
    WrappingSub,
    WrappingMul,
    WrappingDiv,
    WrappingRem,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Identity
    Identical,
    NotIdentical,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        use BinOp::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "%",
            WrappingAdd => "&+",
            WrappingSub => "&-",
            WrappingMul => "&*",
            WrappingDiv => "&/",
            WrappingRem => "&%",
            Eq => "==",
            Ne => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            Identical => "===",
            NotIdentical => "!==",
            And => "&&",
            Or => "||",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            Shl => "<<",
            Shr => ">>",
        }
    }

    /// Binding strength, higher binds tighter
    pub fn precedence(self) -> u8 {
        use BinOp::*;
        match self {
            Shl | Shr => 7,
            Mul | Div | Rem | WrappingMul | WrappingDiv | WrappingRem | BitAnd => 6,
            Add | Sub | WrappingAdd | WrappingSub | BitOr | BitXor => 5,
            Eq | Ne | Lt | Le | Gt | Ge | Identical | NotIdentical => 3,
            And => 2,
            Or => 1,
        }
    }

    pub fn is_comparison(self) -> bool {
        use BinOp::*;
        matches!(self, Eq | Ne | Lt | Le | Gt | Ge | Identical | NotIdentical)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinOp::Shl | BinOp::Shr)
    }

    /// Whether `a op= b` is available for this operator
    pub fn has_compound_form(self) -> bool {
        !self.is_comparison() && !self.is_logical()
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,     // -x
    Plus,    // +x
    Not,     // !x
    BitNot,  // ~x
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Plus => "+",
            UnOp::Not => "!",
            UnOp::BitNot => "~",
            UnOp::PreInc | UnOp::PostInc => "++",
            UnOp::PreDec | UnOp::PostDec => "--",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, UnOp::PostInc | UnOp::PostDec)
    }
}

/// How an integer literal was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Radix {
    #[default]
    Decimal,
    Binary,
    Hex,
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals take their type from context
    IntLiteral(i128, Radix),
    FloatLiteral(f64),
    BoolLiteral(bool),
    CharLiteral(char),
    StringLiteral(String),

    Variable(String),
    /// `UInt8.min`
    IntMin(IntType),
    /// `UInt8.max`
    IntMax(IntType),
    /// Explicit parentheses; evaluates to the inner expression
    Group(Box<Expr>),

    Tuple(Vec<Expr>),
    TupleField {
        tuple: Box<Expr>,
        index: usize,
    },
    Array(Vec<Expr>),
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    /// `.count` of a string, array or range
    Count(Box<Expr>),

    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        kind: RangeKind,
    },

    // Statement-only forms; consuming their value is rejected before execution
    Assign {
        target: String,
        value: Box<Expr>,
    },
    CompoundAssign {
        target: String,
        op: BinOp,
        value: Box<Expr>,
    },

    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// Left-hand side of a declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Name(String),
    Tuple(Vec<String>),
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Decl {
        pattern: Pattern,
        mutable: bool,
        annotation: Option<ValueType>,
        init: Expr,
        location: SourceLocation,
    },
    Expr {
        expr: Expr,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        location: SourceLocation,
    },
    ForIn {
        var: String,
        iterable: Expr,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Decl { location, .. }
            | Stmt::Expr { location, .. }
            | Stmt::If { location, .. }
            | Stmt::ForIn { location, .. } => *location,
        }
    }
}
