//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents every value the
//! engine can produce, and [`ValueType`], the static type attached to it.
//!
//! # Value Kinds
//!
//! - [`Value::Int`]: fixed-width integer ([`FixedInt`])
//! - [`Value::Double`]: 64-bit float
//! - [`Value::Bool`]: boolean
//! - [`Value::Char`]: a single Unicode scalar
//! - [`Value::Str`]: string in shared storage
//! - [`Value::Tuple`]: fixed-size group of values
//! - [`Value::Array`]: homogeneous list in shared storage
//! - [`Value::Range`]: validated integer range
//! - [`Value::Void`]: the empty tuple `()`
//!
//! # Value vs. Identity Equality
//!
//! `PartialEq` compares contents. Strings and arrays additionally have storage
//! identity, observable through [`Value::is_identical`]: every evaluation of a
//! literal allocates new storage, while copying a binding shares it.

use super::int::{FixedInt, IntType};
use super::range::{RangeKind, RangeValue};
use std::fmt;
use std::rc::Rc;

/// Runtime values in the engine
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(FixedInt),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(Rc<str>),
    Tuple(Vec<Value>),
    Array(Rc<[Value]>),
    Range(RangeValue),
    #[default]
    Void,
}

/// Static types of values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int(IntType),
    Double,
    Bool,
    Character,
    String,
    Tuple(Vec<ValueType>),
    Array(Box<ValueType>),
    Range { bound: IntType, kind: RangeKind },
    Void,
}

impl ValueType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int(_) | ValueType::Double)
    }

    pub fn as_int(&self) -> Option<IntType> {
        match self {
            ValueType::Int(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int(t) => write!(f, "{}", t),
            ValueType::Double => f.write_str("Double"),
            ValueType::Bool => f.write_str("Bool"),
            ValueType::Character => f.write_str("Character"),
            ValueType::String => f.write_str("String"),
            ValueType::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            ValueType::Array(elem) => write!(f, "[{}]", elem),
            ValueType::Range { bound, kind } => match kind {
                RangeKind::Closed => write!(f, "ClosedRange<{}>", bound),
                RangeKind::HalfOpen => write!(f, "Range<{}>", bound),
            },
            ValueType::Void => f.write_str("()"),
        }
    }
}

impl Value {
    /// Allocate a new string in its own storage
    pub fn string(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn int(ty: IntType, value: i128) -> Option<Self> {
        FixedInt::new(ty, value).map(Value::Int)
    }

    /// Runtime type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(n) => ValueType::Int(n.ty()),
            Value::Double(_) => ValueType::Double,
            Value::Bool(_) => ValueType::Bool,
            Value::Char(_) => ValueType::Character,
            Value::Str(_) => ValueType::String,
            Value::Tuple(items) => ValueType::Tuple(items.iter().map(Value::value_type).collect()),
            Value::Array(items) => {
                // Array literals are never empty
                let elem = items.first().map(Value::value_type).unwrap_or(ValueType::Void);
                ValueType::Array(Box::new(elem))
            }
            Value::Range(r) => ValueType::Range {
                bound: r.element_type(),
                kind: r.kind(),
            },
            Value::Void => ValueType::Void,
        }
    }

    pub fn as_int(&self) -> Option<FixedInt> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Storage identity; `None` when either side has no identity
    pub fn is_identical(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(Rc::ptr_eq(a, b)),
            (Value::Array(a), Value::Array(b)) => Some(Rc::ptr_eq(a, b)),
            _ => None,
        }
    }

    /// Source-like rendering: strings quoted, characters bare
    pub fn describe(&self) -> String {
        match self {
            Value::Str(s) => format!("{:?}", s),
            Value::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(Value::describe).collect();
                format!("({})", inner.join(", "))
            }
            Value::Array(items) => {
                let inner: Vec<String> = items.iter().map(Value::describe).collect();
                format!("[{}]", inner.join(", "))
            }
            other => other.to_string(),
        }
    }
}

/// Plain rendering, as `print` shows it
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{:?}", d),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => f.write_str(s),
            Value::Range(r) => write!(f, "{}", r),
            Value::Void => f.write_str("()"),
            Value::Tuple(_) | Value::Array(_) => f.write_str(&self.describe()),
        }
    }
}
