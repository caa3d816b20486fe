//! Value model for the engine
//!
//! This module provides the core value abstractions:
//! - [`int`]: fixed-width integers with checked, wrapping and bit operations
//! - [`range`]: validated, lazily iterated integer ranges
//! - [`value`]: runtime value representation and static types
//! - [`bindings`]: named values with `let`/`var` mutability and scopes
//!
//! # Integer Widths
//!
//! `Int` and `UInt` are 64 bits wide, like `Int64`/`UInt64`, but are distinct
//! types: operands of a binary operator must have exactly the same type.

pub mod bindings;
pub mod int;
pub mod range;
pub mod value;

pub use int::{FixedInt, IntType};
pub use range::{RangeKind, RangeValue};
pub use value::{Value, ValueType};
