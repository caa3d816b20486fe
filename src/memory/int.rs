//! Fixed-width integers
//!
//! [`FixedInt`] pairs an [`IntType`] with its mathematical value held in an
//! `i128`, which is wide enough to represent every value of every supported
//! type and every intermediate sum or difference of two of them.
//!
//! Two families of operations are provided:
//!
//! - **Checked** (`checked_*`): return `None` when the mathematical result does
//!   not fit the operand type.
//! - **Wrapping** (`wrapping_*`): work on the two's-complement bit pattern,
//!   masking to `2^N - 1` and sign-extending for signed types.
//!
//! Bitwise and shift operations always work on the bit pattern and never fail.

use std::fmt;

/// The fixed-width integer types known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntType {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
}

impl IntType {
    pub const ALL: [IntType; 10] = [
        IntType::Int,
        IntType::Int8,
        IntType::Int16,
        IntType::Int32,
        IntType::Int64,
        IntType::UInt,
        IntType::UInt8,
        IntType::UInt16,
        IntType::UInt32,
        IntType::UInt64,
    ];

    /// Width in bits
    pub fn bits(self) -> u32 {
        match self {
            IntType::Int8 | IntType::UInt8 => 8,
            IntType::Int16 | IntType::UInt16 => 16,
            IntType::Int32 | IntType::UInt32 => 32,
            IntType::Int | IntType::Int64 | IntType::UInt | IntType::UInt64 => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntType::Int | IntType::Int8 | IntType::Int16 | IntType::Int32 | IntType::Int64
        )
    }

    /// All-ones pattern for this width
    #[inline]
    pub fn mask(self) -> u128 {
        (1u128 << self.bits()) - 1
    }

    pub fn min_value(self) -> i128 {
        if self.is_signed() {
            -(1i128 << (self.bits() - 1))
        } else {
            0
        }
    }

    pub fn max_value(self) -> i128 {
        if self.is_signed() {
            (1i128 << (self.bits() - 1)) - 1
        } else {
            self.mask() as i128
        }
    }

    #[inline]
    pub fn contains(self, value: i128) -> bool {
        value >= self.min_value() && value <= self.max_value()
    }

    pub fn name(self) -> &'static str {
        match self {
            IntType::Int => "Int",
            IntType::Int8 => "Int8",
            IntType::Int16 => "Int16",
            IntType::Int32 => "Int32",
            IntType::Int64 => "Int64",
            IntType::UInt => "UInt",
            IntType::UInt8 => "UInt8",
            IntType::UInt16 => "UInt16",
            IntType::UInt32 => "UInt32",
            IntType::UInt64 => "UInt64",
        }
    }
}

impl fmt::Display for IntType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An integer value tagged with its fixed-width type.
///
/// The stored value is always within `ty`'s range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedInt {
    ty: IntType,
    value: i128,
}

impl FixedInt {
    /// Create a value, returning `None` if it is out of range for `ty`
    pub fn new(ty: IntType, value: i128) -> Option<Self> {
        ty.contains(value).then_some(FixedInt { ty, value })
    }

    /// Reduce an arbitrary value modulo `2^N` into `ty`
    pub fn wrapping_new(ty: IntType, value: i128) -> Self {
        Self::from_bits(ty, value as u128)
    }

    /// Reinterpret the low `N` bits of `bits` as a value of `ty`
    pub fn from_bits(ty: IntType, bits: u128) -> Self {
        let bits = bits & ty.mask();
        let value = if ty.is_signed() && (bits >> (ty.bits() - 1)) & 1 == 1 {
            // Sign-extend: subtract 2^N
            bits as i128 - (1i128 << ty.bits())
        } else {
            bits as i128
        };
        FixedInt { ty, value }
    }

    pub fn min(ty: IntType) -> Self {
        FixedInt {
            ty,
            value: ty.min_value(),
        }
    }

    pub fn max(ty: IntType) -> Self {
        FixedInt {
            ty,
            value: ty.max_value(),
        }
    }

    pub fn zero(ty: IntType) -> Self {
        FixedInt { ty, value: 0 }
    }

    #[inline]
    pub fn ty(&self) -> IntType {
        self.ty
    }

    #[inline]
    pub fn value(&self) -> i128 {
        self.value
    }

    /// Two's-complement bit pattern, masked to the type width
    #[inline]
    pub fn to_bits(&self) -> u128 {
        (self.value as u128) & self.ty.mask()
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    // Checked arithmetic

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Self::new(self.ty, self.value.checked_add(rhs.value)?)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        Self::new(self.ty, self.value.checked_sub(rhs.value)?)
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        Self::new(self.ty, self.value.checked_mul(rhs.value)?)
    }

    /// Truncating division; `None` on a zero divisor or `MIN / -1`
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.value == 0 {
            return None;
        }
        Self::new(self.ty, self.value / rhs.value)
    }

    /// Remainder with the sign of the dividend; `None` on a zero divisor or `MIN % -1`
    pub fn checked_rem(self, rhs: Self) -> Option<Self> {
        let overflows = self.ty.is_signed() && self.value == self.ty.min_value() && rhs.value == -1;
        if rhs.value == 0 || overflows {
            return None;
        }
        Self::new(self.ty, self.value % rhs.value)
    }

    pub fn checked_neg(self) -> Option<Self> {
        Self::new(self.ty, -self.value)
    }

    // Wrapping arithmetic

    pub fn wrapping_add(self, rhs: Self) -> Self {
        Self::from_bits(self.ty, self.to_bits().wrapping_add(rhs.to_bits()))
    }

    pub fn wrapping_sub(self, rhs: Self) -> Self {
        Self::from_bits(self.ty, self.to_bits().wrapping_sub(rhs.to_bits()))
    }

    pub fn wrapping_mul(self, rhs: Self) -> Self {
        // The low N bits of a product depend only on the low N bits of the factors
        Self::from_bits(self.ty, self.to_bits().wrapping_mul(rhs.to_bits()))
    }

    /// Division that yields 0 for a zero divisor and wraps `MIN / -1` to `MIN`
    pub fn wrapping_div(self, rhs: Self) -> Self {
        if rhs.value == 0 {
            return Self::zero(self.ty);
        }
        Self::wrapping_new(self.ty, self.value / rhs.value)
    }

    /// Remainder that yields 0 for a zero divisor
    pub fn wrapping_rem(self, rhs: Self) -> Self {
        if rhs.value == 0 {
            return Self::zero(self.ty);
        }
        Self::wrapping_new(self.ty, self.value % rhs.value)
    }

    // Bitwise

    pub fn bit_not(self) -> Self {
        Self::from_bits(self.ty, !self.to_bits())
    }

    pub fn bit_and(self, rhs: Self) -> Self {
        Self::from_bits(self.ty, self.to_bits() & rhs.to_bits())
    }

    pub fn bit_or(self, rhs: Self) -> Self {
        Self::from_bits(self.ty, self.to_bits() | rhs.to_bits())
    }

    pub fn bit_xor(self, rhs: Self) -> Self {
        Self::from_bits(self.ty, self.to_bits() ^ rhs.to_bits())
    }

    /// Left shift; bits shifted past the width are discarded.
    /// A negative amount shifts right instead.
    pub fn shl(self, amount: i128) -> Self {
        if amount < 0 {
            return self.shr(amount.saturating_neg());
        }
        if amount >= self.ty.bits() as i128 {
            return Self::zero(self.ty);
        }
        Self::from_bits(self.ty, self.to_bits() << amount)
    }

    /// Right shift: arithmetic for signed types, logical for unsigned.
    /// A negative amount shifts left instead.
    pub fn shr(self, amount: i128) -> Self {
        if amount < 0 {
            return self.shl(amount.saturating_neg());
        }
        let bits = self.ty.bits() as i128;
        if self.ty.is_signed() {
            let amount = amount.min(bits - 1);
            // i128 shift is arithmetic and the value is already sign-correct
            FixedInt {
                ty: self.ty,
                value: self.value >> amount,
            }
        } else if amount >= bits {
            Self::zero(self.ty)
        } else {
            Self::from_bits(self.ty, self.to_bits() >> amount)
        }
    }
}

impl PartialOrd for FixedInt {
    /// Only values of the same type are ordered
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        (self.ty == other.ty).then(|| self.value.cmp(&other.value))
    }
}

impl fmt::Display for FixedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u8v(v: i128) -> FixedInt {
        FixedInt::new(IntType::UInt8, v).unwrap()
    }

    fn i8v(v: i128) -> FixedInt {
        FixedInt::new(IntType::Int8, v).unwrap()
    }

    #[test]
    fn test_ranges() {
        assert_eq!(IntType::UInt8.max_value(), 255);
        assert_eq!(IntType::Int8.min_value(), -128);
        assert_eq!(IntType::Int.max_value(), i64::MAX as i128);
        assert_eq!(IntType::UInt64.max_value(), u64::MAX as i128);
        assert!(FixedInt::new(IntType::UInt8, 256).is_none());
        assert!(FixedInt::new(IntType::UInt8, -1).is_none());
    }

    #[test]
    fn test_from_bits_sign_extends() {
        assert_eq!(FixedInt::from_bits(IntType::Int8, 0xFC).value(), -4);
        assert_eq!(FixedInt::from_bits(IntType::UInt8, 0xFC).value(), 252);
        assert_eq!(FixedInt::from_bits(IntType::Int8, 0x1_80).value(), -128);
    }

    #[test]
    fn test_checked_overflow() {
        assert!(u8v(255).checked_add(u8v(10)).is_none());
        assert!(u8v(0).checked_sub(u8v(1)).is_none());
        assert!(i8v(-128).checked_neg().is_none());
        assert!(i8v(-128).checked_div(i8v(-1)).is_none());
        assert!(i8v(-128).checked_rem(i8v(-1)).is_none());
        assert_eq!(i8v(-7).checked_rem(i8v(2)).unwrap().value(), -1);
        assert!(i8v(1).checked_div(i8v(0)).is_none());
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(u8v(255).wrapping_add(u8v(1)).value(), 0);
        assert_eq!(u8v(0).wrapping_sub(u8v(1)).value(), 255);
        assert_eq!(i8v(127).wrapping_add(i8v(1)).value(), -128);
        assert_eq!(u8v(16).wrapping_mul(u8v(17)).value(), 16);
        assert_eq!(i8v(-128).wrapping_div(i8v(-1)).value(), -128);
        assert_eq!(i8v(1).wrapping_div(i8v(0)).value(), 0);
        assert_eq!(i8v(1).wrapping_rem(i8v(0)).value(), 0);

        let big = FixedInt::max(IntType::UInt64);
        assert_eq!(big.wrapping_mul(big).value(), 1);
    }

    #[test]
    fn test_shifts() {
        assert_eq!(u8v(4).shl(5).value(), 128);
        assert_eq!(u8v(4).shl(6).value(), 0);
        assert_eq!(u8v(4).shr(2).value(), 1);
        assert_eq!(u8v(4).shl(200).value(), 0);
        assert_eq!(i8v(-4).shl(1).value(), -8);
        assert_eq!(i8v(-4).shl(5).value(), -128);
        assert_eq!(i8v(-4).shl(6).value(), 0);
        assert_eq!(i8v(-4).shr(2).value(), -1);
        assert_eq!(i8v(-4).shr(100).value(), -1);
        assert_eq!(i8v(64).shr(100).value(), 0);
        assert_eq!(u8v(4).shl(-2).value(), 1);
    }

    #[test]
    fn test_bit_not() {
        assert_eq!(u8v(0b0101_0101).bit_not().value(), 0b1010_1010);
        assert_eq!(i8v(0).bit_not().value(), -1);
    }
}
