//! Integer ranges
//!
//! A [`RangeValue`] is a pair of bounds of one integer type plus a
//! [`RangeKind`]. It is validated on construction and iterated lazily;
//! [`RangeValue::iter`] can be called any number of times and every call
//! starts again from the lower bound.

use super::int::{FixedInt, IntType};
use std::fmt;

/// Whether the upper bound is part of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    /// `a...b`
    Closed,
    /// `a..<b`
    HalfOpen,
}

impl RangeKind {
    pub fn symbol(self) -> &'static str {
        match self {
            RangeKind::Closed => "...",
            RangeKind::HalfOpen => "..<",
        }
    }
}

/// Why a range could not be formed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFault {
    /// Lower bound exceeds the upper bound
    Inverted,
    /// Bounds are of different integer types
    MixedTypes(IntType, IntType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeValue {
    start: FixedInt,
    end: FixedInt,
    kind: RangeKind,
}

impl RangeValue {
    pub fn new(start: FixedInt, end: FixedInt, kind: RangeKind) -> Result<Self, RangeFault> {
        if start.ty() != end.ty() {
            return Err(RangeFault::MixedTypes(start.ty(), end.ty()));
        }
        // `a..<a` is empty but valid; both kinds reject end < start
        if end.value() < start.value() {
            return Err(RangeFault::Inverted);
        }
        Ok(RangeValue { start, end, kind })
    }

    pub fn closed(start: FixedInt, end: FixedInt) -> Result<Self, RangeFault> {
        Self::new(start, end, RangeKind::Closed)
    }

    pub fn half_open(start: FixedInt, end: FixedInt) -> Result<Self, RangeFault> {
        Self::new(start, end, RangeKind::HalfOpen)
    }

    pub fn start(&self) -> FixedInt {
        self.start
    }

    pub fn end(&self) -> FixedInt {
        self.end
    }

    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    pub fn element_type(&self) -> IntType {
        self.start.ty()
    }

    /// One past the last value produced, as a plain number
    fn upper_exclusive(&self) -> i128 {
        match self.kind {
            RangeKind::Closed => self.end.value() + 1,
            RangeKind::HalfOpen => self.end.value(),
        }
    }

    pub fn len(&self) -> u128 {
        (self.upper_exclusive() - self.start.value()) as u128
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, value: FixedInt) -> bool {
        value.ty() == self.element_type()
            && value.value() >= self.start.value()
            && value.value() < self.upper_exclusive()
    }

    /// A fresh iterator from the lower bound
    pub fn iter(&self) -> RangeIter {
        RangeIter {
            ty: self.element_type(),
            next: self.start.value(),
            upper: self.upper_exclusive(),
        }
    }
}

impl IntoIterator for &RangeValue {
    type Item = FixedInt;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for RangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, self.kind.symbol(), self.end)
    }
}

/// Lazy ascending iterator over a [`RangeValue`]
#[derive(Debug, Clone)]
pub struct RangeIter {
    ty: IntType,
    next: i128,
    upper: i128,
}

impl Iterator for RangeIter {
    type Item = FixedInt;

    fn next(&mut self) -> Option<FixedInt> {
        if self.next >= self.upper {
            return None;
        }
        let current = FixedInt::new(self.ty, self.next);
        self.next += 1;
        current
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.upper - self.next).max(0);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i128) -> FixedInt {
        FixedInt::new(IntType::Int, v).unwrap()
    }

    #[test]
    fn test_closed_includes_end() {
        let r = RangeValue::closed(int(1), int(10)).unwrap();
        let values: Vec<i128> = r.iter().map(|v| v.value()).collect();
        assert_eq!(values, (1..=10).collect::<Vec<_>>());
        assert_eq!(r.len(), 10);
    }

    #[test]
    fn test_half_open_excludes_end() {
        let r = RangeValue::half_open(int(0), int(3)).unwrap();
        let values: Vec<i128> = r.iter().map(|v| v.value()).collect();
        assert_eq!(values, vec![0, 1, 2]);
        assert!(!r.contains(int(3)));
    }

    #[test]
    fn test_restartable() {
        let r = RangeValue::half_open(int(5), int(8)).unwrap();
        assert_eq!(r.iter().count(), 3);
        assert_eq!(r.iter().count(), 3);
    }

    #[test]
    fn test_empty_and_inverted() {
        assert!(RangeValue::half_open(int(4), int(4)).unwrap().is_empty());
        assert_eq!(RangeValue::closed(int(4), int(4)).unwrap().len(), 1);
        assert_eq!(
            RangeValue::closed(int(5), int(4)),
            Err(RangeFault::Inverted)
        );
        assert_eq!(
            RangeValue::half_open(int(5), int(4)),
            Err(RangeFault::Inverted)
        );
    }

    #[test]
    fn test_closed_range_at_type_max() {
        let max = FixedInt::max(IntType::UInt8);
        let r = RangeValue::closed(FixedInt::new(IntType::UInt8, 250).unwrap(), max).unwrap();
        assert_eq!(r.iter().last(), Some(max));
        assert_eq!(r.len(), 6);
    }
}
