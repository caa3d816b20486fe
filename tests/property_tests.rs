//! Property-based tests for fixed-width integer semantics using proptest

use opplay::interpreter::Interpreter;
use opplay::memory::{FixedInt, IntType, Value, ValueType};
use opplay::script::ast::{BinOp, Expr, UnOp};
use opplay::script::ScriptBuilder;
use proptest::prelude::*;

// ============================================================================
// Strategy generators
// ============================================================================

fn unsigned_type() -> impl Strategy<Value = IntType> {
    prop_oneof![
        Just(IntType::UInt8),
        Just(IntType::UInt16),
        Just(IntType::UInt32),
        Just(IntType::UInt64),
        Just(IntType::UInt),
    ]
}

fn any_type() -> impl Strategy<Value = IntType> {
    proptest::sample::select(IntType::ALL.to_vec())
}

/// A type and a value in its range
fn fixed_int() -> impl Strategy<Value = FixedInt> {
    any_type().prop_flat_map(|ty| {
        (ty.min_value()..=ty.max_value()).prop_map(move |v| FixedInt::wrapping_new(ty, v))
    })
}

/// A type and two values in its range
fn fixed_pair() -> impl Strategy<Value = (FixedInt, FixedInt)> {
    any_type().prop_flat_map(|ty| {
        let range = ty.min_value()..=ty.max_value();
        (range.clone(), range).prop_map(move |(a, b)| {
            (FixedInt::wrapping_new(ty, a), FixedInt::wrapping_new(ty, b))
        })
    })
}

fn unsigned_pair() -> impl Strategy<Value = (FixedInt, FixedInt)> {
    unsigned_type().prop_flat_map(|ty| {
        let range = 0..=ty.max_value();
        (range.clone(), range).prop_map(move |(a, b)| {
            (FixedInt::wrapping_new(ty, a), FixedInt::wrapping_new(ty, b))
        })
    })
}

// ============================================================================
// Bitwise properties
// ============================================================================

proptest! {
    #[test]
    fn bit_not_is_max_minus_value((x, _) in unsigned_pair()) {
        let ty = x.ty();
        prop_assert_eq!(x.bit_not().value(), ty.max_value() - x.value());
    }

    #[test]
    fn bit_not_is_an_involution(x in fixed_int()) {
        prop_assert_eq!(x.bit_not().bit_not(), x);
    }

    #[test]
    fn shifting_by_width_or_more_clears_unsigned((x, _) in unsigned_pair(), extra in 0u32..8) {
        let amount = (x.ty().bits() + extra) as i128;
        prop_assert!(x.shl(amount).is_zero());
        prop_assert!(x.shr(amount).is_zero());
    }

    #[test]
    fn signed_right_shift_keeps_sign(x in fixed_int(), amount in 0i128..70) {
        prop_assume!(x.ty().is_signed());
        let shifted = x.shr(amount);
        prop_assert_eq!(shifted.value() < 0, x.value() < 0);
    }
}

// ============================================================================
// Arithmetic properties
// ============================================================================

proptest! {
    #[test]
    fn wrapping_add_is_modular((x, y) in unsigned_pair()) {
        let modulus = x.ty().max_value() + 1;
        let sum = x.wrapping_add(y);
        prop_assert_eq!(sum.value(), (x.value() + y.value()) % modulus);
    }

    #[test]
    fn checked_add_agrees_with_wrapping_when_in_range((x, y) in fixed_pair()) {
        let exact = x.value() + y.value();
        match x.checked_add(y) {
            Some(sum) => {
                prop_assert_eq!(sum.value(), exact);
                prop_assert_eq!(sum, x.wrapping_add(y));
            }
            None => prop_assert!(!x.ty().contains(exact)),
        }
    }

    #[test]
    fn wrapping_sub_undoes_wrapping_add((x, y) in fixed_pair()) {
        prop_assert_eq!(x.wrapping_add(y).wrapping_sub(y), x);
    }

    #[test]
    fn wrapping_division_never_fails((x, y) in fixed_pair()) {
        let q = x.wrapping_div(y);
        let r = x.wrapping_rem(y);
        if y.is_zero() {
            prop_assert!(q.is_zero());
            prop_assert!(r.is_zero());
        } else if let Some(expected) = x.checked_rem(y) {
            prop_assert_eq!(r, expected);
        }
    }

    #[test]
    fn remainder_takes_sign_of_dividend((x, y) in fixed_pair()) {
        prop_assume!(!y.is_zero());
        if let Some(r) = x.checked_rem(y) {
            prop_assert!(r.is_zero() || (r.value() < 0) == (x.value() < 0));
            prop_assert!(r.value().abs() < y.value().abs());
        }
    }
}

// ============================================================================
// Interpreter properties
// ============================================================================

proptest! {
    #[test]
    fn closed_range_has_inclusive_length(start in -50i128..50, len in 0i128..50) {
        let mut interpreter = Interpreter::new();
        let count = interpreter
            .evaluate(&Expr::count(Expr::closed_range(
                Expr::int(start),
                Expr::int(start + len),
            )))
            .unwrap();
        prop_assert_eq!(count, Value::int(IntType::Int, len + 1).unwrap());
    }

    #[test]
    fn negating_twice_is_identity(x in -1000i128..1000) {
        let script = ScriptBuilder::new()
            .section("negate", |b| {
                b.let_("x", Expr::int(x));
            })
            .build();
        let mut interpreter = Interpreter::new();
        interpreter.run(&script);
        let twice = interpreter
            .evaluate(&Expr::unary(UnOp::Neg, Expr::unary(UnOp::Neg, Expr::var("x"))))
            .unwrap();
        prop_assert_eq!(Some(&twice), interpreter.binding("x"));
    }

    #[test]
    fn literal_adopts_operand_type(x in 0i128..=255, y in 0i128..=255) {
        let script = ScriptBuilder::new()
            .section("typed", |b| {
                b.let_typed("x", ValueType::Int(IntType::UInt8), Expr::int(x));
            })
            .build();
        let mut interpreter = Interpreter::new();
        interpreter.run(&script);
        let sum = interpreter
            .evaluate(&Expr::binary(BinOp::WrappingAdd, Expr::var("x"), Expr::int(y)))
            .unwrap();
        prop_assert_eq!(sum, Value::int(IntType::UInt8, (x + y) % 256).unwrap());
    }
}
