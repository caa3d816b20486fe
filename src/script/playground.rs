//! The built-in operator tour
//!
//! One section per operator family, in the order a reader would meet them.
//! Two lines are meant to fail: consuming the result of an assignment, and
//! standard addition past `UInt8.max`.

use super::ast::{BinOp, Expr, UnOp};
use super::{BlockBuilder, Script, ScriptBuilder};
use crate::memory::{IntType, ValueType};

fn bin(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::binary(op, left, right)
}

fn var(name: &str) -> Expr {
    Expr::var(name)
}

fn print(text: &str) -> Expr {
    Expr::call("print", vec![Expr::string(text)])
}

fn welcome_or_denied(b: &mut BlockBuilder, condition: Expr) {
    b.if_else(
        condition,
        |then| {
            then.expr(print("Welcome!"));
        },
        |otherwise| {
            otherwise.expr(print("ACCESS DENIED"));
        },
    );
}

const UINT8: ValueType = ValueType::Int(IntType::UInt8);

/// Build the full operator tour
pub fn operators() -> Script {
    ScriptBuilder::new()
        .section("Assignment Operator", |b| {
            b.let_("b", Expr::int(10));
            b.var("a", Expr::int(5));
            b.expr(Expr::assign("a", var("b")));
            b.gap();
            b.var("c", Expr::assign("a", var("b"))).expect_failure();
            b.gap();
            b.let_("z", Expr::tuple(vec![Expr::int(1), Expr::int(2)]));
            b.let_tuple(&["x", "y"], Expr::tuple(vec![Expr::int(1), Expr::int(2)]));
            b.expr(var("x"));
            b.expr(var("y"));
        })
        .section("Arithmetic Operators", |b| {
            b.expr(bin(BinOp::Add, Expr::int(2), Expr::int(3)));
            b.expr(bin(BinOp::Sub, Expr::int(10), Expr::int(3)));
            b.expr(bin(BinOp::Mul, Expr::int(2), Expr::int(4)));
            b.expr(bin(BinOp::Div, Expr::float(20.0), Expr::float(2.5)));
            b.gap();
            b.expr(bin(BinOp::Add, Expr::string("hello, "), Expr::string("world")));
            b.gap();
            b.let_typed("dog", ValueType::Character, Expr::char('🐶'));
            b.let_typed("cow", ValueType::Character, Expr::char('🐮'));
            b.let_("dogCow", bin(BinOp::Add, var("dog"), var("cow")));
        })
        .section("Remainder Operator", |b| {
            b.expr(bin(BinOp::Rem, Expr::int(9), Expr::int(4)));
            b.expr(bin(BinOp::Rem, Expr::unary(UnOp::Neg, Expr::int(1)), Expr::int(3)));
            b.expr(bin(BinOp::Rem, Expr::int(9), Expr::float(2.5)));
        })
        .section("Overflow Operators", |b| {
            b.var("potentialOverflow", Expr::max_of(IntType::UInt8));
            b.expr(Expr::assign(
                "potentialOverflow",
                bin(BinOp::Add, var("potentialOverflow"), Expr::int(10)),
            ))
            .expect_failure();
            b.gap();
            b.var("willOverflow", Expr::max_of(IntType::UInt8));
            b.expr(Expr::assign(
                "willOverflow",
                bin(BinOp::WrappingAdd, var("willOverflow"), Expr::int(1)),
            ));
            b.gap();
            b.var("willUnderflow", Expr::min_of(IntType::UInt8));
            b.expr(Expr::assign(
                "willUnderflow",
                bin(BinOp::WrappingSub, var("willUnderflow"), Expr::int(1)),
            ));
            b.gap();
            b.let_("x1", Expr::int(1));
            b.let_("y1", bin(BinOp::WrappingDiv, var("x1"), Expr::int(0)));
            b.let_("z1", bin(BinOp::WrappingRem, var("x1"), Expr::int(0)));
        })
        .section("Increment and Decrement Operators", |b| {
            b.var("i", Expr::int(0));
            b.expr(Expr::unary(UnOp::PreInc, var("i")));
            b.expr(Expr::unary(UnOp::PreDec, var("i")));
            b.gap();
            b.var("j", Expr::unary(UnOp::PreInc, var("i")));
            b.var("k", Expr::unary(UnOp::PostInc, var("i")));
            b.expr(var("j"));
            b.expr(var("k"));
            b.expr(var("i"));
            b.gap();
            b.var("l", Expr::float(8.5));
            b.expr(Expr::unary(UnOp::PreInc, var("l")));
        })
        .section("Unary Minus/Plus Operator", |b| {
            b.let_("three", Expr::int(3));
            b.let_("minusThree", Expr::unary(UnOp::Neg, var("three")));
            b.let_("plusThree", Expr::unary(UnOp::Neg, var("minusThree")));
            b.let_("alsoMinusThree", Expr::unary(UnOp::Plus, var("minusThree")));
        })
        .section("Compound Assignment Operators", |b| {
            b.var("a1", Expr::int(1));
            b.expr(Expr::compound("a1", BinOp::Add, Expr::int(2)));
            b.expr(Expr::assign("a1", bin(BinOp::Add, var("a1"), Expr::int(2))));
        })
        .section("Comparison Operators", |b| {
            b.expr(bin(BinOp::Eq, Expr::int(1), Expr::int(1)));
            b.expr(bin(BinOp::Ne, Expr::int(2), Expr::int(1)));
            b.gap();
            b.var("firstObj", Expr::string("test1"));
            b.var("secondObj", Expr::string("test1"));
            b.var("sameObj", var("firstObj"));
            b.gap();
            b.expr(bin(BinOp::Eq, var("firstObj"), var("secondObj")));
            b.expr(bin(BinOp::Identical, var("firstObj"), var("secondObj")));
            b.expr(bin(BinOp::Identical, var("firstObj"), var("sameObj")));
        })
        .section("Ternary Conditional Operator", |b| {
            b.let_("contentHeight", Expr::int(40));
            b.let_("hasHeader", Expr::bool(true));
            b.let_(
                "rowHeight",
                bin(
                    BinOp::Add,
                    var("contentHeight"),
                    Expr::ternary(var("hasHeader"), Expr::int(50), Expr::int(20)),
                ),
            );
        })
        .section("Closed Range Operator", |b| {
            b.var("total", Expr::int(0));
            b.for_in("index", Expr::closed_range(Expr::int(1), Expr::int(10)), |body| {
                body.expr(Expr::unary(UnOp::PostInc, var("total")));
            });
            b.expr(var("total"));
        })
        .section("Half-Open Range Operator", |b| {
            b.let_(
                "places",
                Expr::array(vec![
                    Expr::string("SFO"),
                    Expr::string("LAS"),
                    Expr::string("BOS"),
                ]),
            );
            b.var("count", Expr::count(var("places")));
            b.var("result", Expr::string(""));
            b.for_in(
                "index",
                Expr::half_open_range(Expr::int(0), var("count")),
                |body| {
                    body.expr(Expr::compound(
                        "result",
                        BinOp::Add,
                        Expr::index(var("places"), var("index")),
                    ));
                },
            );
            b.expr(var("result"));
        })
        .section("Logical NOT Operator", |b| {
            b.let_("allowed", Expr::bool(true));
            b.expr(Expr::unary(UnOp::Not, var("allowed")));
            b.if_(Expr::unary(UnOp::Not, var("allowed")), |then| {
                then.expr(print("Access Denied"));
            });
        })
        .section("Logical AND Operator", |b| {
            b.let_("enteredDoorCode", Expr::bool(true));
            b.let_("passedRetinaScan", Expr::bool(false));
            welcome_or_denied(
                b,
                bin(BinOp::And, var("enteredDoorCode"), var("passedRetinaScan")),
            );
        })
        .section("Logical OR Operator", |b| {
            b.let_("hasDoorKey", Expr::bool(false));
            b.let_("knowsOverridePassword", Expr::bool(true));
            welcome_or_denied(
                b,
                bin(BinOp::Or, var("hasDoorKey"), var("knowsOverridePassword")),
            );
        })
        .section("Combining Logical Operators", |b| {
            welcome_or_denied(
                b,
                bin(
                    BinOp::Or,
                    bin(
                        BinOp::Or,
                        bin(BinOp::And, var("enteredDoorCode"), var("passedRetinaScan")),
                        var("hasDoorKey"),
                    ),
                    var("knowsOverridePassword"),
                ),
            );
        })
        .section("Explicit Parentheses", |b| {
            welcome_or_denied(
                b,
                bin(
                    BinOp::Or,
                    bin(
                        BinOp::Or,
                        Expr::group(bin(
                            BinOp::And,
                            var("enteredDoorCode"),
                            var("passedRetinaScan"),
                        )),
                        var("hasDoorKey"),
                    ),
                    var("knowsOverridePassword"),
                ),
            );
        })
        .section("Bitwise NOT Operator", |b| {
            b.let_typed("initialBits", UINT8, Expr::binary_literal(0b0101_0101));
            b.let_("invertedBits", Expr::unary(UnOp::BitNot, var("initialBits")));
        })
        .section("Bitwise AND Operator", |b| {
            b.let_typed("firstSixBits", UINT8, Expr::binary_literal(0b1111_1100));
            b.let_typed("lastSixBits", UINT8, Expr::binary_literal(0b0011_1111));
            b.let_(
                "middleFourBits",
                bin(BinOp::BitAnd, var("firstSixBits"), var("lastSixBits")),
            );
        })
        .section("Bitwise OR Operator", |b| {
            b.let_typed("someBits", UINT8, Expr::binary_literal(0b1011_0010));
            b.let_typed("moreBits", UINT8, Expr::binary_literal(0b0101_1110));
            b.let_("combinedBits", bin(BinOp::BitOr, var("someBits"), var("moreBits")));
        })
        .section("Bitwise XOR Operator", |b| {
            b.let_typed("firstBits", UINT8, Expr::binary_literal(0b0001_0100));
            b.let_typed("otherBits", UINT8, Expr::binary_literal(0b0000_0101));
            b.let_("outputBits", bin(BinOp::BitXor, var("firstBits"), var("otherBits")));
        })
        .section("Bitwise Shift Operators", |b| {
            b.let_typed("shiftBits", UINT8, Expr::int(4));
            for amount in [1, 2, 5, 6] {
                b.expr(bin(BinOp::Shl, var("shiftBits"), Expr::int(amount)));
            }
            b.expr(bin(BinOp::Shr, var("shiftBits"), Expr::int(2)));
            b.gap();
            b.let_typed(
                "shiftBitsSigned",
                ValueType::Int(IntType::Int8),
                Expr::unary(UnOp::Neg, Expr::int(4)),
            );
            for amount in [1, 2, 5, 6] {
                b.expr(bin(BinOp::Shl, var("shiftBitsSigned"), Expr::int(amount)));
            }
            b.expr(bin(BinOp::Shr, var("shiftBitsSigned"), Expr::int(2)));
        })
        .section("Color Components", |b| {
            b.let_typed("color", ValueType::Int(IntType::UInt32), Expr::hex(0xCC6699));
            b.let_(
                "redComponent",
                bin(
                    BinOp::Shr,
                    Expr::group(bin(BinOp::BitAnd, var("color"), Expr::hex(0xFF0000))),
                    Expr::int(16),
                ),
            );
            b.let_(
                "greenComponent",
                bin(
                    BinOp::Shr,
                    Expr::group(bin(BinOp::BitAnd, var("color"), Expr::hex(0x00FF00))),
                    Expr::int(8),
                ),
            );
            b.let_("blueComponent", bin(BinOp::BitAnd, var("color"), Expr::hex(0x0000FF)));
        })
        .build()
}
