// Integration tests for the operator interpreter

use opplay::interpreter::{EvalError, Interpreter};
use opplay::memory::{IntType, Value, ValueType};
use opplay::script::ast::{BinOp, Expr, UnOp};
use opplay::script::{playground, BlockBuilder, ScriptBuilder};
use opplay::transcript::EntryKind;
use std::cell::Cell;
use std::rc::Rc;

fn int(value: i128) -> Value {
    Value::int(IntType::Int, value).expect("value in range")
}

fn run(build: impl FnOnce(&mut BlockBuilder)) -> Interpreter {
    let script = ScriptBuilder::new().section("test", build).build();
    let mut interpreter = Interpreter::new();
    interpreter.run(&script);
    interpreter
}

/// Register `name()` returning `result`, counting how often it runs
fn counting_native(interpreter: &mut Interpreter, name: &str, result: bool) -> Rc<Cell<usize>> {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    interpreter.register_native(name, ValueType::Bool, move |_args| {
        counter.set(counter.get() + 1);
        Ok(Value::Bool(result))
    });
    calls
}

#[test]
fn test_playground_runs_with_expected_failures() {
    let script = playground::operators();
    let mut interpreter = Interpreter::new();
    let summary = interpreter.run(&script);

    assert_eq!(summary.failures, 2, "failures: {:?}", summary.unexpected_failures);
    assert!(summary.is_clean());
    assert_eq!(summary.executed, script.lines().count());

    let kinds: Vec<_> = interpreter.transcript().failures().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["use of void result", "overflow"]);

    let expect = [
        ("a", int(10)),
        ("dogCow", Value::string("🐶🐮")),
        ("willOverflow", Value::int(IntType::UInt8, 0).unwrap()),
        ("willUnderflow", Value::int(IntType::UInt8, 255).unwrap()),
        ("y1", int(0)),
        ("i", int(2)),
        ("l", Value::Double(9.5)),
        ("a1", int(5)),
        ("rowHeight", int(90)),
        ("total", int(10)),
        ("result", Value::string("SFOLASBOS")),
        ("invertedBits", Value::int(IntType::UInt8, 170).unwrap()),
        ("redComponent", Value::int(IntType::UInt32, 0xCC).unwrap()),
    ];
    for (name, value) in expect {
        assert_eq!(interpreter.binding(name), Some(&value), "binding {}", name);
    }
    assert_eq!(interpreter.binding("c"), None);

    assert_eq!(
        interpreter.transcript().output_lines(),
        vec!["ACCESS DENIED", "Welcome!", "Welcome!", "Welcome!"]
    );
}

#[test]
fn test_playground_bindings_are_visible_to_later_sections() {
    let script = playground::operators();
    let combining = script
        .section("Combining Logical Operators")
        .expect("section exists");
    assert!(combining.matches("combining"));

    let mut interpreter = Interpreter::new();
    let mut summary = Default::default();
    for section in &script.sections {
        interpreter
            .transcript_mut()
            .set_muted(!section.matches("combining"));
        for line in &section.lines {
            let _ = interpreter.run_line(line, &mut summary);
        }
    }
    assert_eq!(interpreter.transcript().output_lines(), vec!["Welcome!"]);
}

#[test]
fn test_and_short_circuits() {
    let mut interpreter = Interpreter::new();
    let calls = counting_native(&mut interpreter, "sideEffect", true);

    let value = interpreter
        .evaluate(&Expr::binary(
            BinOp::And,
            Expr::bool(false),
            Expr::call("sideEffect", vec![]),
        ))
        .unwrap();
    assert_eq!(value, Value::Bool(false));
    assert_eq!(calls.get(), 0);

    let value = interpreter
        .evaluate(&Expr::binary(
            BinOp::And,
            Expr::bool(true),
            Expr::call("sideEffect", vec![]),
        ))
        .unwrap();
    assert_eq!(value, Value::Bool(true));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_or_short_circuits() {
    let mut interpreter = Interpreter::new();
    let calls = counting_native(&mut interpreter, "sideEffect", false);

    let value = interpreter
        .evaluate(&Expr::binary(
            BinOp::Or,
            Expr::bool(true),
            Expr::call("sideEffect", vec![]),
        ))
        .unwrap();
    assert_eq!(value, Value::Bool(true));
    assert_eq!(calls.get(), 0);

    let value = interpreter
        .evaluate(&Expr::binary(
            BinOp::Or,
            Expr::bool(false),
            Expr::call("sideEffect", vec![]),
        ))
        .unwrap();
    assert_eq!(value, Value::Bool(false));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_logical_operands_evaluate_left_to_right() {
    let order = Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut interpreter = Interpreter::new();
    for name in ["first", "second"] {
        let order = Rc::clone(&order);
        interpreter.register_native(name, ValueType::Bool, move |_| {
            order.borrow_mut().push(name);
            Ok(Value::Bool(true))
        });
    }

    interpreter
        .evaluate(&Expr::binary(
            BinOp::And,
            Expr::call("first", vec![]),
            Expr::call("second", vec![]),
        ))
        .unwrap();
    assert_eq!(*order.borrow(), vec!["first", "second"]);
}

#[test]
fn test_ternary_evaluates_one_branch() {
    let mut interpreter = Interpreter::new();
    let chosen = counting_native(&mut interpreter, "chosen", true);
    let skipped = counting_native(&mut interpreter, "skipped", false);

    let value = interpreter
        .evaluate(&Expr::ternary(
            Expr::bool(true),
            Expr::call("chosen", vec![]),
            Expr::call("skipped", vec![]),
        ))
        .unwrap();
    assert_eq!(value, Value::Bool(true));
    assert_eq!(chosen.get(), 1);
    assert_eq!(skipped.get(), 0);
}

#[test]
fn test_ternary_branches_need_a_common_type() {
    let mut interpreter = run(|b| {
        b.let_("flag", Expr::bool(false));
    });
    let value = interpreter
        .evaluate(&Expr::ternary(Expr::var("flag"), Expr::int(50), Expr::float(20.5)))
        .unwrap();
    assert_eq!(value, Value::Double(20.5));

    let err = interpreter
        .evaluate(&Expr::ternary(Expr::var("flag"), Expr::string("x"), Expr::int(1)))
        .unwrap_err();
    assert!(err.is_static());
}

#[test]
fn test_ternary_result_has_the_common_type() {
    let mut interpreter = Interpreter::new();
    let value = interpreter
        .evaluate(&Expr::ternary(Expr::bool(true), Expr::int(50), Expr::float(20.5)))
        .unwrap();
    assert_eq!(value, Value::Double(50.0));

    let interpreter = run(|b| {
        b.let_typed("x", ValueType::Int(IntType::UInt8), Expr::int(7));
        b.let_("flag", Expr::bool(false));
        b.let_("picked", Expr::ternary(Expr::var("flag"), Expr::var("x"), Expr::int(2)));
    });
    assert_eq!(
        interpreter.binding("picked"),
        Some(&Value::int(IntType::UInt8, 2).unwrap())
    );
}

#[test]
fn test_literal_operand_is_evaluated_first() {
    let mut interpreter = Interpreter::new();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    interpreter.register_native("next", ValueType::Int(IntType::UInt8), move |_| {
        counter.set(counter.get() + 1);
        Ok(Value::int(IntType::UInt8, 10).unwrap())
    });

    let failing = Expr::binary(
        BinOp::Add,
        Expr::group(Expr::binary(BinOp::Div, Expr::int(1), Expr::int(0))),
        Expr::call("next", vec![]),
    );
    let err = interpreter.evaluate(&failing).unwrap_err();
    assert!(matches!(err, EvalError::DivideByZero { .. }));
    assert_eq!(calls.get(), 0);

    // The literal still takes the type of the right operand
    let sum = interpreter
        .evaluate(&Expr::binary(BinOp::Add, Expr::int(1), Expr::call("next", vec![])))
        .unwrap();
    assert_eq!(sum, Value::int(IntType::UInt8, 11).unwrap());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_branch_types_are_checked_inside_loops() {
    let mut interpreter = Interpreter::new();
    let ticks = counting_native(&mut interpreter, "tick", true);
    let script = ScriptBuilder::new()
        .section("loop", |b| {
            b.let_("flag", Expr::bool(true));
            b.for_in("i", Expr::closed_range(Expr::int(1), Expr::int(3)), |body| {
                body.expr(Expr::call("tick", vec![]));
                body.let_("v", Expr::ternary(Expr::var("flag"), Expr::var("i"), Expr::string("x")));
            });
            b.for_in("i", Expr::closed_range(Expr::int(1), Expr::int(3)), |body| {
                body.let_("v", Expr::ternary(Expr::var("flag"), Expr::var("i"), Expr::int(0)));
            });
        })
        .build();
    interpreter.run(&script);

    let failures: Vec<_> = interpreter.transcript().failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], EvalError::BranchTypeMismatch { .. }));
    // Rejected before the body ran
    assert_eq!(ticks.get(), 0);
}

#[test]
fn test_closed_range_loop() {
    let interpreter = run(|b| {
        b.var("total", Expr::int(0));
        b.var("sum", Expr::int(0));
        b.for_in("index", Expr::closed_range(Expr::int(1), Expr::int(10)), |body| {
            body.expr(Expr::unary(UnOp::PostInc, Expr::var("total")));
            body.expr(Expr::compound("sum", BinOp::Add, Expr::var("index")));
        });
    });
    assert_eq!(interpreter.binding("total"), Some(&int(10)));
    assert_eq!(interpreter.binding("sum"), Some(&int(55)));
    // The loop variable does not outlive the loop
    assert_eq!(interpreter.binding("index"), None);
}

#[test]
fn test_half_open_range_loop() {
    let interpreter = run(|b| {
        b.let_(
            "places",
            Expr::array(vec![
                Expr::string("SFO"),
                Expr::string("LAS"),
                Expr::string("BOS"),
            ]),
        );
        b.var("count", Expr::count(Expr::var("places")));
        b.var("result", Expr::string(""));
        b.for_in("index", Expr::half_open_range(Expr::int(0), Expr::var("count")), |body| {
            body.expr(Expr::compound(
                "result",
                BinOp::Add,
                Expr::index(Expr::var("places"), Expr::var("index")),
            ));
        });
        b.var("iterations", Expr::int(0));
        b.for_in("index", Expr::half_open_range(Expr::int(3), Expr::int(3)), |body| {
            body.expr(Expr::unary(UnOp::PreInc, Expr::var("iterations")));
        });
    });
    assert_eq!(interpreter.binding("count"), Some(&int(3)));
    assert_eq!(interpreter.binding("result"), Some(&Value::string("SFOLASBOS")));
    assert_eq!(interpreter.binding("iterations"), Some(&int(0)));
}

#[test]
fn test_range_values_are_restartable() {
    let mut interpreter = Interpreter::new();
    let value = interpreter
        .evaluate(&Expr::half_open_range(Expr::int(0), Expr::int(3)))
        .unwrap();
    let range = match value {
        Value::Range(range) => range,
        other => panic!("expected a range, got {:?}", other),
    };
    let first: Vec<i128> = range.iter().map(|n| n.value()).collect();
    let second: Vec<i128> = range.iter().map(|n| n.value()).collect();
    assert_eq!(first, vec![0, 1, 2]);
    assert_eq!(first, second);

    let count = interpreter
        .evaluate(&Expr::count(Expr::closed_range(Expr::int(1), Expr::int(10))))
        .unwrap();
    assert_eq!(count, int(10));
}

#[test]
fn test_inverted_range_fails() {
    let mut interpreter = Interpreter::new();
    let err = interpreter
        .evaluate(&Expr::closed_range(Expr::int(5), Expr::int(1)))
        .unwrap_err();
    assert!(matches!(err, EvalError::InvalidRange { kind: "closed", .. }));

    let err = interpreter
        .evaluate(&Expr::half_open_range(Expr::int(3), Expr::int(2)))
        .unwrap_err();
    assert!(matches!(err, EvalError::InvalidRange { kind: "half-open", .. }));
}

#[test]
fn test_equality_versus_identity() {
    let mut interpreter = run(|b| {
        b.var("firstObj", Expr::string("test1"));
        b.var("secondObj", Expr::string("test1"));
        b.var("sameObj", Expr::var("firstObj"));
    });

    let eq = |interpreter: &mut Interpreter, op, l: &str, r: &str| {
        interpreter
            .evaluate(&Expr::binary(op, Expr::var(l), Expr::var(r)))
            .unwrap()
    };
    assert_eq!(eq(&mut interpreter, BinOp::Eq, "firstObj", "secondObj"), Value::Bool(true));
    assert_eq!(
        eq(&mut interpreter, BinOp::Identical, "firstObj", "secondObj"),
        Value::Bool(false)
    );
    assert_eq!(
        eq(&mut interpreter, BinOp::NotIdentical, "firstObj", "secondObj"),
        Value::Bool(true)
    );
    assert_eq!(eq(&mut interpreter, BinOp::Identical, "firstObj", "sameObj"), Value::Bool(true));

    // Numbers have no storage identity
    let err = interpreter
        .evaluate(&Expr::binary(BinOp::Identical, Expr::int(1), Expr::int(1)))
        .unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }));
}

#[test]
fn test_assignment_result_cannot_be_used() {
    let interpreter = run(|b| {
        b.let_("b", Expr::int(10));
        b.var("a", Expr::int(5));
        b.var("c", Expr::assign("a", Expr::var("b")));
        b.expr(Expr::call("print", vec![Expr::compound("a", BinOp::Add, Expr::int(1))]));
    });

    let failures: Vec<_> = interpreter.transcript().failures().collect();
    assert_eq!(failures.len(), 2);
    for failure in &failures {
        assert!(matches!(failure, EvalError::UseOfVoidResult { .. }));
        assert!(failure.is_static());
    }
    assert_eq!(
        failures[0].to_string(),
        "Assignment `a = b` produces no value and cannot be used as one at line 5"
    );
    // Rejected before running: nothing was assigned or declared
    assert_eq!(interpreter.binding("a"), Some(&int(5)));
    assert_eq!(interpreter.binding("c"), None);
    assert!(interpreter.transcript().output_lines().is_empty());
}

#[test]
fn test_logical_operators_have_no_compound_form() {
    let mut interpreter = Interpreter::new();
    let calls = counting_native(&mut interpreter, "check", true);
    let script = ScriptBuilder::new()
        .section("compound", |b| {
            b.var("ok", Expr::bool(false));
            b.expr(Expr::compound("ok", BinOp::And, Expr::call("check", vec![])));
            b.expr(Expr::compound("ok", BinOp::Eq, Expr::bool(true)));
        })
        .build();
    interpreter.run(&script);

    let failures: Vec<_> = interpreter.transcript().failures().collect();
    assert_eq!(failures.len(), 2);
    for failure in &failures {
        assert!(matches!(failure, EvalError::TypeMismatch { .. }));
    }
    assert_eq!(calls.get(), 0);
    assert_eq!(interpreter.binding("ok"), Some(&Value::Bool(false)));
}

#[test]
fn test_constants_cannot_be_modified() {
    let interpreter = run(|b| {
        b.let_("b", Expr::int(10));
        b.expr(Expr::assign("b", Expr::int(11)));
        b.expr(Expr::unary(UnOp::PreInc, Expr::var("b")));
        b.expr(Expr::compound("b", BinOp::Add, Expr::int(1)));
    });

    let failures: Vec<_> = interpreter.transcript().failures().collect();
    assert_eq!(failures.len(), 3);
    assert!(failures
        .iter()
        .all(|e| matches!(e, EvalError::ConstModification { .. })));
    assert_eq!(interpreter.binding("b"), Some(&int(10)));
}

#[test]
fn test_tuples_and_decomposition() {
    let mut interpreter = run(|b| {
        b.let_("z", Expr::tuple(vec![Expr::int(1), Expr::int(2)]));
        b.let_tuple(&["x", "y"], Expr::tuple(vec![Expr::int(1), Expr::int(2)]));
        b.let_tuple(&["p", "q"], Expr::var("z"));
    });
    assert_eq!(interpreter.binding("x"), Some(&int(1)));
    assert_eq!(interpreter.binding("y"), Some(&int(2)));
    assert_eq!(interpreter.binding("q"), Some(&int(2)));

    let second = interpreter.evaluate(&Expr::field(Expr::var("z"), 1)).unwrap();
    assert_eq!(second, int(2));
    let err = interpreter.evaluate(&Expr::field(Expr::var("z"), 2)).unwrap_err();
    assert!(matches!(err, EvalError::TupleIndexOutOfRange { index: 2, arity: 2, .. }));
}

#[test]
fn test_string_and_character_concatenation() {
    let mut interpreter = run(|b| {
        b.let_typed("dog", ValueType::Character, Expr::char('🐶'));
        b.let_typed("cow", ValueType::Character, Expr::char('🐮'));
    });

    let cases = [
        (Expr::string("hello, "), Expr::string("world"), "hello, world"),
        (Expr::var("dog"), Expr::var("cow"), "🐶🐮"),
        (Expr::var("dog"), Expr::string("!"), "🐶!"),
    ];
    for (left, right, expected) in cases {
        let value = interpreter.evaluate(&Expr::binary(BinOp::Add, left, right)).unwrap();
        assert_eq!(value, Value::string(expected));
        assert_eq!(value.value_type(), ValueType::String);
    }
}

#[test]
fn test_array_subscript_out_of_range() {
    let mut interpreter = run(|b| {
        b.let_("places", Expr::array(vec![Expr::string("SFO")]));
    });
    let err = interpreter
        .evaluate(&Expr::index(Expr::var("places"), Expr::int(3)))
        .unwrap_err();
    assert!(matches!(err, EvalError::IndexOutOfRange { index: 3, len: 1, .. }));
}

#[test]
fn test_failures_do_not_stop_the_run() {
    let script = ScriptBuilder::new()
        .section("errors", |b| {
            b.expr(Expr::var("missing"));
            b.expr(Expr::call("nowhere", vec![]));
            b.var("after", Expr::int(1));
        })
        .build();
    let mut interpreter = Interpreter::new();
    let summary = interpreter.run(&script);

    assert_eq!(summary.executed, 3);
    assert_eq!(summary.failures, 2);
    assert!(!summary.is_clean());
    assert_eq!(interpreter.binding("after"), Some(&int(1)));

    let kinds: Vec<_> = interpreter.transcript().failures().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["undefined variable", "undefined function"]);
}

#[test]
fn test_native_failures_are_reported() {
    let mut interpreter = Interpreter::new();
    interpreter.register_native("broken", ValueType::Bool, |_| Err("no luck".to_string()));
    interpreter.register_native("liar", ValueType::Bool, |_| Ok(Value::string("yes")));

    let err = interpreter.evaluate(&Expr::call("broken", vec![])).unwrap_err();
    assert_eq!(err.to_string(), "Function 'broken' failed: no luck at line 1");

    let err = interpreter.evaluate(&Expr::call("liar", vec![])).unwrap_err();
    assert!(matches!(err, EvalError::Native { .. }));
}

#[test]
fn test_print_output_lands_on_its_line() {
    let interpreter = run(|b| {
        b.let_("allowed", Expr::bool(false));
        b.if_(Expr::unary(UnOp::Not, Expr::var("allowed")), |then| {
            then.expr(Expr::call("print", vec![Expr::string("Access Denied")]));
            then.expr(Expr::call("print", vec![Expr::string("code"), Expr::int(42)]));
        });
    });

    let transcript = interpreter.transcript();
    assert_eq!(transcript.output_lines(), vec!["Access Denied", "code 42"]);
    // Section title and blank line come first, then `let` on line 3 and `if` on 4
    assert_eq!(transcript.at_line(5).count(), 1);
    assert_eq!(transcript.at_line(6).count(), 1);
    assert!(matches!(
        transcript.at_line(3).next().map(|e| &e.kind),
        Some(EntryKind::Declared(_))
    ));
}

#[test]
fn test_muted_transcript_records_nothing() {
    let mut interpreter = Interpreter::new();
    interpreter.transcript_mut().set_muted(true);
    let summary = interpreter.run(
        &ScriptBuilder::new()
            .section("quiet", |b| {
                b.var("a", Expr::int(1));
                b.expr(Expr::var("a"));
            })
            .build(),
    );
    assert_eq!(summary.executed, 2);
    assert!(interpreter.transcript().is_empty());
    assert_eq!(interpreter.binding("a"), Some(&int(1)));
}
