//! Invocation behavior of generated closures.

use std::sync::Arc;

use dunlin_runtime::reporting::{EvalFault, InvalidCall, RuntimeError};
use dunlin_runtime::runtime::closure::ClosureValue;
use dunlin_runtime::runtime::eval::Evaluator;
use dunlin_runtime::runtime::{Captures, Globals, Monitor, Value};

mod support;

use support::{s64_domain, AddCaptured, CountDown, SuccGreater};

fn succ_greater() -> SuccGreater {
    SuccGreater {
        domain: s64_domain(0..=2),
        fixed: Arc::new(Value::s64(0)),
    }
}

#[test]
fn invoke_returns_the_body_value() {
    let closure = succ_greater();
    let result = closure.invoke(&[Arc::new(Value::s64(5))]).unwrap();

    assert_eq!(result.as_bool(), Some(true));
}

#[test]
fn invoke_is_deterministic() {
    let mut captures = Captures::new();
    captures.push(Arc::new(Value::s64(10)));
    let closure = AddCaptured { captures };
    let arguments = [Arc::new(Value::s64(32))];

    let first = closure.invoke(&arguments).unwrap();
    let second = closure.invoke(&arguments).unwrap();

    assert_eq!(first.to_string(), "42");
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn wrong_arity_is_rejected_not_truncated() {
    let closure = succ_greater();
    let arguments = [Arc::new(Value::s64(5)), Arc::new(Value::s64(6))];

    match closure.invoke(&arguments) {
        Err(RuntimeError::InvalidCall(InvalidCall::ArityMismatch { expected, found })) => {
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        result => panic!("expected an arity fault, found {:?}", result),
    }

    match closure.invoke(&[]) {
        Err(RuntimeError::InvalidCall(InvalidCall::ArityMismatch { .. })) => {}
        result => panic!("expected an arity fault, found {:?}", result),
    }
}

#[test]
fn body_faults_propagate_to_the_caller() {
    let closure = succ_greater();

    match closure.invoke(&[Arc::new(Value::s64(i64::max_value()))]) {
        Err(RuntimeError::EvalFault(EvalFault::ArithmeticOverflow)) => {}
        result => panic!("expected an overflow fault, found {:?}", result),
    }
}

#[test]
fn malformed_arguments_are_shape_faults() {
    let closure = CountDown {
        monitor: Arc::new(Monitor::unlimited()),
    };

    match closure.invoke(&[Arc::new(Value::bool(true))]) {
        Err(RuntimeError::InvalidCall(InvalidCall::MalformedArgument {
            index,
            expected,
            found,
        })) => {
            assert_eq!(index, 0);
            assert_eq!(expected, "S64");
            assert_eq!(found, "Bool");
        }
        result => panic!("expected a shape fault, found {:?}", result),
    }
}

#[test]
fn exhausted_budget_is_a_body_fault() {
    let closure = CountDown {
        monitor: Arc::new(Monitor::new(10)),
    };

    match closure.invoke(&[Arc::new(Value::s64(1000))]) {
        Err(RuntimeError::EvalFault(EvalFault::BudgetExhausted)) => {}
        result => panic!("expected a budget fault, found {:?}", result),
    }
}

#[test]
fn generous_budget_lets_recursion_finish() {
    let closure = CountDown {
        monitor: Arc::new(Monitor::new(1000)),
    };

    let result = closure.invoke(&[Arc::new(Value::s64(100))]).unwrap();
    assert_eq!(result.as_bool(), Some(true));
}

#[test]
fn evaluator_applies_function_values() {
    let globals = Globals::default();
    let evaluator = Evaluator::new(&globals);
    let function = Value::Closure(Arc::new(succ_greater()));

    let result = evaluator
        .apply(&function, &[Arc::new(Value::s64(7))])
        .unwrap();

    assert_eq!(result.as_bool(), Some(true));
}

#[test]
fn evaluator_rejects_non_functions() {
    let globals = Globals::default();
    let evaluator = Evaluator::new(&globals);

    match evaluator.apply(&Value::s64(1), &[]) {
        Err(RuntimeError::InvalidCall(InvalidCall::NotAFunction { found })) => {
            assert_eq!(found, "S64");
        }
        result => panic!("expected a non-function fault, found {:?}", result),
    }
}

#[test]
fn evaluator_finds_the_first_rejected_value() {
    let globals = Globals::default();
    let evaluator = Evaluator::new(&globals);

    let always = succ_greater();
    let counterexample = evaluator
        .find_counterexample(&always, &s64_domain(0..=2))
        .unwrap();
    assert!(counterexample.is_none());

    let sometimes = support::GreaterThanOne {
        domain: s64_domain(0..=2),
        fixed: Arc::new(Value::s64(2)),
    };
    let counterexample = evaluator
        .find_counterexample(&sometimes, &s64_domain(0..=2))
        .unwrap()
        .expect("a counterexample");
    assert_eq!(counterexample.to_string(), "0");
}

#[test]
fn concurrent_invocation_needs_no_synchronization() {
    let closure = Arc::new(succ_greater());

    let handles = (0..4)
        .map(|offset| {
            let closure = closure.clone();
            std::thread::spawn(move || {
                let result = closure.invoke(&[Arc::new(Value::s64(offset))]).unwrap();
                assert_eq!(result.as_bool(), Some(true));
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.join().unwrap();
    }
}
