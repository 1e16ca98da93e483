//! Closures written the way the Dunlin code generator emits them.
//!
//! Each source-level closure becomes its own type: captured bindings as
//! fields, an `invoke` body lowered from the source expression, and
//! `check_forall`/`check_axiom` bodies that call into the runtime's shared
//! drivers with the captured quantifier state.

#![allow(dead_code)]

use std::sync::Arc;

use dunlin_runtime::reporting::{EvalFault, RuntimeError};
use dunlin_runtime::runtime::closure::{check_arity, check_mask, ClosureValue, Domain};
use dunlin_runtime::runtime::{ops, quantifier, CaptureIndex, Captures, Monitor, Value};

/// `forall (x: S64). (x + 1) > x`, quantified over a captured domain.
#[derive(Debug)]
pub struct SuccGreater {
    pub domain: Domain,
    pub fixed: Arc<Value>,
}

impl ClosureValue for SuccGreater {
    fn arity(&self) -> usize {
        1
    }

    fn invoke(&self, arguments: &[Arc<Value>]) -> Result<Arc<Value>, RuntimeError> {
        check_arity(1, arguments)?;
        let x = &arguments[0];
        let succ = ops::add(x, &Value::s64(1))?;
        ops::gt(&succ, x)
    }

    fn check_forall(&self, quantified: &[bool]) -> Result<(), RuntimeError> {
        quantifier::sweep(
            std::slice::from_ref(&self.domain),
            std::slice::from_ref(&self.fixed),
            quantified,
            |arguments| self.invoke(arguments),
        )
    }
}

/// `forall (x: S64). x > 1`, quantified over a captured domain.
#[derive(Debug)]
pub struct GreaterThanOne {
    pub domain: Domain,
    pub fixed: Arc<Value>,
}

impl ClosureValue for GreaterThanOne {
    fn arity(&self) -> usize {
        1
    }

    fn invoke(&self, arguments: &[Arc<Value>]) -> Result<Arc<Value>, RuntimeError> {
        check_arity(1, arguments)?;
        ops::gt(&arguments[0], &Value::s64(1))
    }

    fn check_forall(&self, quantified: &[bool]) -> Result<(), RuntimeError> {
        quantifier::sweep(
            std::slice::from_ref(&self.domain),
            std::slice::from_ref(&self.fixed),
            quantified,
            |arguments| self.invoke(arguments),
        )
    }
}

/// `forall (x: S64) (y: S64). x <= y`, quantified over two captured domains.
#[derive(Debug)]
pub struct LessOrEqual {
    pub domains: Vec<Domain>,
    pub fixed: Vec<Arc<Value>>,
}

impl ClosureValue for LessOrEqual {
    fn arity(&self) -> usize {
        2
    }

    fn invoke(&self, arguments: &[Arc<Value>]) -> Result<Arc<Value>, RuntimeError> {
        check_arity(2, arguments)?;
        ops::le(&arguments[0], &arguments[1])
    }

    fn check_forall(&self, quantified: &[bool]) -> Result<(), RuntimeError> {
        quantifier::sweep(&self.domains, &self.fixed, quantified, |arguments| {
            self.invoke(arguments)
        })
    }
}

/// `fun (x: S64) -> x + c`, with `c` captured at index 0.
#[derive(Debug)]
pub struct AddCaptured {
    pub captures: Captures,
}

impl ClosureValue for AddCaptured {
    fn arity(&self) -> usize {
        1
    }

    fn invoke(&self, arguments: &[Arc<Value>]) -> Result<Arc<Value>, RuntimeError> {
        check_arity(1, arguments)?;
        let captured = self
            .captures
            .get(CaptureIndex(0))
            .ok_or(EvalFault::UnboundCapture { index: 0 })?;
        ops::add(&arguments[0], captured)
    }
}

/// Axiom `c >= 0`, with the witness `c` captured at index 0.
#[derive(Debug)]
pub struct NonNegativeAxiom {
    pub captures: Captures,
}

impl ClosureValue for NonNegativeAxiom {
    fn arity(&self) -> usize {
        0
    }

    fn invoke(&self, arguments: &[Arc<Value>]) -> Result<Arc<Value>, RuntimeError> {
        check_arity(0, arguments)?;
        let witness = self
            .captures
            .get(CaptureIndex(0))
            .ok_or(EvalFault::UnboundCapture { index: 0 })?;
        ops::ge(witness, &Value::s64(0))
    }

    fn check_forall(&self, quantified: &[bool]) -> Result<(), RuntimeError> {
        check_mask(0, quantified)
    }

    fn check_axiom(&self) -> Result<(), RuntimeError> {
        let witnesses = self.captures.iter().cloned().collect::<Vec<_>>();
        let verdict = self.invoke(&[])?;
        quantifier::expect_consistent("nonNegative", &witnesses, &verdict)
    }
}

/// `fun (n: S64) -> n == 0 || self(n - 1)`, with a captured monitor bounding
/// the recursion.
#[derive(Debug)]
pub struct CountDown {
    pub monitor: Arc<Monitor>,
}

impl ClosureValue for CountDown {
    fn arity(&self) -> usize {
        1
    }

    fn invoke(&self, arguments: &[Arc<Value>]) -> Result<Arc<Value>, RuntimeError> {
        check_arity(1, arguments)?;
        self.monitor.tick()?;

        let n = ops::argument_s64(arguments, 0)?;
        if n == 0 {
            Ok(Arc::new(Value::bool(true)))
        } else {
            self.invoke(&[Arc::new(Value::s64(n - 1))])
        }
    }
}

/// A domain of signed 64-bit constants.
pub fn s64_domain(values: impl IntoIterator<Item = i64>) -> Domain {
    Domain::new(
        values
            .into_iter()
            .map(|value| Arc::new(Value::s64(value)))
            .collect(),
    )
}
