//! Concrete evaluation of function values.
//!
//! The evaluator is the engine half that *runs* closures: it applies
//! function values during concrete execution and drives the linear search
//! used when hunting for counterexamples. It never recovers from a runtime
//! failure; every failure propagates to the enclosing evaluation.

use std::sync::Arc;

use crate::reporting::{EvalFault, InvalidCall, RuntimeError};
use crate::runtime::closure::{ClosureValue, Domain};
use crate::runtime::{Globals, Value};

/// The state of the evaluator.
pub struct Evaluator<'me> {
    /// Global definition environment.
    globals: &'me Globals,
}

impl<'me> Evaluator<'me> {
    /// Construct a new evaluator.
    pub fn new(globals: &'me Globals) -> Evaluator<'me> {
        Evaluator { globals }
    }

    /// Resolve a named global definition for a generated body.
    pub fn global(&self, name: &str) -> Option<&Arc<Value>> {
        self.globals.get(name)
    }

    /// Apply a function value to an argument vector.
    ///
    /// Arguments must already be reduced to values; the callee's own arity
    /// check rejects wrong-length vectors.
    pub fn apply(
        &self,
        function: &Value,
        arguments: &[Arc<Value>],
    ) -> Result<Arc<Value>, RuntimeError> {
        match function {
            Value::Closure(closure) => closure.invoke(arguments),
            function => Err(InvalidCall::NotAFunction {
                found: function.kind_name(),
            }
            .into()),
        }
    }

    /// Search a domain for the first value a unary predicate closure rejects.
    ///
    /// Returns the rejected value as a counterexample, or `None` when the
    /// predicate accepts the whole domain. Evaluation faults propagate.
    pub fn find_counterexample(
        &self,
        closure: &dyn ClosureValue,
        domain: &Domain,
    ) -> Result<Option<Arc<Value>>, RuntimeError> {
        for candidate in domain.iter() {
            let verdict = closure.invoke(std::slice::from_ref(candidate))?;
            match verdict.as_bool() {
                Some(true) => {}
                Some(false) => return Ok(Some(candidate.clone())),
                None => {
                    return Err(EvalFault::NotAPredicate {
                        found: verdict.kind_name(),
                    }
                    .into());
                }
            }
        }

        Ok(None)
    }
}
