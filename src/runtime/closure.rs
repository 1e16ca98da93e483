//! The contract every generated closure implements.
//!
//! The code generator emits one type per source-level closure, capturing
//! whatever the source expression closed over, and implements
//! [`ClosureValue`] for it. The engine only ever sees the trait object, so
//! concrete captured environments and bodies stay opaque.

use std::fmt;
use std::sync::Arc;

use crate::reporting::{InvalidCall, RuntimeError};
use crate::runtime::Value;

/// A first-class function value emitted by the code generator.
///
/// Implementations are immutable after construction: the captured
/// environment is fixed at creation time and every operation is a
/// single-shot synchronous computation, so a closure shared between threads
/// may be invoked concurrently without synchronization.
pub trait ClosureValue: fmt::Debug + Send + Sync {
    /// The number of parameters the closure's body binds.
    fn arity(&self) -> usize;

    /// Evaluate the body with `arguments` bound to the formal parameters and
    /// the captured environment visible.
    ///
    /// Arguments must already be reduced to values. Invocation is
    /// referentially transparent with respect to the captured environment:
    /// equal arguments give equal results. Failures propagate to the caller,
    /// never swallowed.
    fn invoke(&self, arguments: &[Arc<Value>]) -> Result<Arc<Value>, RuntimeError>;

    /// Confirm that the quantified proposition this closure carries holds
    /// for the variables selected by `quantified`.
    ///
    /// The mask has one flag per universally quantified variable of the
    /// originating formula: `true` sweeps that variable over its captured
    /// domain, `false` holds it at its captured fixed binding. A failing
    /// instantiation surfaces as [`RuntimeError::ForallViolation`] with the
    /// counterexample recoverable by the caller.
    ///
    /// Closures that carry no quantified proposition have nothing to check.
    fn check_forall(&self, quantified: &[bool]) -> Result<(), RuntimeError> {
        check_mask(0, quantified)
    }

    /// Revalidate the axiom this closure carries against its captured
    /// environment, raising [`RuntimeError::AxiomViolation`] if the captured
    /// values make the axiom inconsistent.
    ///
    /// Closures that carry no axiom have nothing to check.
    fn check_axiom(&self) -> Result<(), RuntimeError> {
        Ok(())
    }
}

/// Fail unless the argument vector matches the declared arity.
///
/// Generated `invoke` bodies call this first; wrong-length vectors are never
/// silently truncated or padded.
pub fn check_arity(expected: usize, arguments: &[Arc<Value>]) -> Result<(), RuntimeError> {
    if arguments.len() == expected {
        Ok(())
    } else {
        Err(InvalidCall::ArityMismatch {
            expected,
            found: arguments.len(),
        }
        .into())
    }
}

/// Fail unless the instantiation mask covers exactly the quantified variables.
pub fn check_mask(expected: usize, quantified: &[bool]) -> Result<(), RuntimeError> {
    if quantified.len() == expected {
        Ok(())
    } else {
        Err(InvalidCall::MaskLengthMismatch {
            expected,
            found: quantified.len(),
        }
        .into())
    }
}

/// A finite, ordered set of candidate values for one quantified variable.
///
/// Domains are supplied by the verifier while it explores instantiations and
/// are captured by quantifier-carrying closures at creation, alongside a
/// fixed fallback binding per variable.
#[derive(Clone, Debug)]
pub struct Domain {
    values: Vec<Arc<Value>>,
}

impl Domain {
    pub fn new(values: Vec<Arc<Value>>) -> Domain {
        Domain { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Value>> {
        self.values.iter()
    }
}
