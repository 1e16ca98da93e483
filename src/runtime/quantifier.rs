//! Quantifier and axiom checking over generated closures.
//!
//! The checker is the engine half that *reasons about* closures: instead of
//! re-interpreting a quantified proposition symbolically, it delegates
//! "does this predicate hold under these instantiations" to the closure's
//! own generated code and turns the first rejection into a counterexample.
//!
//! Instantiation values never cross the [`ClosureValue::check_forall`]
//! signature; only the mask does. Quantifier-carrying closures capture one
//! [`Domain`] and one fixed fallback binding per quantified variable at
//! creation, and their generated `check_forall` bodies call [`sweep`] with
//! that captured state.

use crossbeam_channel::Sender;
use itertools::Itertools;
use std::sync::Arc;

use crate::reporting::{
    AxiomMessage, AxiomViolation, EvalFault, ForallViolation, InvalidCall, Message,
    QuantifierMessage, RuntimeError,
};
use crate::runtime::closure::{ClosureValue, Domain};
use crate::runtime::{Globals, Value};

/// The state of the quantifier/axiom checker.
pub struct State<'me> {
    /// Global definition environment.
    globals: &'me Globals,
    /// The diagnostic messages accumulated during checking.
    message_tx: Sender<Message>,
}

impl<'me> State<'me> {
    /// Construct a new checker state.
    pub fn new(globals: &'me Globals, message_tx: Sender<Message>) -> State<'me> {
        State {
            globals,
            message_tx,
        }
    }

    /// Resolve a named global definition.
    pub fn global(&self, name: &str) -> Option<&Arc<Value>> {
        self.globals.get(name)
    }

    /// Report a diagnostic message.
    fn report(&self, message: impl Into<Message>) {
        self.message_tx.send(message.into()).unwrap();
    }

    /// Validate one instantiation batch against a quantifier-carrying closure.
    ///
    /// The failure, if any, is returned unchanged so the caller can recover
    /// the counterexample; a diagnostic message records the outcome either
    /// way.
    pub fn check_forall(
        &self,
        name: &str,
        closure: &dyn ClosureValue,
        quantified: &[bool],
    ) -> Result<(), RuntimeError> {
        match closure.check_forall(quantified) {
            Ok(()) => {
                self.report(QuantifierMessage::ForallHolds {
                    closure: name.to_owned(),
                    instantiated_variables: quantified.iter().filter(|&&q| q).count(),
                });
                Ok(())
            }
            Err(error) => {
                if let RuntimeError::ForallViolation(violation) = &error {
                    self.report(QuantifierMessage::CounterexampleFound {
                        closure: name.to_owned(),
                        counterexample: violation.counterexample.clone(),
                    });
                }
                Err(error)
            }
        }
    }

    /// Revalidate the axiom carried by a closure against its captured context.
    pub fn check_axiom(&self, name: &str, closure: &dyn ClosureValue) -> Result<(), RuntimeError> {
        match closure.check_axiom() {
            Ok(()) => {
                self.report(AxiomMessage::Revalidated {
                    axiom: name.to_owned(),
                });
                Ok(())
            }
            Err(error) => {
                if let RuntimeError::AxiomViolation(violation) = &error {
                    self.report(AxiomMessage::Violated {
                        axiom: violation.axiom.clone(),
                        witnesses: violation.witnesses.clone(),
                    });
                }
                Err(error)
            }
        }
    }
}

/// Enumerate every instantiation selected by the mask and apply a predicate.
///
/// Takes one domain and one fixed fallback binding per quantified variable:
/// masked variables sweep their whole domain, unmasked variables keep their
/// fixed binding. The first instantiation the predicate rejects becomes a
/// [`ForallViolation`] carrying those values as the counterexample. A masked
/// variable with an empty domain makes the proposition vacuously true.
///
/// Generated `check_forall` bodies call this with their captured quantifier
/// state and their own `invoke` as the predicate.
pub fn sweep(
    domains: &[Domain],
    fixed: &[Arc<Value>],
    quantified: &[bool],
    mut predicate: impl FnMut(&[Arc<Value>]) -> Result<Arc<Value>, RuntimeError>,
) -> Result<(), RuntimeError> {
    if quantified.len() != domains.len() || fixed.len() != domains.len() {
        return Err(InvalidCall::MaskLengthMismatch {
            expected: domains.len(),
            found: quantified.len(),
        }
        .into());
    }

    let candidates = domains
        .iter()
        .zip(fixed.iter())
        .zip(quantified.iter())
        .map(|((domain, fixed), &quantified)| {
            if quantified {
                domain.iter().cloned().collect()
            } else {
                vec![fixed.clone()]
            }
        })
        .collect::<Vec<Vec<Arc<Value>>>>();

    for instantiation in candidates
        .iter()
        .map(|candidates| candidates.iter().cloned())
        .multi_cartesian_product()
    {
        let verdict = predicate(&instantiation)?;
        match verdict.as_bool() {
            Some(true) => {}
            Some(false) => {
                return Err(ForallViolation {
                    counterexample: instantiation,
                }
                .into());
            }
            None => {
                return Err(EvalFault::NotAPredicate {
                    found: verdict.kind_name(),
                }
                .into());
            }
        }
    }

    Ok(())
}

/// Convert an axiom body's verdict into the axiom's result.
///
/// Generated `check_axiom` bodies evaluate the axiom under their captured
/// environment and pass the verdict here along with the captured values that
/// would witness an inconsistency.
pub fn expect_consistent(
    axiom: &str,
    witnesses: &[Arc<Value>],
    verdict: &Value,
) -> Result<(), RuntimeError> {
    match verdict.as_bool() {
        Some(true) => Ok(()),
        Some(false) => Err(AxiomViolation {
            axiom: axiom.to_owned(),
            witnesses: witnesses.to_vec(),
        }
        .into()),
        None => Err(EvalFault::NotAPredicate {
            found: verdict.kind_name(),
        }
        .into()),
    }
}
