//! Reporting runtime failures and check outcomes.
//!
//! The runtime exposes a single failure taxonomy, [`RuntimeError`], with one
//! variant per cause so that the engine can branch on what happened without
//! string matching. Non-fatal check outcomes travel as [`Message`]s over the
//! checker's diagnostic channel.

use itertools::Itertools;
use pretty::{DocAllocator, DocBuilder};
use std::fmt;
use std::sync::Arc;

use crate::runtime::Value;

/// The runtime failure signal.
///
/// Never recovered from locally: every failure is surfaced to the immediate
/// caller, which decides whether it is a program error, a discovered
/// counterexample, or an unsound axiom.
#[derive(Clone, Debug)]
pub enum RuntimeError {
    /// The call itself was malformed.
    InvalidCall(InvalidCall),
    /// Evaluating a closure body faulted.
    EvalFault(EvalFault),
    /// A universally quantified proposition does not hold.
    ForallViolation(ForallViolation),
    /// An assumed axiom is inconsistent with its captured context.
    AxiomViolation(AxiomViolation),
}

impl RuntimeError {
    /// The counterexample carried by a quantifier violation, if any.
    pub fn counterexample(&self) -> Option<&[Arc<Value>]> {
        match self {
            RuntimeError::ForallViolation(violation) => Some(&violation.counterexample),
            _ => None,
        }
    }
}

impl From<InvalidCall> for RuntimeError {
    fn from(error: InvalidCall) -> Self {
        RuntimeError::InvalidCall(error)
    }
}

impl From<EvalFault> for RuntimeError {
    fn from(fault: EvalFault) -> Self {
        RuntimeError::EvalFault(fault)
    }
}

impl From<ForallViolation> for RuntimeError {
    fn from(violation: ForallViolation) -> Self {
        RuntimeError::ForallViolation(violation)
    }
}

impl From<AxiomViolation> for RuntimeError {
    fn from(violation: AxiomViolation) -> Self {
        RuntimeError::AxiomViolation(violation)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::InvalidCall(error) => error.fmt(f),
            RuntimeError::EvalFault(fault) => fault.fmt(f),
            RuntimeError::ForallViolation(violation) => violation.fmt(f),
            RuntimeError::AxiomViolation(violation) => violation.fmt(f),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// A malformed invocation, detected before the body runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidCall {
    /// The argument vector does not match the closure's declared arity.
    ArityMismatch { expected: usize, found: usize },
    /// An argument has the wrong shape for its formal parameter.
    MalformedArgument {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// The instantiation mask does not cover the quantified variables.
    MaskLengthMismatch { expected: usize, found: usize },
    /// A non-function value was applied.
    NotAFunction { found: &'static str },
}

impl fmt::Display for InvalidCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidCall::ArityMismatch { expected, found } => write!(
                f,
                "arity mismatch: expected {} arguments, found {}",
                expected, found,
            ),
            InvalidCall::MalformedArgument {
                index,
                expected,
                found,
            } => write!(
                f,
                "malformed argument {}: expected {}, found {}",
                index, expected, found,
            ),
            InvalidCall::MaskLengthMismatch { expected, found } => write!(
                f,
                "instantiation mask covers {} variables, closure quantifies {}",
                found, expected,
            ),
            InvalidCall::NotAFunction { found } => {
                write!(f, "applied a value that is not a function: {}", found)
            }
        }
    }
}

/// A fault raised while evaluating a closure body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalFault {
    DivisionByZero,
    ArithmeticOverflow,
    /// An operator was applied to operands it is not defined for.
    MismatchedOperands {
        lhs: &'static str,
        rhs: &'static str,
    },
    /// A body used as a predicate returned something other than a boolean.
    NotAPredicate { found: &'static str },
    /// A capture index missed the captured environment. Generator bug.
    UnboundCapture { index: u32 },
    /// The invocation budget is spent.
    BudgetExhausted,
}

impl fmt::Display for EvalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalFault::DivisionByZero => write!(f, "division by zero"),
            EvalFault::ArithmeticOverflow => write!(f, "arithmetic overflow"),
            EvalFault::MismatchedOperands { lhs, rhs } => {
                write!(f, "mismatched operands: {} and {}", lhs, rhs)
            }
            EvalFault::NotAPredicate { found } => {
                write!(f, "expected a boolean verdict, found {}", found)
            }
            EvalFault::UnboundCapture { index } => {
                write!(f, "unbound capture at index {}", index)
            }
            EvalFault::BudgetExhausted => write!(f, "invocation budget exhausted"),
        }
    }
}

/// A counterexample to a universally quantified proposition.
///
/// The instantiation values are in quantifier order and are recoverable by
/// the caller through [`RuntimeError::counterexample`].
#[derive(Clone, Debug)]
pub struct ForallViolation {
    pub counterexample: Vec<Arc<Value>>,
}

impl fmt::Display for ForallViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quantified proposition violated at [{}]",
            self.counterexample.iter().format(", "),
        )
    }
}

/// A violated axiom under a concrete captured context.
#[derive(Clone, Debug)]
pub struct AxiomViolation {
    /// The name the generator gave the axiom.
    pub axiom: String,
    /// The captured values that witnessed the inconsistency.
    pub witnesses: Vec<Arc<Value>>,
}

impl fmt::Display for AxiomViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "axiom {} violated under captured [{}]",
            self.axiom,
            self.witnesses.iter().format(", "),
        )
    }
}

/// Diagnostic messages emitted by the engine-side collaborators.
#[derive(Clone, Debug)]
pub enum Message {
    /// Messages produced from [`runtime::quantifier`] forall checks.
    ///
    /// [`runtime::quantifier`]: crate::runtime::quantifier
    Quantifier(QuantifierMessage),
    /// Messages produced from [`runtime::quantifier`] axiom checks.
    ///
    /// [`runtime::quantifier`]: crate::runtime::quantifier
    Axiom(AxiomMessage),
}

impl From<QuantifierMessage> for Message {
    fn from(message: QuantifierMessage) -> Self {
        Message::Quantifier(message)
    }
}

impl From<AxiomMessage> for Message {
    fn from(message: AxiomMessage) -> Self {
        Message::Axiom(message)
    }
}

impl Message {
    pub fn to_doc<'a, D>(&'a self, alloc: &'a D) -> DocBuilder<'a, D>
    where
        D: DocAllocator<'a>,
        D::Doc: Clone,
    {
        match self {
            Message::Quantifier(message) => message.to_doc(alloc),
            Message::Axiom(message) => message.to_doc(alloc),
        }
    }
}

#[derive(Clone, Debug)]
pub enum QuantifierMessage {
    /// A forall check passed for every selected instantiation.
    ForallHolds {
        closure: String,
        instantiated_variables: usize,
    },
    /// A forall check turned up a counterexample.
    CounterexampleFound {
        closure: String,
        counterexample: Vec<Arc<Value>>,
    },
}

impl QuantifierMessage {
    pub fn to_doc<'a, D>(&'a self, alloc: &'a D) -> DocBuilder<'a, D>
    where
        D: DocAllocator<'a>,
        D::Doc: Clone,
    {
        match self {
            QuantifierMessage::ForallHolds {
                closure,
                instantiated_variables,
            } => (alloc.nil())
                .append("forall holds:")
                .append(alloc.space())
                .append(alloc.text(closure))
                .append(alloc.space())
                .append("over")
                .append(alloc.space())
                .append(alloc.as_string(instantiated_variables))
                .append(alloc.space())
                .append("instantiated variables"),
            QuantifierMessage::CounterexampleFound {
                closure,
                counterexample,
            } => (alloc.nil())
                .append("counterexample to")
                .append(alloc.space())
                .append(alloc.text(closure))
                .append(":")
                .append(alloc.space())
                .append(from_values(alloc, counterexample)),
        }
    }
}

#[derive(Clone, Debug)]
pub enum AxiomMessage {
    /// An axiom was revalidated against its captured context.
    Revalidated { axiom: String },
    /// An axiom turned out to be inconsistent for its captured values.
    Violated {
        axiom: String,
        witnesses: Vec<Arc<Value>>,
    },
}

impl AxiomMessage {
    pub fn to_doc<'a, D>(&'a self, alloc: &'a D) -> DocBuilder<'a, D>
    where
        D: DocAllocator<'a>,
        D::Doc: Clone,
    {
        match self {
            AxiomMessage::Revalidated { axiom } => (alloc.nil())
                .append("axiom revalidated:")
                .append(alloc.space())
                .append(alloc.text(axiom)),
            AxiomMessage::Violated { axiom, witnesses } => (alloc.nil())
                .append("axiom violated:")
                .append(alloc.space())
                .append(alloc.text(axiom))
                .append(alloc.space())
                .append("under captured")
                .append(alloc.space())
                .append(from_values(alloc, witnesses)),
        }
    }
}

/// Pretty print a list of runtime values.
pub fn from_values<'a, D>(alloc: &'a D, values: &'a [Arc<Value>]) -> DocBuilder<'a, D>
where
    D: DocAllocator<'a>,
    D::Doc: Clone,
{
    (alloc.nil())
        .append("[")
        .group()
        .append(alloc.intersperse(
            values.iter().map(|value| from_value(alloc, value)),
            alloc.text(",").append(alloc.space()),
        ))
        .append("]")
}

/// Pretty print a runtime value.
pub fn from_value<'a, D>(alloc: &'a D, value: &'a Value) -> DocBuilder<'a, D>
where
    D: DocAllocator<'a>,
    D::Doc: Clone,
{
    match value {
        Value::Constant(constant) => alloc.as_string(constant),
        Value::Sequence(entries) => (alloc.nil())
            .append("[")
            .group()
            .append(alloc.intersperse(
                entries.iter().map(|entry| from_value(alloc, entry)),
                alloc.text(",").append(alloc.space()),
            ))
            .append("]"),
        Value::Closure(closure) => (alloc.nil())
            .append("<closure/")
            .append(alloc.as_string(closure.arity()))
            .append(">"),
    }
}
