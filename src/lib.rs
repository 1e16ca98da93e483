//! Runtime support for programs compiled by the Dunlin verifier.
//!
//! The Dunlin code generator lowers each source-level closure to its own
//! type implementing [`ClosureValue`]. That trait is the seam between
//! generated executable code and the verification engine: the engine can
//! both *run* a closure (through the [evaluator]) and *reason about* it as a
//! logical predicate (through the [quantifier/axiom checker]).
//!
//! [`ClosureValue`]: crate::runtime::closure::ClosureValue
//! [evaluator]: crate::runtime::eval
//! [quantifier/axiom checker]: crate::runtime::quantifier

pub mod reporting;
pub mod runtime;
