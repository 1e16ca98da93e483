//! The runtime value model shared by generated code and the engine.
//!
//! Everything in this module is immutable after construction. Generated
//! bodies allocate values behind [`Arc`] and share them freely; the only
//! interior mutability in the whole runtime is the [`Monitor`] budget
//! counter, which is atomic.

use contracts::debug_ensures;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::reporting::{EvalFault, RuntimeError};

pub mod closure;
pub mod eval;
pub mod ops;
pub mod quantifier;

pub use self::closure::{ClosureValue, Domain};

/// Constants produced and consumed by generated bodies.
// FIXME: Partial eq for floating point numbers
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
}

impl Constant {
    /// The name of the kind of constant, as it appears in failure reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constant::Bool(_) => "Bool",
            Constant::U8(_) => "U8",
            Constant::U16(_) => "U16",
            Constant::U32(_) => "U32",
            Constant::U64(_) => "U64",
            Constant::S8(_) => "S8",
            Constant::S16(_) => "S16",
            Constant::S32(_) => "S32",
            Constant::S64(_) => "S64",
            Constant::F32(_) => "F32",
            Constant::F64(_) => "F64",
            Constant::Char(_) => "Char",
            Constant::String(_) => "String",
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(value) => write!(f, "{}", value),
            Constant::U8(value) => write!(f, "{}", value),
            Constant::U16(value) => write!(f, "{}", value),
            Constant::U32(value) => write!(f, "{}", value),
            Constant::U64(value) => write!(f, "{}", value),
            Constant::S8(value) => write!(f, "{}", value),
            Constant::S16(value) => write!(f, "{}", value),
            Constant::S32(value) => write!(f, "{}", value),
            Constant::S64(value) => write!(f, "{}", value),
            Constant::F32(value) => write!(f, "{}", value),
            Constant::F64(value) => write!(f, "{}", value),
            Constant::Char(value) => write!(f, "{:?}", value),
            Constant::String(value) => write!(f, "{:?}", value),
        }
    }
}

/// Values in the runtime.
///
/// Closure identity and equality are defined by the code generator, so
/// `Value` deliberately does not implement `PartialEq`.
#[derive(Clone, Debug)]
pub enum Value {
    /// Constants.
    Constant(Constant),
    /// Ordered sequences.
    Sequence(Vec<Arc<Value>>),
    /// First-class function values emitted by the code generator.
    Closure(Arc<dyn ClosureValue>),
}

impl Value {
    /// Create a boolean constant.
    pub fn bool(value: bool) -> Value {
        Value::Constant(Constant::Bool(value))
    }

    /// Create a signed 64-bit constant.
    pub fn s64(value: i64) -> Value {
        Value::Constant(Constant::S64(value))
    }

    /// View the value as a boolean constant, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Constant(Constant::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// The name of the kind of value, as it appears in failure reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Constant(constant) => constant.kind_name(),
            Value::Sequence(_) => "Sequence",
            Value::Closure(_) => "Closure",
        }
    }
}

impl From<Constant> for Value {
    fn from(constant: Constant) -> Value {
        Value::Constant(constant)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Constant(constant) => constant.fmt(f),
            Value::Sequence(entries) => write!(f, "[{}]", entries.iter().format(", ")),
            Value::Closure(closure) => write!(f, "<closure/{}>", closure.arity()),
        }
    }
}

/// An index into a closure's captured environment.
///
/// Indices count from the first binding captured, in capture order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CaptureIndex(pub u32);

/// The ordered free-variable bindings a closure captured at creation.
///
/// Capture is by value: the backing vector is persistent, so taking a copy
/// of the current environment at closure creation is cheap structural
/// sharing, and later pushes in the creating scope cannot be observed
/// through an existing closure.
#[derive(Clone)]
pub struct Captures {
    values: im::Vector<Arc<Value>>,
}

impl Captures {
    /// Create an empty captured environment.
    pub fn new() -> Captures {
        Captures {
            values: im::Vector::new(),
        }
    }

    /// The number of captured bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lookup a captured binding.
    pub fn get(&self, index: CaptureIndex) -> Option<&Arc<Value>> {
        self.values.get(index.0 as usize)
    }

    /// Push a binding onto the environment.
    #[debug_ensures(self.len() == old(self.len()) + 1)]
    pub fn push(&mut self, value: Arc<Value>) {
        self.values.push_back(value);
    }

    /// Iterate over the captured bindings in capture order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Value>> {
        self.values.iter()
    }
}

impl Default for Captures {
    fn default() -> Captures {
        Captures::new()
    }
}

impl fmt::Debug for Captures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Captures")
            .field("values", &self.values)
            .finish()
    }
}

/// An environment of named global definitions visible to generated bodies.
pub struct Globals {
    entries: BTreeMap<String, Arc<Value>>,
}

impl Globals {
    pub fn new(entries: BTreeMap<String, Arc<Value>>) -> Globals {
        Globals { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Value>> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Arc<Value>)> {
        self.entries.iter()
    }
}

impl Default for Globals {
    fn default() -> Globals {
        Globals::new(BTreeMap::new())
    }
}

/// A shared invocation budget.
///
/// The evaluator hands a monitor to generated code at closure creation, and
/// recursive bodies capture it like any other binding. Each invocation calls
/// [`Monitor::tick`], so runaway recursion surfaces as
/// [`EvalFault::BudgetExhausted`] instead of exhausting the stack.
#[derive(Debug)]
pub struct Monitor {
    remaining: AtomicU64,
}

impl Monitor {
    /// Create a monitor that permits the given number of invocations.
    pub fn new(budget: u64) -> Monitor {
        Monitor {
            remaining: AtomicU64::new(budget),
        }
    }

    /// Create a monitor with a budget that will never be exhausted in practice.
    pub fn unlimited() -> Monitor {
        Monitor::new(u64::MAX)
    }

    /// The number of invocations still permitted.
    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Relaxed)
    }

    /// Spend one invocation from the budget.
    pub fn tick(&self) -> Result<(), RuntimeError> {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |remaining| {
                remaining.checked_sub(1)
            })
            .map(drop)
            .map_err(|_| EvalFault::BudgetExhausted.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_are_fixed_at_creation() {
        let mut outer = Captures::new();
        outer.push(Arc::new(Value::s64(1)));

        let captured = outer.clone();
        outer.push(Arc::new(Value::s64(2)));

        assert_eq!(captured.len(), 1);
        assert!(captured.get(CaptureIndex(1)).is_none());
    }

    #[test]
    fn monitor_budget_runs_out() {
        let monitor = Monitor::new(2);
        assert!(monitor.tick().is_ok());
        assert!(monitor.tick().is_ok());
        assert!(monitor.tick().is_err());
        assert_eq!(monitor.remaining(), 0);
    }
}
