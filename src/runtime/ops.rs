//! Checked arithmetic and comparison over runtime constants.
//!
//! Generated bodies call these helpers instead of raw operators so that
//! arithmetic faults surface through the runtime failure taxonomy rather
//! than as panics. Integer operations are checked; float operations follow
//! IEEE semantics and never fault.

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub};
use std::sync::Arc;

use crate::reporting::{EvalFault, InvalidCall, RuntimeError};
use crate::runtime::{Constant, Value};

fn constant_pair<'a>(
    lhs: &'a Value,
    rhs: &'a Value,
) -> Result<(&'a Constant, &'a Constant), RuntimeError> {
    match (lhs, rhs) {
        (Value::Constant(lhs), Value::Constant(rhs)) => Ok((lhs, rhs)),
        (lhs, rhs) => Err(EvalFault::MismatchedOperands {
            lhs: lhs.kind_name(),
            rhs: rhs.kind_name(),
        }
        .into()),
    }
}

macro_rules! impl_checked_arith {
    ($(#[$meta:meta])* $name:ident, $trait:ident :: $method:ident, $op:tt) => {
        $(#[$meta])*
        pub fn $name(lhs: &Value, rhs: &Value) -> Result<Arc<Value>, RuntimeError> {
            let constant = match constant_pair(lhs, rhs)? {
                (Constant::U8(lhs), Constant::U8(rhs)) => $trait::$method(lhs, rhs).map(Constant::U8),
                (Constant::U16(lhs), Constant::U16(rhs)) => $trait::$method(lhs, rhs).map(Constant::U16),
                (Constant::U32(lhs), Constant::U32(rhs)) => $trait::$method(lhs, rhs).map(Constant::U32),
                (Constant::U64(lhs), Constant::U64(rhs)) => $trait::$method(lhs, rhs).map(Constant::U64),
                (Constant::S8(lhs), Constant::S8(rhs)) => $trait::$method(lhs, rhs).map(Constant::S8),
                (Constant::S16(lhs), Constant::S16(rhs)) => $trait::$method(lhs, rhs).map(Constant::S16),
                (Constant::S32(lhs), Constant::S32(rhs)) => $trait::$method(lhs, rhs).map(Constant::S32),
                (Constant::S64(lhs), Constant::S64(rhs)) => $trait::$method(lhs, rhs).map(Constant::S64),
                (Constant::F32(lhs), Constant::F32(rhs)) => Some(Constant::F32(lhs $op rhs)),
                (Constant::F64(lhs), Constant::F64(rhs)) => Some(Constant::F64(lhs $op rhs)),
                (lhs, rhs) => {
                    return Err(EvalFault::MismatchedOperands {
                        lhs: lhs.kind_name(),
                        rhs: rhs.kind_name(),
                    }
                    .into());
                }
            };

            match constant {
                Some(constant) => Ok(Arc::new(Value::Constant(constant))),
                None => Err(EvalFault::ArithmeticOverflow.into()),
            }
        }
    };
}

impl_checked_arith!(
    /// Checked addition on numeric constants of the same kind.
    add, CheckedAdd::checked_add, +
);
impl_checked_arith!(
    /// Checked subtraction on numeric constants of the same kind.
    sub, CheckedSub::checked_sub, -
);
impl_checked_arith!(
    /// Checked multiplication on numeric constants of the same kind.
    mul, CheckedMul::checked_mul, *
);

/// Checked division on numeric constants of the same kind.
///
/// Integer division by zero faults with [`EvalFault::DivisionByZero`];
/// overflowing division (`MIN / -1`) faults with
/// [`EvalFault::ArithmeticOverflow`].
pub fn div(lhs: &Value, rhs: &Value) -> Result<Arc<Value>, RuntimeError> {
    let (lhs, rhs) = constant_pair(lhs, rhs)?;
    if is_integer_zero(rhs) {
        return Err(EvalFault::DivisionByZero.into());
    }

    let constant = match (lhs, rhs) {
        (Constant::U8(lhs), Constant::U8(rhs)) => CheckedDiv::checked_div(lhs, rhs).map(Constant::U8),
        (Constant::U16(lhs), Constant::U16(rhs)) => CheckedDiv::checked_div(lhs, rhs).map(Constant::U16),
        (Constant::U32(lhs), Constant::U32(rhs)) => CheckedDiv::checked_div(lhs, rhs).map(Constant::U32),
        (Constant::U64(lhs), Constant::U64(rhs)) => CheckedDiv::checked_div(lhs, rhs).map(Constant::U64),
        (Constant::S8(lhs), Constant::S8(rhs)) => CheckedDiv::checked_div(lhs, rhs).map(Constant::S8),
        (Constant::S16(lhs), Constant::S16(rhs)) => CheckedDiv::checked_div(lhs, rhs).map(Constant::S16),
        (Constant::S32(lhs), Constant::S32(rhs)) => CheckedDiv::checked_div(lhs, rhs).map(Constant::S32),
        (Constant::S64(lhs), Constant::S64(rhs)) => CheckedDiv::checked_div(lhs, rhs).map(Constant::S64),
        (Constant::F32(lhs), Constant::F32(rhs)) => Some(Constant::F32(lhs / rhs)),
        (Constant::F64(lhs), Constant::F64(rhs)) => Some(Constant::F64(lhs / rhs)),
        (lhs, rhs) => {
            return Err(EvalFault::MismatchedOperands {
                lhs: lhs.kind_name(),
                rhs: rhs.kind_name(),
            }
            .into());
        }
    };

    match constant {
        Some(constant) => Ok(Arc::new(Value::Constant(constant))),
        None => Err(EvalFault::ArithmeticOverflow.into()),
    }
}

fn is_integer_zero(constant: &Constant) -> bool {
    match constant {
        Constant::U8(0)
        | Constant::U16(0)
        | Constant::U32(0)
        | Constant::U64(0)
        | Constant::S8(0)
        | Constant::S16(0)
        | Constant::S32(0)
        | Constant::S64(0) => true,
        _ => false,
    }
}

macro_rules! impl_comparison {
    ($(#[$meta:meta])* $name:ident, $op:tt) => {
        $(#[$meta])*
        pub fn $name(lhs: &Value, rhs: &Value) -> Result<Arc<Value>, RuntimeError> {
            let verdict = match constant_pair(lhs, rhs)? {
                (Constant::U8(lhs), Constant::U8(rhs)) => lhs $op rhs,
                (Constant::U16(lhs), Constant::U16(rhs)) => lhs $op rhs,
                (Constant::U32(lhs), Constant::U32(rhs)) => lhs $op rhs,
                (Constant::U64(lhs), Constant::U64(rhs)) => lhs $op rhs,
                (Constant::S8(lhs), Constant::S8(rhs)) => lhs $op rhs,
                (Constant::S16(lhs), Constant::S16(rhs)) => lhs $op rhs,
                (Constant::S32(lhs), Constant::S32(rhs)) => lhs $op rhs,
                (Constant::S64(lhs), Constant::S64(rhs)) => lhs $op rhs,
                (Constant::F32(lhs), Constant::F32(rhs)) => lhs $op rhs,
                (Constant::F64(lhs), Constant::F64(rhs)) => lhs $op rhs,
                (Constant::Char(lhs), Constant::Char(rhs)) => lhs $op rhs,
                (lhs, rhs) => {
                    return Err(EvalFault::MismatchedOperands {
                        lhs: lhs.kind_name(),
                        rhs: rhs.kind_name(),
                    }
                    .into());
                }
            };

            Ok(Arc::new(Value::bool(verdict)))
        }
    };
}

impl_comparison!(
    /// Strict less-than on ordered constants of the same kind.
    lt, <
);
impl_comparison!(
    /// Less-than-or-equal on ordered constants of the same kind.
    le, <=
);
impl_comparison!(
    /// Strict greater-than on ordered constants of the same kind.
    gt, >
);
impl_comparison!(
    /// Greater-than-or-equal on ordered constants of the same kind.
    ge, >=
);

/// Equality on constants of the same kind.
pub fn eq(lhs: &Value, rhs: &Value) -> Result<Arc<Value>, RuntimeError> {
    let (lhs, rhs) = constant_pair(lhs, rhs)?;
    if lhs.kind_name() != rhs.kind_name() {
        return Err(EvalFault::MismatchedOperands {
            lhs: lhs.kind_name(),
            rhs: rhs.kind_name(),
        }
        .into());
    }

    Ok(Arc::new(Value::bool(lhs == rhs)))
}

/// View argument `index` as a signed 64-bit constant.
///
/// Anything else is a shape fault against the closure's declared signature.
pub fn argument_s64(arguments: &[Arc<Value>], index: usize) -> Result<i64, RuntimeError> {
    match arguments.get(index).map(Arc::as_ref) {
        Some(Value::Constant(Constant::S64(value))) => Ok(*value),
        Some(value) => Err(InvalidCall::MalformedArgument {
            index,
            expected: "S64",
            found: value.kind_name(),
        }
        .into()),
        None => Err(InvalidCall::ArityMismatch {
            expected: index + 1,
            found: arguments.len(),
        }
        .into()),
    }
}

/// View argument `index` as a boolean constant.
pub fn argument_bool(arguments: &[Arc<Value>], index: usize) -> Result<bool, RuntimeError> {
    match arguments.get(index).map(Arc::as_ref) {
        Some(Value::Constant(Constant::Bool(value))) => Ok(*value),
        Some(value) => Err(InvalidCall::MalformedArgument {
            index,
            expected: "Bool",
            found: value.kind_name(),
        }
        .into()),
        None => Err(InvalidCall::ArityMismatch {
            expected: index + 1,
            found: arguments.len(),
        }
        .into()),
    }
}
