//! Logic functions over numbers; nonzero is true.
//!
//! `&` and `|` short-circuit like their boolean counterparts and return the
//! deciding operand, `!` returns `1` or `0`, and `I` picks one of its
//! branches. Mixing them with arithmetic is allowed but rarely meaningful.

use karva_engine::{EvalError, Function};

use crate::{from_bool, truthy};

/// `x && y`: `x` when it is false, `y` otherwise.
pub fn and(args: &[f64]) -> Result<f64, EvalError> {
    Ok(if truthy(args[0]) { args[1] } else { args[0] })
}

/// `x || y`: `x` when it is true, `y` otherwise.
pub fn or(args: &[f64]) -> Result<f64, EvalError> {
    Ok(if truthy(args[0]) { args[0] } else { args[1] })
}

pub fn not(args: &[f64]) -> Result<f64, EvalError> {
    Ok(from_bool(!truthy(args[0])))
}

/// `y` if `x` else `z`.
pub fn if_then_else(args: &[f64]) -> Result<f64, EvalError> {
    Ok(if truthy(args[0]) { args[1] } else { args[2] })
}

#[must_use]
pub fn all() -> Vec<Function<f64>> {
    vec![
        Function::new("&", 2, and),
        Function::new("|", 2, or),
        Function::new("!", 1, not),
        Function::new("I", 3, if_then_else),
    ]
}
