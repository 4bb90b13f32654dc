//! Arithmetic functions.
//!
//! Semantic failures are reported as [`EvalError`]s and never caught here;
//! fitness functions usually score such organisms as inviable.

use karva_engine::{EvalError, Function};

pub fn add(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0] + args[1])
}

pub fn subtract(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0] - args[1])
}

pub fn multiply(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0] * args[1])
}

/// `x / y`; fails with [`EvalError::DivisionByZero`] when `y` is zero.
pub fn divide(args: &[f64]) -> Result<f64, EvalError> {
    if args[1] == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(args[0] / args[1])
}

/// `x` raised to `y`.
///
/// A negative base with a fractional exponent has no real result and fails
/// with a domain error.
pub fn power(args: &[f64]) -> Result<f64, EvalError> {
    let (x, y) = (args[0], args[1]);
    if x < 0.0 && y.fract() != 0.0 {
        return Err(EvalError::Domain {
            function: "^".to_owned(),
        });
    }
    Ok(x.powf(y))
}

/// Square root; fails with a domain error for negative input.
pub fn root(args: &[f64]) -> Result<f64, EvalError> {
    if args[0] < 0.0 {
        return Err(EvalError::Domain {
            function: "Q".to_owned(),
        });
    }
    Ok(args[0].sqrt())
}

/// `+ - * /`, the usual set for symbolic regression.
#[must_use]
pub fn basic() -> Vec<Function<f64>> {
    vec![
        Function::new("+", 2, add),
        Function::new("-", 2, subtract),
        Function::new("*", 2, multiply),
        Function::new("/", 2, divide),
    ]
}

/// Every arithmetic function, including `^` and `Q`.
#[must_use]
pub fn all() -> Vec<Function<f64>> {
    let mut functions = basic();
    functions.push(Function::new("^", 2, power));
    functions.push(Function::new("Q", 1, root));
    functions
}
