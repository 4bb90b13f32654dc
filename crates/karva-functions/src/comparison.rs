//! Comparison functions.
//!
//! Each returns its first argument when the relation holds and its second
//! otherwise, so results stay numeric.

use karva_engine::{EvalError, Function};

fn pick(args: &[f64], holds: fn(f64, f64) -> bool) -> f64 {
    if holds(args[0], args[1]) {
        args[0]
    } else {
        args[1]
    }
}

#[allow(clippy::float_cmp)]
pub fn equal(args: &[f64]) -> Result<f64, EvalError> {
    Ok(pick(args, |x, y| x == y))
}

#[allow(clippy::float_cmp)]
pub fn unequal(args: &[f64]) -> Result<f64, EvalError> {
    Ok(pick(args, |x, y| x != y))
}

pub fn less(args: &[f64]) -> Result<f64, EvalError> {
    Ok(pick(args, |x, y| x < y))
}

pub fn greater(args: &[f64]) -> Result<f64, EvalError> {
    Ok(pick(args, |x, y| x > y))
}

pub fn less_or_equal(args: &[f64]) -> Result<f64, EvalError> {
    Ok(pick(args, |x, y| x <= y))
}

pub fn greater_or_equal(args: &[f64]) -> Result<f64, EvalError> {
    Ok(pick(args, |x, y| x >= y))
}

#[must_use]
pub fn all() -> Vec<Function<f64>> {
    vec![
        Function::new("=", 2, equal),
        Function::new("U", 2, unequal),
        Function::new("<", 2, less),
        Function::new(">", 2, greater),
        Function::new("L", 2, less_or_equal),
        Function::new("G", 2, greater_or_equal),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_picks_operand() {
        assert_eq!(less(&[1.0, 2.0]), Ok(1.0));
        assert_eq!(less(&[2.0, 1.0]), Ok(1.0));
        assert_eq!(greater(&[1.0, 2.0]), Ok(2.0));
        assert_eq!(less_or_equal(&[3.0, 3.0]), Ok(3.0));
        assert_eq!(greater_or_equal(&[4.0, 3.0]), Ok(4.0));
    }

    #[test]
    fn test_equality() {
        assert_eq!(equal(&[5.0, 5.0]), Ok(5.0));
        assert_eq!(equal(&[5.0, 6.0]), Ok(6.0));
        assert_eq!(unequal(&[5.0, 6.0]), Ok(5.0));
        assert_eq!(unequal(&[5.0, 5.0]), Ok(5.0));
    }

    #[test]
    fn test_catalog_glyphs() {
        let glyphs = all().iter().map(|f| f.glyph().to_owned()).collect::<Vec<_>>();
        assert_eq!(glyphs, ["=", "U", "<", ">", "L", "G"]);
    }
}
