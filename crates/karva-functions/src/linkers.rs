//! Linkers combining per-gene values.

use karva_engine::{EvalError, Linker};

use crate::{from_bool, truthy};

/// Adds the values of all genes.
#[must_use]
pub fn sum() -> Linker<f64> {
    Linker::new("sum", total)
}

/// `1` if any gene is true, `0` otherwise.
#[must_use]
pub fn or() -> Linker<f64> {
    Linker::new("or", any_true)
}

fn total(values: &[f64]) -> Result<f64, EvalError> {
    Ok(values.iter().sum())
}

fn any_true(values: &[f64]) -> Result<f64, EvalError> {
    Ok(from_bool(values.iter().copied().any(truthy)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum() {
        assert_eq!(sum().link(&[1.0, 2.5, -0.5]), Ok(3.0));
        assert_eq!(sum().name(), "sum");
    }

    #[test]
    fn test_or() {
        assert_eq!(or().link(&[0.0, 0.0, 7.0]), Ok(1.0));
        assert_eq!(or().link(&[0.0, 0.0]), Ok(0.0));
        assert_eq!(or().link(&[]), Ok(0.0));
    }
}
