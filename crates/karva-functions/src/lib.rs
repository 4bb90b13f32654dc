//! Ready-made function catalogs and linkers over `f64`.
//!
//! Each module exposes the individual operations as plain `fn(&[f64])`
//! values plus constructors returning [`Function`](karva_engine::Function)s
//! ready for a [`ChromosomeSpec`](karva_engine::ChromosomeSpec):
//!
//! - [`arithmetic`]: `+ - * / ^ Q`
//! - [`comparison`]: `= U < > L G`
//! - [`logic`]: `& | ! I`, where any nonzero value is true
//! - [`linkers`]: `sum` and `or`
//!
//! # Example
//!
//! ```
//! use karva_engine::{ChromosomeSpec, Terminal};
//! use karva_functions::{arithmetic, linkers};
//!
//! let spec = ChromosomeSpec::new(
//!     arithmetic::basic(),
//!     vec![Terminal::attribute("x"), Terminal::constant("1", 1.0)],
//!     6,
//!     3,
//!     linkers::sum(),
//! )
//! .unwrap();
//! assert_eq!(spec.gene_len(), 13);
//! ```

pub mod arithmetic;
pub mod comparison;
pub mod linkers;
pub mod logic;

/// Truth value of a number: anything but zero.
pub(crate) fn truthy(x: f64) -> bool {
    x != 0.0
}

pub(crate) fn from_bool(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}
