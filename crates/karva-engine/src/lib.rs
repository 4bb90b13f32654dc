//! Karva encoding, evaluation and structure-preserving variation for Gene
//! Expression Programming.
//!
//! A chromosome is a fixed-length linear string of symbols split into genes.
//! Each gene has a *head*, which may hold functions or terminals, and a
//! *tail*, which holds terminals only. The tail is sized so that any head
//! arrangement decodes to a complete expression tree:
//!
//! ```text
//! tail = head * (max_arity - 1) + 1
//! ```
//!
//! # Modules
//!
//! - [`symbol`]: functions, terminals and linkers supplied by the problem
//! - [`spec`]: [`ChromosomeSpec`], the validated configuration shared by all
//!   chromosomes of one run
//! - [`gene`]: the Karva codec (coding region, bottom-up evaluation)
//! - [`chromosome`]: multigenic chromosomes and their evaluation
//! - [`variation`]: mutation, inversion, transposition and crossover
//! - [`input`]: the [`Input`] trait evaluated genes read attributes from
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use karva_engine::{Chromosome, ChromosomeSpec, EvalError, Function, Linker, Sample, Terminal};
//! use rand::SeedableRng as _;
//!
//! fn add(args: &[f64]) -> Result<f64, EvalError> {
//!     Ok(args[0] + args[1])
//! }
//! fn sum(values: &[f64]) -> Result<f64, EvalError> {
//!     Ok(values.iter().sum())
//! }
//!
//! let spec = Arc::new(
//!     ChromosomeSpec::new(
//!         vec![Function::new("+", 2, add)],
//!         vec![Terminal::attribute("x"), Terminal::constant("1", 1.0)],
//!         3,
//!         2,
//!         Linker::new("sum", sum),
//!     )
//!     .unwrap(),
//! );
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let chromosome = Chromosome::random(&spec, &mut rng);
//! let sample = Sample::new().with("x", 2.0);
//! assert!(chromosome.evaluate(&sample).is_ok());
//! ```

pub use self::{chromosome::*, gene::*, input::*, spec::*, symbol::*, variation::*};

pub mod chromosome;
pub mod gene;
pub mod input;
pub mod spec;
pub mod symbol;
pub mod variation;

/// Invalid chromosome, gene or population configuration.
///
/// Configuration is validated eagerly; nothing is silently coerced.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("gene count must be at least 1")]
    NoGenes,
    #[display("terminal set must not be empty")]
    NoTerminals,
    #[display("duplicate symbol glyph '{glyph}'")]
    DuplicateSymbol { glyph: String },
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("genome length must be nonzero")]
    EmptyGenome,
    #[display("{name} must be a probability in [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    #[display("exclusion level must be positive and finite, got {value}")]
    InvalidExclusionLevel { value: f64 },
    #[display("{name} must not be empty while its rate is nonzero")]
    EmptyLengthSet { name: &'static str },
    #[display("chromosome must have {expected} genes, got {actual}")]
    GeneCount { expected: usize, actual: usize },
    #[display("gene must have {expected} loci, got {actual}")]
    GeneLength { expected: usize, actual: usize },
    #[display("unknown symbol id {id} at locus {locus}")]
    UnknownSymbol { locus: usize, id: usize },
    #[display("function '{glyph}' at tail locus {locus}")]
    FunctionInTail { locus: usize, glyph: String },
}

/// Fault raised while evaluating an expression.
///
/// The core never catches these: they propagate to the fitness function,
/// which usually scores the organism as inviable.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvalError {
    #[display("division by zero")]
    DivisionByZero,
    #[display("argument outside the domain of '{function}'")]
    Domain { function: String },
    #[display("input has no attribute '{name}'")]
    MissingAttribute { name: String },
    #[display("no value for coding locus {locus}")]
    Unresolved { locus: usize },
}
