//! Population-level evolution of GEP chromosomes.
//!
//! # How a Generation Works
//!
//! 1. **Fitness** - every individual is scored once (memoized on the
//!    chromosome), in parallel across threads
//! 2. **Elitism** - the best individual survives unchanged into slot 0
//! 3. **Selection** - the remaining slots are filled by sigma-scaled
//!    roulette-wheel selection
//! 4. **Variation** - every non-elite individual may mutate, invert and
//!    transpose; then up to one pair per crossover kind recombines
//! 5. **Replacement** - the new generation replaces the old one
//!
//! # Architecture
//!
//! ```text
//! PopulationParams + ChromosomeSpec
//!     ↓ configure
//! Population (karva-training)
//!     ↓ asks for fitness
//! FitnessFunction (problem)
//!     ↓ evaluates
//! Chromosome / Gene (karva-engine)
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use karva_engine::{Chromosome, ChromosomeSpec, EvalError, Function, Linker, Sample, Terminal};
//! use karva_training::{
//!     fitness::FitnessFunction, params::PopulationParams, population::Population,
//!     seed::EvolutionSeed,
//! };
//!
//! fn add(args: &[f64]) -> Result<f64, EvalError> {
//!     Ok(args[0] + args[1])
//! }
//! fn first(values: &[f64]) -> Result<f64, EvalError> {
//!     Ok(values[0])
//! }
//!
//! /// Rewards expressions evaluating close to 10 at x = 2.
//! struct CloseToTen(Sample<f64>);
//!
//! impl FitnessFunction<f64> for CloseToTen {
//!     fn fitness(&self, chromosome: &Chromosome<f64>) -> f64 {
//!         chromosome
//!             .evaluate(&self.0)
//!             .map_or(0.0, |v| (100.0 - (v - 10.0).abs()).max(0.0))
//!     }
//! }
//!
//! let spec = ChromosomeSpec::new(
//!     vec![Function::new("+", 2, add)],
//!     vec![Terminal::attribute("x")],
//!     4,
//!     1,
//!     Linker::new("first", first),
//! )
//! .unwrap();
//! let problem = CloseToTen(Sample::new().with("x", 2.0));
//! let mut population = Population::new(
//!     Arc::new(spec),
//!     10,
//!     PopulationParams::default(),
//!     problem,
//!     EvolutionSeed::from_bytes([7; 16]),
//! )
//! .unwrap();
//!
//! for _ in 0..20 {
//!     population.cycle();
//! }
//! assert_eq!(population.age(), 20);
//! ```

pub mod fitness;
pub mod params;
pub mod population;
pub mod seed;
pub mod selection;
