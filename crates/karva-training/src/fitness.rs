//! Problem definition: how good a chromosome is, and when to stop.

use karva_engine::Chromosome;

/// Scores chromosomes for one problem.
///
/// Higher is better. The score must be deterministic for fixed gene content,
/// because each chromosome is scored only once.
///
/// Evaluation errors ([`karva_engine::EvalError`]) are not handled by the
/// population; implementations are expected to map them to a fitness that
/// marks the organism as inviable (conventionally `0.0`).
pub trait FitnessFunction<V> {
    fn fitness(&self, chromosome: &Chromosome<V>) -> f64;

    /// Whether `chromosome` solves the problem. Defaults to never.
    fn solved(&self, chromosome: &Chromosome<V>) -> bool {
        let _ = chromosome;
        false
    }
}

impl<V, F> FitnessFunction<V> for &F
where
    F: FitnessFunction<V> + ?Sized,
{
    fn fitness(&self, chromosome: &Chromosome<V>) -> f64 {
        (**self).fitness(chromosome)
    }

    fn solved(&self, chromosome: &Chromosome<V>) -> bool {
        (**self).solved(chromosome)
    }
}
