//! The generational loop.

use std::{fmt, mem, num::NonZeroUsize, sync::Arc, thread};

use karva_engine::{Chromosome, ChromosomeSpec, ConfigError, CrossoverKind};
use karva_stats::descriptive::DescriptiveStats;
use rand::{
    Rng,
    seq::{IndexedRandom, index},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{fitness::FitnessFunction, params::PopulationParams, seed::EvolutionSeed, selection};

/// Summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub age: usize,
    pub best_id: u64,
    pub best_fitness: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// A fixed-size population evolving under one fitness function.
///
/// Each call to [`cycle`](Self::cycle) produces the next generation. All
/// randomness comes from a generator seeded by the [`EvolutionSeed`], so
/// the same spec, parameters and seed always produce the same run.
pub struct Population<V, F> {
    spec: Arc<ChromosomeSpec<V>>,
    params: PopulationParams,
    mutation_rate: f64,
    fitness_fn: F,
    rng: Pcg32,
    individuals: Vec<Arc<Chromosome<V>>>,
    next: Vec<Arc<Chromosome<V>>>,
    age: usize,
    stats: GenerationStats,
}

impl<V, F> fmt::Debug for Population<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Population")
            .field("size", &self.individuals.len())
            .field("age", &self.age)
            .field("params", &self.params)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<V, F> Population<V, F>
where
    V: Send + Sync,
    F: FitnessFunction<V> + Sync,
{
    /// Creates a random initial population and scores it.
    pub fn new(
        spec: Arc<ChromosomeSpec<V>>,
        size: usize,
        params: PopulationParams,
        fitness_fn: F,
        seed: EvolutionSeed,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if spec.genome_len() == 0 {
            return Err(ConfigError::EmptyGenome);
        }
        params.validate()?;

        let mut rng = seed.rng();
        let individuals = Chromosome::generate(&spec, &mut rng)
            .take(size)
            .collect::<Vec<_>>();
        let mutation_rate = params.mutation_rate_for(spec.genome_len());
        log::debug!(
            "population: size={size}, genome_len={}, mutation_rate={mutation_rate}, seed={seed}",
            spec.genome_len()
        );

        let mut population = Self {
            spec,
            params,
            mutation_rate,
            fitness_fn,
            rng,
            individuals,
            next: Vec::with_capacity(size),
            age: 0,
            stats: GenerationStats {
                age: 0,
                best_id: 0,
                best_fitness: f64::NEG_INFINITY,
                mean: 0.0,
                std_dev: 0.0,
            },
        };
        population.evaluate_fitness();
        population.stats = population.compute_stats();
        Ok(population)
    }

    /// Advances one generation: selection, variation, then scoring.
    pub fn cycle(&mut self) {
        let size = self.individuals.len();
        let fitnesses = self.fitnesses();

        // elitism
        let elite = selection::best_index(&fitnesses);
        self.next.clear();
        self.next.push(Arc::clone(&self.individuals[elite]));

        let weights = selection::sigma_scaled_weights(&fitnesses, self.params.exclusion_level);
        let picks = selection::roulette(&weights, size - 1, &mut self.rng);
        self.next
            .extend(picks.into_iter().map(|i| Arc::clone(&self.individuals[i])));

        for slot in &mut self.next[1..] {
            *slot = vary(slot, &self.params, self.mutation_rate, &mut self.rng);
        }

        if size >= 3 {
            for kind in CrossoverKind::ALL {
                if !self.rng.random_bool(self.params.crossover_rate(kind)) {
                    continue;
                }
                let pair = index::sample(&mut self.rng, size - 1, 2);
                let (a, b) = (pair.index(0) + 1, pair.index(1) + 1);
                let (x, y) = self.next[a].crossover(kind, &self.next[b], &mut self.rng);
                log::trace!("{kind} crossover between slots {a} and {b}");
                self.next[a] = x;
                self.next[b] = y;
            }
        }

        mem::swap(&mut self.individuals, &mut self.next);
        self.age += 1;
        self.evaluate_fitness();
        self.stats = self.compute_stats();
        log::debug!(
            "generation {}: best #{} ({}), mean {:.4}, std {:.4}",
            self.stats.age,
            self.stats.best_id,
            self.stats.best_fitness,
            self.stats.mean,
            self.stats.std_dev
        );
    }

    /// Scores every unscored individual in parallel.
    fn evaluate_fitness(&self) {
        let threads = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk_size = self.individuals.len().div_ceil(threads).max(1);
        let fitness_fn = &self.fitness_fn;
        thread::scope(|s| {
            for chunk in self.individuals.chunks(chunk_size) {
                s.spawn(move || {
                    for individual in chunk {
                        individual.fitness_or_init(|c| fitness_fn.fitness(c));
                    }
                });
            }
        });
    }

    fn fitness_of(&self, individual: &Chromosome<V>) -> f64 {
        individual.fitness_or_init(|c| self.fitness_fn.fitness(c))
    }

    fn fitnesses(&self) -> Vec<f64> {
        self.individuals
            .iter()
            .map(|individual| self.fitness_of(individual))
            .collect()
    }

    fn compute_stats(&self) -> GenerationStats {
        let fitnesses = self.fitnesses();
        let best = &self.individuals[selection::best_index(&fitnesses)];
        let summary = DescriptiveStats::new(fitnesses.iter().copied());
        GenerationStats {
            age: self.age,
            best_id: best.id().0,
            best_fitness: self.fitness_of(best),
            mean: summary.map_or(0.0, |s| s.mean),
            std_dev: summary.map_or(0.0, |s| s.std_dev),
        }
    }

    /// The fittest individual; ties go to the later one.
    #[must_use]
    pub fn best(&self) -> &Arc<Chromosome<V>> {
        &self.individuals[selection::best_index(&self.fitnesses())]
    }

    /// Whether the fitness function considers the best individual a solution.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.fitness_fn.solved(self.best())
    }
}

impl<V, F> Population<V, F> {
    /// Number of completed generations.
    #[must_use]
    pub fn age(&self) -> usize {
        self.age
    }

    #[must_use]
    pub fn stats(&self) -> GenerationStats {
        self.stats
    }

    #[must_use]
    pub fn individuals(&self) -> &[Arc<Chromosome<V>>] {
        &self.individuals
    }

    #[must_use]
    pub fn spec(&self) -> &Arc<ChromosomeSpec<V>> {
        &self.spec
    }

    #[must_use]
    pub fn params(&self) -> &PopulationParams {
        &self.params
    }

    #[must_use]
    pub fn fitness_fn(&self) -> &F {
        &self.fitness_fn
    }
}

/// Applies the unary operators to one selected individual.
fn vary<V, R>(
    individual: &Arc<Chromosome<V>>,
    params: &PopulationParams,
    mutation_rate: f64,
    rng: &mut R,
) -> Arc<Chromosome<V>>
where
    R: Rng + ?Sized,
{
    let mut c = individual.mutate(mutation_rate, rng);
    if rng.random_bool(params.inversion_rate) {
        c = c.invert(rng);
    }
    if rng.random_bool(params.is_transposition_rate)
        && let Some(&length) = params.is_transposition_lengths.choose(rng)
    {
        c = c.transpose_is(length, rng);
    }
    if rng.random_bool(params.ris_transposition_rate)
        && let Some(&length) = params.ris_transposition_lengths.choose(rng)
    {
        c = c.transpose_ris(length, rng);
    }
    if rng.random_bool(params.gene_transposition_rate) {
        c = c.transpose_gene(rng);
    }
    c
}

/// Header line, a locus ruler with a rule below it, then one line per
/// individual with right-aligned ids.
impl<V, F> fmt::Display for Population<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let GenerationStats {
            age,
            best_id,
            best_fitness,
            mean,
            ..
        } = self.stats;
        writeln!(
            f,
            "[Generation: {age} | Best: #{best_id} ({best_fitness}) | Mean: {mean:.4}]"
        )?;
        let genome_len = self.spec.genome_len();
        for locus in 0..genome_len {
            write!(f, "{}", locus % 10)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(genome_len))?;

        let id_width = self
            .individuals
            .iter()
            .map(|individual| individual.id().0.to_string().len())
            .max()
            .unwrap_or(0);
        for individual in &self.individuals {
            write!(f, "{individual} [{:>id_width$}]: ", individual.id().0)?;
            match individual.fitness() {
                Some(fitness) => writeln!(f, "{fitness}")?,
                None => writeln!(f, "-")?,
            }
        }
        Ok(())
    }
}
