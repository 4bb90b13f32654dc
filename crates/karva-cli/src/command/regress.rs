use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::Utc;
use karva_engine::{Chromosome, ChromosomeSpec, Sample, Terminal};
use karva_functions::{arithmetic, linkers};
use karva_training::{
    fitness::FitnessFunction, params::PopulationParams, population::Population,
    seed::EvolutionSeed,
};
use rand::Rng as _;

use crate::{
    model::run_report::{BestIndividual, RunReport},
    util::{self, Output},
};

/// Largest credit one sample can earn.
const SELECTION_RANGE: f64 = 1000.0;
const SAMPLE_LOW: f64 = -10.0;
const SAMPLE_HIGH: f64 = 10.0;

fn target(x: f64) -> f64 {
    4.0 * x.powi(3) + 3.0 * x.powi(2) + 2.0 * x + 1.0
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RegressArg {
    /// Number of individuals
    #[arg(long, default_value_t = 20)]
    population: usize,
    /// Head length of every gene
    #[arg(long, default_value_t = 8)]
    head: usize,
    /// Genes per chromosome
    #[arg(long, default_value_t = 4)]
    genes: usize,
    /// Maximum number of generations
    #[arg(long, default_value_t = 100)]
    generations: usize,
    /// Number of random sample points
    #[arg(long, default_value_t = 10)]
    samples: usize,
    /// Seed as 32 hex characters; random if omitted
    #[arg(long)]
    seed: Option<EvolutionSeed>,
    /// JSON file with population parameters
    #[arg(long)]
    params: Option<PathBuf>,
    /// Print every individual of every generation
    #[arg(long)]
    show_population: bool,
    /// Output file path for the run report
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Rewards small absolute error summed over the samples.
///
/// Any evaluation error makes the organism inviable.
struct Polynomial {
    samples: Vec<(Sample<f64>, f64)>,
}

impl FitnessFunction<f64> for Polynomial {
    fn fitness(&self, chromosome: &Chromosome<f64>) -> f64 {
        let mut total = 0.0;
        for (sample, expected) in &self.samples {
            match chromosome.evaluate(sample) {
                Ok(v) if v.is_finite() => total += SELECTION_RANGE - (v - expected).abs(),
                _ => return 0.0,
            }
        }
        total.max(0.0).floor()
    }

    #[expect(clippy::cast_precision_loss)]
    fn solved(&self, chromosome: &Chromosome<f64>) -> bool {
        self.fitness(chromosome) >= SELECTION_RANGE * self.samples.len() as f64
    }
}

pub(crate) fn run(arg: &RegressArg) -> anyhow::Result<()> {
    log::debug!("regress: {arg:?}");
    let RegressArg {
        population: size,
        head,
        genes,
        generations,
        samples,
        seed,
        params,
        show_population,
        output,
    } = arg;

    let params = match params {
        Some(path) => util::read_json_file::<PopulationParams, _>("params", path)?,
        None => PopulationParams::default(),
    };
    let seed = seed.unwrap_or_else(|| rand::rng().random());

    // samples and the evolution seed both derive from the run seed
    let mut rng = seed.rng();
    let problem = Polynomial {
        samples: (0..*samples)
            .map(|_| {
                let x = rng.random_range(SAMPLE_LOW..SAMPLE_HIGH);
                (Sample::new().with("x", x), target(x))
            })
            .collect(),
    };

    let spec = ChromosomeSpec::new(
        arithmetic::basic(),
        vec![
            Terminal::attribute("x"),
            Terminal::constant("1", 1.0),
            Terminal::constant("2", 2.0),
        ],
        *head,
        *genes,
        linkers::sum(),
    )
    .context("Invalid chromosome layout")?;
    let mut population = Population::new(
        Arc::new(spec),
        *size,
        params.clone(),
        problem,
        rng.random(),
    )
    .context("Invalid population settings")?;

    eprintln!("Seed: {seed}");
    let mut history = vec![population.stats()];
    if *show_population {
        eprintln!("{population}");
    }
    while population.age() < *generations && !population.is_solved() {
        population.cycle();
        let stats = population.stats();
        history.push(stats);
        if *show_population {
            eprintln!("{population}");
        } else {
            eprintln!(
                "Generation #{}: best #{} => {:.3}, mean {:.3}, std {:.3}",
                stats.age, stats.best_id, stats.best_fitness, stats.mean, stats.std_dev
            );
        }
    }

    let solved = population.is_solved();
    let best = population.best();
    if solved {
        eprintln!("SOLVED: {best}");
    } else {
        eprintln!("Not solved after {} generations", population.age());
    }

    let report = RunReport {
        finished_at: Utc::now(),
        seed,
        params,
        generations: population.age(),
        solved,
        best: BestIndividual {
            id: best.id().0,
            genome: best.to_string(),
            fitness: population.stats().best_fitness,
        },
        history,
    };
    Output::save_json(&report, output.clone())?;

    if let Some(path) = output {
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}
