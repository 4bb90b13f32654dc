use chrono::{DateTime, Utc};
use karva_training::{params::PopulationParams, population::GenerationStats, seed::EvolutionSeed};
use serde::{Deserialize, Serialize};

/// Outcome of one `regress` run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunReport {
    pub finished_at: DateTime<Utc>,
    pub seed: EvolutionSeed,
    pub params: PopulationParams,
    pub generations: usize,
    pub solved: bool,
    pub best: BestIndividual,
    pub history: Vec<GenerationStats>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BestIndividual {
    pub id: u64,
    pub genome: String,
    pub fitness: f64,
}
