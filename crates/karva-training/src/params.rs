//! Tunable rates of the evolutionary loop.

use karva_engine::{ConfigError, CrossoverKind};
use serde::{Deserialize, Serialize};

/// Selection pressure and variation rates of a [`Population`](crate::population::Population).
///
/// Every rate is an independent Bernoulli probability per applicable unit:
/// per locus for mutation, per individual for inversion and transposition,
/// per generation for each crossover kind.
///
/// Defaults follow the classic GEP settings. The mutation rate defaults to
/// `2 / genome_length`, which mutates about two loci per individual.
///
/// # Example
///
/// ```
/// use karva_training::params::PopulationParams;
///
/// let params: PopulationParams = serde_json::from_str(r#"{ "inversion_rate": 0.2 }"#).unwrap();
/// assert_eq!(params.inversion_rate, 0.2);
/// assert_eq!(params.crossover_one_point_rate, 0.3);
/// assert_eq!(params.mutation_rate_for(50), 0.04);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParams {
    /// Selection pressure applied to scaled fitness.
    pub exclusion_level: f64,
    /// Per-locus mutation probability; `None` means `2 / genome_length`.
    pub mutation_rate: Option<f64>,
    pub inversion_rate: f64,
    pub is_transposition_rate: f64,
    /// Lengths an IS transposition draws from.
    pub is_transposition_lengths: Vec<usize>,
    pub ris_transposition_rate: f64,
    /// Lengths a RIS transposition draws from.
    pub ris_transposition_lengths: Vec<usize>,
    pub gene_transposition_rate: f64,
    pub crossover_one_point_rate: f64,
    pub crossover_two_point_rate: f64,
    pub crossover_gene_rate: f64,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            exclusion_level: 1.5,
            mutation_rate: None,
            inversion_rate: 0.1,
            is_transposition_rate: 0.1,
            is_transposition_lengths: vec![1, 2, 3],
            ris_transposition_rate: 0.1,
            ris_transposition_lengths: vec![1, 2, 3],
            gene_transposition_rate: 0.1,
            crossover_one_point_rate: 0.3,
            crossover_two_point_rate: 0.3,
            crossover_gene_rate: 0.1,
        }
    }
}

impl PopulationParams {
    /// Parameters that never vary anything: selection only.
    #[must_use]
    pub fn selection_only() -> Self {
        Self {
            mutation_rate: Some(0.0),
            inversion_rate: 0.0,
            is_transposition_rate: 0.0,
            ris_transposition_rate: 0.0,
            gene_transposition_rate: 0.0,
            crossover_one_point_rate: 0.0,
            crossover_two_point_rate: 0.0,
            crossover_gene_rate: 0.0,
            ..Self::default()
        }
    }

    /// Effective per-locus mutation rate for a genome of `genome_len` loci.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mutation_rate_for(&self, genome_len: usize) -> f64 {
        self.mutation_rate
            .unwrap_or_else(|| (2.0 / genome_len as f64).min(1.0))
    }

    /// Per-generation probability of one crossover of `kind`.
    #[must_use]
    pub fn crossover_rate(&self, kind: CrossoverKind) -> f64 {
        match kind {
            CrossoverKind::OnePoint => self.crossover_one_point_rate,
            CrossoverKind::TwoPoint => self.crossover_two_point_rate,
            CrossoverKind::Gene => self.crossover_gene_rate,
        }
    }

    /// Checks that every rate is a probability and that length sets are
    /// usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.exclusion_level.is_finite() && self.exclusion_level > 0.0) {
            return Err(ConfigError::InvalidExclusionLevel {
                value: self.exclusion_level,
            });
        }

        let rates = [
            ("mutation_rate", self.mutation_rate.unwrap_or(0.0)),
            ("inversion_rate", self.inversion_rate),
            ("is_transposition_rate", self.is_transposition_rate),
            ("ris_transposition_rate", self.ris_transposition_rate),
            ("gene_transposition_rate", self.gene_transposition_rate),
            ("crossover_one_point_rate", self.crossover_one_point_rate),
            ("crossover_two_point_rate", self.crossover_two_point_rate),
            ("crossover_gene_rate", self.crossover_gene_rate),
        ];
        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }

        if self.is_transposition_rate > 0.0 && self.is_transposition_lengths.is_empty() {
            return Err(ConfigError::EmptyLengthSet {
                name: "is_transposition_lengths",
            });
        }
        if self.ris_transposition_rate > 0.0 && self.ris_transposition_lengths.is_empty() {
            return Err(ConfigError::EmptyLengthSet {
                name: "ris_transposition_lengths",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(PopulationParams::default().validate(), Ok(()));
        assert_eq!(PopulationParams::selection_only().validate(), Ok(()));
    }

    #[test]
    fn test_default_mutation_rate_targets_two_loci() {
        let params = PopulationParams::default();
        assert_eq!(params.mutation_rate_for(100), 0.02);
        assert_eq!(params.mutation_rate_for(1), 1.0);

        let fixed = PopulationParams {
            mutation_rate: Some(0.5),
            ..PopulationParams::default()
        };
        assert_eq!(fixed.mutation_rate_for(100), 0.5);
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        let params = PopulationParams {
            crossover_gene_rate: 1.5,
            ..PopulationParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::InvalidRate {
                name: "crossover_gene_rate",
                value: 1.5
            })
        );

        let params = PopulationParams {
            mutation_rate: Some(-0.1),
            ..PopulationParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidRate {
                name: "mutation_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_crossover_rate_by_kind() {
        let params = PopulationParams {
            crossover_two_point_rate: 0.7,
            ..PopulationParams::default()
        };
        assert_eq!(params.crossover_rate(CrossoverKind::OnePoint), 0.3);
        assert_eq!(params.crossover_rate(CrossoverKind::TwoPoint), 0.7);
        assert_eq!(params.crossover_rate(CrossoverKind::Gene), 0.1);
    }

    #[test]
    fn test_rejects_bad_exclusion_level() {
        let params = PopulationParams {
            exclusion_level: 0.0,
            ..PopulationParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidExclusionLevel { .. })
        ));
    }

    #[test]
    fn test_empty_length_set_only_matters_with_nonzero_rate() {
        let params = PopulationParams {
            ris_transposition_lengths: vec![],
            ..PopulationParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::EmptyLengthSet {
                name: "ris_transposition_lengths"
            })
        );

        let params = PopulationParams {
            ris_transposition_rate: 0.0,
            ris_transposition_lengths: vec![],
            ..PopulationParams::default()
        };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_json_roundtrip_keeps_defaults_for_missing_fields() {
        let params: PopulationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PopulationParams::default());
    }
}
