//! Multigenic chromosomes.

use std::{
    fmt, iter,
    sync::{Arc, OnceLock},
};

use rand::Rng;

use crate::{ChromosomeSpec, ConfigError, EvalError, Gene, Input};

/// Unique, increasing identifier of a chromosome within one spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{_0}")]
pub struct ChromosomeId(pub u64);

/// An immutable individual: one or more genes sharing a spec.
///
/// Chromosomes are handled as `Arc<Chromosome<V>>`. Variation operators
/// return the very same `Arc` when they leave every locus unchanged, so
/// [`Arc::ptr_eq`] is a cheap "nothing happened" check and memoized fitness
/// carries over.
#[derive(Debug)]
pub struct Chromosome<V> {
    id: ChromosomeId,
    spec: Arc<ChromosomeSpec<V>>,
    genes: Vec<Arc<Gene<V>>>,
    fitness: OnceLock<f64>,
}

impl<V> Chromosome<V> {
    /// Creates a chromosome from genes built for `spec`.
    ///
    /// Fails when the number of genes or the length of any gene does not
    /// match the spec.
    pub fn new(
        spec: &Arc<ChromosomeSpec<V>>,
        genes: Vec<Arc<Gene<V>>>,
    ) -> Result<Self, ConfigError> {
        if genes.len() != spec.gene_count() {
            return Err(ConfigError::GeneCount {
                expected: spec.gene_count(),
                actual: genes.len(),
            });
        }
        if let Some(gene) = genes.iter().find(|gene| gene.len() != spec.gene_len()) {
            return Err(ConfigError::GeneLength {
                expected: spec.gene_len(),
                actual: gene.len(),
            });
        }
        Ok(Self::from_genes(spec, genes))
    }

    /// Creates a chromosome from genes known to match `spec`.
    pub(crate) fn from_genes(spec: &Arc<ChromosomeSpec<V>>, genes: Vec<Arc<Gene<V>>>) -> Self {
        debug_assert_eq!(genes.len(), spec.gene_count());
        Self {
            id: ChromosomeId(spec.next_id()),
            spec: Arc::clone(spec),
            genes,
            fitness: OnceLock::new(),
        }
    }

    /// Creates a random chromosome.
    #[must_use]
    pub fn random<R>(spec: &Arc<ChromosomeSpec<V>>, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let genes = (0..spec.gene_count())
            .map(|_| Arc::new(Gene::random(spec, rng)))
            .collect();
        Self::from_genes(spec, genes)
    }

    /// Returns an endless stream of random chromosomes.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use karva_engine::{Chromosome, ChromosomeSpec, EvalError, Linker, Terminal};
    /// # use rand::SeedableRng as _;
    /// # fn first(v: &[f64]) -> Result<f64, EvalError> { Ok(v[0]) }
    /// # let spec = Arc::new(ChromosomeSpec::new(vec![], vec![Terminal::constant("1", 1.0)], 2, 1, Linker::new("first", first)).unwrap());
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    /// let population: Vec<_> = Chromosome::generate(&spec, &mut rng).take(10).collect();
    /// assert_eq!(population.len(), 10);
    /// ```
    pub fn generate<'a, R>(
        spec: &'a Arc<ChromosomeSpec<V>>,
        rng: &'a mut R,
    ) -> impl Iterator<Item = Arc<Self>> + 'a
    where
        R: Rng + ?Sized,
        V: 'a,
    {
        iter::repeat_with(move || Arc::new(Self::random(spec, rng)))
    }

    #[must_use]
    pub fn id(&self) -> ChromosomeId {
        self.id
    }

    #[must_use]
    pub fn spec(&self) -> &Arc<ChromosomeSpec<V>> {
        &self.spec
    }

    #[must_use]
    pub fn genes(&self) -> &[Arc<Gene<V>>] {
        &self.genes
    }

    /// Total number of loci.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spec.genome_len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fitness, computing it with `f` on first use.
    ///
    /// The value is computed at most once per chromosome, so `f` must be the
    /// same fitness function every time it is called on this chromosome.
    pub fn fitness_or_init<F>(&self, f: F) -> f64
    where
        F: FnOnce(&Self) -> f64,
    {
        *self.fitness.get_or_init(|| f(self))
    }

    /// Returns the fitness if it has been computed.
    #[must_use]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness.get().copied()
    }

    /// Whether both chromosomes carry the same symbols at every locus.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        same_genes(&self.genes, &other.genes)
    }

    /// Returns `self` when `genes` match its content, a new child otherwise.
    pub(crate) fn derive(self: &Arc<Self>, genes: Vec<Arc<Gene<V>>>) -> Arc<Self> {
        if same_genes(&self.genes, &genes) {
            Arc::clone(self)
        } else {
            Arc::new(Self::from_genes(&self.spec, genes))
        }
    }
}

impl<V> Chromosome<V>
where
    V: Clone,
{
    /// Evaluates every gene against `input` and links the results.
    pub fn evaluate<I>(&self, input: &I) -> Result<V, EvalError>
    where
        I: Input<V> + ?Sized,
    {
        let values = self
            .genes
            .iter()
            .map(|gene| gene.evaluate(&self.spec, input))
            .collect::<Result<Vec<_>, _>>()?;
        self.spec.linker().link(&values)
    }
}

/// Concatenated glyphs of all genes.
impl<V> fmt::Display for Chromosome<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            write!(f, "{}", gene.display(&self.spec))?;
        }
        Ok(())
    }
}

fn same_genes<V>(a: &[Arc<Gene<V>>], b: &[Arc<Gene<V>>]) -> bool {
    a.len() == b.len()
        && iter::zip(a, b).all(|(a, b)| Arc::ptr_eq(a, b) || a.alleles() == b.alleles())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{Function, Linker, Sample, Terminal};

    fn add(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args[0] + args[1])
    }

    fn sum(values: &[f64]) -> Result<f64, EvalError> {
        Ok(values.iter().sum())
    }

    fn spec() -> Arc<ChromosomeSpec<f64>> {
        Arc::new(
            ChromosomeSpec::new(
                vec![Function::new("+", 2, add)],
                vec![Terminal::attribute("x"), Terminal::constant("1", 1.0)],
                1,
                2,
                Linker::new("sum", sum),
            )
            .unwrap(),
        )
    }

    fn chromosome(spec: &Arc<ChromosomeSpec<f64>>, genes: &[[&str; 3]]) -> Arc<Chromosome<f64>> {
        let genes = genes
            .iter()
            .map(|glyphs| {
                let ids = glyphs.map(|g| spec.symbol_id(g).unwrap()).to_vec();
                Arc::new(Gene::new(spec, ids).unwrap())
            })
            .collect();
        Arc::new(Chromosome::new(spec, genes).unwrap())
    }

    #[test]
    fn test_evaluate_links_genes_in_order() {
        let spec = spec();
        let c = chromosome(&spec, &[["+", "x", "1"], ["x", "1", "1"]]);
        let sample = Sample::new().with("x", 4.0);
        assert_eq!(c.evaluate(&sample), Ok(9.0));
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let spec = spec();
        let mut rng = Pcg32::seed_from_u64(1);
        let ids: Vec<_> = Chromosome::generate(&spec, &mut rng)
            .take(20)
            .map(|c| c.id())
            .collect();
        assert!(ids.is_sorted_by(|a, b| a < b));
    }

    #[test]
    fn test_fitness_computed_once() {
        let spec = spec();
        let c = chromosome(&spec, &[["+", "x", "1"], ["x", "1", "1"]]);
        assert_eq!(c.fitness(), None);
        let mut calls = 0;
        let first = c.fitness_or_init(|_| {
            calls += 1;
            42.0
        });
        let second = c.fitness_or_init(|_| 0.0);
        assert_eq!(first, 42.0);
        assert_eq!(second, 42.0);
        assert_eq!(calls, 1);
        assert_eq!(c.fitness(), Some(42.0));
    }

    #[test]
    fn test_derive_keeps_identity_for_equal_content() {
        let spec = spec();
        let c = chromosome(&spec, &[["+", "x", "1"], ["x", "1", "1"]]);
        let copy = chromosome(&spec, &[["+", "x", "1"], ["x", "1", "1"]]);
        let same = c.derive(copy.genes().to_vec());
        assert!(Arc::ptr_eq(&c, &same));

        let other = chromosome(&spec, &[["+", "1", "1"], ["x", "1", "1"]]);
        let child = c.derive(other.genes().to_vec());
        assert!(!Arc::ptr_eq(&c, &child));
        assert!(child.id() > c.id());
    }

    #[test]
    fn test_new_rejects_mismatched_genes() {
        let spec = spec();
        let c = chromosome(&spec, &[["+", "x", "1"], ["x", "1", "1"]]);
        let one_gene = vec![Arc::clone(&c.genes()[0])];
        assert_eq!(
            Chromosome::new(&spec, one_gene).unwrap_err(),
            ConfigError::GeneCount {
                expected: 2,
                actual: 1
            }
        );

        let longer = Arc::new(
            ChromosomeSpec::new(
                vec![Function::new("+", 2, add)],
                vec![Terminal::constant("1", 1.0)],
                2,
                1,
                Linker::new("sum", sum),
            )
            .unwrap(),
        );
        let foreign = Arc::new(Gene::random(&longer, &mut Pcg32::seed_from_u64(2)));
        assert_eq!(
            Chromosome::new(&spec, vec![Arc::clone(&c.genes()[0]), foreign]).unwrap_err(),
            ConfigError::GeneLength {
                expected: 3,
                actual: 5
            }
        );
    }

    #[test]
    fn test_display() {
        let spec = spec();
        let c = chromosome(&spec, &[["+", "x", "1"], ["x", "1", "1"]]);
        assert_eq!(c.to_string(), "+x1x11");
    }
}
