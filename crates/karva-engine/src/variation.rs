//! Structure-preserving genetic operators.
//!
//! Every operator is a pure function of its parent chromosome(s) and the
//! injected random generator. None of them ever places a function in a
//! gene's tail, so every offspring still decodes to a valid expression.
//!
//! When an operator leaves every locus unchanged, the parent `Arc` itself is
//! returned:
//!
//! | Operator | Returns the parent when |
//! |---|---|
//! | [`mutate`](Chromosome::mutate) | no locus was replaced by a different symbol |
//! | [`invert`](Chromosome::invert) | head < 2 |
//! | [`transpose_is`](Chromosome::transpose_is) | head < 2 |
//! | [`transpose_ris`](Chromosome::transpose_ris) | the source gene holds no function |
//! | [`transpose_gene`](Chromosome::transpose_gene) | fewer than 2 genes |
//! | [`crossover_two_point`](Chromosome::crossover_two_point) | genome shorter than 2 |
//!
//! and in every case whenever the edit happens to reproduce the parent.

use std::{iter, sync::Arc};

use rand::{
    Rng,
    seq::{IndexedRandom, index},
};

use crate::{Chromosome, Gene, SymbolId};

/// The three recombination operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CrossoverKind {
    #[display("one-point")]
    OnePoint,
    #[display("two-point")]
    TwoPoint,
    #[display("gene")]
    Gene,
}

impl CrossoverKind {
    pub const ALL: [Self; 3] = [Self::OnePoint, Self::TwoPoint, Self::Gene];
}

impl<V> Chromosome<V> {
    /// Point mutation: each locus is replaced with probability `rate` by a
    /// random symbol legal at that locus.
    pub fn mutate<R>(self: &Arc<Self>, rate: f64, rng: &mut R) -> Arc<Self>
    where
        R: Rng + ?Sized,
    {
        let spec = self.spec();
        let genes = self
            .genes()
            .iter()
            .map(|gene| {
                let mut alleles: Option<Vec<SymbolId>> = None;
                for (locus, &allele) in gene.alleles().iter().enumerate() {
                    if rng.random::<f64>() < rate {
                        let replacement = spec.random_symbol_at(locus, rng);
                        if replacement != allele {
                            alleles.get_or_insert_with(|| gene.alleles().to_vec())[locus] =
                                replacement;
                        }
                    }
                }
                match alleles {
                    Some(alleles) => Arc::new(Gene::from_valid(spec, alleles)),
                    None => Arc::clone(gene),
                }
            })
            .collect();
        self.derive(genes)
    }

    /// Reverses the head loci between two distinct random head positions
    /// (both inclusive) of one random gene.
    pub fn invert<R>(self: &Arc<Self>, rng: &mut R) -> Arc<Self>
    where
        R: Rng + ?Sized,
    {
        let head = self.spec().head();
        if head < 2 {
            return Arc::clone(self);
        }

        let target = rng.random_range(0..self.genes().len());
        let (start, stop) = distinct_ordered_pair(rng, head);

        let mut alleles = self.genes()[target].alleles().to_vec();
        alleles[start..=stop].reverse();
        self.replace_gene(target, alleles)
    }

    /// Insertion-sequence transposition.
    ///
    /// Copies a run of up to `length` loci from a random position of a random
    /// source gene into the head of a random target gene, at a random
    /// non-root offset. Head loci after the insertion shift right and those
    /// pushed past the head are dropped, so the head length is unchanged and
    /// the tail is untouched.
    pub fn transpose_is<R>(self: &Arc<Self>, length: usize, rng: &mut R) -> Arc<Self>
    where
        R: Rng + ?Sized,
    {
        let spec = self.spec();
        let head = spec.head();
        if head < 2 {
            return Arc::clone(self);
        }

        let gene_len = spec.gene_len();
        let source = &self.genes()[rng.random_range(0..self.genes().len())];
        let target = rng.random_range(0..self.genes().len());
        let start = rng.random_range(0..gene_len);
        let end = usize::min(start + length, gene_len);
        let offset = rng.random_range(1..head);

        let alleles = splice_head(
            self.genes()[target].alleles(),
            &source.alleles()[start..end],
            offset,
            head,
        );
        self.replace_gene(target, alleles)
    }

    /// Root insertion-sequence transposition.
    ///
    /// Like [`transpose_is`](Self::transpose_is), but the run must start at
    /// a function of the source gene and becomes the new root of the target
    /// gene.
    pub fn transpose_ris<R>(self: &Arc<Self>, length: usize, rng: &mut R) -> Arc<Self>
    where
        R: Rng + ?Sized,
    {
        let spec = self.spec();
        let gene_len = spec.gene_len();
        let source = &self.genes()[rng.random_range(0..self.genes().len())];
        let target = rng.random_range(0..self.genes().len());

        let function_loci = source
            .alleles()
            .iter()
            .enumerate()
            .filter(|&(_, &id)| spec.is_function(id))
            .map(|(locus, _)| locus)
            .collect::<Vec<_>>();
        let Some(&start) = function_loci.choose(rng) else {
            return Arc::clone(self);
        };
        let end = usize::min(start + length, gene_len);

        let alleles = splice_head(
            self.genes()[target].alleles(),
            &source.alleles()[start..end],
            0,
            spec.head(),
        );
        self.replace_gene(target, alleles)
    }

    /// Swaps two distinct random genes.
    pub fn transpose_gene<R>(self: &Arc<Self>, rng: &mut R) -> Arc<Self>
    where
        R: Rng + ?Sized,
    {
        let count = self.genes().len();
        if count < 2 {
            return Arc::clone(self);
        }
        let (a, b) = distinct_ordered_pair(rng, count);
        let mut genes = self.genes().to_vec();
        genes.swap(a, b);
        self.derive(genes)
    }

    /// Applies the crossover selected by `kind`.
    pub fn crossover<R>(
        self: &Arc<Self>,
        kind: CrossoverKind,
        other: &Arc<Self>,
        rng: &mut R,
    ) -> (Arc<Self>, Arc<Self>)
    where
        R: Rng + ?Sized,
    {
        match kind {
            CrossoverKind::OnePoint => self.crossover_one_point(other, rng),
            CrossoverKind::TwoPoint => self.crossover_two_point(other, rng),
            CrossoverKind::Gene => self.crossover_gene(other, rng),
        }
    }

    /// One-point crossover at a random locus of a random gene.
    ///
    /// Everything from that point to the end of the chromosome is exchanged.
    pub fn crossover_one_point<R>(
        self: &Arc<Self>,
        other: &Arc<Self>,
        rng: &mut R,
    ) -> (Arc<Self>, Arc<Self>)
    where
        R: Rng + ?Sized,
    {
        let gene_len = self.spec().gene_len();
        let gene = rng.random_range(0..self.genes().len());
        let locus = rng.random_range(0..gene_len);
        self.exchange(other, gene * gene_len + locus, self.len())
    }

    /// Two-point crossover between two distinct random loci of the
    /// flattened chromosome.
    pub fn crossover_two_point<R>(
        self: &Arc<Self>,
        other: &Arc<Self>,
        rng: &mut R,
    ) -> (Arc<Self>, Arc<Self>)
    where
        R: Rng + ?Sized,
    {
        if self.len() < 2 {
            return (Arc::clone(self), Arc::clone(other));
        }
        let (start, stop) = distinct_ordered_pair(rng, self.len());
        self.exchange(other, start, stop)
    }

    /// Exchanges one random whole gene.
    pub fn crossover_gene<R>(
        self: &Arc<Self>,
        other: &Arc<Self>,
        rng: &mut R,
    ) -> (Arc<Self>, Arc<Self>)
    where
        R: Rng + ?Sized,
    {
        let gene_len = self.spec().gene_len();
        let gene = rng.random_range(0..self.genes().len());
        self.exchange(other, gene * gene_len, (gene + 1) * gene_len)
    }

    /// Swaps the loci in `start..stop` of the flattened chromosomes.
    ///
    /// Genes entirely inside the range are exchanged as shared `Arc`s; genes
    /// cut by a range boundary are spliced at the boundary offset.
    fn exchange(
        self: &Arc<Self>,
        other: &Arc<Self>,
        start: usize,
        stop: usize,
    ) -> (Arc<Self>, Arc<Self>) {
        assert!(
            Arc::ptr_eq(self.spec(), other.spec()),
            "crossover parents must share a spec"
        );
        let spec = self.spec();
        let gene_len = spec.gene_len();

        let mut first = Vec::with_capacity(self.genes().len());
        let mut second = Vec::with_capacity(self.genes().len());
        for (index, (a, b)) in iter::zip(self.genes(), other.genes()).enumerate() {
            let gene_start = index * gene_len;
            let from = start.clamp(gene_start, gene_start + gene_len) - gene_start;
            let to = stop.clamp(gene_start, gene_start + gene_len) - gene_start;
            if from >= to {
                first.push(Arc::clone(a));
                second.push(Arc::clone(b));
            } else if from == 0 && to == gene_len {
                first.push(Arc::clone(b));
                second.push(Arc::clone(a));
            } else {
                let (x, y) = (a.alleles(), b.alleles());
                let spliced_a = [&x[..from], &y[from..to], &x[to..]].concat();
                let spliced_b = [&y[..from], &x[from..to], &y[to..]].concat();
                first.push(Arc::new(Gene::from_valid(spec, spliced_a)));
                second.push(Arc::new(Gene::from_valid(spec, spliced_b)));
            }
        }

        log::trace!(
            "crossover #{} x #{} over loci {start}..{stop}",
            self.id(),
            other.id()
        );
        (self.derive(first), other.derive(second))
    }

    fn replace_gene(self: &Arc<Self>, index: usize, alleles: Vec<SymbolId>) -> Arc<Self> {
        if self.genes()[index].alleles() == alleles.as_slice() {
            return Arc::clone(self);
        }
        let mut genes = self.genes().to_vec();
        genes[index] = Arc::new(Gene::from_valid(self.spec(), alleles));
        self.derive(genes)
    }
}

/// Inserts `insert` into the head of `target` at `offset`.
///
/// Head loci from `offset` on shift right; whatever is pushed past `head` is
/// dropped. The result has the same head length and the same tail as
/// `target`.
///
/// ```
/// # use karva_engine::splice_head;
/// let target = [10, 11, 12, 13, 90, 91];
/// assert_eq!(splice_head(&target, &[1, 2], 1, 4), [10, 1, 2, 11, 90, 91]);
/// assert_eq!(splice_head(&target, &[1, 2, 3, 4, 5], 0, 4), [1, 2, 3, 4, 90, 91]);
/// ```
#[must_use]
pub fn splice_head<T>(target: &[T], insert: &[T], offset: usize, head: usize) -> Vec<T>
where
    T: Clone,
{
    debug_assert!(offset <= head && head <= target.len());
    let mut alleles = Vec::with_capacity(target.len());
    alleles.extend_from_slice(&target[..offset]);
    alleles.extend_from_slice(insert);
    alleles.extend_from_slice(&target[offset..head]);
    alleles.truncate(head);
    alleles.extend_from_slice(&target[head..]);
    alleles
}

/// Two distinct indices below `len`, smallest first.
fn distinct_ordered_pair<R>(rng: &mut R, len: usize) -> (usize, usize)
where
    R: Rng + ?Sized,
{
    let picks = index::sample(rng, len, 2);
    let (a, b) = (picks.index(0), picks.index(1));
    (a.min(b), a.max(b))
}
