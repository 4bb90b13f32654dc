//! Property tests: random genes and every variation operator keep the
//! head/tail invariant.

use std::sync::Arc;

use karva_engine::{
    Chromosome, ChromosomeSpec, CrossoverKind, EvalError, Function, Linker, Sample, Terminal,
};
use proptest::prelude::*;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

fn add(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0] + args[1])
}

fn neg(args: &[f64]) -> Result<f64, EvalError> {
    Ok(-args[0])
}

fn fold(args: &[f64]) -> Result<f64, EvalError> {
    Ok(args[0] * args[1] - args[2])
}

fn sum(values: &[f64]) -> Result<f64, EvalError> {
    Ok(values.iter().sum())
}

/// Spec with functions of arity 1..=`max_arity`.
fn spec(head: usize, gene_count: usize, max_arity: usize) -> Arc<ChromosomeSpec<f64>> {
    let functions = [
        Function::new("~", 1, neg),
        Function::new("+", 2, add),
        Function::new("F", 3, fold),
    ]
    .into_iter()
    .filter(|f| f.arity() <= max_arity)
    .collect();
    Arc::new(
        ChromosomeSpec::new(
            functions,
            vec![
                Terminal::attribute("x"),
                Terminal::constant("1", 1.0),
                Terminal::constant("2", 2.0),
            ],
            head,
            gene_count,
            Linker::new("sum", sum),
        )
        .unwrap(),
    )
}

fn assert_well_formed(c: &Chromosome<f64>) -> Result<(), TestCaseError> {
    let spec = c.spec();
    prop_assert_eq!(c.genes().len(), spec.gene_count());
    for gene in c.genes() {
        prop_assert_eq!(gene.len(), spec.gene_len());
        prop_assert!(gene.coding_len() >= 1);
        prop_assert!(gene.coding_len() <= gene.len());
        for &id in &gene.alleles()[spec.head()..] {
            prop_assert!(!spec.is_function(id));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn generated_genes_are_well_formed(
        head in 0usize..12,
        gene_count in 1usize..5,
        max_arity in 0usize..=3,
        seed in any::<u64>(),
    ) {
        let spec = spec(head, gene_count, max_arity);
        prop_assert_eq!(spec.tail(), head * spec.max_arity().saturating_sub(1) + 1);

        let mut rng = Pcg32::seed_from_u64(seed);
        for c in Chromosome::generate(&spec, &mut rng).take(20) {
            assert_well_formed(&c)?;
        }
    }

    #[test]
    fn evaluation_is_deterministic(
        head in 0usize..10,
        seed in any::<u64>(),
        x in -100.0f64..100.0,
    ) {
        let spec = spec(head, 2, 3);
        let mut rng = Pcg32::seed_from_u64(seed);
        let c = Chromosome::random(&spec, &mut rng);
        let sample = Sample::new().with("x", x);
        let first = c.evaluate(&sample);
        prop_assert!(first.is_ok());
        prop_assert_eq!(first, c.evaluate(&sample));
    }

    #[test]
    fn operators_preserve_structure(
        head in 0usize..10,
        gene_count in 1usize..4,
        length in 1usize..6,
        seed in any::<u64>(),
    ) {
        let spec = spec(head, gene_count, 3);
        let mut rng = Pcg32::seed_from_u64(seed);
        let a = Arc::new(Chromosome::random(&spec, &mut rng));
        let b = Arc::new(Chromosome::random(&spec, &mut rng));

        assert_well_formed(&a.mutate(0.5, &mut rng))?;
        assert_well_formed(&a.invert(&mut rng))?;
        assert_well_formed(&a.transpose_is(length, &mut rng))?;
        assert_well_formed(&a.transpose_ris(length, &mut rng))?;
        assert_well_formed(&a.transpose_gene(&mut rng))?;
        for kind in CrossoverKind::ALL {
            let (c, d) = a.crossover(kind, &b, &mut rng);
            assert_well_formed(&c)?;
            assert_well_formed(&d)?;
        }
    }

    #[test]
    fn gene_transposition_swaps_distinct_genes(
        head in 1usize..8,
        seed in any::<u64>(),
    ) {
        let spec = spec(head, 2, 2);
        let mut rng = Pcg32::seed_from_u64(seed);
        let c = Arc::new(Chromosome::random(&spec, &mut rng));
        let t = c.transpose_gene(&mut rng);
        if c.genes()[0].alleles() == c.genes()[1].alleles() {
            prop_assert!(Arc::ptr_eq(&c, &t));
        } else {
            prop_assert!(!Arc::ptr_eq(&c, &t));
            prop_assert_eq!(t.genes()[0].alleles(), c.genes()[1].alleles());
            prop_assert_eq!(t.genes()[1].alleles(), c.genes()[0].alleles());
        }
    }
}
