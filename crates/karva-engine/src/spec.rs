//! Validated chromosome configuration.

use std::{
    collections::HashSet,
    sync::atomic::{AtomicU64, Ordering},
};

use rand::Rng;

use crate::{ConfigError, Function, Linker, Symbol, SymbolId, Terminal};

/// Configuration shared by every chromosome of one evolutionary run.
///
/// Holds the symbol table (functions first, then terminals), the gene
/// geometry and the linker. It also owns the counter chromosome ids are
/// drawn from, so ids are unique and increasing within a run.
///
/// # Gene geometry
///
/// ```text
/// tail        = head * (max_arity - 1) + 1
/// gene_len    = head + tail
/// genome_len  = gene_len * gene_count
/// ```
///
/// `max_arity - 1` saturates at zero, so a spec without functions (or with
/// only nullary and unary ones) has a one-locus tail.
#[derive(Debug)]
pub struct ChromosomeSpec<V> {
    symbols: Vec<Symbol<V>>,
    function_count: usize,
    max_arity: usize,
    head: usize,
    tail: usize,
    gene_count: usize,
    linker: Linker<V>,
    next_id: AtomicU64,
}

impl<V> ChromosomeSpec<V> {
    /// Builds and validates a spec.
    ///
    /// Fails when `gene_count` is zero, the terminal set is empty, or two
    /// symbols share a glyph.
    pub fn new(
        functions: Vec<Function<V>>,
        terminals: Vec<Terminal<V>>,
        head: usize,
        gene_count: usize,
        linker: Linker<V>,
    ) -> Result<Self, ConfigError> {
        if gene_count == 0 {
            return Err(ConfigError::NoGenes);
        }
        if terminals.is_empty() {
            return Err(ConfigError::NoTerminals);
        }

        let mut glyphs = HashSet::new();
        for glyph in functions
            .iter()
            .map(Function::glyph)
            .chain(terminals.iter().map(Terminal::glyph))
        {
            if !glyphs.insert(glyph) {
                return Err(ConfigError::DuplicateSymbol {
                    glyph: glyph.to_owned(),
                });
            }
        }

        let max_arity = functions.iter().map(Function::arity).max().unwrap_or(0);
        let tail = head * max_arity.saturating_sub(1) + 1;
        let function_count = functions.len();
        let symbols = functions
            .into_iter()
            .map(Symbol::Function)
            .chain(terminals.into_iter().map(Symbol::Terminal))
            .collect();

        Ok(Self {
            symbols,
            function_count,
            max_arity,
            head,
            tail,
            gene_count,
            linker,
            next_id: AtomicU64::new(1),
        })
    }

    #[must_use]
    pub fn head(&self) -> usize {
        self.head
    }

    #[must_use]
    pub fn tail(&self) -> usize {
        self.tail
    }

    #[must_use]
    pub fn gene_len(&self) -> usize {
        self.head + self.tail
    }

    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.gene_count
    }

    /// Total number of loci in a chromosome.
    #[must_use]
    pub fn genome_len(&self) -> usize {
        self.gene_len() * self.gene_count
    }

    #[must_use]
    pub fn max_arity(&self) -> usize {
        self.max_arity
    }

    #[must_use]
    pub fn linker(&self) -> &Linker<V> {
        &self.linker
    }

    #[must_use]
    pub fn symbols(&self) -> &[Symbol<V>] {
        &self.symbols
    }

    /// Looks up a symbol by glyph.
    #[must_use]
    pub fn symbol_id(&self, glyph: &str) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|s| s.glyph() == glyph)
            .map(SymbolId)
    }

    /// Returns the symbol for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this spec.
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> &Symbol<V> {
        &self.symbols[id.0]
    }

    #[must_use]
    pub fn is_function(&self, id: SymbolId) -> bool {
        id.0 < self.function_count
    }

    #[must_use]
    pub fn arity(&self, id: SymbolId) -> usize {
        self.symbols[id.0].arity()
    }

    pub(crate) fn contains(&self, id: SymbolId) -> bool {
        id.0 < self.symbols.len()
    }

    /// Draws a symbol that is legal at `locus` of a gene.
    ///
    /// Head loci draw from functions and terminals, tail loci from
    /// terminals only.
    pub fn random_symbol_at<R>(&self, locus: usize, rng: &mut R) -> SymbolId
    where
        R: Rng + ?Sized,
    {
        let first = if locus < self.head {
            0
        } else {
            self.function_count
        };
        SymbolId(rng.random_range(first..self.symbols.len()))
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EvalError;

    fn binary(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args[0] + args[1])
    }

    fn ternary(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args[0] + args[1] + args[2])
    }

    fn first(values: &[f64]) -> Result<f64, EvalError> {
        Ok(values[0])
    }

    #[test]
    fn test_tail_follows_max_arity() {
        let spec = ChromosomeSpec::new(
            vec![Function::new("+", 2, binary), Function::new("T", 3, ternary)],
            vec![Terminal::attribute("x")],
            4,
            2,
            Linker::new("first", first),
        )
        .unwrap();
        assert_eq!(spec.max_arity(), 3);
        assert_eq!(spec.tail(), 9);
        assert_eq!(spec.gene_len(), 13);
        assert_eq!(spec.genome_len(), 26);
    }

    #[test]
    fn test_without_functions_tail_is_one() {
        let spec = ChromosomeSpec::<f64>::new(
            vec![],
            vec![Terminal::attribute("x")],
            3,
            1,
            Linker::new("first", first),
        )
        .unwrap();
        assert_eq!(spec.tail(), 1);
        assert_eq!(spec.gene_len(), 4);
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let err = ChromosomeSpec::new(
            vec![Function::new("+", 2, binary)],
            vec![Terminal::attribute("x")],
            2,
            0,
            Linker::new("first", first),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::NoGenes);

        let err = ChromosomeSpec::new(
            vec![Function::new("+", 2, binary)],
            vec![],
            2,
            1,
            Linker::new("first", first),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::NoTerminals);

        let err = ChromosomeSpec::new(
            vec![Function::new("x", 2, binary)],
            vec![Terminal::attribute("x")],
            2,
            1,
            Linker::new("first", first),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateSymbol {
                glyph: "x".to_owned()
            }
        );
    }

    #[test]
    fn test_ids_increase() {
        let spec = ChromosomeSpec::<f64>::new(
            vec![],
            vec![Terminal::constant("1", 1.0)],
            0,
            1,
            Linker::new("first", first),
        )
        .unwrap();
        let a = spec.next_id();
        let b = spec.next_id();
        assert!(b > a);
    }
}
