//! Karva gene codec.
//!
//! A gene is a linear, breadth-first encoding of an expression tree. Reading
//! left to right, the root comes first, then all of its arguments, then all
//! arguments of those, and so on:
//!
//! ```text
//! loci:    0  1  2  3  4
//! gene:    +  *  y  3  4          head = 2, tail = 3
//!
//!          +
//!         / \
//!        *   y        = (3 * 4) + y
//!       / \
//!      3   4
//! ```
//!
//! Only a prefix of the gene (the *coding region*) takes part in the tree.
//! The remaining loci are inert material that variation operators can move
//! into the coding region later.

use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, PoisonError},
};

use rand::Rng;

use crate::{
    ChromosomeSpec, ConfigError, EvalError, Input, InputKey, Symbol, SymbolId, TerminalKind,
    symbol::write_glyph,
};

/// One gene: a fixed-length sequence of symbols with a head and a tail.
///
/// Genes are immutable. Evaluation results are memoized per input key.
pub struct Gene<V> {
    alleles: Vec<SymbolId>,
    coding_len: usize,
    memo: Mutex<HashMap<InputKey, Result<V, EvalError>>>,
}

impl<V> fmt::Debug for Gene<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gene")
            .field("alleles", &self.alleles)
            .field("coding_len", &self.coding_len)
            .finish_non_exhaustive()
    }
}

impl<V> Gene<V> {
    /// Builds a gene from explicit symbols, checking the head/tail invariant.
    ///
    /// # Example
    ///
    /// ```
    /// # use karva_engine::{ChromosomeSpec, EvalError, Function, Gene, Linker, Terminal};
    /// # fn mul(a: &[f64]) -> Result<f64, EvalError> { Ok(a[0] * a[1]) }
    /// # fn first(v: &[f64]) -> Result<f64, EvalError> { Ok(v[0]) }
    /// let spec = ChromosomeSpec::new(
    ///     vec![Function::new("*", 2, mul)],
    ///     vec![Terminal::attribute("a"), Terminal::constant("2", 2.0)],
    ///     1,
    ///     1,
    ///     Linker::new("first", first),
    /// )
    /// .unwrap();
    /// let ids = ["*", "a", "2"].map(|g| spec.symbol_id(g).unwrap());
    /// let gene = Gene::new(&spec, ids.to_vec()).unwrap();
    /// assert_eq!(gene.coding_len(), 3);
    ///
    /// // a function in the tail is rejected
    /// let ids = ["a", "*", "2"].map(|g| spec.symbol_id(g).unwrap());
    /// assert!(Gene::new(&spec, ids.to_vec()).is_err());
    /// ```
    pub fn new(spec: &ChromosomeSpec<V>, alleles: Vec<SymbolId>) -> Result<Self, ConfigError> {
        if alleles.len() != spec.gene_len() {
            return Err(ConfigError::GeneLength {
                expected: spec.gene_len(),
                actual: alleles.len(),
            });
        }
        for (locus, &id) in alleles.iter().enumerate() {
            if !spec.contains(id) {
                return Err(ConfigError::UnknownSymbol { locus, id: id.0 });
            }
            if locus >= spec.head() && spec.is_function(id) {
                return Err(ConfigError::FunctionInTail {
                    locus,
                    glyph: spec.symbol(id).glyph().to_owned(),
                });
            }
        }
        Ok(Self::from_valid(spec, alleles))
    }

    /// Builds a gene from symbols already known to respect the head/tail
    /// invariant.
    pub(crate) fn from_valid(spec: &ChromosomeSpec<V>, alleles: Vec<SymbolId>) -> Self {
        debug_assert_eq!(alleles.len(), spec.gene_len());
        debug_assert!(
            alleles[spec.head()..]
                .iter()
                .all(|&id| !spec.is_function(id))
        );
        let coding_len = coding_len(spec, &alleles);
        Self {
            alleles,
            coding_len,
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Draws a random gene: head loci from all symbols, tail loci from
    /// terminals.
    pub fn random<R>(spec: &ChromosomeSpec<V>, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let alleles = (0..spec.gene_len())
            .map(|locus| spec.random_symbol_at(locus, rng))
            .collect();
        Self::from_valid(spec, alleles)
    }

    #[must_use]
    pub fn alleles(&self) -> &[SymbolId] {
        &self.alleles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    /// Number of loci forming the expression tree.
    #[must_use]
    pub fn coding_len(&self) -> usize {
        self.coding_len
    }

    /// Last locus of the coding region.
    #[must_use]
    pub fn coding_end(&self) -> usize {
        self.coding_len - 1
    }

    /// Returns a value that renders the gene's glyphs.
    #[must_use]
    pub fn display<'a>(&'a self, spec: &'a ChromosomeSpec<V>) -> GeneDisplay<'a, V> {
        GeneDisplay { gene: self, spec }
    }
}

impl<V> Gene<V>
where
    V: Clone,
{
    /// Evaluates the gene's expression tree against `input`.
    ///
    /// `spec` must be the spec the gene was built with. The result (including
    /// an error) is memoized under the input's key.
    pub fn evaluate<I>(&self, spec: &ChromosomeSpec<V>, input: &I) -> Result<V, EvalError>
    where
        I: Input<V> + ?Sized,
    {
        let key = input.key();
        if let Some(result) = self
            .memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return result.clone();
        }

        let result = self.evaluate_uncached(spec, input);
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, result.clone());
        result
    }

    fn evaluate_uncached<I>(&self, spec: &ChromosomeSpec<V>, input: &I) -> Result<V, EvalError>
    where
        I: Input<V> + ?Sized,
    {
        let coding = &self.alleles[..self.coding_len];

        let mut values = coding
            .iter()
            .map(|&id| match spec.symbol(id) {
                Symbol::Function(_) => Ok(None),
                Symbol::Terminal(terminal) => match terminal.kind() {
                    TerminalKind::Constant(value) => Ok(Some(value.clone())),
                    TerminalKind::Attribute(name) => input
                        .attribute(name)
                        .map(Some)
                        .ok_or_else(|| EvalError::MissingAttribute { name: name.clone() }),
                },
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Arguments of the function at `locus` always sit right below the
        // high-water mark, because deeper levels were resolved first.
        let mut high_water = self.coding_len;
        for locus in (0..self.coding_len).rev() {
            let Symbol::Function(function) = spec.symbol(coding[locus]) else {
                continue;
            };
            let arity = function.arity();
            let args = values[high_water - arity..high_water]
                .iter_mut()
                .map(Option::take)
                .collect::<Option<Vec<_>>>()
                .ok_or(EvalError::Unresolved { locus })?;
            values[locus] = Some(function.apply(&args)?);
            high_water -= arity;
        }

        values[0].take().ok_or(EvalError::Unresolved { locus: 0 })
    }
}

/// Length of the coding region, by breadth-first arity accounting.
///
/// Starting from the root, each level of the tree needs as many loci as the
/// arities of the level above add up to. The coding region ends where a level
/// needs none.
pub fn coding_len<V>(spec: &ChromosomeSpec<V>, alleles: &[SymbolId]) -> usize {
    let mut index = 0;
    let mut required = 1;
    while required > 0 {
        let mut next_required = 0;
        for &id in &alleles[index..index + required] {
            next_required += spec.arity(id);
        }
        index += required;
        required = next_required;
    }
    index
}

/// Renders a gene as its concatenated glyphs.
#[derive(Debug)]
pub struct GeneDisplay<'a, V> {
    gene: &'a Gene<V>,
    spec: &'a ChromosomeSpec<V>,
}

impl<V> fmt::Display for GeneDisplay<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &id in &self.gene.alleles {
            write_glyph(f, self.spec.symbol(id).glyph())?;
        }
        Ok(())
    }
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

    fn mul(args: &[f64]) -> Result<f64, EvalError> {
        Ok(args[0] * args[1])
    }

    fn div(args: &[f64]) -> Result<f64, EvalError> {
        if args[1] == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        Ok(args[0] / args[1])
    }

    fn first(values: &[f64]) -> Result<f64, EvalError> {
        Ok(values[0])
    }

    fn spec(head: usize) -> ChromosomeSpec<f64> {
        ChromosomeSpec::new(
            vec![
                Function::new("+", 2, add),
                Function::new("*", 2, mul),
                Function::new("/", 2, div),
            ],
            vec![
                Terminal::attribute("y"),
                Terminal::constant("0", 0.0),
                Terminal::constant("3", 3.0),
                Terminal::constant("4", 4.0),
            ],
            head,
            1,
            Linker::new("first", first),
        )
        .unwrap()
    }

    fn gene(spec: &ChromosomeSpec<f64>, glyphs: &[&str]) -> Gene<f64> {
        let ids = glyphs.iter().map(|g| spec.symbol_id(g).unwrap()).collect();
        Gene::new(spec, ids).unwrap()
    }

    #[test]
    fn test_coding_len_two_level_tree() {
        // `+` needs loci 1 and 2; `*` at locus 1 needs loci 3 and 4;
        // `y` needs nothing.
        let spec = spec(2);
        let gene = gene(&spec, &["+", "*", "y", "3", "4"]);
        assert_eq!(gene.coding_len(), 5);
        assert_eq!(gene.coding_end(), 4);
    }

    #[test]
    fn test_coding_len_all_terminal() {
        let spec = spec(2);
        let gene = gene(&spec, &["y", "3", "4", "4", "3"]);
        assert_eq!(gene.coding_len(), 1);
    }

    #[test]
    fn test_coding_len_leaves_non_coding_tail() {
        let spec = spec(3);
        let gene = gene(&spec, &["+", "3", "4", "y", "y", "4", "3"]);
        assert_eq!(gene.coding_len(), 3);
        assert_eq!(gene.len(), 7);
    }

    #[test]
    fn test_evaluate_bottom_up() {
        let spec = spec(2);
        let gene = gene(&spec, &["+", "*", "y", "3", "4"]);
        let sample = Sample::new().with("y", 5.0);
        assert_eq!(gene.evaluate(&spec, &sample), Ok(17.0));
    }

    #[test]
    fn test_evaluate_non_commutative_argument_order() {
        let spec = spec(1);
        let gene = gene(&spec, &["/", "3", "4"]);
        let sample = Sample::new();
        assert_eq!(gene.evaluate(&spec, &sample), Ok(0.75));
    }

    #[test]
    fn test_evaluate_is_deterministic_and_memoized() {
        let spec = spec(4);
        let mut rng = Pcg32::seed_from_u64(11);
        let sample = Sample::new().with("y", 2.5);
        for _ in 0..50 {
            let gene = Gene::random(&spec, &mut rng);
            let first = gene.evaluate(&spec, &sample);
            let second = gene.evaluate(&spec, &sample);
            assert_eq!(first, second);
            assert_eq!(first, gene.evaluate_uncached(&spec, &sample));
        }
    }

    #[test]
    fn test_evaluate_propagates_function_errors() {
        let spec = spec(1);
        let gene = gene(&spec, &["/", "3", "0"]);
        assert_eq!(
            gene.evaluate(&spec, &Sample::new()),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_evaluate_missing_attribute() {
        let spec = spec(1);
        let gene = gene(&spec, &["+", "y", "3"]);
        assert_eq!(
            gene.evaluate(&spec, &Sample::new().with("x", 1.0)),
            Err(EvalError::MissingAttribute {
                name: "y".to_owned()
            })
        );
    }

    #[test]
    fn test_non_coding_loci_are_not_evaluated() {
        // `y` sits outside the coding region, so a missing attribute there
        // does not matter.
        let spec = spec(2);
        let gene = gene(&spec, &["3", "+", "y", "y", "y"]);
        assert_eq!(gene.evaluate(&spec, &Sample::new()), Ok(3.0));
    }

    #[test]
    fn test_rejects_invalid_genes() {
        let spec = spec(1);
        let ids = ["+", "3"].map(|g| spec.symbol_id(g).unwrap()).to_vec();
        assert_eq!(
            Gene::new(&spec, ids).unwrap_err(),
            ConfigError::GeneLength {
                expected: 3,
                actual: 2
            }
        );
        let ids = ["3", "+", "4"].map(|g| spec.symbol_id(g).unwrap()).to_vec();
        assert!(matches!(
            Gene::new(&spec, ids),
            Err(ConfigError::FunctionInTail { locus: 1, .. })
        ));
    }

    #[test]
    fn test_display_brackets_long_glyphs() {
        let spec = ChromosomeSpec::new(
            vec![Function::new("add", 2, add)],
            vec![Terminal::attribute("x"), Terminal::constant("1", 1.0)],
            1,
            1,
            Linker::new("first", first),
        )
        .unwrap();
        let gene = gene(&spec, &["add", "x", "1"]);
        assert_eq!(gene.display(&spec).to_string(), "{add}x1");
    }
}
