//! Gene symbols: functions (nonterminals), terminals and linkers.

use std::fmt;

use crate::EvalError;

/// Implementation of a function symbol.
///
/// Receives exactly `arity` resolved argument values.
pub type FunctionOp<V> = fn(&[V]) -> Result<V, EvalError>;

/// Combines the per-gene values of a chromosome into one value.
pub type LinkerOp<V> = fn(&[V]) -> Result<V, EvalError>;

/// A nonterminal symbol with a fixed arity.
#[derive(Debug, Clone)]
pub struct Function<V> {
    glyph: String,
    arity: usize,
    op: FunctionOp<V>,
}

impl<V> Function<V> {
    #[must_use]
    pub fn new(glyph: impl Into<String>, arity: usize, op: FunctionOp<V>) -> Self {
        Self {
            glyph: glyph.into(),
            arity,
            op,
        }
    }

    #[must_use]
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Applies the function to its resolved arguments.
    pub fn apply(&self, args: &[V]) -> Result<V, EvalError> {
        debug_assert_eq!(args.len(), self.arity);
        (self.op)(args)
    }
}

/// What a terminal resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalKind<V> {
    /// A literal value.
    Constant(V),
    /// A named attribute read from the evaluation input.
    Attribute(String),
}

/// A leaf symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal<V> {
    glyph: String,
    kind: TerminalKind<V>,
}

impl<V> Terminal<V> {
    #[must_use]
    pub fn constant(glyph: impl Into<String>, value: V) -> Self {
        Self {
            glyph: glyph.into(),
            kind: TerminalKind::Constant(value),
        }
    }

    /// Creates a terminal reading attribute `name`; its glyph is the name.
    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            glyph: name.clone(),
            kind: TerminalKind::Attribute(name),
        }
    }

    #[must_use]
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    #[must_use]
    pub fn kind(&self) -> &TerminalKind<V> {
        &self.kind
    }
}

/// Any symbol that may occupy a gene locus.
#[derive(Debug, Clone, derive_more::IsVariant)]
pub enum Symbol<V> {
    Function(Function<V>),
    Terminal(Terminal<V>),
}

impl<V> Symbol<V> {
    #[must_use]
    pub fn glyph(&self) -> &str {
        match self {
            Symbol::Function(function) => function.glyph(),
            Symbol::Terminal(terminal) => terminal.glyph(),
        }
    }

    /// Number of arguments the symbol consumes; zero for terminals.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Symbol::Function(function) => function.arity(),
            Symbol::Terminal(_) => 0,
        }
    }
}

/// Index of a symbol in the symbol table of a [`ChromosomeSpec`](crate::ChromosomeSpec).
///
/// Functions come first, then terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Named combiner of gene results.
#[derive(Debug, Clone)]
pub struct Linker<V> {
    name: String,
    op: LinkerOp<V>,
}

impl<V> Linker<V> {
    #[must_use]
    pub fn new(name: impl Into<String>, op: LinkerOp<V>) -> Self {
        Self {
            name: name.into(),
            op,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&self, values: &[V]) -> Result<V, EvalError> {
        (self.op)(values)
    }
}

/// Writes a glyph, bracketing it when it is not a single character.
pub(crate) fn write_glyph(f: &mut fmt::Formatter<'_>, glyph: &str) -> fmt::Result {
    if glyph.chars().count() == 1 {
        f.write_str(glyph)
    } else {
        write!(f, "{{{glyph}}}")
    }
}
