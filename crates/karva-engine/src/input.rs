//! Inputs that expressions are evaluated against.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

/// Identity of an input, used to memoize gene evaluation.
///
/// Two inputs reporting the same key must expose the same attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct InputKey(pub u64);

/// Something attribute terminals can be resolved against.
pub trait Input<V> {
    /// Stable identity of this input.
    fn key(&self) -> InputKey;

    /// Value of the attribute `name`, if the input has one.
    fn attribute(&self, name: &str) -> Option<V>;
}

static NEXT_SAMPLE_KEY: AtomicU64 = AtomicU64::new(0);

/// Map-backed [`Input`] with a process-unique key.
///
/// # Example
///
/// ```
/// use karva_engine::{Input, Sample};
///
/// let sample = Sample::new().with("x", 3.0).with("y", -1.0);
/// assert_eq!(sample.attribute("x"), Some(3.0));
/// assert_eq!(sample.attribute("z"), None);
/// assert_ne!(sample.key(), Sample::<f64>::new().key());
/// ```
#[derive(Debug, Clone)]
pub struct Sample<V> {
    key: InputKey,
    attributes: HashMap<String, V>,
}

impl<V> Default for Sample<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Sample<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: InputKey(NEXT_SAMPLE_KEY.fetch_add(1, Ordering::Relaxed)),
            attributes: HashMap::new(),
        }
    }

    /// Adds (or replaces) an attribute.
    ///
    /// Only use this while building the sample; memoized results are keyed
    /// by the sample, not by its attribute values.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: V) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

impl<V> Input<V> for Sample<V>
where
    V: Clone,
{
    fn key(&self) -> InputKey {
        self.key
    }

    fn attribute(&self, name: &str) -> Option<V> {
        self.attributes.get(name).cloned()
    }
}
