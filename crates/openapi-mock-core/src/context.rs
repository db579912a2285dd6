//! Loaded documents and the per-call resolution context.

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::MockConfig;
use crate::error::MockError;
use crate::observer::{ResolveObserver, TracingObserver};
use crate::overrides::OperationScope;
use crate::scalar::{FakerScalarResolver, ScalarResolver};
use crate::schema_utils::deep_get;

/// Specification documents keyed by spec key. Read-only during resolution.
#[derive(Debug, Clone, Default)]
pub struct SpecStore {
    documents: IndexMap<String, Value>,
}

impl SpecStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a single document.
    pub fn single(spec_key: impl Into<String>, document: Value) -> Self {
        let mut store = Self::new();
        store.insert(spec_key, document);
        store
    }

    pub fn insert(&mut self, spec_key: impl Into<String>, document: Value) {
        self.documents.insert(spec_key.into(), document);
    }

    pub fn get(&self, spec_key: &str) -> Option<&Value> {
        self.documents.get(spec_key)
    }

    pub fn contains(&self, spec_key: &str) -> bool {
        self.documents.contains_key(spec_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// The node at `segments` inside document `spec_key`.
    pub fn deep_get<S: AsRef<str>>(&self, spec_key: &str, segments: &[S]) -> Option<&Value> {
        deep_get(self.get(spec_key)?, segments)
    }
}

static DEFAULT_SCALAR: FakerScalarResolver = FakerScalarResolver;
static DEFAULT_OBSERVER: TracingObserver = TracingObserver;

/// Everything a resolution call needs besides the node itself.
///
/// A context is never mutated once built. Following a reference derives a
/// new context (different document, longer reference chain) for the
/// recursive calls below it.
#[derive(Clone)]
pub struct MockContext<'a> {
    /// Document the nodes being resolved belong to.
    pub spec_key: String,
    pub specs: &'a SpecStore,
    pub config: &'a MockConfig,
    pub scope: &'a OperationScope<'a>,
    pub scalar: &'a dyn ScalarResolver,
    pub observer: &'a dyn ResolveObserver,
    reference_chain: Vec<String>,
}

impl<'a> MockContext<'a> {
    /// Context using the built-in scalar resolver and tracing observer.
    pub fn new(
        spec_key: impl Into<String>,
        specs: &'a SpecStore,
        config: &'a MockConfig,
        scope: &'a OperationScope<'a>,
    ) -> Self {
        Self {
            spec_key: spec_key.into(),
            specs,
            config,
            scope,
            scalar: &DEFAULT_SCALAR,
            observer: &DEFAULT_OBSERVER,
            reference_chain: Vec::new(),
        }
    }

    pub fn with_scalar(mut self, scalar: &'a dyn ScalarResolver) -> Self {
        self.scalar = scalar;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn ResolveObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Targets currently being dereferenced on this branch, outermost first.
    pub fn reference_chain(&self) -> &[String] {
        &self.reference_chain
    }

    /// Derive the context for resolving the target `target_key` inside
    /// document `spec_key`.
    ///
    /// Fails with [`MockError::CyclicSchema`] when the target is already
    /// being resolved further up this branch.
    pub fn enter_reference(&self, target_key: String, spec_key: &str) -> Result<Self, MockError> {
        if self.reference_chain.contains(&target_key) {
            let mut chain = self.reference_chain.clone();
            chain.push(target_key.clone());
            return Err(MockError::CyclicSchema {
                reference: target_key,
                chain,
            });
        }

        let mut derived = self.clone();
        derived.spec_key = spec_key.to_string();
        derived.reference_chain.push(target_key);
        Ok(derived)
    }
}
