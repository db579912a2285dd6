//! Observability hook for the resolution pipeline.
//!
//! Resolution itself stays free of side effects; anything a caller wants to
//! see about intermediate results goes through a [`ResolveObserver`] carried
//! on the context.

use crate::mock::MockDefinition;
use crate::resolver::RefInfo;
use crate::schema::SchemaNode;

/// Callbacks fired during resolution. Every hook defaults to a no-op.
pub trait ResolveObserver {
    /// A reference was dereferenced and its target resolved.
    fn on_reference(&self, _info: &RefInfo, _definition: &MockDefinition) {}

    /// A reference target was missing from its document.
    fn on_unresolved_reference(&self, _reference: &str, _spec_key: &str) {}

    /// An override rule replaced normal generation for `node`.
    fn on_override(&self, _node: &SchemaNode<'_>, _definition: &MockDefinition) {}
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ResolveObserver for NoopObserver {}

/// Forwards hooks to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResolveObserver for TracingObserver {
    fn on_reference(&self, info: &RefInfo, definition: &MockDefinition) {
        tracing::debug!(
            name = %info.name,
            spec_key = ?info.spec_key,
            ref_paths = ?info.ref_paths,
            value = %definition.value,
            "resolved reference"
        );
    }

    fn on_unresolved_reference(&self, reference: &str, spec_key: &str) {
        tracing::warn!(reference, spec_key, "reference target not found; mocking as empty schema");
    }

    fn on_override(&self, node: &SchemaNode<'_>, definition: &MockDefinition) {
        tracing::debug!(
            name = %node.name,
            path = ?node.path,
            value = %definition.value,
            "override applied"
        );
    }
}
