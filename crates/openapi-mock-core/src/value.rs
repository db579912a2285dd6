//! Entry point of value resolution.
//!
//! [`resolve_mock_value`] decides whether a node must be dereferenced first
//! and then hands it to the context's [`crate::scalar::ScalarResolver`],
//! which recurses back here for nested properties, items and combinator
//! members.

use serde_json::Map;

use crate::context::MockContext;
use crate::error::MockError;
use crate::mock::{GeneratorImport, MockDefinition};
use crate::resolver::ref_info;
use crate::schema::{CombineContext, SchemaKind, SchemaNode};

/// Resolve `schema` to a mock definition.
///
/// References are followed: the target is fetched from the store and
/// resolved under the referencing node's name and path, so override
/// matching sees the usage site. The returned `schema_type` is the type
/// declared by the node that was finally resolved.
///
/// A missing target is not an error. It is reported to the observer and
/// mocked as an empty schema.
pub fn resolve_mock_value(
    schema: &SchemaNode<'_>,
    combine: Option<&CombineContext>,
    context: &MockContext<'_>,
    imports: &mut Vec<GeneratorImport>,
) -> Result<MockDefinition, MockError> {
    let reference = match &schema.kind {
        SchemaKind::Inline(_) => {
            let definition = context.scalar.resolve_scalar(schema, combine, context, imports)?;
            return Ok(definition.with_type(schema.declared_type()));
        }
        SchemaKind::Reference(reference) => reference,
    };

    let info = ref_info(reference, &context.spec_key);
    let spec_key = info.target_spec_key(&context.spec_key).to_string();
    let derived = context.enter_reference(info.target_key(&context.spec_key), &spec_key)?;

    let name = if schema.name.is_empty() {
        info.name.clone()
    } else {
        schema.name.clone()
    };

    // Shape is re-evaluated on the target: a reference to a reference yields
    // another reference node, which the scalar resolver sends back here.
    let target = match context.specs.deep_get(&spec_key, &info.ref_paths) {
        Some(value) => SchemaNode::from_value(value, name, schema.path.clone()),
        None => {
            context.observer.on_unresolved_reference(reference, &spec_key);
            SchemaNode::inline(Map::new(), name, schema.path.clone())
        }
    }
    .dereferenced_from(info.name.as_str());

    let mut definition = context.scalar.resolve_scalar(&target, combine, &derived, imports)?;
    if !target.is_reference() {
        definition.schema_type = target.declared_type();
    }

    context.observer.on_reference(&info, &definition);
    Ok(definition)
}
