//! Object and array mocks.

use serde_json::{Map, Value};

use crate::context::MockContext;
use crate::error::MockError;
use crate::mock::{GeneratorImport, MockDefinition, MockProperty, MockValue};
use crate::nullable::{wrap_nullable, wrap_optional};
use crate::schema::{CombineContext, SchemaNode};
use crate::schema_utils::child_override_path;
use crate::value::resolve_mock_value;

use super::absorb;

/// Resolve the `properties` of `item`, skipping names an enclosing
/// combinator already emitted.
///
/// A property outside `required` may come out `undefined`, unless the
/// configuration marks everything required or the value was overridden.
pub(super) fn resolve_properties(
    item: &SchemaNode<'_>,
    combine: Option<&CombineContext>,
    context: &MockContext<'_>,
    imports: &mut Vec<GeneratorImport>,
    definition_imports: &mut Vec<GeneratorImport>,
) -> Result<Vec<MockProperty>, MockError> {
    let Some(properties) = item.get("properties").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };

    let required = item.required_properties();
    let mut resolved = Vec::with_capacity(properties.len());

    for (key, schema) in properties {
        if combine.is_some_and(|c| c.includes(key)) {
            continue;
        }

        let child = SchemaNode::from_value(
            schema,
            key.as_str(),
            Some(child_override_path(item.path.as_deref(), key)),
        );
        let definition = resolve_mock_value(&child, None, context, imports)?;

        let is_required = context.config.required || required.contains(&key.as_str());
        let optional = !is_required && !definition.overrided;

        absorb(definition_imports, definition.imports);
        resolved.push(MockProperty {
            key: key.clone(),
            value: wrap_optional(definition.value, optional),
        });
    }

    Ok(resolved)
}

/// Resolve an object schema (or an untyped one) to an object literal.
pub(super) fn resolve_object(
    item: &SchemaNode<'_>,
    combine: Option<&CombineContext>,
    context: &MockContext<'_>,
    imports: &mut Vec<GeneratorImport>,
) -> Result<MockDefinition, MockError> {
    let mut definition_imports = Vec::new();
    let properties = resolve_properties(item, combine, context, imports, &mut definition_imports)?;

    let mut definition = MockDefinition::new(
        wrap_nullable(MockValue::object(properties), item.nullable()),
        item.name.as_str(),
    );
    definition.imports = definition_imports;
    Ok(definition)
}

/// Resolve an array schema. Items keep the array's name and get `.[]`
/// appended to its override path.
pub(super) fn resolve_array(
    item: &SchemaNode<'_>,
    context: &MockContext<'_>,
    imports: &mut Vec<GeneratorImport>,
) -> Result<MockDefinition, MockError> {
    let empty = Value::Object(Map::new());
    let items = item.get("items").unwrap_or(&empty);

    let child = SchemaNode::from_value(
        items,
        item.name.as_str(),
        Some(child_override_path(item.path.as_deref(), "[]")),
    );
    let resolved = resolve_mock_value(&child, None, context, imports)?;

    let min = item
        .get("minItems")
        .and_then(Value::as_u64)
        .unwrap_or(context.config.array_min);
    let max = item
        .get("maxItems")
        .and_then(Value::as_u64)
        .unwrap_or(context.config.array_max)
        .max(min);

    let mut definition = MockDefinition::new(
        wrap_nullable(MockValue::array(resolved.value, min, max), item.nullable()),
        item.name.as_str(),
    );
    definition.imports = resolved.imports;
    Ok(definition)
}
