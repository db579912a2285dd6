//! `allOf` / `oneOf` / `anyOf` mocks.

use crate::context::MockContext;
use crate::error::MockError;
use crate::mock::{GeneratorImport, MockDefinition, MockProperty, MockValue};
use crate::nullable::wrap_nullable;
use crate::schema::{CombineContext, Combinator, SchemaNode};
use crate::value::resolve_mock_value;

use super::absorb;
use super::object::resolve_properties;

/// Resolve a node carrying `combinator`.
///
/// Properties declared next to the combinator are emitted first and count
/// as already included for every member.
pub(super) fn resolve_combined(
    item: &SchemaNode<'_>,
    combinator: Combinator,
    combine: Option<&CombineContext>,
    context: &MockContext<'_>,
    imports: &mut Vec<GeneratorImport>,
) -> Result<MockDefinition, MockError> {
    let mut state = CombineContext {
        separator: combinator,
        included_properties: combine
            .map(|c| c.included_properties.clone())
            .unwrap_or_default(),
    };

    let mut definition_imports = Vec::new();
    let own = resolve_properties(item, Some(&state), context, imports, &mut definition_imports)?;
    state
        .included_properties
        .extend(own.iter().map(|p| p.key.clone()));

    let members = item.members(combinator).map(Vec::as_slice).unwrap_or_default();

    let value = match combinator {
        Combinator::AllOf => {
            let mut merged = own;
            let mut scalar = None;

            for member in members {
                let node = SchemaNode::from_value(member, item.name.as_str(), item.path.clone());
                let resolved = resolve_mock_value(&node, Some(&state), context, imports)?;
                absorb(&mut definition_imports, resolved.imports);

                match object_properties(resolved.value) {
                    Ok(properties) => {
                        for property in properties {
                            if !state.includes(&property.key) {
                                state.included_properties.push(property.key.clone());
                                merged.push(property);
                            }
                        }
                    }
                    Err(other) => scalar = Some(other),
                }
            }

            match scalar {
                Some(value) if merged.is_empty() => value,
                _ => MockValue::object(merged),
            }
        }
        Combinator::OneOf | Combinator::AnyOf => {
            let mut variants = Vec::with_capacity(members.len());

            for member in members {
                let node = SchemaNode::from_value(member, item.name.as_str(), item.path.clone());
                let resolved = resolve_mock_value(&node, Some(&state), context, imports)?;
                absorb(&mut definition_imports, resolved.imports);
                variants.push(with_own_properties(&own, resolved.value));
            }

            match variants.len() {
                0 => MockValue::object(own),
                1 => variants.remove(0),
                _ => MockValue::one_of(variants),
            }
        }
    };

    let mut definition = MockDefinition::new(wrap_nullable(value, item.nullable()), item.name.as_str());
    definition.imports = definition_imports;
    Ok(definition)
}

/// The properties of an object member, seen through nullable wrapping.
/// Anything else is handed back unchanged.
fn object_properties(value: MockValue) -> Result<Vec<MockProperty>, MockValue> {
    match value {
        MockValue::Object { properties } => Ok(properties),
        MockValue::OneOf { mut values }
            if values.len() == 2
                && matches!(values[0], MockValue::Object { .. })
                && values[1] == MockValue::Null =>
        {
            match values.swap_remove(0) {
                MockValue::Object { properties } => Ok(properties),
                other => Err(other),
            }
        }
        other => Err(other),
    }
}

/// Prefix an object variant with the properties declared beside the
/// combinator. Non-object variants are returned unchanged.
fn with_own_properties(own: &[MockProperty], variant: MockValue) -> MockValue {
    match variant {
        MockValue::Object { properties } if !own.is_empty() => {
            let mut merged = own.to_vec();
            merged.extend(properties);
            MockValue::object(merged)
        }
        other => other,
    }
}
