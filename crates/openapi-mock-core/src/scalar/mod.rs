//! Scalar and aggregate resolution.
//!
//! [`ScalarResolver`] is the seam between the value resolver and whatever
//! turns a concrete schema into a mock expression. The two recurse into
//! each other: a scalar resolver calls
//! [`crate::value::resolve_mock_value`] for every nested node it meets.
//!
//! [`FakerScalarResolver`] is the built-in implementation, emitting
//! `@faker-js/faker` expressions.

mod combine;
mod leaf;
mod object;

use serde_json::Value;

use crate::context::MockContext;
use crate::error::MockError;
use crate::mock::{add_import, GeneratorImport, MockDefinition, MockValue};
use crate::nullable::wrap_nullable;
use crate::schema::{CombineContext, SchemaNode, SchemaType};
use crate::value::resolve_mock_value;

/// Produces the mock for one schema node.
pub trait ScalarResolver {
    /// Resolve `item`. Implementations receive reference-shaped nodes when a
    /// reference targets another reference and must send those back through
    /// [`resolve_mock_value`].
    fn resolve_scalar(
        &self,
        item: &SchemaNode<'_>,
        combine: Option<&CombineContext>,
        context: &MockContext<'_>,
        imports: &mut Vec<GeneratorImport>,
    ) -> Result<MockDefinition, MockError>;
}

/// Default resolver producing faker expressions.
///
/// Precedence for a node: override rules, `example` (when enabled),
/// `const`, combinators, `enum`, then by declared type.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakerScalarResolver;

impl ScalarResolver for FakerScalarResolver {
    fn resolve_scalar(
        &self,
        item: &SchemaNode<'_>,
        combine: Option<&CombineContext>,
        context: &MockContext<'_>,
        imports: &mut Vec<GeneratorImport>,
    ) -> Result<MockDefinition, MockError> {
        if item.is_reference() {
            return resolve_mock_value(item, combine, context, imports);
        }

        if let Some(definition) = context.scope.resolve(item) {
            context.observer.on_override(item, &definition);
            return Ok(definition);
        }

        if context.config.use_examples {
            if let Some(example) = item.get("example") {
                return Ok(literal(item, example));
            }
        }

        if let Some(constant) = item.get("const") {
            return Ok(literal(item, constant));
        }

        if let Some(combinator) = item.combinator() {
            return combine::resolve_combined(item, combinator, combine, context, imports);
        }

        if let Some(values) = item.get("enum").and_then(Value::as_array) {
            return Ok(enum_mock(item, values, context, imports));
        }

        match item.declared_type() {
            Some(SchemaType::Array) => object::resolve_array(item, context, imports),
            Some(SchemaType::Object) => object::resolve_object(item, combine, context, imports),
            None if item.format().is_none() => object::resolve_object(item, combine, context, imports),
            schema_type => {
                let value = leaf::resolve_leaf(item, schema_type, context.config);
                Ok(MockDefinition::new(
                    wrap_nullable(value, item.nullable()),
                    item.name.as_str(),
                ))
            }
        }
    }
}

/// A JSON value emitted as a literal.
fn literal(item: &SchemaNode<'_>, value: &Value) -> MockDefinition {
    MockDefinition::new(
        wrap_nullable(MockValue::primitive(value.to_string()), item.nullable()),
        item.name.as_str(),
    )
}

/// A random member of an `enum`.
///
/// Enums reached through a reference are emitted by name, so the generated
/// code uses the declared enum and imports it.
fn enum_mock(
    item: &SchemaNode<'_>,
    values: &[Value],
    context: &MockContext<'_>,
    imports: &mut Vec<GeneratorImport>,
) -> MockDefinition {
    let mut definition = MockDefinition::new(MockValue::Null, item.name.as_str());

    let value = match item.definition_name.as_deref().filter(|_| item.is_ref) {
        Some(enum_name) => {
            let import = GeneratorImport {
                name: enum_name.to_string(),
                spec_key: Some(context.spec_key.clone()),
                values: true,
            };
            add_import(imports, import.clone());
            definition.imports.push(import);
            MockValue::primitive(format!("faker.helpers.arrayElement(Object.values({enum_name}))"))
        }
        None => {
            let members: Vec<String> = values.iter().map(Value::to_string).collect();
            MockValue::primitive(format!(
                "faker.helpers.arrayElement([{}] as const)",
                members.join(", ")
            ))
        }
    };

    definition.value = wrap_nullable(value, item.nullable());
    definition
}

/// Merge child imports into a parent definition's list.
fn absorb(target: &mut Vec<GeneratorImport>, imports: Vec<GeneratorImport>) {
    for import in imports {
        add_import(target, import);
    }
}
