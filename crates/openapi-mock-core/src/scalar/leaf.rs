//! Primitive faker expressions.

use serde_json::Value;

use crate::config::MockConfig;
use crate::mock::MockValue;
use crate::schema::{SchemaNode, SchemaType};

/// Expression for a known string `format`.
fn format_expression(format: &str) -> Option<&'static str> {
    let expression = match format {
        "date-time" => "`${faker.date.past().toISOString().split('.')[0]}Z`",
        "date" => "faker.date.past().toISOString().split('T')[0]",
        "time" => "faker.date.past().toISOString().split('T')[1].split('.')[0]",
        "email" => "faker.internet.email()",
        "uuid" => "faker.string.uuid()",
        "uri" | "url" => "faker.internet.url()",
        "hostname" => "faker.internet.domainName()",
        "ipv4" => "faker.internet.ipv4()",
        "ipv6" => "faker.internet.ipv6()",
        "password" => "faker.internet.password()",
        "byte" => "faker.string.alphanumeric(16)",
        "binary" => "new Blob(faker.helpers.arrayElements(faker.word.words(10).split(' ')))",
        "int32" | "int64" => "faker.number.int()",
        "float" | "double" => "faker.number.float()",
        _ => return None,
    };
    Some(expression)
}

/// Render `{ min: a, max: b }` from whichever bounds are present.
fn bounds(item: &SchemaNode<'_>, min_key: &str, max_key: &str) -> Option<String> {
    let fields: Vec<String> = [("min", min_key), ("max", max_key)]
        .into_iter()
        .filter_map(|(label, key)| {
            item.get(key)
                .filter(|v| v.is_number())
                .map(|v| format!("{label}: {v}"))
        })
        .collect();

    (!fields.is_empty()).then(|| format!("{{ {} }}", fields.join(", ")))
}

/// Quote a regex source as a JS string literal.
fn js_string(raw: &str) -> String {
    Value::String(raw.to_string()).to_string()
}

/// Resolve a primitive node. Configured format overrides win over the
/// built-in format table, which wins over the type table.
pub(super) fn resolve_leaf(
    item: &SchemaNode<'_>,
    schema_type: Option<SchemaType>,
    config: &MockConfig,
) -> MockValue {
    if let Some(format) = item.format() {
        if let Some(expression) = config.format.get(format) {
            return MockValue::primitive(expression.as_str());
        }
        if let Some(expression) = format_expression(format) {
            if matches!(schema_type, None | Some(SchemaType::String)) {
                return MockValue::primitive(expression);
            }
        }
    }

    match schema_type {
        Some(SchemaType::Integer) => match bounds(item, "minimum", "maximum") {
            Some(range) => MockValue::primitive(format!("faker.number.int({range})")),
            None => MockValue::primitive("faker.number.int()"),
        },
        Some(SchemaType::Number) => match bounds(item, "minimum", "maximum") {
            Some(range) => MockValue::primitive(format!("faker.number.float({range})")),
            None => MockValue::primitive("faker.number.float()"),
        },
        Some(SchemaType::Boolean) => MockValue::primitive("faker.datatype.boolean()"),
        Some(SchemaType::Null) => MockValue::Null,
        _ => string_value(item),
    }
}

fn string_value(item: &SchemaNode<'_>) -> MockValue {
    if let Some(pattern) = item.get("pattern").and_then(Value::as_str) {
        return MockValue::primitive(format!("faker.helpers.fromRegExp({})", js_string(pattern)));
    }

    match bounds(item, "minLength", "maxLength") {
        Some(range) => MockValue::primitive(format!("faker.string.alpha({{ length: {range} }})")),
        None => MockValue::primitive("faker.word.sample()"),
    }
}
