//! Mock value descriptions and their rendering to faker source text.

use std::fmt::{self, Display, Write as _};

use serde::{Deserialize, Serialize};

use crate::schema::SchemaType;

/// An expression that evaluates to a fake value.
///
/// Wrappers such as nullability are built by composing variants, never by
/// splicing strings, so quoting stays in one place: [`Display`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MockValue {
    /// Expression text emitted verbatim.
    Primitive { value: String },
    Null,
    Undefined,
    /// A random pick among the alternatives.
    OneOf { values: Vec<MockValue> },
    Object { properties: Vec<MockProperty> },
    Array {
        item: Box<MockValue>,
        min: u64,
        max: u64,
    },
}

/// A single key of an object mock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockProperty {
    pub key: String,
    pub value: MockValue,
}

impl MockValue {
    pub fn primitive(value: impl Into<String>) -> Self {
        Self::Primitive {
            value: value.into(),
        }
    }

    pub fn one_of(values: Vec<MockValue>) -> Self {
        Self::OneOf { values }
    }

    pub fn object(properties: Vec<MockProperty>) -> Self {
        Self::Object { properties }
    }

    pub fn array(item: MockValue, min: u64, max: u64) -> Self {
        Self::Array {
            item: Box::new(item),
            min,
            max,
        }
    }

    /// Render to source text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for MockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { value } => f.write_str(value),
            Self::Null => f.write_str("null"),
            Self::Undefined => f.write_str("undefined"),
            Self::OneOf { values } => {
                f.write_str("faker.helpers.arrayElement([")?;
                write_separated(f, values)?;
                f.write_str("])")
            }
            Self::Object { properties } => {
                f.write_char('{')?;
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_key(f, &property.key)?;
                    write!(f, ": {}", property.value)?;
                }
                f.write_char('}')
            }
            Self::Array { item, min, max } => write!(
                f,
                "Array.from({{ length: faker.number.int({{ min: {min}, max: {max} }}) }}, (_, i) => i + 1).map(() => ({item}))"
            ),
        }
    }
}

fn write_separated(f: &mut fmt::Formatter<'_>, values: &[MockValue]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

/// Object keys that are not plain identifiers are single-quoted.
fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if is_identifier {
        return f.write_str(key);
    }

    f.write_char('\'')?;
    for c in key.chars() {
        if c == '\'' || c == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('\'')
}

/// An identifier the generated expression needs in scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorImport {
    pub name: String,
    /// Document that declares the identifier, when it is not the root one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_key: Option<String>,
    /// Imported as a runtime value rather than a type.
    #[serde(default)]
    pub values: bool,
}

/// Append `import` unless an identical entry is already present.
pub fn add_import(imports: &mut Vec<GeneratorImport>, import: GeneratorImport) {
    if !imports.contains(&import) {
        imports.push(import);
    }
}

/// The resolved mock for one schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockDefinition {
    pub value: MockValue,
    /// Identifiers `value` refers to. Empty for self-contained values.
    pub imports: Vec<GeneratorImport>,
    pub name: String,
    /// Produced by a user override rather than by generation.
    pub overrided: bool,
    /// Declared type of the resolved (post-dereference) node.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
}

impl MockDefinition {
    pub fn new(value: MockValue, name: impl Into<String>) -> Self {
        Self {
            value,
            imports: Vec::new(),
            name: name.into(),
            overrided: false,
            schema_type: None,
        }
    }

    pub fn with_type(mut self, schema_type: Option<SchemaType>) -> Self {
        self.schema_type = schema_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_nested_object() {
        let value = MockValue::object(vec![
            MockProperty {
                key: "id".into(),
                value: MockValue::primitive("42"),
            },
            MockProperty {
                key: "x-trace".into(),
                value: MockValue::one_of(vec![MockValue::primitive("faker.string.uuid()"), MockValue::Null]),
            },
        ]);

        assert_eq!(
            value.render(),
            "{id: 42, 'x-trace': faker.helpers.arrayElement([faker.string.uuid(), null])}"
        );
    }

    #[test]
    fn test_render_array() {
        let value = MockValue::array(MockValue::primitive("faker.word.sample()"), 1, 3);
        assert_eq!(
            value.render(),
            "Array.from({ length: faker.number.int({ min: 1, max: 3 }) }, (_, i) => i + 1).map(() => (faker.word.sample()))"
        );
    }

    #[test]
    fn test_render_quotes_escape() {
        let value = MockValue::object(vec![MockProperty {
            key: "it's".into(),
            value: MockValue::Undefined,
        }]);
        assert_eq!(value.render(), r"{'it\'s': undefined}");
    }

    #[test]
    fn test_definition_serializes_type_tag() {
        let definition = MockDefinition::new(MockValue::primitive("42"), "id")
            .with_type(Some(SchemaType::Integer));
        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(
            json,
            json!({
                "value": { "type": "primitive", "value": "42" },
                "imports": [],
                "name": "id",
                "overrided": false,
                "type": "integer"
            })
        );
    }

    #[test]
    fn test_add_import_dedups() {
        let mut imports = Vec::new();
        let import = GeneratorImport {
            name: "Status".into(),
            spec_key: None,
            values: true,
        };
        add_import(&mut imports, import.clone());
        add_import(&mut imports, import);
        assert_eq!(imports.len(), 1);
    }
}
