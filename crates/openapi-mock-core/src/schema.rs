//! Typed view over a schema node of a loaded OpenAPI document.
//!
//! A node is either a `$ref` pointer or an inline schema object. The
//! distinction is made once, when the node is built from a JSON value, so
//! the value resolver dispatches with a `match` instead of probing fields.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared `type` of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl SchemaType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema composition keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Combinator {
    AllOf,
    OneOf,
    AnyOf,
}

impl Combinator {
    pub const ALL: [Combinator; 3] = [Combinator::AllOf, Combinator::OneOf, Combinator::AnyOf];

    /// The JSON keyword for this combinator.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::AllOf => "allOf",
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
        }
    }
}

/// The combinator currently being resolved and the property names its
/// earlier members already emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombineContext {
    pub separator: Combinator,
    pub included_properties: Vec<String>,
}

impl CombineContext {
    pub fn new(separator: Combinator) -> Self {
        Self {
            separator,
            included_properties: Vec::new(),
        }
    }

    pub fn includes(&self, property: &str) -> bool {
        self.included_properties.iter().any(|p| p == property)
    }
}

/// Shape of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind<'s> {
    /// `{ "$ref": "..." }`
    Reference(Cow<'s, str>),
    /// Any other schema object. Boolean schemas and non-objects become an
    /// empty schema.
    Inline(Cow<'s, Map<String, Value>>),
}

/// A schema node together with the identity it is being mocked under.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode<'s> {
    pub kind: SchemaKind<'s>,
    /// Property, parameter or definition name.
    pub name: String,
    /// Override path (`#.a.b`) from the root of the value being mocked.
    pub path: Option<String>,
    /// Set on the node synthesized from a dereferenced target.
    pub is_ref: bool,
    /// Type-style name of the definition a dereferenced node came from.
    pub definition_name: Option<String>,
}

impl<'s> SchemaNode<'s> {
    /// Build a node from a raw document value. The reference/inline
    /// distinction is evaluated here, every time a node is built.
    pub fn from_value(value: &'s Value, name: impl Into<String>, path: Option<String>) -> Self {
        let kind = match value {
            Value::Object(map) => match map.get("$ref").and_then(Value::as_str) {
                Some(reference) => SchemaKind::Reference(Cow::Borrowed(reference)),
                None => SchemaKind::Inline(Cow::Borrowed(map)),
            },
            _ => SchemaKind::Inline(Cow::Owned(Map::new())),
        };
        Self {
            kind,
            name: name.into(),
            path,
            is_ref: false,
            definition_name: None,
        }
    }

    /// A `$ref` node pointing at `reference`.
    pub fn reference(
        reference: impl Into<Cow<'s, str>>,
        name: impl Into<String>,
        path: Option<String>,
    ) -> Self {
        Self {
            kind: SchemaKind::Reference(reference.into()),
            name: name.into(),
            path,
            is_ref: false,
            definition_name: None,
        }
    }

    /// An inline node over an owned schema object.
    pub fn inline(schema: Map<String, Value>, name: impl Into<String>, path: Option<String>) -> Self {
        Self {
            kind: SchemaKind::Inline(Cow::Owned(schema)),
            name: name.into(),
            path,
            is_ref: false,
            definition_name: None,
        }
    }

    /// Mark the node as synthesized from the definition `definition_name`.
    pub fn dereferenced_from(mut self, definition_name: impl Into<String>) -> Self {
        self.is_ref = true;
        self.definition_name = Some(definition_name.into());
        self
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, SchemaKind::Reference(_))
    }

    /// The `$ref` string, for reference nodes.
    pub fn reference_str(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Reference(reference) => Some(&**reference),
            SchemaKind::Inline(_) => None,
        }
    }

    /// The schema object, for inline nodes.
    pub fn schema(&self) -> Option<&Map<String, Value>> {
        match &self.kind {
            SchemaKind::Inline(schema) => Some(&**schema),
            SchemaKind::Reference(_) => None,
        }
    }

    /// A keyword of the inline schema.
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.schema().and_then(|schema| schema.get(keyword))
    }

    /// Declared type. For OAS 3.1 type arrays the first non-`null` entry wins.
    pub fn declared_type(&self) -> Option<SchemaType> {
        match self.get("type")? {
            Value::String(raw) => SchemaType::parse(raw),
            Value::Array(types) => {
                let parsed: Vec<SchemaType> = types
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(SchemaType::parse)
                    .collect();
                parsed
                    .iter()
                    .copied()
                    .find(|t| *t != SchemaType::Null)
                    .or_else(|| parsed.first().copied())
            }
            _ => None,
        }
    }

    /// `nullable: true`, or a type array that includes `"null"`.
    pub fn nullable(&self) -> bool {
        if self.get("nullable").and_then(Value::as_bool) == Some(true) {
            return true;
        }
        match self.get("type") {
            Some(Value::Array(types)) => {
                types.len() > 1 && types.iter().any(|t| t.as_str() == Some("null"))
            }
            _ => false,
        }
    }

    pub fn format(&self) -> Option<&str> {
        self.get("format").and_then(Value::as_str)
    }

    /// Names listed under `required`.
    pub fn required_properties(&self) -> Vec<&str> {
        self.get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Members of a combinator keyword, if present and well-formed.
    pub fn members(&self, combinator: Combinator) -> Option<&Vec<Value>> {
        self.get(combinator.keyword()).and_then(Value::as_array)
    }

    /// The first combinator keyword present on the node.
    pub fn combinator(&self) -> Option<Combinator> {
        Combinator::ALL
            .into_iter()
            .find(|combinator| self.members(*combinator).is_some())
    }
}
