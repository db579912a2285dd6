//! User override rules.
//!
//! A rule maps a key to an expression that replaces generation for every
//! node the key selects. Keys come in two forms:
//!
//! - `/pattern/`: a regex tested against the node's name (unanchored,
//!   case-sensitive, Rust `regex` syntax). A lone `/` is the empty pattern
//!   and selects every node;
//! - anything else: a dotted path, compared against the node's override path
//!   with the `#.` prefix added (`user.id` selects `#.user.id`).
//!
//! Rules are tried in declaration order and the first match wins. Patterns
//! are compiled once, when the table is built.

use std::collections::BTreeMap;
use std::collections::HashMap;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::MockError;
use crate::mock::{MockDefinition, MockValue};
use crate::nullable::wrap_nullable;
use crate::schema::SchemaNode;

/// Ordered override key → expression map, as written in configuration.
pub type OverrideMap = IndexMap<String, String>;

#[derive(Debug, Clone)]
enum KeyMatcher {
    Pattern(Regex),
    Path,
}

/// One compiled override rule.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    key: String,
    matcher: KeyMatcher,
    value: String,
}

/// The pattern of a key whose first and last characters are `/`. A lone
/// `/` is both, and yields the empty pattern.
fn regex_pattern(key: &str) -> Option<&str> {
    match key {
        "/" => Some(""),
        _ => key.strip_prefix('/')?.strip_suffix('/'),
    }
}

impl OverrideRule {
    pub fn compile(key: &str, value: &str) -> Result<Self, MockError> {
        let matcher = if let Some(pattern) = regex_pattern(key) {
            let regex = Regex::new(pattern).map_err(|source| MockError::InvalidOverridePattern {
                key: key.to_string(),
                source,
            })?;
            KeyMatcher::Pattern(regex)
        } else {
            KeyMatcher::Path
        };

        Ok(Self {
            key: key.to_string(),
            matcher,
            value: value.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether this rule selects `node`.
    pub fn matches(&self, node: &SchemaNode<'_>) -> bool {
        if let KeyMatcher::Pattern(regex) = &self.matcher {
            if regex.is_match(&node.name) {
                return true;
            }
        }

        // `#.{key}` against the node path, or `#.{name}` without one.
        match node.path.as_deref() {
            Some(path) => path.strip_prefix("#.") == Some(self.key.as_str()),
            None => self.key == node.name,
        }
    }
}

/// An ordered list of compiled rules.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    /// Compile every rule of `map`, failing on the first bad pattern.
    pub fn compile(map: &OverrideMap) -> Result<Self, MockError> {
        let rules = map
            .iter()
            .map(|(key, value)| OverrideRule::compile(key, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }

    /// The first rule selecting `node`.
    pub fn find(&self, node: &SchemaNode<'_>) -> Option<&OverrideRule> {
        self.rules.iter().find(|rule| rule.matches(node))
    }

    /// Build the overridden definition for `node`, if a rule selects it.
    pub fn resolve(&self, node: &SchemaNode<'_>) -> Option<MockDefinition> {
        let rule = self.find(node)?;
        Some(MockDefinition {
            value: wrap_nullable(MockValue::primitive(rule.value.as_str()), node.nullable()),
            imports: Vec::new(),
            name: node.name.clone(),
            overrided: true,
            schema_type: None,
        })
    }

    /// Merge tables in order. A key seen again keeps its first position and
    /// takes the later rule.
    fn merge<'a>(tables: impl IntoIterator<Item = &'a OverrideTable>) -> Self {
        let mut merged: IndexMap<&str, &OverrideRule> = IndexMap::new();
        for table in tables {
            for rule in &table.rules {
                merged.insert(rule.key.as_str(), rule);
            }
        }
        Self {
            rules: merged.into_values().cloned().collect(),
        }
    }
}

/// Every override table of a configuration.
#[derive(Debug, Clone, Default)]
pub struct OverrideSet {
    pub global: OverrideTable,
    pub operations: HashMap<String, OverrideTable>,
    /// Ordered by tag name, which is the order tags are merged in.
    pub tags: BTreeMap<String, OverrideTable>,
}

impl OverrideSet {
    /// The view of this set seen by one operation.
    pub fn scope(&self, operation_id: &str, tags: &[String]) -> OperationScope<'_> {
        let tag = OverrideTable::merge(
            self.tags
                .iter()
                .filter(|(name, _)| tags.contains(name))
                .map(|(_, table)| table),
        );

        OperationScope {
            operation_id: operation_id.to_string(),
            tags: tags.to_vec(),
            operation: self.operations.get(operation_id),
            tag,
            global: &self.global,
        }
    }
}

/// Overrides applicable while mocking one operation, consulted as
/// operation, then tags, then global.
#[derive(Debug, Clone)]
pub struct OperationScope<'c> {
    pub operation_id: String,
    pub tags: Vec<String>,
    operation: Option<&'c OverrideTable>,
    tag: OverrideTable,
    global: &'c OverrideTable,
}

impl OperationScope<'_> {
    /// Resolve `node` against the scope's tables in precedence order.
    pub fn resolve(&self, node: &SchemaNode<'_>) -> Option<MockDefinition> {
        self.operation
            .and_then(|table| table.resolve(node))
            .or_else(|| self.tag.resolve(node))
            .or_else(|| self.global.resolve(node))
    }
}
