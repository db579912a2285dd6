//! Configuration for mock generation.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::MockError;
use crate::overrides::{OverrideMap, OverrideSet, OverrideTable};

/// Overrides attached to one operation or tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OverrideScope {
    pub properties: OverrideMap,
}

/// User-facing mock options, as read from a configuration file.
///
/// ## Serialization Format
///
/// Fields use `kebab-case` (`array-min`, `use-examples`). Override tables keep
/// their declaration order, which decides which rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MockOptions {
    /// Global override table.
    pub properties: OverrideMap,
    /// Override tables keyed by `operationId`.
    pub operations: IndexMap<String, OverrideScope>,
    /// Override tables keyed by tag name.
    pub tags: IndexMap<String, OverrideScope>,
    /// Expressions replacing the built-in faker for a schema `format`.
    pub format: IndexMap<String, String>,
    /// Treat every object property as required.
    pub required: bool,
    /// Default minimum array length.
    pub array_min: u64,
    /// Default maximum array length.
    pub array_max: u64,
    /// Use a schema's `example` when it has one.
    pub use_examples: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            properties: OverrideMap::new(),
            operations: IndexMap::new(),
            tags: IndexMap::new(),
            format: IndexMap::new(),
            required: false,
            array_min: 1,
            array_max: 10,
            use_examples: false,
        }
    }
}

impl MockOptions {
    pub fn from_json(raw: &str) -> Result<Self, MockError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Validate the options and compile every override pattern.
    ///
    /// This is the only place a malformed `/regex/` key is reported, so a bad
    /// configuration fails before any schema is resolved.
    pub fn compile(&self) -> Result<MockConfig, MockError> {
        if self.array_min > self.array_max {
            return Err(MockError::InvalidOptions {
                message: format!(
                    "array-min ({}) is greater than array-max ({})",
                    self.array_min, self.array_max
                ),
            });
        }

        let operations = self
            .operations
            .iter()
            .map(|(id, scope)| Ok((id.clone(), OverrideTable::compile(&scope.properties)?)))
            .collect::<Result<HashMap<_, _>, MockError>>()?;
        let tags = self
            .tags
            .iter()
            .map(|(tag, scope)| Ok((tag.clone(), OverrideTable::compile(&scope.properties)?)))
            .collect::<Result<BTreeMap<_, _>, MockError>>()?;

        Ok(MockConfig {
            overrides: OverrideSet {
                global: OverrideTable::compile(&self.properties)?,
                operations,
                tags,
            },
            format: self.format.clone(),
            required: self.required,
            array_min: self.array_min,
            array_max: self.array_max,
            use_examples: self.use_examples,
        })
    }
}

/// Validated options with compiled override tables.
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub overrides: OverrideSet,
    pub format: IndexMap<String, String>,
    pub required: bool,
    pub array_min: u64,
    pub array_max: u64,
    pub use_examples: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            overrides: OverrideSet::default(),
            format: IndexMap::new(),
            required: false,
            array_min: 1,
            array_max: 10,
            use_examples: false,
        }
    }
}
