//! Top-level entry points over a loaded specification set.
//!
//! ## Usage
//!
//! ```rust
//! use openapi_mock_core::{MockGenerator, MockOptions, SpecStore};
//! use serde_json::json;
//!
//! let specs = SpecStore::single("api.json", json!({
//!     "components": { "schemas": { "Pet": {
//!         "type": "object",
//!         "required": ["id"],
//!         "properties": { "id": { "type": "integer" } }
//!     } } }
//! }));
//!
//! let generator = MockGenerator::new(specs, "api.json", &MockOptions::default()).unwrap();
//! let mock = generator.resolve_pointer("#/components/schemas/Pet", "", &[]).unwrap();
//! assert_eq!(mock.definition.value.render(), "{id: faker.number.int()}");
//! ```

use heck::{ToLowerCamelCase, ToUpperCamelCase};
use serde::Serialize;
use serde_json::Value;

use crate::config::{MockConfig, MockOptions};
use crate::context::{MockContext, SpecStore};
use crate::error::MockError;
use crate::mock::{GeneratorImport, MockDefinition};
use crate::observer::{ResolveObserver, TracingObserver};
use crate::resolver::ref_info;
use crate::scalar::{FakerScalarResolver, ScalarResolver};
use crate::schema::SchemaNode;
use crate::schema_utils::{build_pointer, split_pointer};
use crate::value::resolve_mock_value;

/// HTTP methods of an OpenAPI path item, in emission order.
const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A resolved top-level schema with every import its resolution collected.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedMock {
    pub definition: MockDefinition,
    pub imports: Vec<GeneratorImport>,
}

/// The mock of one operation response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMock {
    pub operation_id: String,
    pub method: String,
    pub route: String,
    pub status: String,
    pub media_type: String,
    pub definition: MockDefinition,
    pub imports: Vec<GeneratorImport>,
}

/// An operation response whose body could not be resolved.
#[derive(Debug)]
pub struct OperationFailure {
    pub operation_id: String,
    pub method: String,
    pub route: String,
    pub status: String,
    pub error: MockError,
}

/// Owns a specification set and a compiled configuration.
pub struct MockGenerator {
    specs: SpecStore,
    root: String,
    config: MockConfig,
    scalar: Box<dyn ScalarResolver>,
    observer: Box<dyn ResolveObserver>,
}

impl MockGenerator {
    /// Compile `options` and bind to the document `root_spec_key`.
    ///
    /// Fails before any resolution if an override pattern is invalid or the
    /// root document is missing.
    pub fn new(
        specs: SpecStore,
        root_spec_key: impl Into<String>,
        options: &MockOptions,
    ) -> Result<Self, MockError> {
        let config = options.compile()?;
        let root = root_spec_key.into();
        if !specs.contains(&root) {
            return Err(MockError::UnknownSpec { spec_key: root });
        }

        Ok(Self {
            specs,
            root,
            config,
            scalar: Box::new(FakerScalarResolver),
            observer: Box::new(TracingObserver),
        })
    }

    pub fn with_scalar(mut self, scalar: Box<dyn ScalarResolver>) -> Self {
        self.scalar = scalar;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn ResolveObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn specs(&self) -> &SpecStore {
        &self.specs
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Resolve the schema at `pointer` in the root document.
    ///
    /// An empty `name` takes the definition name of the pointer target.
    pub fn resolve_pointer(
        &self,
        pointer: &str,
        name: &str,
        tags: &[String],
    ) -> Result<ResolvedMock, MockError> {
        self.resolve_pointer_for("", pointer, name, tags)
    }

    /// Like [`Self::resolve_pointer`], within the override scope of
    /// `operation_id`.
    pub fn resolve_pointer_for(
        &self,
        operation_id: &str,
        pointer: &str,
        name: &str,
        tags: &[String],
    ) -> Result<ResolvedMock, MockError> {
        let pointer = if pointer.starts_with('#') {
            pointer.to_string()
        } else {
            format!("#{pointer}")
        };

        if self.specs.deep_get(&self.root, &split_pointer(&pointer)).is_none() {
            return Err(MockError::SchemaError {
                path: pointer,
                message: "no schema at this pointer".to_string(),
            });
        }

        let node = SchemaNode::reference(pointer, name, None);
        self.resolve_node(&self.root, &node, operation_id, tags)
    }

    /// Resolve `node`, which belongs to document `spec_key`, with a fresh
    /// imports accumulator.
    pub fn resolve_node(
        &self,
        spec_key: &str,
        node: &SchemaNode<'_>,
        operation_id: &str,
        tags: &[String],
    ) -> Result<ResolvedMock, MockError> {
        let scope = self.config.overrides.scope(operation_id, tags);
        let context = MockContext::new(spec_key, &self.specs, &self.config, &scope)
            .with_scalar(self.scalar.as_ref())
            .with_observer(self.observer.as_ref());

        let mut imports = Vec::new();
        let definition = resolve_mock_value(node, None, &context, &mut imports)?;
        Ok(ResolvedMock {
            definition,
            imports,
        })
    }

    /// Mock every successful JSON response body of every operation.
    ///
    /// Fails with the error of the first response, in document order, that
    /// does not resolve. Use [`Self::partial_operation_mocks`] to keep the
    /// responses that do.
    pub fn operation_mocks(&self) -> Result<Vec<OperationMock>, MockError> {
        self.walk_operations()
            .into_iter()
            .map(|outcome| outcome.map_err(|failure| failure.error))
            .collect()
    }

    /// Like [`Self::operation_mocks`], but a response that fails to resolve
    /// is reported on its own instead of failing the whole walk.
    pub fn partial_operation_mocks(&self) -> (Vec<OperationMock>, Vec<OperationFailure>) {
        let mut mocks = Vec::new();
        let mut failures = Vec::new();
        for outcome in self.walk_operations() {
            match outcome {
                Ok(mock) => mocks.push(mock),
                Err(failure) => failures.push(failure),
            }
        }
        (mocks, failures)
    }

    fn walk_operations(&self) -> Vec<Result<OperationMock, OperationFailure>> {
        let Some(paths) = self
            .specs
            .get(&self.root)
            .and_then(|doc| doc.get("paths"))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };

        let mut outcomes = Vec::new();
        for (route, path_item) in paths {
            let (item_key, path_item) = self.dereference(&self.root, path_item);
            for method in METHODS {
                let Some(operation) = path_item.get(method) else {
                    continue;
                };
                outcomes.extend(self.operation_responses(&item_key, route, method, operation));
            }
        }
        outcomes
    }

    fn operation_responses(
        &self,
        spec_key: &str,
        route: &str,
        method: &str,
        operation: &Value,
    ) -> Vec<Result<OperationMock, OperationFailure>> {
        let operation_id = operation
            .get("operationId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{method} {route}").to_lower_camel_case());
        let tags: Vec<String> = operation
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        let Some(responses) = operation.get("responses").and_then(Value::as_object) else {
            return Vec::new();
        };

        let mut outcomes = Vec::new();
        for (status, response) in responses {
            if !(status.starts_with('2') || status == "default") {
                continue;
            }

            let (response_key, response) = self.dereference(spec_key, response);
            let Some((media_type, schema)) = json_body(response) else {
                continue;
            };

            // Inline bodies are named after the operation; referenced ones
            // keep their definition name.
            let name = if schema.get("$ref").is_some() {
                String::new()
            } else {
                format!("{}Response{}", operation_id.to_upper_camel_case(), status.to_upper_camel_case())
            };
            let node = SchemaNode::from_value(schema, name, None);

            tracing::debug!(
                operation_id = %operation_id,
                pointer = %build_pointer("#", &["paths", route, method, "responses", status.as_str()]),
                "resolving response body"
            );
            let outcome = match self.resolve_node(&response_key, &node, &operation_id, &tags) {
                Ok(resolved) => Ok(OperationMock {
                    operation_id: operation_id.clone(),
                    method: method.to_string(),
                    route: route.to_string(),
                    status: status.clone(),
                    media_type: media_type.to_string(),
                    definition: resolved.definition,
                    imports: resolved.imports,
                }),
                Err(error) => Err(OperationFailure {
                    operation_id: operation_id.clone(),
                    method: method.to_string(),
                    route: route.to_string(),
                    status: status.clone(),
                    error,
                }),
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Follow a `$ref` on a path item or response object.
    ///
    /// Returns the document the returned value lives in. Dangling
    /// references are returned unchanged.
    fn dereference<'v>(&'v self, spec_key: &str, value: &'v Value) -> (String, &'v Value) {
        let Some(reference) = value.get("$ref").and_then(Value::as_str) else {
            return (spec_key.to_string(), value);
        };

        let info = ref_info(reference, spec_key);
        let target_key = info.target_spec_key(spec_key).to_string();
        match self.specs.deep_get(&target_key, &info.ref_paths) {
            Some(target) => (target_key, target),
            None => {
                self.observer.on_unresolved_reference(reference, &target_key);
                (spec_key.to_string(), value)
            }
        }
    }
}

/// The first JSON media type of a response and its schema.
fn json_body(response: &Value) -> Option<(&str, &Value)> {
    response
        .get("content")?
        .as_object()?
        .iter()
        .find(|(media_type, _)| media_type.contains("json"))
        .and_then(|(media_type, media)| Some((media_type.as_str(), media.get("schema")?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn petstore() -> SpecStore {
        SpecStore::single(
            "petstore.json",
            json!({
                "paths": {
                    "/pets/{petId}": {
                        "get": {
                            "operationId": "showPetById",
                            "tags": ["pets"],
                            "responses": {
                                "200": {
                                    "content": {
                                        "application/json": {
                                            "schema": { "$ref": "#/components/schemas/Pet" }
                                        }
                                    }
                                },
                                "404": { "description": "missing" }
                            }
                        },
                        "delete": {
                            "responses": { "204": { "description": "gone" } }
                        }
                    },
                    "/health": { "$ref": "#/components/pathItems/Health" }
                },
                "components": {
                    "schemas": {
                        "Pet": {
                            "type": "object",
                            "required": ["id"],
                            "properties": { "id": { "type": "integer" } }
                        }
                    },
                    "pathItems": {
                        "Health": {
                            "get": {
                                "responses": {
                                    "default": { "$ref": "#/components/responses/Health" }
                                }
                            }
                        }
                    },
                    "responses": {
                        "Health": {
                            "content": {
                                "application/problem+json": {
                                    "schema": { "type": "object", "required": ["ok"], "properties": { "ok": { "type": "boolean" } } }
                                }
                            }
                        }
                    }
                }
            }),
        )
    }

    #[test]
    fn test_unknown_root_is_rejected() {
        let err = MockGenerator::new(petstore(), "other.json", &MockOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, MockError::UnknownSpec { .. }));
    }

    #[test]
    fn test_resolve_pointer_missing_target() {
        let generator = MockGenerator::new(petstore(), "petstore.json", &MockOptions::default()).unwrap();
        let err = generator
            .resolve_pointer("#/components/schemas/Nope", "", &[])
            .unwrap_err();
        assert!(matches!(err, MockError::SchemaError { .. }));
    }

    #[test]
    fn test_resolve_pointer_without_hash() {
        let generator = MockGenerator::new(petstore(), "petstore.json", &MockOptions::default()).unwrap();
        let mock = generator
            .resolve_pointer("/components/schemas/Pet", "", &[])
            .unwrap();
        assert_eq!(mock.definition.name, "Pet");
    }

    #[test]
    fn test_operation_mocks_walks_success_responses() {
        let generator = MockGenerator::new(petstore(), "petstore.json", &MockOptions::default()).unwrap();
        let mocks = generator.operation_mocks().unwrap();

        let summary: Vec<_> = mocks
            .iter()
            .map(|m| (m.operation_id.as_str(), m.status.as_str(), m.definition.name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("showPetById", "200", "Pet"),
                ("getHealth", "default", "GetHealthResponseDefault"),
            ]
        );
        assert_eq!(mocks[0].definition.value.render(), "{id: faker.number.int()}");
        assert_eq!(mocks[1].media_type, "application/problem+json");
    }

    #[test]
    fn test_operation_override_scope_applies() {
        let options = MockOptions::from_json(
            r#"{ "operations": { "showPetById": { "properties": { "id": "1" } } } }"#,
        )
        .unwrap();
        let generator = MockGenerator::new(petstore(), "petstore.json", &options).unwrap();
        let mocks = generator.operation_mocks().unwrap();
        assert_eq!(mocks[0].definition.value.render(), "{id: 1}");
    }

    fn tree_store() -> SpecStore {
        SpecStore::single(
            "tree.json",
            json!({
                "paths": {
                    "/trees": {
                        "get": {
                            "operationId": "listTrees",
                            "responses": {
                                "200": {
                                    "content": {
                                        "application/json": {
                                            "schema": { "$ref": "#/components/schemas/Tree" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "/leaves": {
                        "get": {
                            "operationId": "listLeaves",
                            "responses": {
                                "200": {
                                    "content": {
                                        "application/json": {
                                            "schema": { "$ref": "#/components/schemas/Leaf" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "components": {
                    "schemas": {
                        "Tree": {
                            "type": "object",
                            "required": ["children"],
                            "properties": {
                                "children": { "type": "array", "items": { "$ref": "#/components/schemas/Tree" } }
                            }
                        },
                        "Leaf": { "type": "string" }
                    }
                }
            }),
        )
    }

    #[test]
    fn test_partial_operation_mocks_keeps_resolvable_operations() {
        let generator = MockGenerator::new(tree_store(), "tree.json", &MockOptions::default()).unwrap();
        let (mocks, failures) = generator.partial_operation_mocks();

        assert_eq!(mocks.len(), 1);
        assert_eq!(mocks[0].operation_id, "listLeaves");
        assert_eq!(mocks[0].definition.value.render(), "faker.word.sample()");

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].operation_id, "listTrees");
        assert_eq!(failures[0].route, "/trees");
        assert_eq!(failures[0].status, "200");
        assert!(matches!(failures[0].error, MockError::CyclicSchema { .. }));
    }

    #[test]
    fn test_operation_mocks_fails_on_first_unresolvable_operation() {
        let generator = MockGenerator::new(tree_store(), "tree.json", &MockOptions::default()).unwrap();
        let err = generator.operation_mocks().unwrap_err();
        assert!(matches!(err, MockError::CyclicSchema { .. }));
    }
}
