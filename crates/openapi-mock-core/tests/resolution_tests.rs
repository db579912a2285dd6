//! Integration tests for value resolution, through the public API only.

use std::cell::RefCell;
use std::rc::Rc;

use openapi_mock_core::{
    resolve_mock_value, GeneratorImport, MockContext, MockDefinition, MockError, MockGenerator,
    MockOptions, MockValue, OverrideSet, RefInfo, ResolveObserver, SchemaNode, SchemaType,
    SpecStore,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn user_spec() -> SpecStore {
    SpecStore::single(
        "api.yaml",
        json!({
            "components": {
                "schemas": {
                    "User": {
                        "type": "object",
                        "required": ["id", "name"],
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string", "nullable": true }
                        }
                    },
                    "Pet": {
                        "type": "object",
                        "required": ["name"],
                        "properties": { "name": { "type": "string" } }
                    },
                    "Age": { "type": "integer", "minimum": 0 },
                    "Node": {
                        "type": "object",
                        "properties": {
                            "children": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Node" }
                            }
                        }
                    }
                }
            }
        }),
    )
}

fn options(raw: &str) -> MockOptions {
    MockOptions::from_json(raw).expect("options should parse")
}

fn resolve_with(schema: &Value, name: &str, path: Option<&str>, options: &MockOptions) -> MockDefinition {
    let specs = user_spec();
    let config = options.compile().expect("options should compile");
    let scope = config.overrides.scope("getUser", &[]);
    let context = MockContext::new("api.yaml", &specs, &config, &scope);
    let node = SchemaNode::from_value(schema, name, path.map(str::to_string));
    let mut imports = Vec::new();
    resolve_mock_value(&node, None, &context, &mut imports).expect("resolution should succeed")
}

fn property<'a>(value: &'a MockValue, key: &str) -> &'a MockValue {
    match value {
        MockValue::Object { properties } => {
            &properties
                .iter()
                .find(|p| p.key == key)
                .unwrap_or_else(|| panic!("missing property {key}"))
                .value
        }
        other => panic!("expected object, got {other:?}"),
    }
}

// ── Override precedence ─────────────────────────────────────────────────────

#[test]
fn test_override_precedence_follows_declaration_order() {
    let schema = json!({ "type": "integer" });

    let path_first = options(r#"{ "properties": { "user.id": "1", "/Id$/": "2" } }"#);
    let regex_first = options(r#"{ "properties": { "/Id$/": "2", "user.id": "1" } }"#);

    // `userId` at `#.user.id` matches both rules.
    let by_path = resolve_with(&schema, "userId", Some("#.user.id"), &path_first);
    let by_regex = resolve_with(&schema, "userId", Some("#.user.id"), &regex_first);

    assert_eq!(by_path.value, MockValue::primitive("1"));
    assert_eq!(by_regex.value, MockValue::primitive("2"));
    assert!(by_path.overrided && by_regex.overrided);
}

// ── Nullable wrapping on the override path ──────────────────────────────────

#[test]
fn test_override_nullable_wrapping() {
    let rules = options(r#"{ "properties": { "nick": "'Ace'" } }"#);

    let nullable = resolve_with(&json!({ "type": "string", "nullable": true }), "nick", None, &rules);
    let plain = resolve_with(&json!({ "type": "string" }), "nick", None, &rules);

    let rendered = nullable.value.render();
    assert!(rendered.contains("'Ace'"));
    assert!(rendered.contains("null"));
    assert_eq!(plain.value, MockValue::primitive("'Ace'"));
}

// ── Reference path inheritance ──────────────────────────────────────────────

#[test]
fn test_reference_is_transparent_to_override_matching() {
    let rules = options(r#"{ "properties": { "pet": "{ name: 'Rex' }" } }"#);

    let via_ref = resolve_with(
        &json!({ "$ref": "#/components/schemas/Pet" }),
        "pet",
        Some("#.pet"),
        &rules,
    );
    let inline = resolve_with(
        &json!({ "type": "object", "properties": { "name": { "type": "string" } } }),
        "pet",
        Some("#.pet"),
        &rules,
    );

    assert_eq!(via_ref.value, inline.value);
    assert!(via_ref.overrided && inline.overrided);
    assert_eq!(via_ref.name, "pet");
}

// ── Regex anchoring ─────────────────────────────────────────────────────────

#[test]
fn test_regex_anchoring() {
    let schema = json!({ "type": "string" });
    let anchored = options(r#"{ "properties": { "/^Id$/": "'a'" } }"#);
    let suffix = options(r#"{ "properties": { "/Id$/": "'s'" } }"#);

    assert!(resolve_with(&schema, "Id", None, &anchored).overrided);
    assert!(!resolve_with(&schema, "UserId", None, &anchored).overrided);
    assert!(resolve_with(&schema, "Id", None, &suffix).overrided);
    assert!(resolve_with(&schema, "UserId", None, &suffix).overrided);
}

// ── Type propagation ────────────────────────────────────────────────────────

#[test]
fn test_reference_type_is_target_type() {
    let definition = resolve_with(
        &json!({ "$ref": "#/components/schemas/Age" }),
        "age",
        None,
        &MockOptions::default(),
    );
    assert_eq!(definition.schema_type, Some(SchemaType::Integer));
    assert_eq!(definition.value.render(), "faker.number.int({ min: 0 })");
}

// ── End-to-end scenario ─────────────────────────────────────────────────────

#[test]
fn test_user_scenario() {
    let rules = options(r#"{ "properties": { "/^id$/": "42" } }"#);
    let definition = resolve_with(
        &json!({ "$ref": "#/components/schemas/User" }),
        "",
        None,
        &rules,
    );

    assert_eq!(definition.name, "User");
    assert_eq!(definition.schema_type, Some(SchemaType::Object));
    assert!(!definition.overrided);
    assert_eq!(property(&definition.value, "id"), &MockValue::primitive("42"));
    assert_eq!(
        property(&definition.value, "name").render(),
        "faker.helpers.arrayElement([faker.word.sample(), null])"
    );
    assert_eq!(
        definition.value.render(),
        "{id: 42, name: faker.helpers.arrayElement([faker.word.sample(), null])}"
    );
}

#[test]
fn test_user_scenario_override_flag_via_custom_observer() {
    #[derive(Default)]
    struct Overrides(RefCell<Vec<(String, bool)>>);

    impl ResolveObserver for Overrides {
        fn on_override(&self, node: &SchemaNode<'_>, definition: &MockDefinition) {
            self.0
                .borrow_mut()
                .push((node.name.clone(), definition.overrided));
        }
    }

    let specs = user_spec();
    let config = options(r#"{ "properties": { "/^id$/": "42" } }"#)
        .compile()
        .unwrap();
    let scope = config.overrides.scope("getUser", &[]);
    let observer = Overrides::default();
    let context = MockContext::new("api.yaml", &specs, &config, &scope).with_observer(&observer);
    let node = SchemaNode::reference("#/components/schemas/User", "", None);

    let mut imports: Vec<GeneratorImport> = Vec::new();
    resolve_mock_value(&node, None, &context, &mut imports).unwrap();

    assert_eq!(*observer.0.borrow(), vec![("id".to_string(), true)]);
    assert!(imports.is_empty());
}

// ── Cycles ──────────────────────────────────────────────────────────────────

#[test]
fn test_recursive_schema_fails_with_cycle_error() {
    let specs = user_spec();
    let config = MockOptions::default().compile().unwrap();
    let overrides = OverrideSet::default();
    let scope = overrides.scope("", &[]);
    let context = MockContext::new("api.yaml", &specs, &config, &scope);
    let node = SchemaNode::reference("#/components/schemas/Node", "", None);

    let err = resolve_mock_value(&node, None, &context, &mut Vec::new()).unwrap_err();
    match err {
        MockError::CyclicSchema { reference, .. } => {
            assert_eq!(reference, "api.yaml#/components/schemas/Node");
        }
        other => panic!("expected CyclicSchema, got {other:?}"),
    }
}

#[test]
fn test_sibling_references_are_not_cycles() {
    let specs = SpecStore::single(
        "api.yaml",
        json!({
            "components": {
                "schemas": {
                    "Money": { "type": "number" },
                    "Order": {
                        "type": "object",
                        "required": ["net", "gross"],
                        "properties": {
                            "net": { "$ref": "#/components/schemas/Money" },
                            "gross": { "$ref": "#/components/schemas/Money" }
                        }
                    }
                }
            }
        }),
    );
    let generator = MockGenerator::new(specs, "api.yaml", &MockOptions::default()).unwrap();
    let mock = generator
        .resolve_pointer("#/components/schemas/Order", "", &[])
        .unwrap();
    assert_eq!(
        mock.definition.value.render(),
        "{net: faker.number.float(), gross: faker.number.float()}"
    );
}

// ── Unresolvable references ─────────────────────────────────────────────────

#[test]
fn test_dangling_reference_degrades_and_is_observed() {
    #[derive(Default)]
    struct Missing(Rc<RefCell<Vec<String>>>);

    impl ResolveObserver for Missing {
        fn on_unresolved_reference(&self, reference: &str, _spec_key: &str) {
            self.0.borrow_mut().push(reference.to_string());
        }

        fn on_reference(&self, _info: &RefInfo, _definition: &MockDefinition) {}
    }

    let seen = Rc::new(RefCell::new(Vec::new()));
    let specs = SpecStore::single(
        "api.yaml",
        json!({
            "components": {
                "schemas": {
                    "Box": {
                        "type": "object",
                        "required": ["content"],
                        "properties": { "content": { "$ref": "#/components/schemas/Gone" } }
                    }
                }
            }
        }),
    );
    let generator = MockGenerator::new(specs, "api.yaml", &MockOptions::default())
        .unwrap()
        .with_observer(Box::new(Missing(Rc::clone(&seen))));

    let mock = generator
        .resolve_pointer("#/components/schemas/Box", "", &[])
        .unwrap();
    assert_eq!(mock.definition.value.render(), "{content: {}}");
    assert_eq!(*seen.borrow(), vec!["#/components/schemas/Gone"]);
}

// ── Configuration fails fast ────────────────────────────────────────────────

#[test]
fn test_bad_override_pattern_fails_before_resolution() {
    let err = MockGenerator::new(
        user_spec(),
        "api.yaml",
        &options(r#"{ "properties": { "/[unterminated/": "1" } }"#),
    )
    .err()
    .expect("generator construction should fail");

    assert!(matches!(err, MockError::InvalidOverridePattern { .. }));
    assert!(err.to_string().contains("/[unterminated/"));
}

// ── Tag scopes ──────────────────────────────────────────────────────────────

#[test]
fn test_tag_scope_overrides_global() {
    let generator = MockGenerator::new(
        user_spec(),
        "api.yaml",
        &options(
            r#"{
                "properties": { "name": "'global'" },
                "tags": { "pets": { "properties": { "name": "'tagged'" } } }
            }"#,
        ),
    )
    .unwrap();

    let tagged = generator
        .resolve_pointer("#/components/schemas/Pet", "", &["pets".to_string()])
        .unwrap();
    let untagged = generator
        .resolve_pointer("#/components/schemas/Pet", "", &[])
        .unwrap();

    assert_eq!(tagged.definition.value.render(), "{name: 'tagged'}");
    assert_eq!(untagged.definition.value.render(), "{name: 'global'}");
}

// ── External documents ──────────────────────────────────────────────────────

#[test]
fn test_external_document_references() {
    let mut specs = SpecStore::single(
        "specs/api.yaml",
        json!({
            "components": {
                "schemas": {
                    "Error": { "$ref": "../shared/errors.yaml#/Error" }
                }
            }
        }),
    );
    specs.insert(
        "shared/errors.yaml",
        json!({
            "Error": {
                "type": "object",
                "required": ["code"],
                "properties": { "code": { "$ref": "#/Code" } }
            },
            "Code": { "type": "string", "enum": ["E1", "E2"] }
        }),
    );

    let generator = MockGenerator::new(specs, "specs/api.yaml", &MockOptions::default()).unwrap();
    let mock = generator
        .resolve_pointer("#/components/schemas/Error", "", &[])
        .unwrap();

    assert_eq!(
        mock.definition.value.render(),
        "{code: faker.helpers.arrayElement(Object.values(Code))}"
    );
    assert_eq!(
        mock.imports,
        vec![GeneratorImport {
            name: "Code".into(),
            spec_key: Some("shared/errors.yaml".into()),
            values: true,
        }]
    );
}
