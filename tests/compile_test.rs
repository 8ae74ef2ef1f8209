//! Integration tests for schema compilation and merging.

use form_schema::{compile, merge, validate, CompileOptions};
use serde_json::json;

fn registration_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "basics": {
                "type": "void",
                "component": "Card",
                "order": 0,
                "properties": {
                    "username": {"type": "string", "required": true, "order": 0},
                    "age": {"type": "number", "order": 1}
                }
            },
            "tags": {
                "type": "array",
                "order": 1,
                "items": {"type": "string"}
            },
            "newsletter": {"type": "boolean", "order": 2}
        }
    })
}

mod path_algebra {
    use super::*;

    #[test]
    fn void_containers_vanish_from_data_paths() {
        let compiled = compile(&registration_schema(), &CompileOptions::default());

        let username = &compiled.fields["basics.username"];
        assert_eq!(username.address, "basics.username");
        assert_eq!(username.data_path, "username");

        let basics = &compiled.fields["basics"];
        assert!(basics.is_void);
        assert_eq!(basics.data_path, "");
    }

    #[test]
    fn array_items_use_star_and_share_data_path() {
        let compiled = compile(&registration_schema(), &CompileOptions::default());

        let item = &compiled.fields["tags.*"];
        assert_eq!(item.address, "tags.*");
        assert_eq!(item.data_path, "tags");
        assert!(compiled.fields["tags"].is_array);
    }

    #[test]
    fn nested_voids_stack_in_addresses_only() {
        let schema = json!({
            "type": "object",
            "properties": {
                "outer": {
                    "type": "void",
                    "properties": {
                        "inner": {
                            "type": "void",
                            "properties": {
                                "leaf": {"type": "string"}
                            }
                        }
                    }
                }
            }
        });
        let compiled = compile(&schema, &CompileOptions::default());

        let leaf = &compiled.fields["outer.inner.leaf"];
        assert_eq!(leaf.data_path, "leaf");
    }
}

mod ordering {
    use super::*;

    #[test]
    fn field_order_is_preorder() {
        let compiled = compile(&registration_schema(), &CompileOptions::default());
        assert_eq!(
            compiled.field_order,
            vec![
                "basics",
                "basics.username",
                "basics.age",
                "tags",
                "tags.*",
                "newsletter"
            ]
        );
    }

    #[test]
    fn explicit_order_beats_declaration_order() {
        let schema = json!({
            "type": "object",
            "properties": {
                "b": {"type": "string", "order": 2},
                "a": {"type": "string", "order": 1}
            }
        });
        let compiled = compile(&schema, &CompileOptions::default());
        assert_eq!(compiled.field_order, vec!["a", "b"]);
    }

    #[test]
    fn compile_is_deterministic() {
        let schema = registration_schema();
        let first = compile(&schema, &CompileOptions::default());
        let second = compile(&schema, &CompileOptions::default());

        assert_eq!(first.field_order, second.field_order);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

mod resolution {
    use super::*;

    #[test]
    fn components_resolved_from_type_table() {
        let compiled = compile(&registration_schema(), &CompileOptions::default());
        assert_eq!(
            compiled.fields["basics.username"]
                .resolved_component
                .as_deref(),
            Some("Input")
        );
        assert_eq!(
            compiled.fields["basics.age"].resolved_component.as_deref(),
            Some("InputNumber")
        );
        assert_eq!(
            compiled.fields["newsletter"].resolved_component.as_deref(),
            Some("Switch")
        );
    }

    #[test]
    fn enum_field_resolves_to_select() {
        let schema = json!({
            "type": "object",
            "properties": {
                "color": {"type": "string", "enum": ["red", "blue"]}
            }
        });
        let compiled = compile(&schema, &CompileOptions::default());
        let color = &compiled.fields["color"];
        assert_eq!(color.resolved_component.as_deref(), Some("Select"));
        // enum normalized into label/value pairs in the compiled node
        assert_eq!(
            color.schema["dataSource"],
            json!([
                {"label": "red", "value": "red"},
                {"label": "blue", "value": "blue"}
            ])
        );
    }

    #[test]
    fn pre_normalized_data_source_passes_through() {
        // a node that already carries dataSource pairs (e.g. a recompiled
        // field payload) is left untouched; normalization is idempotent
        let source = json!([
            {"label": "Red", "value": "r"},
            {"label": "Blue", "value": "b"}
        ]);
        let schema = json!({
            "type": "object",
            "properties": {
                "color": {"type": "string", "dataSource": source.clone()}
            }
        });
        let compiled = compile(&schema, &CompileOptions::default());
        let color = &compiled.fields["color"];
        assert_eq!(color.resolved_component.as_deref(), Some("Select"));
        assert_eq!(color.schema["dataSource"], source);
    }

    #[test]
    fn required_flag_becomes_leading_rule() {
        let compiled = compile(&registration_schema(), &CompileOptions::default());
        let rules = compiled.fields["basics.username"].schema["rules"]
            .as_array()
            .unwrap();
        assert_eq!(rules[0], json!({"required": true}));
    }

    #[test]
    fn custom_mapping_overrides_defaults() {
        let options = CompileOptions::new()
            .component("string", "TextField")
            .decorator("Field");
        let compiled = compile(&registration_schema(), &options);
        assert_eq!(
            compiled.fields["basics.username"]
                .resolved_component
                .as_deref(),
            Some("TextField")
        );
        assert_eq!(
            compiled.fields["basics.username"]
                .resolved_decorator
                .as_deref(),
            Some("Field")
        );
    }
}

mod merge_pipeline {
    use super::*;

    #[test]
    fn merge_then_compile() {
        let base = registration_schema();
        let overlay = json!({
            "properties": {
                "basics": {
                    "properties": {
                        "username": {"title": "Login"}
                    }
                }
            }
        });

        let merged = merge(&base, &overlay);
        let compiled = compile(&merged, &CompileOptions::default());

        let username = &compiled.fields["basics.username"];
        assert_eq!(username.schema["title"], "Login");
        // base attributes survive the overlay
        assert!(username.schema["rules"]
            .as_array()
            .unwrap()
            .contains(&json!({"required": true})));
    }

    #[test]
    fn merge_is_left_foldable() {
        let base = json!({"type": "object", "properties": {"a": {"type": "string"}}});
        let o1 = json!({"properties": {"a": {"title": "First"}}});
        let o2 = json!({"properties": {"a": {"title": "Second"}}});

        let result = merge(&merge(&base, &o1), &o2);
        assert_eq!(result["properties"]["a"]["title"], "Second");
        assert_eq!(result["properties"]["a"]["type"], "string");
    }
}

mod validation_pipeline {
    use super::*;

    #[test]
    fn well_formed_schema_passes() {
        let report = validate(&registration_schema());
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn bad_type_fails_before_compile() {
        let schema = json!({
            "type": "object",
            "properties": {
                "x": {"type": "strnig"}
            }
        });
        let report = validate(&schema);
        assert!(!report.valid);
        assert_eq!(report.errors[0].path, "properties.x.type");
    }

    #[test]
    fn compile_degrades_where_validate_complains() {
        // compile never fails; the unknown type falls back to the default
        // component while validate reports the same node as an error
        let schema = json!({
            "type": "object",
            "properties": {
                "x": {"type": "strnig"}
            }
        });
        let compiled = compile(&schema, &CompileOptions::default());
        assert_eq!(
            compiled.fields["x"].resolved_component.as_deref(),
            Some("Input")
        );
        assert!(!validate(&schema).valid);
    }
}
