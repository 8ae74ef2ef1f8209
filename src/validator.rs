//! Static schema validation - diagnostics over an internal schema tree.
//!
//! The validator mirrors the compiler's traversal (`properties`/`items`/
//! `definitions`) but is independent of it: it runs before compilation,
//! mutates nothing, and reports findings as data. The compiler tolerates
//! everything flagged here by degrading gracefully; warnings never change
//! behavior.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::types::{json_type_name, PATTERN_STATES, VALIDATE_TRIGGERS, VALID_TYPES};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic with a dot-joined path back to the offending node
/// (e.g. `properties.address.properties.city.type`).
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

/// Result of validating a schema tree.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) = diagnostics
            .into_iter()
            .partition(|d| d.severity == Severity::Error);
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validate a schema tree.
///
/// Definitions are resolved against the tree's root-level collection; any
/// node's own `definitions` attribute is merged in on the way down as an
/// extension point, never re-scoped per subtree.
pub fn validate(schema: &Value) -> ValidationReport {
    let mut diagnostics = Vec::new();
    let defs = definition_names(schema, &HashSet::new());
    check_node(schema, "", &defs, &mut diagnostics);
    ValidationReport::from_diagnostics(diagnostics)
}

// --- Internal implementation ---

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn push(diags: &mut Vec<Diagnostic>, severity: Severity, path: String, message: String) {
    diags.push(Diagnostic {
        severity,
        path,
        message,
    });
}

fn definition_names(node: &Value, inherited: &HashSet<String>) -> HashSet<String> {
    let mut names = inherited.clone();
    if let Some(defs) = node.get("definitions").and_then(|d| d.as_object()) {
        names.extend(defs.keys().cloned());
    }
    names
}

fn check_node(node: &Value, path: &str, defs: &HashSet<String>, diags: &mut Vec<Diagnostic>) {
    let Some(map) = node.as_object() else {
        push(
            diags,
            Severity::Error,
            path.to_string(),
            format!("expected a schema object, got {}", json_type_name(node)),
        );
        return;
    };

    let defs = definition_names(node, defs);
    let type_tag = map.get("type").and_then(|t| t.as_str());

    if let Some(type_value) = map.get("type") {
        match type_value.as_str() {
            Some(tag) if VALID_TYPES.contains(&tag) => {}
            Some(tag) => push(
                diags,
                Severity::Error,
                join(path, "type"),
                format!(
                    "unknown type \"{}\": expected one of {}",
                    tag,
                    VALID_TYPES.join(", ")
                ),
            ),
            None => push(
                diags,
                Severity::Error,
                join(path, "type"),
                format!("type must be a string, got {}", json_type_name(type_value)),
            ),
        }
    }

    if let Some(pattern) = map.get("pattern") {
        match pattern.as_str() {
            Some(state) if PATTERN_STATES.contains(&state) => {}
            Some(state) => push(
                diags,
                Severity::Error,
                join(path, "pattern"),
                format!(
                    "unknown pattern \"{}\": expected one of {}",
                    state,
                    PATTERN_STATES.join(", ")
                ),
            ),
            None => push(
                diags,
                Severity::Error,
                join(path, "pattern"),
                format!("pattern must be a string, got {}", json_type_name(pattern)),
            ),
        }
    }

    check_structure(map, type_tag, path, diags);
    check_ref(map, path, &defs, diags);
    check_enum(map, path, diags);
    check_rules(map, path, diags);
    check_validate_trigger(map, path, diags);
    check_reactions(map, path, diags);
    check_one_of(map, path, diags);
    check_span(map, path, diags);

    // Recurse
    if let Some(props) = map.get("properties").and_then(|p| p.as_object()) {
        let base = join(path, "properties");
        for (name, child) in props {
            check_node(child, &join(&base, name), &defs, diags);
        }
    }
    if let Some(items) = map.get("items") {
        check_node(items, &join(path, "items"), &defs, diags);
    }
    if let Some(definitions) = map.get("definitions").and_then(|d| d.as_object()) {
        let base = join(path, "definitions");
        for (name, def) in definitions {
            check_node(def, &join(&base, name), &defs, diags);
        }
    }
}

fn check_structure(
    map: &serde_json::Map<String, Value>,
    type_tag: Option<&str>,
    path: &str,
    diags: &mut Vec<Diagnostic>,
) {
    let is_array = type_tag == Some("array");
    let is_container = matches!(type_tag, Some("object") | Some("void") | None);

    if is_array && !map.contains_key("items") {
        push(
            diags,
            Severity::Warning,
            path.to_string(),
            "array type without items renders nothing".to_string(),
        );
    }
    if !is_array && map.contains_key("items") {
        push(
            diags,
            Severity::Warning,
            join(path, "items"),
            "items is only meaningful on array type".to_string(),
        );
    }
    if !is_container && map.contains_key("properties") {
        push(
            diags,
            Severity::Warning,
            join(path, "properties"),
            "properties is only meaningful on object or void type".to_string(),
        );
    }

    for key in ["minItems", "maxItems"] {
        if !is_array && map.contains_key(key) {
            push(
                diags,
                Severity::Warning,
                join(path, key),
                format!("{} is only meaningful on array type", key),
            );
        }
    }

    if let (Some(min), Some(max)) = (
        map.get("minItems").and_then(|v| v.as_f64()),
        map.get("maxItems").and_then(|v| v.as_f64()),
    ) {
        if min > max {
            push(
                diags,
                Severity::Error,
                join(path, "minItems"),
                format!("minItems ({}) greater than maxItems ({})", min, max),
            );
        }
    }
}

fn check_ref(
    map: &serde_json::Map<String, Value>,
    path: &str,
    defs: &HashSet<String>,
    diags: &mut Vec<Diagnostic>,
) {
    let Some(ref_value) = map.get("$ref") else {
        return;
    };
    let ref_path = join(path, "$ref");

    let Some(reference) = ref_value.as_str() else {
        push(
            diags,
            Severity::Error,
            ref_path,
            format!("$ref must be a string, got {}", json_type_name(ref_value)),
        );
        return;
    };

    match reference.strip_prefix("#/definitions/") {
        Some(name) if !name.is_empty() && !name.contains('/') => {
            if !defs.contains(name) {
                push(
                    diags,
                    Severity::Error,
                    ref_path,
                    format!("$ref target not found: {}", name),
                );
            }
        }
        _ => push(
            diags,
            Severity::Error,
            ref_path,
            format!(
                "malformed $ref \"{}\": expected #/definitions/<name>",
                reference
            ),
        ),
    }
}

fn check_enum(map: &serde_json::Map<String, Value>, path: &str, diags: &mut Vec<Diagnostic>) {
    let Some(enum_value) = map.get("enum") else {
        return;
    };
    match enum_value.as_array() {
        Some(arr) if arr.is_empty() => push(
            diags,
            Severity::Warning,
            join(path, "enum"),
            "empty enum has no selectable options".to_string(),
        ),
        Some(_) => {}
        None => push(
            diags,
            Severity::Error,
            join(path, "enum"),
            format!("enum must be an array, got {}", json_type_name(enum_value)),
        ),
    }
}

fn check_rules(map: &serde_json::Map<String, Value>, path: &str, diags: &mut Vec<Diagnostic>) {
    let Some(rules) = map.get("rules") else {
        return;
    };
    let Some(arr) = rules.as_array() else {
        push(
            diags,
            Severity::Error,
            join(path, "rules"),
            format!("rules must be an array, got {}", json_type_name(rules)),
        );
        return;
    };
    for (i, rule) in arr.iter().enumerate() {
        if !rule.is_object() {
            push(
                diags,
                Severity::Error,
                join(path, &format!("rules.{}", i)),
                format!("rule must be an object, got {}", json_type_name(rule)),
            );
        }
    }
}

fn check_validate_trigger(
    map: &serde_json::Map<String, Value>,
    path: &str,
    diags: &mut Vec<Diagnostic>,
) {
    let Some(trigger) = map.get("validateTrigger") else {
        return;
    };
    let trigger_path = join(path, "validateTrigger");

    let tokens: Vec<&Value> = match trigger {
        Value::String(_) => vec![trigger],
        Value::Array(arr) => arr.iter().collect(),
        other => {
            push(
                diags,
                Severity::Error,
                trigger_path,
                format!(
                    "validateTrigger must be a string or array, got {}",
                    json_type_name(other)
                ),
            );
            return;
        }
    };

    for token in tokens {
        match token.as_str() {
            Some(t) if VALIDATE_TRIGGERS.contains(&t) => {}
            Some(t) => push(
                diags,
                Severity::Error,
                trigger_path.clone(),
                format!(
                    "unknown trigger \"{}\": expected {}",
                    t,
                    VALIDATE_TRIGGERS.join(", ")
                ),
            ),
            None => push(
                diags,
                Severity::Error,
                trigger_path.clone(),
                format!("trigger must be a string, got {}", json_type_name(token)),
            ),
        }
    }
}

fn check_reactions(map: &serde_json::Map<String, Value>, path: &str, diags: &mut Vec<Diagnostic>) {
    let Some(reactions) = map.get("reactions") else {
        return;
    };
    let Some(arr) = reactions.as_array() else {
        push(
            diags,
            Severity::Error,
            join(path, "reactions"),
            format!(
                "reactions must be an array, got {}",
                json_type_name(reactions)
            ),
        );
        return;
    };

    for (i, reaction) in arr.iter().enumerate() {
        let entry_path = join(path, &format!("reactions.{}", i));
        let Some(entry) = reaction.as_object() else {
            push(
                diags,
                Severity::Error,
                entry_path,
                format!("reaction must be an object, got {}", json_type_name(reaction)),
            );
            continue;
        };
        if !entry.contains_key("watch") {
            push(
                diags,
                Severity::Error,
                entry_path.clone(),
                "reaction must declare watch".to_string(),
            );
        }
        if !entry.contains_key("when") && !entry.contains_key("fulfill") {
            push(
                diags,
                Severity::Warning,
                entry_path,
                "reaction with neither when nor fulfill has no effect".to_string(),
            );
        }
    }
}

fn check_one_of(map: &serde_json::Map<String, Value>, path: &str, diags: &mut Vec<Diagnostic>) {
    let Some(one_of) = map.get("oneOf") else {
        return;
    };
    let Some(arr) = one_of.as_array() else {
        push(
            diags,
            Severity::Error,
            join(path, "oneOf"),
            format!("oneOf must be an array, got {}", json_type_name(one_of)),
        );
        return;
    };

    for (i, branch) in arr.iter().enumerate() {
        let branch_path = join(path, &format!("oneOf.{}", i));
        let Some(entry) = branch.as_object() else {
            push(
                diags,
                Severity::Error,
                branch_path,
                format!("branch must be an object, got {}", json_type_name(branch)),
            );
            continue;
        };
        if !entry.contains_key("when") {
            push(
                diags,
                Severity::Error,
                branch_path.clone(),
                "branch must declare when".to_string(),
            );
        }
        if !entry.contains_key("properties") {
            push(
                diags,
                Severity::Warning,
                branch_path,
                "branch without properties contributes no fields".to_string(),
            );
        }
    }
}

fn check_span(map: &serde_json::Map<String, Value>, path: &str, diags: &mut Vec<Diagnostic>) {
    let Some(span) = map.get("span") else {
        return;
    };
    let in_range = span
        .as_f64()
        .map(|n| (1.0..=24.0).contains(&n))
        .unwrap_or(false);
    if !in_range {
        push(
            diags,
            Severity::Warning,
            join(path, "span"),
            format!("span {} outside grid range [1, 24]", span),
        );
    }
}
