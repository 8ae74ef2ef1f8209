//! Schema compilation - flattens a schema tree into addressable field descriptors.
//!
//! The compiler walks the tree once, pre-order, and emits one `CompiledField`
//! per node, keyed by `address`. Two parallel path spaces are maintained:
//!
//! - `address`: structural path from the root, including void-container
//!   segments and the literal `*` segment for array item templates;
//! - `data_path`: logical path into the value tree, excluding void segments
//!   (array indices are appended by the runtime, never by the compiler).
//!
//! The compiler never fails: malformed input degrades to conservative
//! defaults. It holds no cache across calls - the authoring layer may hand it
//! proxy-wrapped trees whose nested mutations don't change outer identity, so
//! identity-keyed memoization would be unsound.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{CompileOptions, SchemaType};

/// One entry of the compiler's output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledField {
    /// Structural path from the root, dot-joined, including void segments.
    pub address: String,
    /// Logical data path, excluding void segments.
    pub data_path: String,
    /// The normalized node: `enum` rewritten to `dataSource`, implicit
    /// required rule prepended, structural children stripped.
    pub schema: Value,
    /// Concrete component name, if any resolves.
    pub resolved_component: Option<String>,
    /// Concrete decorator name; `None` for undecorated (void) fields.
    pub resolved_decorator: Option<String>,
    pub is_void: bool,
    pub is_array: bool,
    /// Addresses of direct children, in render order.
    pub children: Vec<String>,
}

/// Root output of compilation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledSchema {
    /// The source root node, unchanged.
    pub root: Value,
    /// Compiled fields keyed by address.
    pub fields: BTreeMap<String, CompiledField>,
    /// Pre-order traversal sequence for deterministic rendering.
    pub field_order: Vec<String>,
}

/// Compile a schema tree into a flat field map.
///
/// The entry point recurses into the root's `properties` only; a root with
/// no properties produces an empty result. Pure function of its two inputs.
pub fn compile(schema: &Value, options: &CompileOptions) -> CompiledSchema {
    let mut fields = BTreeMap::new();
    let mut field_order = Vec::new();

    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        for (name, child) in sorted_properties(props) {
            let address = name.clone();
            let data_path = if is_void_node(child) {
                String::new()
            } else {
                name.clone()
            };
            compile_node(child, address, data_path, options, &mut fields, &mut field_order);
        }
    }

    CompiledSchema {
        root: schema.clone(),
        fields,
        field_order,
    }
}

/// Join a path segment onto a parent path (empty parent yields the segment).
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

/// Split a dot-joined path into its segments.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}

// --- Internal implementation ---

fn compile_node(
    node: &Value,
    address: String,
    data_path: String,
    options: &CompileOptions,
    fields: &mut BTreeMap<String, CompiledField>,
    field_order: &mut Vec<String>,
) {
    let node_type = node
        .get("type")
        .and_then(|t| t.as_str())
        .and_then(SchemaType::parse);
    let is_void = node_type == Some(SchemaType::Void);
    let is_array = node_type == Some(SchemaType::Array);

    let mut children = Vec::new();
    // (address, data_path, node) triples, recursed after the parent is recorded
    let mut pending: Vec<(String, String, &Value)> = Vec::new();

    if let Some(props) = node.get("properties").and_then(|p| p.as_object()) {
        for (name, child) in sorted_properties(props) {
            let child_address = join_path(&address, name);
            let child_data_path = if is_void_node(child) {
                data_path.clone()
            } else {
                join_path(&data_path, name)
            };
            children.push(child_address.clone());
            pending.push((child_address, child_data_path, child));
        }
    }

    if is_array {
        // The item template lives at `<array>.*` but adds no data segment;
        // a missing `items` simply yields no item sub-tree.
        if let Some(items) = node.get("items") {
            if items.is_object() {
                let item_address = join_path(&address, "*");
                children.push(item_address.clone());
                pending.push((item_address, data_path.clone(), items));
            }
        }
    }

    let field = CompiledField {
        address: address.clone(),
        data_path,
        schema: normalize_node(node),
        resolved_component: resolve_component(node, node_type, is_void, options),
        resolved_decorator: resolve_decorator(node, is_void, options),
        is_void,
        is_array,
        children,
    };

    field_order.push(address.clone());
    fields.insert(address, field);

    for (child_address, child_data_path, child) in pending {
        compile_node(child, child_address, child_data_path, options, fields, field_order);
    }
}

fn is_void_node(node: &Value) -> bool {
    node.get("type").and_then(|t| t.as_str()) == Some("void")
}

/// Sort sibling properties by their numeric `order`, ascending and stable
/// (missing `order` sorts as 0; ties keep declaration order).
fn sorted_properties(props: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<(&String, &Value)> = props.iter().collect();
    entries.sort_by(|a, b| {
        let oa = sort_order(a.1);
        let ob = sort_order(b.1);
        oa.partial_cmp(&ob).unwrap_or(std::cmp::Ordering::Equal)
    });
    entries
}

fn sort_order(node: &Value) -> f64 {
    node.get("order").and_then(|o| o.as_f64()).unwrap_or(0.0)
}

/// Produce the per-field schema payload: `enum` rewritten to `dataSource`,
/// the implicit required rule prepended, `properties`/`items` stripped
/// (structure lives in the `children` address list).
fn normalize_node(node: &Value) -> Value {
    let Some(map) = node.as_object() else {
        return node.clone();
    };

    let mut result = map.clone();
    result.remove("properties");
    result.remove("items");

    if let Some(Value::Array(entries)) = result.remove("enum") {
        let data_source: Vec<Value> = entries.iter().map(normalize_enum_entry).collect();
        result.insert("dataSource".to_string(), Value::Array(data_source));
    }

    let required = map.get("required").and_then(|r| r.as_bool()).unwrap_or(false);
    if required && !has_required_rule(map.get("rules")) {
        let mut rules = vec![serde_json::json!({"required": true})];
        if let Some(Value::Array(existing)) = result.get("rules") {
            rules.extend(existing.iter().cloned());
        }
        result.insert("rules".to_string(), Value::Array(rules));
    }

    Value::Object(result)
}

/// Raw scalars become `{label: String(value), value}`; objects pass through.
fn normalize_enum_entry(entry: &Value) -> Value {
    match entry {
        Value::Object(_) => entry.clone(),
        Value::String(s) => serde_json::json!({"label": s, "value": s}),
        other => serde_json::json!({"label": other.to_string(), "value": other}),
    }
}

fn has_required_rule(rules: Option<&Value>) -> bool {
    rules
        .and_then(|r| r.as_array())
        .map(|arr| {
            arr.iter()
                .any(|rule| rule.as_object().is_some_and(|o| o.contains_key("required")))
        })
        .unwrap_or(false)
}

/// Resolution order: explicit `component` wins; enum or a static/remote
/// `dataSource` resolve to `Select`; void nodes are transparent; otherwise
/// the type table with the configured fallback.
fn resolve_component(
    node: &Value,
    node_type: Option<SchemaType>,
    is_void: bool,
    options: &CompileOptions,
) -> Option<String> {
    if let Some(name) = node.get("component").and_then(|c| c.as_str()) {
        return Some(name.to_string());
    }

    if has_selectable_source(node) {
        return Some("Select".to_string());
    }

    if is_void {
        return None;
    }

    let tag = node_type.map(|t| t.as_str()).unwrap_or("string");
    Some(
        options
            .component_mapping
            .get(tag)
            .cloned()
            .unwrap_or_else(|| options.fallback_component.clone()),
    )
}

fn has_selectable_source(node: &Value) -> bool {
    if node
        .get("enum")
        .and_then(|e| e.as_array())
        .is_some_and(|arr| !arr.is_empty())
    {
        return true;
    }
    match node.get("dataSource") {
        Some(Value::Array(arr)) => !arr.is_empty(),
        // A dynamic descriptor with a remote-fetch locator
        Some(Value::Object(map)) => map.get("url").is_some_and(|u| u.is_string()),
        _ => false,
    }
}

fn resolve_decorator(node: &Value, is_void: bool, options: &CompileOptions) -> Option<String> {
    if let Some(name) = node.get("decorator").and_then(|d| d.as_str()) {
        return Some(name.to_string());
    }
    if is_void {
        return None;
    }
    Some(options.default_decorator.clone())
}
