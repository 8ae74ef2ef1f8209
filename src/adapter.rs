//! JSON Schema adapter - translates between the standard interchange dialect
//! (Draft-07 / 2020-12 subset) and the internal form-schema dialect.
//!
//! `from_standard` reads only the keyword subset needed to produce form
//! metadata; unrecognized standard keywords (`patternProperties`,
//! `unevaluatedProperties`, ...) are silently ignored. The hard part is
//! conditional logic: `if/then/else`, dependency keywords, and
//! `oneOf`/`anyOf` branches are derived into the internal reactive-rule
//! representation, with discriminator inference across branches.
//!
//! `to_standard` is the lossy structural inverse: it reverses the per-node
//! keyword mapping and drops behavior-only attributes (`reactions`,
//! `component`, branch conditions).

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::compiler::join_path;
use crate::types::Expression;

/// Target representation for `if/then/else` sub-schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionalMode {
    /// Emit per-target reactions (default).
    #[default]
    Reactions,
    /// Emit `oneOf` branches keyed by the condition values.
    OneOf,
}

/// Strategy for deriving field titles.
#[derive(Debug, Clone, Copy, Default)]
pub enum LabelStrategy {
    /// Verbatim `title` attribute only.
    #[default]
    Title,
    /// Humanize the property key (camelCase/snake_case/kebab-case → words)
    /// when no `title` is present.
    Humanize,
    /// Caller-supplied key-to-label function.
    Custom(fn(&str) -> String),
}

/// Options for standard → internal conversion.
#[derive(Debug, Clone)]
pub struct AdapterOptions {
    pub conditional_mode: ConditionalMode,
    pub label: LabelStrategy,
    /// Mirror `description` into a `componentProps.placeholder` hint.
    pub description_as_placeholder: bool,
    /// `format` → component hint table.
    pub format_components: HashMap<String, String>,
    /// `format` → internal rule format tag table.
    pub format_rules: HashMap<String, String>,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        let mut format_components = HashMap::new();
        format_components.insert("date".to_string(), "DatePicker".to_string());
        format_components.insert("date-time".to_string(), "DatePicker".to_string());
        format_components.insert("time".to_string(), "TimePicker".to_string());

        let mut format_rules = HashMap::new();
        format_rules.insert("email".to_string(), "email".to_string());
        format_rules.insert("uri".to_string(), "url".to_string());
        format_rules.insert("date".to_string(), "date".to_string());
        format_rules.insert("date-time".to_string(), "datetime".to_string());
        format_rules.insert("time".to_string(), "time".to_string());

        Self {
            conditional_mode: ConditionalMode::Reactions,
            label: LabelStrategy::Title,
            description_as_placeholder: false,
            format_components,
            format_rules,
        }
    }
}

impl AdapterOptions {
    /// Create options with the default tables and reaction-mode conditionals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `oneOf` branches instead of reactions for `if/then/else`.
    pub fn one_of_mode(mut self) -> Self {
        self.conditional_mode = ConditionalMode::OneOf;
        self
    }

    /// Derive titles from property keys when no `title` is present.
    pub fn humanize_labels(mut self) -> Self {
        self.label = LabelStrategy::Humanize;
        self
    }

    /// Use a caller-supplied key-to-label function.
    pub fn label_fn(mut self, f: fn(&str) -> String) -> Self {
        self.label = LabelStrategy::Custom(f);
        self
    }

    /// Mirror `description` into a placeholder hint.
    pub fn placeholder_from_description(mut self, enabled: bool) -> Self {
        self.description_as_placeholder = enabled;
        self
    }

    /// Override the `format` → component hint table.
    pub fn format_component(mut self, format: impl Into<String>, name: impl Into<String>) -> Self {
        self.format_components.insert(format.into(), name.into());
        self
    }
}

/// Convert a standard JSON Schema into the internal dialect.
///
/// The output is valid input to `compile`, `merge`, and `validate`.
pub fn from_standard(standard: &Value, options: &AdapterOptions) -> Value {
    convert_node(standard, "", None, options)
}

/// Convert an internal schema into a standard JSON Schema.
///
/// Lossy inverse of the per-node conversion only: no attempt is made to
/// reconstruct `if/then/else` from reactions. Void containers are flattened
/// into their parent's `properties`, mirroring the data-path semantics.
pub fn to_standard(schema: &Value) -> Value {
    export_node(schema)
}

// --- Standard → internal ---

fn convert_node(
    node: &Value,
    data_path: &str,
    name: Option<&str>,
    options: &AdapterOptions,
) -> Value {
    let Some(source) = node.as_object() else {
        // `true`/`false` schemas and other degenerate forms
        return json!({});
    };

    // allOf flattens into a single node before anything else looks at it
    let flattened;
    let source = if source.contains_key("allOf") {
        flattened = flatten_all_of(source);
        &flattened
    } else {
        source
    };

    let mut out = Map::new();

    if let Some(tag) = convert_type(source.get("type")) {
        out.insert("type".to_string(), Value::String(tag));
    }

    if let Some(title) = resolve_title(source, name, options) {
        out.insert("title".to_string(), Value::String(title));
    }

    if let Some(desc) = source.get("description").and_then(|d| d.as_str()) {
        out.insert("description".to_string(), json!(desc));
        if options.description_as_placeholder {
            out.insert(
                "componentProps".to_string(),
                json!({"placeholder": desc}),
            );
        }
    }

    if let Some(default) = source.get("default") {
        out.insert("default".to_string(), default.clone());
    }
    if source.get("readOnly").and_then(|r| r.as_bool()) == Some(true) {
        out.insert("readOnly".to_string(), json!(true));
    }

    if let Some(format) = source.get("format").and_then(|f| f.as_str()) {
        if let Some(component) = options.format_components.get(format) {
            out.insert("component".to_string(), json!(component));
        }
    }

    let rules = convert_rules(source, options);
    if !rules.is_empty() {
        out.insert("rules".to_string(), Value::Array(rules));
    }

    if let Some(entries) = source.get("enum").and_then(|e| e.as_array()) {
        let pairs: Vec<Value> = entries
            .iter()
            .map(|v| json!({"label": scalar_label(v), "value": v}))
            .collect();
        out.insert("enum".to_string(), Value::Array(pairs));
    }

    for key in ["minItems", "maxItems"] {
        if let Some(v) = source.get(key) {
            out.insert(key.to_string(), v.clone());
        }
    }

    // Recurse into properties, threading the data path for conditional logic
    let required_names = string_list(source.get("required"));
    if let Some(props) = source.get("properties").and_then(|p| p.as_object()) {
        let mut converted = Map::new();
        for (child_name, child) in props {
            let child_path = join_path(data_path, child_name);
            let mut child_out = convert_node(child, &child_path, Some(child_name), options);
            if required_names.iter().any(|r| r == child_name) {
                if let Some(map) = child_out.as_object_mut() {
                    map.insert("required".to_string(), json!(true));
                }
            }
            converted.insert(child_name.clone(), child_out);
        }
        out.insert("properties".to_string(), Value::Object(converted));
    }

    if let Some(items) = source.get("items") {
        if items.is_object() {
            // item templates share the array's data path; indices are runtime
            out.insert(
                "items".to_string(),
                convert_node(items, data_path, None, options),
            );
        }
    }

    convert_conditional(source, data_path, options, &mut out);
    convert_dependencies(source, data_path, options, &mut out);
    convert_branches(source, data_path, options, &mut out);

    for key in ["definitions", "$defs"] {
        if let Some(defs) = source.get(key).and_then(|d| d.as_object()) {
            let mut converted = Map::new();
            for (def_name, def) in defs {
                converted.insert(
                    def_name.clone(),
                    convert_node(def, "", Some(def_name), options),
                );
            }
            // exposed uniformly regardless of which keyword the source used
            out.insert("definitions".to_string(), Value::Object(converted));
        }
    }

    Value::Object(out)
}

/// Deep-merge all `allOf` branches into one node. `required` arrays are
/// unioned; `properties` merge key-by-key; later branches win on scalars.
fn flatten_all_of(source: &Map<String, Value>) -> Map<String, Value> {
    let mut result: Map<String, Value> = source.clone();
    let branches = result.remove("allOf");

    let Some(Value::Array(branches)) = branches else {
        return result;
    };

    for branch in &branches {
        let Some(branch_map) = branch.as_object() else {
            continue;
        };
        for (key, value) in branch_map {
            match (key.as_str(), result.get(key)) {
                ("required", Some(existing)) => {
                    let mut union = string_list(Some(existing));
                    for name in string_list(Some(value)) {
                        if !union.contains(&name) {
                            union.push(name);
                        }
                    }
                    result.insert(
                        key.clone(),
                        Value::Array(union.into_iter().map(Value::String).collect()),
                    );
                }
                ("properties", Some(existing)) => {
                    let merged = merge_prop_maps(existing, value);
                    result.insert(key.clone(), merged);
                }
                _ => {
                    result.insert(key.clone(), value.clone());
                }
            }
        }
    }

    result
}

fn merge_prop_maps(base: &Value, overlay: &Value) -> Value {
    let (Some(base_map), Some(overlay_map)) = (base.as_object(), overlay.as_object()) else {
        return overlay.clone();
    };
    let mut result = base_map.clone();
    for (name, overlay_child) in overlay_map {
        let merged = match (
            base_map.get(name).and_then(|b| b.as_object()),
            overlay_child.as_object(),
        ) {
            (Some(base_child), Some(overlay_map)) => {
                let mut m = base_child.clone();
                for (k, v) in overlay_map {
                    m.insert(k.clone(), v.clone());
                }
                Value::Object(m)
            }
            _ => overlay_child.clone(),
        };
        result.insert(name.clone(), merged);
    }
    Value::Object(result)
}

fn convert_type(type_value: Option<&Value>) -> Option<String> {
    let tag = match type_value? {
        Value::String(s) => s.clone(),
        Value::Array(arr) => arr
            .iter()
            .filter_map(|v| v.as_str())
            .find(|s| *s != "null")?
            .to_string(),
        _ => return None,
    };
    Some(match tag.as_str() {
        "integer" => "number".to_string(),
        _ => tag,
    })
}

fn resolve_title(
    source: &Map<String, Value>,
    name: Option<&str>,
    options: &AdapterOptions,
) -> Option<String> {
    if let Some(title) = source.get("title").and_then(|t| t.as_str()) {
        return Some(title.to_string());
    }
    match options.label {
        LabelStrategy::Title => None,
        LabelStrategy::Humanize => name.map(humanize_key),
        LabelStrategy::Custom(f) => name.map(f),
    }
}

/// Split camelCase, snake_case, and kebab-case keys into capitalized words.
pub fn humanize_key(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in key.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Constraint keywords become internal rules, keyed by their source keyword
/// so the export direction can reverse them losslessly.
fn convert_rules(source: &Map<String, Value>, options: &AdapterOptions) -> Vec<Value> {
    let mut rules = Vec::new();

    for key in [
        "minLength",
        "maxLength",
        "pattern",
        "minimum",
        "maximum",
        "exclusiveMinimum",
        "exclusiveMaximum",
    ] {
        if let Some(v) = source.get(key) {
            rules.push(json!({key: v}));
        }
    }

    if let Some(format) = source.get("format").and_then(|f| f.as_str()) {
        if let Some(rule_tag) = options.format_rules.get(format) {
            rules.push(json!({"format": rule_tag}));
        }
    }

    rules
}

fn scalar_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

// --- if/then/else extraction ---

/// Sibling conditions read from `if.properties`: "field equals a constant"
/// or "field is one of a set", conjoined into a single expression over
/// fully-qualified data paths.
fn extract_condition(if_schema: &Value, data_path: &str) -> Option<(Expression, Vec<(String, Value)>)> {
    let props = if_schema.get("properties")?.as_object()?;
    let mut parts = Vec::new();
    let mut literals = Vec::new();

    for (field, condition) in props {
        let qualified = join_path(data_path, field);
        if let Some(constant) = condition.get("const") {
            parts.push(Expression::eq(&qualified, constant));
            literals.push((field.clone(), constant.clone()));
        } else if let Some(Value::Array(values)) = condition.get("enum") {
            parts.push(Expression::is_in(&qualified, values));
            literals.push((field.clone(), Value::Array(values.clone())));
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some((Expression::and(parts), literals))
}

fn convert_conditional(
    source: &Map<String, Value>,
    data_path: &str,
    options: &AdapterOptions,
    out: &mut Map<String, Value>,
) {
    let Some(if_schema) = source.get("if") else {
        return;
    };
    let Some((condition, literals)) = extract_condition(if_schema, data_path) else {
        return;
    };

    let then_schema = source.get("then");
    let else_schema = source.get("else");

    match options.conditional_mode {
        ConditionalMode::Reactions => {
            // Fields declared only inside then/else still need real targets
            for branch in [then_schema, else_schema].into_iter().flatten() {
                hoist_properties(branch, data_path, options, out);
            }

            let mut reactions = Vec::new();

            let then_required = string_list(then_schema.and_then(|t| t.get("required")));
            for target in &then_required {
                reactions.push(required_reaction(&condition, data_path, target, false));
            }

            // Visibility: present in then.properties, explicitly false in else
            let then_props = then_schema
                .and_then(|t| t.get("properties"))
                .and_then(|p| p.as_object());
            let else_props = else_schema
                .and_then(|e| e.get("properties"))
                .and_then(|p| p.as_object());
            if let (Some(then_props), Some(else_props)) = (then_props, else_props) {
                for field in then_props.keys() {
                    if else_props.get(field) == Some(&Value::Bool(false)) {
                        reactions.push(json!({
                            "watch": condition.watch_paths(),
                            "target": join_path(data_path, field),
                            "when": condition.embed(),
                            "fulfill": {"visible": true},
                            "otherwise": {"visible": false}
                        }));
                    }
                }
            }

            let else_required = string_list(else_schema.and_then(|e| e.get("required")));
            for target in &else_required {
                if !then_required.contains(target) {
                    reactions.push(required_reaction(&condition, data_path, target, true));
                }
            }

            append_reactions(out, reactions);
        }
        ConditionalMode::OneOf => {
            let mut branches = Vec::new();
            if let Some(then_schema) = then_schema {
                let mut when = Map::new();
                for (field, value) in &literals {
                    when.insert(field.clone(), value.clone());
                }
                branches.push(json!({
                    "when": when,
                    "properties": converted_properties(then_schema, data_path, options)
                }));
            }
            if let Some(else_schema) = else_schema {
                branches.push(json!({
                    "when": condition.clone().negate().embed(),
                    "properties": converted_properties(else_schema, data_path, options)
                }));
            }
            append_branches(out, branches);
        }
    }
}

fn required_reaction(
    condition: &Expression,
    data_path: &str,
    target: &str,
    inverted: bool,
) -> Value {
    let when = if inverted {
        condition.clone().negate()
    } else {
        condition.clone()
    };
    json!({
        "watch": when.watch_paths(),
        "target": join_path(data_path, target),
        "when": when.embed(),
        "fulfill": {"required": true},
        "otherwise": {"required": false}
    })
}

/// Convert a branch schema's properties without threading them into the
/// parent (used for oneOf-mode branch payloads).
fn converted_properties(branch: &Value, data_path: &str, options: &AdapterOptions) -> Value {
    let Some(props) = branch.get("properties").and_then(|p| p.as_object()) else {
        return json!({});
    };
    let required_names = string_list(branch.get("required"));
    let mut converted = Map::new();
    for (name, child) in props {
        if !child.is_object() {
            continue;
        }
        let child_path = join_path(data_path, name);
        let mut child_out = convert_node(child, &child_path, Some(name), options);
        if required_names.iter().any(|r| r == name) {
            if let Some(map) = child_out.as_object_mut() {
                map.insert("required".to_string(), json!(true));
            }
        }
        converted.insert(name.clone(), child_out);
    }
    Value::Object(converted)
}

/// Add conditional-branch fields to the parent's properties when they are
/// not already declared there (union; first declaration wins).
fn hoist_properties(
    branch: &Value,
    data_path: &str,
    options: &AdapterOptions,
    out: &mut Map<String, Value>,
) {
    let Some(props) = branch.get("properties").and_then(|p| p.as_object()) else {
        return;
    };

    let existing = out
        .entry("properties".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(existing_map) = existing.as_object_mut() else {
        return;
    };

    for (name, child) in props {
        if !child.is_object() || existing_map.contains_key(name) {
            continue;
        }
        let child_path = join_path(data_path, name);
        existing_map.insert(
            name.clone(),
            convert_node(child, &child_path, Some(name), options),
        );
    }
}

fn append_reactions(out: &mut Map<String, Value>, reactions: Vec<Value>) {
    if reactions.is_empty() {
        return;
    }
    let list = out
        .entry("reactions".to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Some(arr) = list.as_array_mut() {
        arr.extend(reactions);
    }
}

fn append_branches(out: &mut Map<String, Value>, branches: Vec<Value>) {
    if branches.is_empty() {
        return;
    }
    let list = out
        .entry("oneOf".to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Some(arr) = list.as_array_mut() {
        arr.extend(branches);
    }
}

// --- Dependency keywords ---

fn convert_dependencies(
    source: &Map<String, Value>,
    data_path: &str,
    options: &AdapterOptions,
    out: &mut Map<String, Value>,
) {
    let mut reactions = Vec::new();

    // dependentRequired and the array form of `dependencies` are equivalent
    for key in ["dependentRequired", "dependencies"] {
        let Some(deps) = source.get(key).and_then(|d| d.as_object()) else {
            continue;
        };
        for (trigger, targets) in deps {
            let Some(targets) = targets.as_array() else {
                continue;
            };
            let qualified = join_path(data_path, trigger);
            let condition = Expression::truthy(&qualified);
            for target in targets.iter().filter_map(|t| t.as_str()) {
                reactions.push(json!({
                    "watch": [qualified.clone()],
                    "target": join_path(data_path, target),
                    "when": condition.embed(),
                    "fulfill": {"required": true},
                    "otherwise": {"required": false}
                }));
            }
        }
    }

    // dependentSchemas: trigger truthy ⇒ the dependent properties are visible
    if let Some(deps) = source.get("dependentSchemas").and_then(|d| d.as_object()) {
        for (trigger, dependent) in deps {
            let qualified = join_path(data_path, trigger);
            let condition = Expression::truthy(&qualified);

            hoist_properties(dependent, data_path, options, out);

            let Some(props) = dependent.get("properties").and_then(|p| p.as_object()) else {
                continue;
            };
            for name in props.keys() {
                reactions.push(json!({
                    "watch": [qualified.clone()],
                    "target": join_path(data_path, name),
                    "when": condition.embed(),
                    "fulfill": {"visible": true},
                    "otherwise": {"visible": false}
                }));
            }
        }
    }

    append_reactions(out, reactions);
}

// --- oneOf/anyOf branches and discriminator inference ---

fn convert_branches(
    source: &Map<String, Value>,
    data_path: &str,
    options: &AdapterOptions,
    out: &mut Map<String, Value>,
) {
    let mut branches: Vec<&Value> = Vec::new();
    for key in ["oneOf", "anyOf"] {
        if let Some(arr) = source.get(key).and_then(|v| v.as_array()) {
            branches.extend(arr.iter().filter(|b| b.is_object()));
        }
    }
    if branches.is_empty() {
        return;
    }

    let discriminator = infer_discriminator(&branches);
    let mut converted = Vec::new();

    for (index, branch) in branches.iter().enumerate() {
        let mut properties = converted_properties(branch, data_path, options);

        let when = match &discriminator {
            Some(field) => {
                let value = branch_const(branch, field).cloned().unwrap_or(Value::Null);
                // the discriminator lives in the parent, not in each branch
                if let Some(map) = properties.as_object_mut() {
                    map.remove(field);
                }
                json!({field.as_str(): value})
            }
            None => Value::String(Expression::index_eq(index).embed()),
        };

        converted.push(json!({"when": when, "properties": properties}));
    }

    if let Some(field) = &discriminator {
        hoist_discriminator(&branches, field, data_path, options, out);
    }

    append_branches(out, converted);
}

/// The discriminator is the single field that every branch constrains with a
/// `const`, all naming the same property. Anything less falls back to
/// index-based conditions.
fn infer_discriminator(branches: &[&Value]) -> Option<String> {
    let mut shared: Option<String> = None;

    for branch in branches {
        let props = branch.get("properties")?.as_object()?;
        let const_fields: Vec<&String> = props
            .iter()
            .filter(|(_, schema)| schema.get("const").is_some())
            .map(|(name, _)| name)
            .collect();
        if const_fields.len() != 1 {
            return None;
        }
        match &shared {
            None => shared = Some(const_fields[0].clone()),
            Some(existing) if existing == const_fields[0] => {}
            Some(_) => return None,
        }
    }

    shared
}

fn branch_const<'a>(branch: &'a Value, field: &str) -> Option<&'a Value> {
    branch.get("properties")?.get(field)?.get("const")
}

/// Place the discriminator field in the parent's properties, with an enum
/// of every branch's constant so it renders as a selectable field.
fn hoist_discriminator(
    branches: &[&Value],
    field: &str,
    data_path: &str,
    options: &AdapterOptions,
    out: &mut Map<String, Value>,
) {
    let existing = out
        .entry("properties".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(existing_map) = existing.as_object_mut() else {
        return;
    };
    if existing_map.contains_key(field) {
        return;
    }

    let template = branches[0]
        .get("properties")
        .and_then(|p| p.get(field))
        .cloned()
        .unwrap_or(json!({}));
    let child_path = join_path(data_path, field);
    let mut converted = convert_node(&template, &child_path, Some(field), options);

    if let Some(map) = converted.as_object_mut() {
        let values: Vec<Value> = branches
            .iter()
            .filter_map(|b| branch_const(b, field))
            .map(|v| json!({"label": scalar_label(v), "value": v}))
            .collect();
        map.insert("enum".to_string(), Value::Array(values));
    }

    existing_map.insert(field.to_string(), converted);
}

// --- Internal → standard ---

const EXPORT_RULE_KEYS: &[&str] = &[
    "minLength",
    "maxLength",
    "pattern",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
];

fn export_node(node: &Value) -> Value {
    let Some(source) = node.as_object() else {
        return json!({});
    };

    let mut out = Map::new();

    match source.get("type").and_then(|t| t.as_str()) {
        Some("date") => {
            out.insert("type".to_string(), json!("string"));
            out.insert("format".to_string(), json!("date"));
        }
        // void has no standard counterpart; its children are flattened below
        Some("void") | None => {}
        Some(tag) => {
            out.insert("type".to_string(), json!(tag));
        }
    }

    for key in ["title", "description", "default"] {
        if let Some(v) = source.get(key) {
            out.insert(key.to_string(), v.clone());
        }
    }
    if source.get("readOnly").and_then(|r| r.as_bool()) == Some(true) {
        out.insert("readOnly".to_string(), json!(true));
    }

    if let Some(rules) = source.get("rules").and_then(|r| r.as_array()) {
        export_rules(rules, &mut out);
    }

    if let Some(entries) = source.get("enum").and_then(|e| e.as_array()) {
        let values: Vec<Value> = entries
            .iter()
            .map(|entry| match entry.get("value") {
                Some(v) => v.clone(),
                None => entry.clone(),
            })
            .collect();
        out.insert("enum".to_string(), Value::Array(values));
    }

    for key in ["minItems", "maxItems"] {
        if let Some(v) = source.get(key) {
            out.insert(key.to_string(), v.clone());
        }
    }

    if source.get("properties").is_some() {
        let mut props = Map::new();
        let mut required = Vec::new();
        export_properties(source, &mut props, &mut required);
        out.insert("properties".to_string(), Value::Object(props));
        if !required.is_empty() {
            out.insert(
                "required".to_string(),
                Value::Array(required.into_iter().map(Value::String).collect()),
            );
        }
    }

    if let Some(items) = source.get("items") {
        if items.is_object() {
            out.insert("items".to_string(), export_node(items));
        }
    }

    if let Some(defs) = source.get("definitions").and_then(|d| d.as_object()) {
        let mut exported = Map::new();
        for (name, def) in defs {
            exported.insert(name.clone(), export_node(def));
        }
        out.insert("definitions".to_string(), Value::Object(exported));
    }

    Value::Object(out)
}

/// Collect exported child properties, flattening void containers into the
/// parent level and gathering `required: true` flags.
fn export_properties(
    source: &Map<String, Value>,
    props: &mut Map<String, Value>,
    required: &mut Vec<String>,
) {
    let Some(children) = source.get("properties").and_then(|p| p.as_object()) else {
        return;
    };

    for (name, child) in children {
        let is_void = child.get("type").and_then(|t| t.as_str()) == Some("void");
        if is_void {
            if let Some(child_map) = child.as_object() {
                export_properties(child_map, props, required);
            }
            continue;
        }

        props.insert(name.clone(), export_node(child));
        if child.get("required").and_then(|r| r.as_bool()) == Some(true) {
            required.push(name.clone());
        }
    }
}

fn export_rules(rules: &[Value], out: &mut Map<String, Value>) {
    for rule in rules {
        let Some(rule_map) = rule.as_object() else {
            continue;
        };
        for key in EXPORT_RULE_KEYS {
            if let Some(v) = rule_map.get(*key) {
                out.insert((*key).to_string(), v.clone());
            }
        }
        if let Some(tag) = rule_map.get("format").and_then(|f| f.as_str()) {
            let format = match tag {
                "url" => "uri",
                "datetime" => "date-time",
                other => other,
            };
            out.insert("format".to_string(), json!(format));
        }
    }
}
