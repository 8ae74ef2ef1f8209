//! Core types shared by the compiler, validator, merge, and adapter.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Known schema type tags.
pub const VALID_TYPES: &[&str] = &[
    "string", "number", "boolean", "date", "array", "object", "void",
];

/// Known presentation pattern states.
pub const PATTERN_STATES: &[&str] = &["editable", "disabled", "readOnly", "readPretty"];

/// Known validation trigger kinds.
pub const VALIDATE_TRIGGERS: &[&str] = &["onInput", "onFocus", "onBlur"];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Type tag of a schema node.
///
/// `Void` marks a non-data container: it participates in layout and
/// addressing but contributes no segment to the data path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
    Date,
    Array,
    Object,
    Void,
}

impl SchemaType {
    /// Parse a type tag from a string.
    ///
    /// Returns `None` for unknown tags (the validator reports these; the
    /// compiler falls back to string-like defaults).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "boolean" => Some(SchemaType::Boolean),
            "date" => Some(SchemaType::Date),
            "array" => Some(SchemaType::Array),
            "object" => Some(SchemaType::Object),
            "void" => Some(SchemaType::Void),
            _ => None,
        }
    }

    /// Returns the tag string for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Date => "date",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Void => "void",
        }
    }
}

/// Options for schema compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Overrides/extensions for the default type → component table.
    pub component_mapping: HashMap<String, String>,
    /// Decorator applied to non-void fields without an explicit one.
    pub default_decorator: String,
    /// Component used when no mapping matches.
    pub fallback_component: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        let mut mapping = HashMap::new();
        mapping.insert("string".to_string(), "Input".to_string());
        mapping.insert("number".to_string(), "InputNumber".to_string());
        mapping.insert("boolean".to_string(), "Switch".to_string());
        mapping.insert("date".to_string(), "DatePicker".to_string());
        Self {
            component_mapping: mapping,
            default_decorator: "FormItem".to_string(),
            fallback_component: "Input".to_string(),
        }
    }
}

impl CompileOptions {
    /// Create options with the default component table and decorator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a type tag to a component name, overriding the default table.
    pub fn component(mut self, type_tag: impl Into<String>, name: impl Into<String>) -> Self {
        self.component_mapping.insert(type_tag.into(), name.into());
        self
    }

    /// Set the default decorator name.
    pub fn decorator(mut self, name: impl Into<String>) -> Self {
        self.default_decorator = name.into();
        self
    }

    /// Set the component used when no mapping matches.
    pub fn fallback(mut self, name: impl Into<String>) -> Self {
        self.fallback_component = name.into();
        self
    }
}

/// A condition in the string-embedded expression language.
///
/// The adapter only ever *constructs* conditions; evaluation belongs to the
/// form runtime. An expression carries the data paths it references so
/// reactions can declare what they watch.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    watch: Vec<String>,
}

impl Expression {
    /// `$values.<path> === <literal>`
    pub fn eq(path: &str, value: &Value) -> Self {
        Self {
            source: format!("$values.{} === {}", path, json_literal(value)),
            watch: vec![path.to_string()],
        }
    }

    /// `[<literals>].includes($values.<path>)`
    pub fn is_in(path: &str, values: &[Value]) -> Self {
        let literals: Vec<String> = values.iter().map(json_literal).collect();
        Self {
            source: format!("[{}].includes($values.{})", literals.join(","), path),
            watch: vec![path.to_string()],
        }
    }

    /// `!!$values.<path>`
    pub fn truthy(path: &str) -> Self {
        Self {
            source: format!("!!$values.{}", path),
            watch: vec![path.to_string()],
        }
    }

    /// Index-based branch condition: `$values.__oneOfIndex === <n>`.
    ///
    /// Requires the external runtime to populate `__oneOfIndex`; used only
    /// as a fallback when no discriminator can be inferred.
    pub fn index_eq(index: usize) -> Self {
        Self {
            source: format!("$values.__oneOfIndex === {}", index),
            watch: Vec::new(),
        }
    }

    /// Conjoin a non-empty list of expressions with `&&`.
    pub fn and(mut parts: Vec<Expression>) -> Self {
        if parts.len() == 1 {
            if let Some(only) = parts.pop() {
                return only;
            }
        }
        let mut watch = Vec::new();
        let sources: Vec<String> = parts
            .into_iter()
            .map(|p| {
                for w in p.watch {
                    if !watch.contains(&w) {
                        watch.push(w);
                    }
                }
                format!("({})", p.source)
            })
            .collect();
        Self {
            source: sources.join(" && "),
            watch,
        }
    }

    /// Logical negation of this expression.
    pub fn negate(self) -> Self {
        Self {
            source: format!("!({})", self.source),
            watch: self.watch,
        }
    }

    /// The data paths this expression references.
    pub fn watch_paths(&self) -> &[String] {
        &self.watch
    }

    /// Embed as a `{{...}}` template string for a `when` attribute.
    pub fn embed(&self) -> String {
        format!("{{{{{}}}}}", self.source)
    }
}

fn json_literal(value: &Value) -> String {
    // serde_json's string form doubles as a JS literal for scalars
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_type_parse_valid() {
        assert_eq!(SchemaType::parse("string"), Some(SchemaType::String));
        assert_eq!(SchemaType::parse("void"), Some(SchemaType::Void));
        assert_eq!(SchemaType::parse("date"), Some(SchemaType::Date));
    }

    #[test]
    fn schema_type_parse_invalid() {
        assert_eq!(SchemaType::parse("integer"), None);
        assert_eq!(SchemaType::parse("Object"), None);
        assert_eq!(SchemaType::parse(""), None);
    }

    #[test]
    fn schema_type_round_trip() {
        for tag in VALID_TYPES {
            assert_eq!(SchemaType::parse(tag).unwrap().as_str(), *tag);
        }
    }

    #[test]
    fn compile_options_defaults() {
        let opts = CompileOptions::new();
        assert_eq!(opts.component_mapping["number"], "InputNumber");
        assert_eq!(opts.default_decorator, "FormItem");
        assert_eq!(opts.fallback_component, "Input");
    }

    #[test]
    fn compile_options_builder() {
        let opts = CompileOptions::new()
            .component("string", "TextArea")
            .decorator("Cell");
        assert_eq!(opts.component_mapping["string"], "TextArea");
        assert_eq!(opts.default_decorator, "Cell");
    }

    #[test]
    fn expression_eq_string() {
        let expr = Expression::eq("role", &json!("admin"));
        assert_eq!(expr.embed(), r#"{{$values.role === "admin"}}"#);
        assert_eq!(expr.watch_paths(), &["role".to_string()]);
    }

    #[test]
    fn expression_is_in() {
        let expr = Expression::is_in("kind", &[json!("a"), json!(1)]);
        assert_eq!(expr.embed(), r#"{{["a",1].includes($values.kind)}}"#);
    }

    #[test]
    fn expression_and_dedupes_watch() {
        let expr = Expression::and(vec![
            Expression::eq("a", &json!(1)),
            Expression::truthy("a"),
            Expression::eq("b", &json!(2)),
        ]);
        assert_eq!(expr.watch_paths(), &["a".to_string(), "b".to_string()]);
        assert_eq!(
            expr.embed(),
            "{{($values.a === 1) && (!!$values.a) && ($values.b === 2)}}"
        );
    }

    #[test]
    fn expression_and_single_unwrapped() {
        let expr = Expression::and(vec![Expression::eq("a", &json!(true))]);
        assert_eq!(expr.embed(), "{{$values.a === true}}");
    }

    #[test]
    fn expression_negate() {
        let expr = Expression::eq("role", &json!("admin")).negate();
        assert_eq!(expr.embed(), r#"{{!($values.role === "admin")}}"#);
    }

    #[test]
    fn expression_index_fallback() {
        let expr = Expression::index_eq(2);
        assert_eq!(expr.embed(), "{{$values.__oneOfIndex === 2}}");
        assert!(expr.watch_paths().is_empty());
    }
}
