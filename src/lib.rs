//! Form Schema Compiler
//!
//! Compiles declarative form schemas into flat, renderer-ready field maps.
//!
//! A form schema is a JSON tree: object and void nodes group fields, leaf
//! nodes describe inputs. The compiler walks the tree once and produces a
//! `CompiledSchema` keyed by address, with component/decorator resolution and
//! the dual address/data-path algebra already applied. Companion passes merge
//! schemas structurally, lint them statically, and translate to and from
//! standard JSON Schema.
//!
//! # Example
//!
//! ```
//! use form_schema::{compile, CompileOptions};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "card": {
//!             "type": "void",
//!             "component": "Card",
//!             "properties": {
//!                 "name": { "type": "string", "required": true }
//!             }
//!         },
//!         "age": { "type": "number" }
//!     }
//! });
//!
//! let compiled = compile(&schema, &CompileOptions::default());
//!
//! // Void containers appear in addresses but not in data paths
//! let name = &compiled.fields["card.name"];
//! assert_eq!(name.data_path, "name");
//! assert_eq!(name.resolved_component.as_deref(), Some("Input"));
//!
//! let age = &compiled.fields["age"];
//! assert_eq!(age.resolved_component.as_deref(), Some("InputNumber"));
//! ```
//!
//! # Path Algebra
//!
//! | Node | Address | Data path |
//! |------|---------|-----------|
//! | field under the root | `age` | `age` |
//! | field inside a void container | `card.name` | `name` |
//! | array item template | `tags.*` | `tags` |
//!
//! Array item addresses use a literal `*`; the runtime substitutes indices
//! when instantiating rows, so item templates share the array's data path.

mod adapter;
mod compiler;
mod error;
mod loader;
mod merge;
mod types;
mod validator;

pub use adapter::{from_standard, humanize_key, to_standard, AdapterOptions, ConditionalMode, LabelStrategy};
pub use compiler::{compile, join_path, split_path, CompiledField, CompiledSchema};
pub use error::LoadError;
pub use loader::{expect_object, load_schema, load_schema_str};
pub use merge::merge;
pub use types::{
    json_type_name, CompileOptions, Expression, SchemaType, PATTERN_STATES, VALIDATE_TRIGGERS,
    VALID_TYPES,
};
pub use validator::{validate, Diagnostic, Severity, ValidationReport};
