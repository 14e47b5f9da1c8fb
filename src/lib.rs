//! JSON Schema → GBNF grammar compiler.
//!
//! Turns a (reference-free) JSON Schema into a flat list of `name ::= body`
//! rules for grammar-constrained decoding. The grammar accepts JSON shaped
//! like the schema, with at most one space between tokens.
//!
//! Pipeline:
//! - [`inline`] expands local `$ref` pointers (front end);
//! - [`visitor`] classifies each node ([`ir::SchemaNode`]) and registers rules
//!   in a [`rules::RuleTable`];
//! - [`grammar`] prints the table.
//!
//! Supported keywords: `oneOf`/`anyOf`, `const`, `enum`, `object` with
//! `properties`, `array` with `items`, and the five primitive types.
pub mod config;
pub mod error;
pub mod grammar;
pub mod inline;
pub mod ir;
pub mod literal;
pub mod order;
pub mod path_de;
pub mod primitive;
pub mod rules;
pub mod visitor;

use serde_json::Value;

pub use config::CompileOptions;
pub use error::{ConfigError, Error, InlineError, SchemaError};
pub use grammar::format_grammar;
pub use inline::inline;
pub use literal::format_literal;
pub use order::{declared_order, PropertyOrder};
pub use rules::RuleTable;
pub use visitor::{Compilation, Visitor};

/// Compile a reference-free schema with an optional property order.
pub fn json_schema_to_grammar<S: AsRef<str>>(
    schema: &Value,
    prop_order: &[S],
) -> Result<String, SchemaError> {
    let order = PropertyOrder::new(prop_order);
    let compiled = compile(schema, &order, visitor::DEFAULT_MAX_DEPTH)?;
    Ok(format_grammar(&compiled.rules))
}

/// Compile into a fresh [`RuleTable`], nesting at most `max_depth` levels.
pub fn compile(
    schema: &Value,
    order: &PropertyOrder,
    max_depth: usize,
) -> Result<Compilation, SchemaError> {
    visitor::compile_schema(schema, order, max_depth)
}

/// Inline `$ref`s; the compiler itself never follows references.
pub fn json_schema_with_inlining(document: &Value) -> Result<Value, InlineError> {
    inline::inline(document)
}

/// Inline, pick the property order from `options`, compile and format.
pub fn compile_document(document: &Value, options: &CompileOptions) -> Result<String, Error> {
    let schema = inline::inline(document)?;
    let order = if !options.property_order.is_empty() {
        PropertyOrder::new(&options.property_order)
    } else if options.declared_order {
        PropertyOrder::new(declared_order(&schema))
    } else {
        PropertyOrder::default()
    };
    let compiled = compile(&schema, &order, options.max_depth)?;
    tracing::debug!(rules = compiled.rules.len(), "compiled schema");
    Ok(format_grammar(&compiled.rules))
}

// ------------------------------- Tests ------------------------------------ //
