//! `$ref` inlining front end.
//!
//! Produces a reference-free tree for the compiler: every `{"$ref": "#/..."}`
//! object is replaced by a copy of its (recursively inlined) target, and the
//! definition maps are left out of the root.
use serde_json::{Map, Value};

use crate::error::InlineError;

/// Definition containers left out of the inlined root.
pub const DEFINITION_KEYS: [&str; 2] = ["$defs", "definitions"];

/// Definitions are only expanded when something reaches them through a
/// `$ref`, so an unused cyclic or dangling definition is harmless.
pub fn inline(document: &Value) -> Result<Value, InlineError> {
    let mut stack = Vec::new();
    match document {
        Value::Object(map) if !matches!(map.get("$ref"), Some(Value::String(_))) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                if DEFINITION_KEYS.contains(&k.as_str()) {
                    continue;
                }
                out.insert(k.clone(), expand(v, document, &mut stack)?);
            }
            Ok(Value::Object(out))
        }
        _ => expand(document, document, &mut stack),
    }
}

fn expand(node: &Value, document: &Value, stack: &mut Vec<String>) -> Result<Value, InlineError> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                return expand_reference(reference, document, stack);
            }
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), expand(v, document, stack)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(xs) => xs
            .iter()
            .map(|x| expand(x, document, stack))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

fn expand_reference(
    reference: &str,
    document: &Value,
    stack: &mut Vec<String>,
) -> Result<Value, InlineError> {
    let pointer = reference
        .strip_prefix('#')
        .ok_or_else(|| InlineError::UnsupportedReference { reference: reference.to_owned() })?;
    if stack.iter().any(|r| r == reference) {
        return Err(InlineError::Cyclic { reference: reference.to_owned() });
    }
    let target = document
        .pointer(pointer)
        .ok_or_else(|| InlineError::Unresolvable { reference: reference.to_owned() })?;

    tracing::trace!(reference, "inlining reference");
    stack.push(reference.to_owned());
    let expanded = expand(target, document, stack);
    stack.pop();
    expanded
}
