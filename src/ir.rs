// Tagged view over a raw schema node. Borrowed; no cloning of the input tree.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::primitive::Primitive;

#[derive(Debug, Clone, Copy)]
pub enum SchemaNode<'a> {
    Alternation(&'a [Value]),       // oneOf / anyOf arms
    Const(&'a Value),
    Enum(&'a [Value]),
    Object(&'a Map<String, Value>), // the `properties` map
    Array(&'a Value),               // the `items` schema
    Primitive(Primitive),
}

impl<'a> SchemaNode<'a> {
    /// Classify `schema`. Precedence matters: a node can match several arms
    /// (e.g. `const` next to `type`), the first match wins.
    ///
    /// `path` only feeds error messages.
    pub fn classify(schema: &'a Value, path: &str) -> Result<Self, SchemaError> {
        let unsupported = || SchemaError::UnsupportedShape {
            path: display_path(path),
            schema: schema.to_string(),
        };
        let obj = schema.as_object().ok_or_else(unsupported)?;
        let schema_type = obj.get("type").and_then(Value::as_str);

        if obj.contains_key("oneOf") || obj.contains_key("anyOf") {
            let one_of = obj.get("oneOf").and_then(Value::as_array).filter(|xs| !xs.is_empty());
            let arms = match one_of {
                Some(xs) => xs,
                None => obj.get("anyOf").and_then(Value::as_array).ok_or_else(unsupported)?,
            };
            if arms.is_empty() {
                return Err(unsupported());
            }
            return Ok(Self::Alternation(arms));
        }

        if let Some(value) = obj.get("const") {
            return Ok(Self::Const(value));
        }

        if let Some(values) = obj.get("enum") {
            let values = values.as_array().ok_or_else(unsupported)?;
            return Ok(Self::Enum(values));
        }

        if schema_type == Some("object") {
            if let Some(props) = obj.get("properties") {
                let props = props.as_object().ok_or_else(unsupported)?;
                return Ok(Self::Object(props));
            }
        }

        if schema_type == Some("array") {
            if let Some(items) = obj.get("items") {
                return Ok(Self::Array(items));
            }
        }

        match schema_type {
            Some(name) => Primitive::from_type_name(name)
                .map(Self::Primitive)
                .ok_or_else(|| SchemaError::UnsupportedPrimitive {
                    path: display_path(path),
                    type_name: name.to_owned(),
                }),
            None => Err(unsupported()),
        }
    }
}

pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() { "root".to_owned() } else { path.to_owned() }
}
