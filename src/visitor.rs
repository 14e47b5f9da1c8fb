//! Recursive schema → rule compiler.
//!
//! Holds no state of its own. Every call threads the caller's [`RuleTable`]
//! and a shared [`PropertyOrder`] through the recursion, so independent
//! compilations never share anything.
use serde_json::Value;

use crate::error::SchemaError;
use crate::ir::{display_path, SchemaNode};
use crate::literal::{format_literal, format_str_literal};
use crate::order::PropertyOrder;
use crate::rules::{RuleTable, ROOT_RULE};

/// Default bound on schema nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy)]
pub struct Visitor<'o> {
    order: &'o PropertyOrder,
    max_depth: usize,
}

impl<'o> Visitor<'o> {
    pub fn new(order: &'o PropertyOrder) -> Self {
        Self { order, max_depth: DEFAULT_MAX_DEPTH }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Compile `schema` into `table` and return the rule name standing for it.
    ///
    /// `name` is the path-derived hint. Only the entry call with an empty
    /// hint registers `root`; nested nodes always go through `add_rule`.
    pub fn visit(
        &self,
        table: &mut RuleTable,
        schema: &Value,
        name: &str,
    ) -> Result<String, SchemaError> {
        self.visit_at(table, schema, name, 0)
    }

    fn visit_at(
        &self,
        table: &mut RuleTable,
        schema: &Value,
        name: &str,
        depth: usize,
    ) -> Result<String, SchemaError> {
        if depth > self.max_depth {
            return Err(SchemaError::TooDeep {
                path: display_path(name),
                max_depth: self.max_depth,
            });
        }
        // only the entry node is the start symbol; a nested hint can be empty too
        let is_root = depth == 0 && name.is_empty();
        let register = |table: &mut RuleTable, body: &str| {
            if is_root {
                table.add_root_rule(body)
            } else {
                table.add_rule(name, body)
            }
        };

        match SchemaNode::classify(schema, name)? {
            SchemaNode::Alternation(arms) => {
                let mut alts = Vec::with_capacity(arms.len());
                for (i, arm) in arms.iter().enumerate() {
                    let arm_name = child_name(name, &i.to_string());
                    alts.push(self.visit_at(table, arm, &arm_name, depth + 1)?);
                }
                Ok(register(table, &alts.join(" | ")))
            }
            SchemaNode::Const(value) => Ok(register(table, &format_literal(value))),
            SchemaNode::Enum(values) => {
                let body = values.iter().map(format_literal).collect::<Vec<_>>().join(" | ");
                Ok(register(table, &body))
            }
            SchemaNode::Object(props) => {
                let mut pairs: Vec<(&str, &Value)> =
                    props.iter().map(|(k, v)| (k.as_str(), v)).collect();
                self.order.sort(&mut pairs);

                let mut body = String::from(r#""{" space"#);
                for (i, (key, prop_schema)) in pairs.into_iter().enumerate() {
                    let prop_name = child_name(name, key);
                    let prop_rule = self.visit_at(table, prop_schema, &prop_name, depth + 1)?;
                    if i > 0 {
                        body.push_str(r#" "," space"#);
                    }
                    let key_literal = format_str_literal(key);
                    body.push_str(&format!(r#" {key_literal} space ":" space {prop_rule}"#));
                }
                body.push_str(r#" "}" space"#);
                Ok(register(table, &body))
            }
            SchemaNode::Array(items) => {
                let item = self.visit_at(table, items, &child_name(name, "item"), depth + 1)?;
                let body = format!(r#""[" space ({item} ("," space {item})*)? "]" space"#);
                Ok(register(table, &body))
            }
            SchemaNode::Primitive(primitive) => {
                if is_root {
                    Ok(table.add_root_rule(primitive.rule_body()))
                } else {
                    Ok(table.add_rule(primitive.rule_name(), primitive.rule_body()))
                }
            }
        }
    }
}

/// `{name}-{suffix}`, or just `suffix` at the root.
fn child_name(name: &str, suffix: &str) -> String {
    if name.is_empty() {
        suffix.to_owned()
    } else {
        format!("{name}-{suffix}")
    }
}

/// Output of one compilation: the start symbol and the finished table.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub root: String,
    pub rules: RuleTable,
}

/// Compile `schema` into a fresh table.
pub fn compile_schema(
    schema: &Value,
    order: &PropertyOrder,
    max_depth: usize,
) -> Result<Compilation, SchemaError> {
    let mut rules = RuleTable::new();
    let root = Visitor::new(order)
        .with_max_depth(max_depth)
        .visit(&mut rules, schema, "")?;
    debug_assert_eq!(root, ROOT_RULE);
    Ok(Compilation { root, rules })
}

// ------------------------------- Tests ------------------------------------ //
