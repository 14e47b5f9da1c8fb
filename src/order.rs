//! Property ordering for object rules.
use std::collections::HashMap;

use indexmap::IndexSet;
use serde_json::Value;

/// Rank table built from a caller-supplied list of property names.
///
/// Listed names rank by position; unlisted names all rank after them and fall
/// back to comparing the key itself.
#[derive(Debug, Clone, Default)]
pub struct PropertyOrder {
    ranks: HashMap<String, usize>,
}

impl PropertyOrder {
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        for (idx, name) in names.into_iter().enumerate() {
            // later duplicates overwrite earlier ones
            ranks.insert(name.as_ref().to_owned(), idx);
        }
        Self { ranks }
    }

    pub fn rank(&self, key: &str) -> usize {
        self.ranks.get(key).copied().unwrap_or(self.ranks.len())
    }

    /// Sort `(key, schema)` pairs by `(rank, key)`.
    pub fn sort<T>(&self, pairs: &mut [(&str, T)]) {
        pairs.sort_by(|(a, _), (b, _)| (self.rank(a), *a).cmp(&(self.rank(b), *b)));
    }
}

/// Every property name under a `properties` map, in declaration order.
///
/// Walks the whole schema depth-first and keeps the first occurrence of each
/// name. Needs `serde_json`'s `preserve_order` feature to see declaration order.
pub fn declared_order(schema: &Value) -> Vec<String> {
    let mut seen = IndexSet::new();
    collect_declared(schema, &mut seen);
    seen.into_iter().collect()
}

fn collect_declared(value: &Value, seen: &mut IndexSet<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(props)) = map.get("properties") {
                for key in props.keys() {
                    seen.insert(key.clone());
                }
            }
            for child in map.values() {
                collect_declared(child, seen);
            }
        }
        Value::Array(xs) => {
            for x in xs {
                collect_declared(x, seen);
            }
        }
        _ => {}
    }
}
