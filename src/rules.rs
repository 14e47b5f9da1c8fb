//! Ordered, deduplicating rule registry.
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Start symbol of every compiled grammar.
pub const ROOT_RULE: &str = "root";

/// Name of the bounded-whitespace rule seeded into every table.
pub const SPACE_RULE_NAME: &str = "space";

/// At most one literal space between tokens, so the model cannot run away in whitespace.
pub const SPACE_RULE: &str = r#"" "?"#;

static INVALID_RULE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9-]").expect("static rule name pattern"));

/// Replace every character outside `[A-Za-z0-9-]` with `-`.
pub fn sanitize_rule_name(name: &str) -> String {
    INVALID_RULE_CHARS_RE.replace_all(name, "-").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: IndexMap<String, String>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTable {
    /// A fresh table holding only the `space` rule.
    pub fn new() -> Self {
        let mut rules = IndexMap::new();
        rules.insert(SPACE_RULE_NAME.to_owned(), SPACE_RULE.to_owned());
        Self { rules }
    }

    /// Register `body` under `name` and return the canonical name.
    ///
    /// - unused name, or same body already there → the sanitized name itself
    /// - same name, different body → first free `{name}{i}` for `i = 0, 1, ...`
    ///
    /// `root` is reserved for [`RuleTable::add_root_rule`]; nested rules
    /// that sanitize to it, or to nothing, are suffixed like any other collision.
    pub fn add_rule(&mut self, name: &str, body: &str) -> String {
        self.insert(name, body, false)
    }

    /// Register the start rule.
    pub fn add_root_rule(&mut self, body: &str) -> String {
        self.insert(ROOT_RULE, body, true)
    }

    fn insert(&mut self, name: &str, body: &str, is_root: bool) -> String {
        let esc_name = sanitize_rule_name(name);
        let reserved = !is_root && (esc_name == ROOT_RULE || esc_name.is_empty());
        let reusable = !reserved
            && self.rules.get(&esc_name).is_none_or(|existing| existing == body);

        let key = if reusable {
            esc_name
        } else {
            let mut i = 0usize;
            while self.rules.contains_key(&format!("{esc_name}{i}")) {
                i += 1;
            }
            let key = format!("{esc_name}{i}");
            tracing::debug!(name = %esc_name, renamed = %key, "rule name collision");
            key
        };

        if !self.rules.contains_key(&key) {
            tracing::debug!(rule = %key, "registered rule");
            self.rules.insert(key.clone(), body.to_owned());
        }
        key
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.rules.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_starts_with_space() {
        let table = RuleTable::new();
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next(), Some(("space", r#"" "?"#)));
    }

    #[test]
    fn sanitize_replaces_each_invalid_char() {
        assert_eq!(sanitize_rule_name("a_b.c"), "a-b-c");
        assert_eq!(sanitize_rule_name("user-first name"), "user-first-name");
        assert_eq!(sanitize_rule_name("ok-Name-9"), "ok-Name-9");
        assert_eq!(sanitize_rule_name("é"), "-");
    }

    #[test]
    fn same_name_same_body_is_reused() {
        let mut table = RuleTable::new();
        assert_eq!(table.add_rule("item", "x"), "item");
        assert_eq!(table.add_rule("item", "x"), "item");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn collisions_take_first_free_suffix() {
        let mut table = RuleTable::new();
        assert_eq!(table.add_rule("a_b", "one"), "a-b");
        assert_eq!(table.add_rule("a.b", "two"), "a-b0");
        assert_eq!(table.add_rule("a b", "three"), "a-b1");
        // existing suffixed bodies are not revisited: the scan only looks for a free slot
        assert_eq!(table.add_rule("a-b", "two"), "a-b2");
        assert_eq!(table.get("a-b"), Some("one"));
        assert_eq!(table.get("a-b0"), Some("two"));
        assert_eq!(table.get("a-b1"), Some("three"));
    }

    #[test]
    fn root_is_reserved_for_the_start_rule() {
        let mut table = RuleTable::new();
        assert_eq!(table.add_rule("root", "nested"), "root0");
        assert_eq!(table.add_root_rule("top"), "root");
        assert_eq!(table.get("root"), Some("top"));
    }

    #[test]
    fn empty_name_is_never_registered_bare() {
        let mut table = RuleTable::new();
        assert_eq!(table.add_rule("", "a"), "0");
        assert_eq!(table.add_rule("", "b"), "1");
        assert!(!table.contains(""));
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut table = RuleTable::new();
        table.add_rule("zeta", "1");
        table.add_rule("alpha", "2");
        let names: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["space", "zeta", "alpha"]);
    }
}
