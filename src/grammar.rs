//! Grammar text output.
use std::fmt;

use crate::rules::RuleTable;

/// One `name ::= body` entry per rule, in insertion order, joined by `\n`.
pub fn format_grammar(rules: &RuleTable) -> String {
    rules
        .iter()
        .map(|(name, body)| format!("{name} ::= {body}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_grammar(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_prints_space_only() {
        assert_eq!(format_grammar(&RuleTable::new()), r#"space ::= " "?"#);
    }

    #[test]
    fn rules_print_in_insertion_order() {
        let mut rules = RuleTable::new();
        rules.add_rule("b", r#""b""#);
        rules.add_root_rule("b");
        let text = rules.to_string();
        assert_eq!(text, "space ::= \" \"?\nb ::= \"b\"\nroot ::= b");
        assert!(!text.ends_with('\n'));
    }
}
