//! Fixed grammar patterns for the JSON primitives.
//!
//! The bodies are consumed verbatim by the decoding engine's grammar parser;
//! keep them byte-for-byte stable.

pub const BOOLEAN_RULE: &str = r#"("true" | "false") space"#;

pub const NUMBER_RULE: &str =
    r#"("-"? ([0-9] | [1-9] [0-9]*)) ("." [0-9]+)? ([eE] [-+]? [0-9]+)? space"#;

pub const INTEGER_RULE: &str = r#"("-"? ([0-9] | [1-9] [0-9]*)) space"#;

pub const STRING_RULE: &str = r#" "\"" (
        [^"\\] |
        "\\" (["\\/bfnrt] | "u" [0-9a-fA-F] [0-9a-fA-F] [0-9a-fA-F] [0-9a-fA-F])
      )* "\"" space "#;

pub const NULL_RULE: &str = r#""null" space"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Number,
    Integer,
    String,
    Null,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Boolean,
        Primitive::Number,
        Primitive::Integer,
        Primitive::String,
        Primitive::Null,
    ];

    /// Parse a JSON Schema `type` keyword value.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// The shared rule name, identical to the `type` keyword.
    pub fn rule_name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Null => "null",
        }
    }

    pub fn rule_body(self) -> &'static str {
        match self {
            Self::Boolean => BOOLEAN_RULE,
            Self::Number => NUMBER_RULE,
            Self::Integer => INTEGER_RULE,
            Self::String => STRING_RULE,
            Self::Null => NULL_RULE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_round_trip() {
        for p in Primitive::ALL {
            assert_eq!(Primitive::from_type_name(p.rule_name()), Some(p));
        }
        assert_eq!(Primitive::from_type_name("object"), None);
        assert_eq!(Primitive::from_type_name("String"), None);
    }

    #[test]
    fn every_pattern_ends_in_space() {
        for p in Primitive::ALL {
            assert!(p.rule_body().trim_end().ends_with("space"), "{p:?}");
        }
    }

    #[test]
    fn string_pattern_accepts_unicode_escapes() {
        assert!(STRING_RULE.contains(r#""u" [0-9a-fA-F] [0-9a-fA-F] [0-9a-fA-F] [0-9a-fA-F]"#));
        assert!(STRING_RULE.contains(r#"["\\/bfnrt]"#));
    }
}
