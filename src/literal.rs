//! Grammar literals for JSON values.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static GRAMMAR_LITERAL_ESCAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[\\\r\n"]"#).expect("static literal escape pattern")
});

fn grammar_literal_escape(c: &str) -> &'static str {
    match c {
        "\\" => r"\\",
        "\r" => r"\r",
        "\n" => r"\n",
        _ => r#"\""#,
    }
}

/// JSON-encode `value` and quote it as a single grammar literal.
///
/// The literal matches exactly the compact JSON text of `value`:
/// `"x"` becomes `"\"x\""`, `1` becomes `"1"`.
pub fn format_literal(value: &Value) -> String {
    let encoded = value.to_string();
    let escaped = GRAMMAR_LITERAL_ESCAPE_RE
        .replace_all(&encoded, |caps: &Captures| grammar_literal_escape(&caps[0]));
    format!("\"{escaped}\"")
}

/// Shorthand for property names and other bare strings.
pub fn format_str_literal(s: &str) -> String {
    format_literal(&Value::String(s.to_owned()))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Undo the grammar's literal escapes (`\\`, `\"`, `\r`, `\n`).
    fn unescape_literal(lit: &str) -> String {
        let inner = &lit[1..lit.len() - 1];
        let mut out = String::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => panic!("dangling escape in {lit}"),
            }
        }
        out
    }

    #[test]
    fn strings_are_quoted_twice() {
        assert_eq!(format_literal(&json!("x")), r#""\"x\"""#);
        assert_eq!(format_str_literal("name"), r#""\"name\"""#);
    }

    #[test]
    fn scalars_keep_their_json_text() {
        assert_eq!(format_literal(&json!(42)), r#""42""#);
        assert_eq!(format_literal(&json!(-1.5)), r#""-1.5""#);
        assert_eq!(format_literal(&json!(true)), r#""true""#);
        assert_eq!(format_literal(&Value::Null), r#""null""#);
    }

    #[test]
    fn quotes_backslashes_and_newlines_survive_unescaping() {
        for raw in ["say \"hi\"", "C:\\temp", "line1\nline2", "cr\r", "mixed \\\" \n"] {
            let value = json!(raw);
            let lit = format_literal(&value);
            let json_text = unescape_literal(&lit);
            let back: Value = serde_json::from_str(&json_text).unwrap();
            assert_eq!(back, value, "literal {lit} did not round back to {raw:?}");
        }
    }

    #[test]
    fn literal_never_contains_a_bare_newline() {
        let lit = format_literal(&json!("a\nb"));
        assert!(!lit.contains('\n'));
    }
}
