//! Golden runner: compiles every `cases/*.json` fixture and checks the rules.
//!
//! Fixture layout:
//! ```json
//! { "description": "...", "schema": {...}, "options": {...},
//!   "expect": {"root": "<exact body>"}, "absent": ["item"], "error": "substring" }
//! ```
use std::path::{Path, PathBuf};

use colored::Colorize;
use json_gbnf::CompileOptions;
use rule_lines::RuleLines;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    description: String,
    schema: Value,
    #[serde(default)]
    options: CompileOptions,
    /// rule name → exact body
    #[serde(default)]
    expect: Map<String, Value>,
    /// rule names that must not be emitted
    #[serde(default)]
    absent: Vec<String>,
    /// compilation must fail with a message containing this
    #[serde(default)]
    error: Option<String>,
}

mod rule_lines {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static RULE_LINE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^([A-Za-z0-9-]+) ::= (.*)$").expect("static rule line pattern"));

    /// Grammar text split back into `(name, body)`; lines that do not start a
    /// rule continue the previous body.
    pub struct RuleLines(pub Vec<(String, String)>);

    impl RuleLines {
        pub fn parse(grammar: &str) -> Self {
            let mut rules: Vec<(String, String)> = Vec::new();
            for line in grammar.split('\n') {
                match RULE_LINE_RE.captures(line) {
                    Some(caps) => rules.push((caps[1].to_owned(), caps[2].to_owned())),
                    None => {
                        if let Some((_, body)) = rules.last_mut() {
                            body.push('\n');
                            body.push_str(line);
                        }
                    }
                }
            }
            Self(rules)
        }

        pub fn get(&self, name: &str) -> Option<&str> {
            self.0.iter().find(|(n, _)| n == name).map(|(_, b)| b.as_str())
        }

        pub fn count(&self, name: &str) -> usize {
            self.0.iter().filter(|(n, _)| n == name).count()
        }
    }
}

fn check_case(case: &Case) -> Result<(), String> {
    let result = json_gbnf::compile_document(&case.schema, &case.options);
    let grammar = match (result, case.error.as_ref()) {
        (Err(error), Some(needle)) => {
            let message = error.to_string();
            return if message.contains(needle.as_str()) {
                Ok(())
            } else {
                Err(format!("error `{message}` does not mention `{needle}`"))
            };
        }
        (Err(error), None) => return Err(format!("unexpected error: {error}")),
        (Ok(_), Some(needle)) => return Err(format!("expected an error mentioning `{needle}`")),
        (Ok(grammar), None) => grammar,
    };

    let rules = RuleLines::parse(&grammar);
    if rules.count("root") != 1 {
        return Err(format!("expected exactly one root rule in:\n{grammar}"));
    }
    for (name, expected) in &case.expect {
        let expected = expected
            .as_str()
            .ok_or_else(|| format!("expect.{name} must be a string"))?;
        match rules.get(name) {
            Some(body) if body == expected => {}
            Some(body) => {
                return Err(format!("rule `{name}`:\n  expected {expected}\n  actual   {body}"));
            }
            None => return Err(format!("rule `{name}` missing from:\n{grammar}")),
        }
    }
    for name in &case.absent {
        if rules.get(name).is_some() {
            return Err(format!("rule `{name}` should not be emitted"));
        }
    }
    let again =
        json_gbnf::compile_document(&case.schema, &case.options).map_err(|e| e.to_string())?;
    if again != grammar {
        return Err("second compilation differs".to_owned());
    }
    Ok(())
}

fn load_case(path: &Path) -> Result<Case, String> {
    let src = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let de = &mut serde_json::Deserializer::from_str(&src);
    serde_path_to_error::deserialize::<_, Case>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

fn main() {
    let cases_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("cases"));

    let mut paths: Vec<PathBuf> = match std::fs::read_dir(&cases_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect(),
        Err(error) => {
            eprintln!("❌ cannot read {}: {error}", cases_dir.display());
            std::process::exit(2);
        }
    };
    paths.sort();

    let mut failed = 0usize;
    for path in &paths {
        let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let outcome = load_case(path).and_then(|case| check_case(&case).map(|()| case.description));
        match outcome {
            Ok(description) => eprintln!("{} {name}: {description}", "✅".green()),
            Err(error) => {
                failed += 1;
                eprintln!("{} {name}: {error}", "❌".red());
            }
        }
    }

    eprintln!("—— {} passed, {} failed ——", paths.len() - failed, failed);
    if failed > 0 {
        std::process::exit(1);
    }
}
