//! Minimal CLI: schema file(s) → (grammar | inlined schema)
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use json_gbnf::CompileOptions;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile JSON Schema files into GBNF grammars for constrained decoding
#[derive(Parser, Debug)]
#[command(name = "json-gbnf", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// inline references and print the grammar
    Grammar(GrammarOut),
    /// inline references and print the resulting schema
    Inline(InlineOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select the schema inside each document (e.g. /components/schemas/Job)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is compiled separately
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GrammarOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// JSON options file (property_order, declared_order, max_depth)
    #[arg(long)]
    config: Option<PathBuf>,

    /// comma separated property names emitted first, at every object level
    #[arg(long, value_delimiter = ',')]
    order: Vec<String>,

    /// order properties as declared in the schema
    #[arg(long)]
    declared_order: bool,

    /// maximum schema nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// output .gbnf file (stdout if omitted); single document only
    #[arg(short, long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// write one `<name>.gbnf` per document into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct InlineOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted); single document only
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One schema document to process, labelled for messages and output names.
#[derive(Debug)]
struct Document {
    label: String,
    stem: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut docs = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let stem = source_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "schema".to_owned());
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {source_path_str}"))?;
            let mut json_value = serde_json::from_str::<Value>(&source)
                .with_context(|| format!("failed to parse JSON source file {source_path_str}"))?;

            if let Some(pointer) = self.json_pointer.as_ref() {
                json_value = json_value
                    .pointer(pointer)
                    .cloned()
                    .with_context(|| {
                        format!("JSON pointer {pointer} selects nothing in {source_path_str}")
                    })?;
            }

            match self.jq_expr.as_ref() {
                None => docs.push(Document { label: source_path_str, stem, value: json_value }),
                Some(jq_expr) => {
                    let outputs = crate::jq_exec::select_with_jq(jq_expr, &json_value)
                        .with_context(|| {
                            format!("failed to apply jq expression to {source_path_str}")
                        })?;
                    let many = outputs.len() > 1;
                    for (i, value) in outputs.into_iter().enumerate() {
                        let (label, stem) = if many {
                            (format!("{source_path_str}#{i}"), format!("{stem}-{i}"))
                        } else {
                            (source_path_str.clone(), stem.clone())
                        };
                        docs.push(Document { label, stem, value });
                    }
                }
            }
        }
        Ok(docs)
    }
}

impl GrammarOut {
    fn options(&self) -> Result<CompileOptions> {
        let mut options = match self.config.as_ref() {
            Some(path) => CompileOptions::load(path)?,
            None => CompileOptions::default(),
        };
        if !self.order.is_empty() {
            options.property_order = self.order.clone();
        }
        if self.declared_order {
            options.declared_order = true;
        }
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        Ok(options)
    }

    fn run(&self) -> Result<()> {
        let options = self.options()?;
        let docs = self.input_settings.load_documents()?;
        if self.out.is_some() && docs.len() > 1 {
            bail!("--out takes a single document, got {}; use --out-dir", docs.len());
        }
        if self.out_dir.is_some() {
            check_unique_stems(&docs)?;
        }
        tracing::info!(documents = docs.len(), ?options, "compiling");

        // each compilation owns its rule table, so documents fan out freely
        let results: Vec<(&Document, Result<String, json_gbnf::Error>)> = docs
            .par_iter()
            .map(|doc| (doc, json_gbnf::compile_document(&doc.value, &options)))
            .collect();

        let mut failures = 0usize;
        for (doc, result) in results {
            match result {
                Ok(grammar) => {
                    tracing::info!(document = %doc.label, bytes = grammar.len(), "compiled");
                    if let Some(dir) = self.out_dir.as_ref() {
                        let target = dir.join(format!("{}.gbnf", doc.stem));
                        write_output(&target, &grammar)?;
                        eprintln!("{} {} → {}", "✓".green(), doc.label, target.display());
                    } else if let Some(out) = self.out.as_ref() {
                        write_output(out, &grammar)?;
                    } else {
                        println!("{grammar}");
                    }
                }
                Err(error) => {
                    failures += 1;
                    eprintln!("{} {}: {error}", "✗".red(), doc.label);
                }
            }
        }
        if failures > 0 {
            bail!("{failures} of {} document(s) failed to compile", docs.len());
        }
        Ok(())
    }
}

impl InlineOut {
    fn run(&self) -> Result<()> {
        let docs = self.input_settings.load_documents()?;
        if self.out.is_some() && docs.len() > 1 {
            bail!("--out takes a single document, got {}", docs.len());
        }
        for doc in &docs {
            let inlined = json_gbnf::json_schema_with_inlining(&doc.value)
                .with_context(|| format!("failed to inline {}", doc.label))?;
            let inlined_src = serde_json::to_string_pretty(&inlined)?;
            match self.out.as_ref() {
                Some(out) => write_output(out, &inlined_src)?,
                None => println!("{inlined_src}"),
            }
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Grammar(target) => target.run(),
            Command::Inline(target) => target.run(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// `--out-dir` names files by stem, so two inputs must not share one.
fn check_unique_stems(docs: &[Document]) -> Result<()> {
    let mut seen = HashSet::new();
    for doc in docs {
        if !seen.insert(doc.stem.as_str()) {
            bail!("more than one document maps to {}.gbnf (latest: {})", doc.stem, doc.label);
        }
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            let entries =
                glob::glob(pattern).with_context(|| format!("bad glob pattern {pattern}"))?;
            for entry in entries {
                out.push(entry?);
            }
            if out.len() == before {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(paths, [PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        assert!(resolve_file_path_patterns(["/nonexistent-dir-for-tests/*.json"]).is_err());
    }

    fn doc(label: &str, stem: &str) -> Document {
        Document { label: label.to_owned(), stem: stem.to_owned(), value: Value::Null }
    }

    #[test]
    fn shared_stems_are_rejected_for_out_dir() {
        let docs = [doc("a/job.json", "job"), doc("b/job.json", "job")];
        let err = check_unique_stems(&docs).unwrap_err().to_string();
        assert!(err.contains("job.gbnf"), "{err}");
        assert!(err.contains("b/job.json"), "{err}");
    }

    #[test]
    fn distinct_stems_pass() {
        let docs = [doc("a/job.json", "job"), doc("a/job.json#1", "job-1"), doc("x.json", "x")];
        assert!(check_unique_stems(&docs).is_ok());
    }

    #[test]
    fn flags_override_config_defaults() {
        let cli = CommandLineInterface::try_parse_from([
            "json-gbnf", "grammar", "-i", "s.json", "--order", "b,a", "--max-depth", "4",
        ])
        .unwrap();
        let Command::Grammar(target) = cli.cmd else { panic!("expected grammar") };
        let options = target.options().unwrap();
        assert_eq!(options.property_order, ["b", "a"]);
        assert_eq!(options.max_depth, 4);
        assert!(!options.declared_order);
    }
}
