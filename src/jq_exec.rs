//! jq pre-processing of input documents (e.g. pick one schema out of a bundle).
use anyhow::{anyhow, Context, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` on `input`; every jq output becomes one document.
pub fn select_with_jq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let val = item.map_err(|e| anyhow!("jq runtime error: {e:?}"))?;
        // Val's Display is JSON text
        let doc = serde_json::from_str::<Value>(&val.to_string())
            .with_context(|| format!("jq output of `{filter_src}` is not JSON"))?;
        out.push(doc);
    }
    Ok(out)
}

fn format_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    anyhow!(s)
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    anyhow!(s)
}
