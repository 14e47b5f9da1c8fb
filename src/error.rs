//! Error kinds for the compiler, the reference inliner and option loading.

/// Raised by the schema visitor. Always fatal: no partial grammar is returned.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The node matches none of the recognized shapes.
    #[error("unsupported schema shape at `{path}`: {schema}")]
    UnsupportedShape { path: String, schema: String },

    /// `type` names something other than the five JSON primitives.
    #[error("unsupported primitive type `{type_name}` at `{path}`")]
    UnsupportedPrimitive { path: String, type_name: String },

    #[error("schema nesting at `{path}` exceeds the maximum depth of {max_depth}")]
    TooDeep { path: String, max_depth: usize },
}

/// Raised while expanding `$ref` pointers, before the compiler runs.
#[derive(Debug, thiserror::Error)]
pub enum InlineError {
    /// Only document-local references (`#...`) can be inlined.
    #[error("unsupported reference `{reference}`: only local `#/...` pointers are inlined")]
    UnsupportedReference { reference: String },

    #[error("reference `{reference}` does not resolve to anything in the document")]
    Unresolvable { reference: String },

    /// The reference is reached again while it is still being expanded.
    #[error("reference `{reference}` is cyclic and cannot be inlined")]
    Cyclic { reference: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read options file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Umbrella error for the end-to-end entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Inline(#[from] InlineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
