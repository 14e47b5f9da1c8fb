//! Compile options, loadable from a JSON file.
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::visitor::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Property names ranked first, applied at every object level.
    pub property_order: Vec<String>,
    /// Derive the order from the schema's own declaration order instead.
    /// Ignored when `property_order` is non-empty.
    pub declared_order: bool,
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            property_order: Vec::new(),
            declared_order: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompileOptions {
    pub fn from_json_str(src: &str, origin: &str) -> Result<Self, ConfigError> {
        crate::path_de::from_str_with_path(src).map_err(|message| ConfigError::Parse {
            path: origin.to_owned(),
            message,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.to_string_lossy().to_string();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: origin.clone(),
            source,
        })?;
        Self::from_json_str(&src, &origin)
    }
}
