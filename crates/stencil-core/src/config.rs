use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::session::DEFAULT_RENDER_COUNTS;

/// Project configuration loaded from `.stencil.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StencilConfig {
    /// Path of the JSON file used as local storage.
    pub store: String,
    /// Preview limit used until one is saved with `stencil limit`.
    pub render_limit: usize,
    /// Write rendered output here instead of stdout.
    pub output: Option<String>,
}

impl Default for StencilConfig {
    fn default() -> Self {
        Self {
            store: ".stencil/storage.json".to_string(),
            render_limit: DEFAULT_RENDER_COUNTS,
            output: None,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".stencil.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<StencilConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: StencilConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# stencil configuration
store: .stencil/storage.json   # JSON file holding the schema, templates and render limit
render_limit: 500              # fragments shown in the preview until `stencil limit` is used
# output: src/api/generated.ts  # write rendered code to a file instead of stdout
"#
}
