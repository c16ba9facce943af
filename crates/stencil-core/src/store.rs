use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Key holding the scraped schema as a JSON string.
pub const SWAGGER_DATA: &str = "swaggerData";
/// Key holding the template list as a JSON string.
pub const CODE_TEMPLATE: &str = "codeTemplate";
/// Key holding the preview fragment limit.
pub const RENDER_COUNTS: &str = "renderCounts";

/// A string-keyed JSON value store, shaped like browser extension local storage.
pub trait Store {
    /// Fetch the given keys. Keys with no stored value are left out of the result.
    fn get(&self, keys: &[&str]) -> Result<IndexMap<String, Value>, StoreError>;

    /// Insert or overwrite every entry in `items`.
    fn set(&mut self, items: IndexMap<String, Value>) -> Result<(), StoreError>;

    /// Remove everything.
    fn clear(&mut self) -> Result<(), StoreError>;
}

fn pick(entries: &Map<String, Value>, keys: &[&str]) -> IndexMap<String, Value> {
    keys.iter()
        .filter_map(|k| entries.get(*k).map(|v| (k.to_string(), v.clone())))
        .collect()
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Map<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<IndexMap<String, Value>, StoreError> {
        Ok(pick(&self.entries, keys))
    }

    fn set(&mut self, items: IndexMap<String, Value>) -> Result<(), StoreError> {
        self.entries.extend(items);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// Every call reads the file fresh; `set` and `clear` rewrite it whole.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        let value: Value = serde_json::from_str(&content)?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject),
        }
    }

    fn write(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        log::debug!("wrote {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, keys: &[&str]) -> Result<IndexMap<String, Value>, StoreError> {
        Ok(pick(&self.read()?, keys))
    }

    fn set(&mut self, items: IndexMap<String, Value>) -> Result<(), StoreError> {
        let mut entries = self.read()?;
        entries.extend(items);
        self.write(&entries)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.write(&Map::new())
    }
}
