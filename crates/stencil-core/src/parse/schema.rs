use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::operation::{Operation, PathItem};

/// A Swagger/OpenAPI document reduced to what code generation needs.
///
/// `paths` keeps document order. All other top-level members (`info`,
/// `definitions`, `components`, ...) pass through in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, deserialize_with = "deserialize_paths")]
    pub paths: IndexMap<String, PathItem>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Schema {
    /// True when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn operation_count(&self) -> usize {
        self.paths.values().map(IndexMap::len).sum()
    }

    /// Iterate `(path, method, operation)` in document order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &str, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.iter()
                .map(move |(method, op)| (path.as_str(), method.as_str(), op))
        })
    }
}

/// Path items may hold non-operation members such as a shared `parameters`
/// array or a `$ref`. Only object-valued members are treated as operations.
fn deserialize_paths<'de, D>(deserializer: D) -> Result<IndexMap<String, PathItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
    let mut paths = IndexMap::with_capacity(raw.len());

    for (path, item) in raw {
        let Value::Object(members) = item else {
            log::warn!("skipping path {path}: path item is not an object");
            continue;
        };

        let mut methods = PathItem::new();
        for (method, value) in members {
            if !value.is_object() {
                continue;
            }
            let op = Operation::deserialize(value).unwrap_or_else(|e| {
                log::warn!("{path} {method}: unreadable operation, rendering without fields: {e}");
                Operation::default()
            });
            methods.insert(method, op);
        }
        paths.insert(path, methods);
    }

    Ok(paths)
}
