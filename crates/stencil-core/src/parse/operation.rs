use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One HTTP method handler under a path.
///
/// Only the fields the renderer reads are typed. Everything else
/// (`parameters`, `responses`, ...) is carried in `extra` untouched.
/// The typed fields accept whatever the document holds: scalars are
/// stringified, `null` becomes `"null"` and other shapes are dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,

    #[serde(
        rename = "operationId",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Operation {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Operations under one path, keyed by method name exactly as written in the document.
pub type PathItem = IndexMap<String, Operation>;

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    })
}

/// Only string entries can match a category, so anything else is dropped.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn op(value: Value) -> Operation {
        Operation::deserialize(value).unwrap()
    }

    #[test]
    fn test_scalar_fields_are_stringified() {
        let op = op(json!({"summary": 42, "operationId": 7, "tags": ["a"]}));
        assert_eq!(op.summary.as_deref(), Some("42"));
        assert_eq!(op.operation_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_null_fields_render_as_null() {
        let op = op(json!({"summary": null, "operationId": true}));
        assert_eq!(op.summary.as_deref(), Some("null"));
        assert_eq!(op.operation_id.as_deref(), Some("true"));
    }

    #[test]
    fn test_absent_and_structured_fields() {
        let op = op(json!({"summary": {"text": "x"}}));
        assert_eq!(op.summary, None);
        assert_eq!(op.operation_id, None);
        assert!(op.tags.is_empty());
    }

    #[test]
    fn test_malformed_tags() {
        assert!(op(json!({"tags": "pet"})).tags.is_empty());
        assert_eq!(op(json!({"tags": ["pet", 3, null, "store"]})).tags, vec!["pet", "store"]);
    }
}
