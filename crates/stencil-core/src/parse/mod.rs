pub mod operation;
pub mod schema;

pub use operation::{Operation, PathItem};
pub use schema::Schema;

use serde_json::Value;

use crate::error::ParseError;

/// A scraped document: the raw JSON as fetched, and the typed view of it.
///
/// `raw` is what gets persisted, so members the typed view ignores
/// (path-level `parameters`, `$ref`s, vendor extensions) survive a reload.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub raw: Value,
    pub schema: Schema,
}

/// Parse a Swagger/OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<Schema, ParseError> {
    document_from_yaml(input).map(|doc| doc.schema)
}

/// Parse a Swagger/OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<Schema, ParseError> {
    document_from_json(input).map(|doc| doc.schema)
}

/// Build a schema from an already-decoded JSON value.
pub fn from_value(value: Value) -> Result<Schema, ParseError> {
    document_from_value(value).map(|doc| doc.schema)
}

pub fn document_from_yaml(input: &str) -> Result<Document, ParseError> {
    // Go through the YAML value model so integer keys such as `200:` become strings.
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    document_from_value(serde_json::to_value(yaml)?)
}

pub fn document_from_json(input: &str) -> Result<Document, ParseError> {
    document_from_value(serde_json::from_str(input)?)
}

pub fn document_from_value(raw: Value) -> Result<Document, ParseError> {
    let Value::Object(ref root) = raw else {
        return Err(ParseError::NotAnObject(kind(&raw)));
    };
    match root.get("paths") {
        None | Some(Value::Object(_)) => {}
        Some(other) => return Err(ParseError::InvalidPaths(kind(other))),
    }

    let schema: Schema = serde_json::from_value(raw.clone())?;
    log::debug!(
        "parsed schema with {} paths and {} operations",
        schema.paths.len(),
        schema.operation_count()
    );
    Ok(Document { raw, schema })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_object_root() {
        assert!(matches!(
            from_json("[1, 2, 3]"),
            Err(ParseError::NotAnObject("an array"))
        ));
    }

    #[test]
    fn test_invalid_paths() {
        assert!(matches!(
            from_json(r#"{"paths": []}"#),
            Err(ParseError::InvalidPaths("an array"))
        ));
        assert!(matches!(
            from_yaml("paths: nope\n"),
            Err(ParseError::InvalidPaths("a string"))
        ));
    }

    #[test]
    fn test_yaml_integer_keys() {
        let yaml = r#"
paths:
  /a:
    get:
      operationId: getA
      responses:
        200:
          description: OK
"#;
        let doc = document_from_yaml(yaml).unwrap();
        assert_eq!(doc.schema.operation_count(), 1);
        assert_eq!(
            doc.raw["paths"]["/a"]["get"]["responses"]["200"]["description"],
            "OK"
        );
    }

    #[test]
    fn test_raw_keeps_path_level_members() {
        let doc = document_from_json(
            r#"{"paths": {"/p/{id}": {"parameters": [{"name": "id", "in": "path"}], "get": {"operationId": "g"}}}}"#,
        )
        .unwrap();
        assert!(doc.raw["paths"]["/p/{id}"]["parameters"].is_array());
        assert!(doc.raw["paths"]["/p/{id}"]["get"].get("tags").is_none());
        assert_eq!(doc.schema.paths["/p/{id}"].len(), 1);
    }
}
