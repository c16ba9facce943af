use indexmap::IndexMap;
use serde_json::Value;

use crate::error::StoreError;
use crate::parse::{self, Document, Schema};
use crate::render::{RenderOutput, compose_display, process};
use crate::selector::Selector;
use crate::store::{CODE_TEMPLATE, RENDER_COUNTS, SWAGGER_DATA, Store};
use crate::template::TemplateSet;

/// Preview limit used when nothing is persisted.
pub const DEFAULT_RENDER_COUNTS: usize = 500;

/// Everything the generator keeps between runs.
#[derive(Debug, Clone)]
pub struct Session {
    pub schema: Option<Schema>,
    /// The document exactly as imported; persisted in place of `schema`.
    pub raw_schema: Option<Value>,
    pub templates: TemplateSet,
    pub render_counts: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            schema: None,
            raw_schema: None,
            templates: TemplateSet::new(),
            render_counts: DEFAULT_RENDER_COUNTS,
        }
    }
}

impl Session {
    pub fn load(store: &dyn Store) -> Result<Self, StoreError> {
        Self::load_with_limit(store, DEFAULT_RENDER_COUNTS)
    }

    /// Load persisted state. Values that fail to decode are logged and
    /// replaced with defaults; only store access errors are returned.
    pub fn load_with_limit(store: &dyn Store, default_limit: usize) -> Result<Self, StoreError> {
        let stored = store.get(&[SWAGGER_DATA, CODE_TEMPLATE, RENDER_COUNTS])?;

        let document = stored.get(SWAGGER_DATA).and_then(decode_document);
        let (schema, raw_schema) = match document {
            Some(doc) => (Some(doc.schema), Some(doc.raw)),
            None => (None, None),
        };

        let templates = match stored.get(CODE_TEMPLATE).and_then(Value::as_str) {
            Some(json) => TemplateSet::from_json(json).unwrap_or_else(|e| {
                log::warn!("ignoring stored templates: {e}");
                TemplateSet::new()
            }),
            None => TemplateSet::new(),
        };

        let render_counts = stored
            .get(RENDER_COUNTS)
            .and_then(decode_count)
            .unwrap_or(default_limit);

        Ok(Self {
            schema,
            raw_schema,
            templates,
            render_counts,
        })
    }

    /// Replace the current schema with a freshly imported document.
    pub fn set_document(&mut self, document: Document) {
        self.schema = Some(document.schema);
        self.raw_schema = Some(document.raw);
    }

    /// Persist the imported document as-is. A schema set without its raw
    /// document is stored in its typed form.
    pub fn save_schema(&self, store: &mut dyn Store) -> Result<(), StoreError> {
        let json = match (&self.raw_schema, &self.schema) {
            (Some(raw), _) => serde_json::to_string(raw)?,
            (None, Some(schema)) => serde_json::to_string(schema)?,
            (None, None) => return Ok(()),
        };
        store.set(IndexMap::from([(SWAGGER_DATA.to_string(), Value::String(json))]))
    }

    pub fn save_templates(&self, store: &mut dyn Store) -> Result<(), StoreError> {
        let json = self.templates.to_json()?;
        store.set(IndexMap::from([(CODE_TEMPLATE.to_string(), Value::String(json))]))
    }

    pub fn save_render_counts(&self, store: &mut dyn Store) -> Result<(), StoreError> {
        store.set(IndexMap::from([(
            RENDER_COUNTS.to_string(),
            Value::from(self.render_counts),
        )]))
    }

    /// Render the stored schema with the active template.
    pub fn render(&self, selector: &Selector) -> RenderOutput {
        match self.schema {
            Some(ref schema) => process(schema, selector, self.templates.active()),
            None => RenderOutput::default(),
        }
    }

    /// Preview text for `output`: the active header plus up to
    /// `render_counts` fragments.
    pub fn display(&self, output: &RenderOutput) -> String {
        let header = self.templates.active().header.as_deref();
        compose_display(header, &output.codes, self.render_counts)
    }
}

fn decode_document(value: &Value) -> Option<Document> {
    let Some(json) = value.as_str() else {
        log::warn!("ignoring stored schema: expected a JSON string");
        return None;
    };
    parse::document_from_json(json)
        .inspect_err(|e| log::warn!("ignoring stored schema: {e}"))
        .ok()
}

fn decode_count(value: &Value) -> Option<usize> {
    let count = match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if count.is_none() {
        log::warn!("ignoring stored render count {value}");
    }
    count
}
