use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// Id of the built-in example template. It can be edited but never deleted.
pub const BUILTIN_ID: &str = "-1";

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 10;

const DEFAULT_CODE: &str = r#"
  Placeholders:

  apiSummary:          operation summary
  apiOperationId:      operation id
  apiPath:             request path
  apiMethod:           request method
  apiReplaceDefault:   default options for passing params on get and post

  Example (placeholders are wrapped in $):

/**
 * $apiSummary$
 * @method $apiMethod$
 * @path $apiPath$
 */
export const $apiOperationId$ = (params: any) => {
  return request({
    url: `$apiPath$`,
    method: '$apiMethod$',
    $apiReplaceDefault$
  });
}
"#;

const DEFAULT_HEADER: &str = r#"
/** shared header code **/
import { request } from '@/utils/request';
"#;

/// A user-defined code template. `header` is emitted once, verbatim;
/// `code` is rendered once per operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl Template {
    /// An empty, inactive template.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: String::new(),
            header: None,
            active: false,
        }
    }

    /// The example template shipped with every fresh template list.
    pub fn default_template() -> Self {
        Self {
            id: BUILTIN_ID.to_string(),
            name: "Example template".to_string(),
            code: DEFAULT_CODE.to_string(),
            header: Some(DEFAULT_HEADER.to_string()),
            active: true,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.id == BUILTIN_ID
    }
}

/// Field changes for [`TemplateSet::update`]. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct TemplateEdit {
    pub name: Option<String>,
    pub header: Option<String>,
    pub code: Option<String>,
}

/// Ordered template list with exactly one active entry.
///
/// Deserializing goes through [`TemplateSet::from_templates`], so a stored
/// list can never yield an empty set or several active entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Template>", into = "Vec<Template>")]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl From<Vec<Template>> for TemplateSet {
    fn from(templates: Vec<Template>) -> Self {
        Self::from_templates(templates)
    }
}

impl From<TemplateSet> for Vec<Template> {
    fn from(set: TemplateSet) -> Self {
        set.templates
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateSet {
    pub fn new() -> Self {
        Self {
            templates: vec![Template::default_template()],
        }
    }

    /// Adopt a persisted list. An empty list falls back to the example
    /// template, and the active flags are normalized so only one is set.
    pub fn from_templates(templates: Vec<Template>) -> Self {
        if templates.is_empty() {
            return Self::new();
        }
        let mut set = Self { templates };
        let index = set.templates.iter().position(|t| t.active).unwrap_or(0);
        set.activate_index(index);
        set
    }

    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.templates)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// The active template, or the first one if none is flagged.
    pub fn active(&self) -> &Template {
        self.templates
            .iter()
            .find(|t| t.active)
            .unwrap_or(&self.templates[0])
    }

    /// Make `id` the only active template.
    pub fn select(&mut self, id: &str) -> Result<(), TemplateError> {
        let index = self.position(id)?;
        self.activate_index(index);
        Ok(())
    }

    /// Append a blank template, make it active and return its id.
    pub fn add(&mut self) -> String {
        let mut template = Template::new(generate_id(), "New template");
        template.header = Some(String::new());
        let id = template.id.clone();
        self.templates.push(template);
        self.activate_index(self.templates.len() - 1);
        log::debug!("added template {id}");
        id
    }

    pub fn update(&mut self, id: &str, edit: TemplateEdit) -> Result<&Template, TemplateError> {
        if edit.name.as_deref().is_some_and(str::is_empty) {
            return Err(TemplateError::EmptyName);
        }
        let index = self.position(id)?;
        let template = &mut self.templates[index];
        if let Some(name) = edit.name {
            template.name = name;
        }
        if let Some(header) = edit.header {
            template.header = Some(header);
        }
        if let Some(code) = edit.code {
            template.code = code;
        }
        Ok(template)
    }

    /// Remove `id`. When the active template goes, the first remaining one
    /// takes over.
    pub fn delete(&mut self, id: &str) -> Result<Template, TemplateError> {
        if id == BUILTIN_ID {
            return Err(TemplateError::BuiltinDeletion);
        }
        let index = self.position(id)?;
        let removed = self.templates.remove(index);

        if self.templates.is_empty() {
            self.templates.push(Template::default_template());
        }
        if removed.active || !self.templates.iter().any(|t| t.active) {
            self.activate_index(0);
        }
        log::debug!("deleted template {id}, active is now {}", self.active().id);
        Ok(removed)
    }

    fn position(&self, id: &str) -> Result<usize, TemplateError> {
        self.templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    fn activate_index(&mut self, index: usize) {
        for (i, template) in self.templates.iter_mut().enumerate() {
            template.active = i == index;
        }
    }
}

fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
