use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::filter::filter_schema;
use crate::parse::{Operation, Schema};
use crate::selector::Selector;
use crate::template::Template;

/// `{petId}` style path parameters.
static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("path parameter pattern is valid"));

/// `$apiPath$` style placeholders.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z0-9_]+)\$").expect("placeholder pattern is valid"));

/// Text substituted for a placeholder with no value.
pub const UNDEFINED: &str = "undefined";

/// Separator between fragments in the composed preview.
pub const FRAGMENT_SEPARATOR: &str = "\n\n\n\n";

/// Generated fragments, one per operation, plus how many there were.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub codes: Vec<String>,
    pub totals: usize,
}

impl RenderOutput {
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Values available to placeholders for a single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub api_summary: Option<String>,
    pub api_operation_id: Option<String>,
    pub api_path: String,
    pub api_method: String,
    pub api_replace_default: &'static str,
}

impl RenderContext {
    pub fn for_operation(path: &str, method: &str, op: &Operation) -> Self {
        let method = method.to_lowercase();
        Self {
            api_summary: op.summary.clone(),
            api_operation_id: op.operation_id.clone(),
            api_path: rewrite_path(path),
            api_replace_default: replace_default(&method),
            api_method: method,
        }
    }

    /// Look up a placeholder by name. Names are matched exactly.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "apiSummary" => self.api_summary.as_deref(),
            "apiOperationId" => self.api_operation_id.as_deref(),
            "apiPath" => Some(&self.api_path),
            "apiMethod" => Some(&self.api_method),
            "apiReplaceDefault" => Some(self.api_replace_default),
            _ => None,
        }
    }
}

/// The default request-options snippet for a lower-cased method.
///
/// `post` sends params as the body, other reads send them as the query.
/// `put`, `delete` and `update` get nothing.
pub fn replace_default(method: &str) -> &'static str {
    match method {
        "put" | "delete" | "update" => "",
        "post" => "data: params",
        _ => "params: params",
    }
}

/// Turn a templated path into a template-literal friendly one.
///
/// Every `{param}` segment is removed and `${params.<first>}` is appended,
/// so `/users/{id}` becomes `/users/${params.id}`. Only the first parameter
/// is interpolated; saved templates depend on this.
pub fn rewrite_path(path: &str) -> String {
    let Some(first) = PATH_PARAM.captures(path) else {
        return path.to_string();
    };
    let stripped = PATH_PARAM.replace_all(path, "");
    format!("{stripped}${{params.{}}}", &first[1])
}

/// Replace every `$name$` in `code` with its value from `ctx`.
pub fn substitute(code: &str, ctx: &RenderContext) -> String {
    PLACEHOLDER
        .replace_all(code, |caps: &Captures| {
            ctx.get(&caps[1]).unwrap_or(UNDEFINED).to_string()
        })
        .into_owned()
}

/// Render one fragment per operation in `schema`, in document order.
pub fn render(schema: &Schema, template: &Template) -> RenderOutput {
    if schema.is_empty() || template.code.is_empty() {
        return RenderOutput::default();
    }

    let codes: Vec<String> = schema
        .operations()
        .map(|(path, method, op)| {
            let ctx = RenderContext::for_operation(path, method, op);
            substitute(&template.code, &ctx)
        })
        .collect();

    log::debug!(
        "rendered {} fragments with template {:?}",
        codes.len(),
        template.name
    );

    RenderOutput {
        totals: codes.len(),
        codes,
    }
}

/// Filter `schema` with `selector`, then render what is left.
pub fn process(schema: &Schema, selector: &Selector, template: &Template) -> RenderOutput {
    render(&filter_schema(schema, selector), template)
}

/// Assemble the preview text: header, then the first `limit` fragments.
pub fn compose_display(header: Option<&str>, codes: &[String], limit: usize) -> String {
    let mut out = String::new();
    if let Some(header) = header.filter(|h| !h.is_empty()) {
        out.push_str(header);
        out.push_str(FRAGMENT_SEPARATOR);
    }
    let shown = &codes[..limit.min(codes.len())];
    out.push_str(&shown.join(FRAGMENT_SEPARATOR));
    out.push_str(FRAGMENT_SEPARATOR);
    out
}
