use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use percent_encoding::percent_decode_str;

/// Narrows a schema to one tag and, optionally, one operation.
///
/// Written as `"{category}/{operationId}"`; either part may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub category: Option<String>,
    pub operation_id: Option<String>,
}

impl Selector {
    /// A selector that keeps every operation.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Self {
        let mut parts = input.split('/');
        Self {
            category: non_empty(parts.next()),
            operation_id: non_empty(parts.next()),
        }
    }

    /// Derive a selector from a Swagger UI page URL.
    ///
    /// Swagger UI deep links look like `.../index.html#/pet/getPetById`.
    /// Everything after the first `#/` is percent-decoded and parsed.
    pub fn from_page_url(url: &str) -> Self {
        let fragment = url.split_once("#/").map(|(_, rest)| rest).unwrap_or("");
        let decoded = percent_decode_str(fragment).decode_utf8_lossy();
        Self::parse(&decoded)
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.operation_id.is_none()
    }
}

fn non_empty(part: Option<&str>) -> Option<String> {
    part.filter(|p| !p.is_empty()).map(String::from)
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = self.category.as_deref().unwrap_or("");
        match &self.operation_id {
            Some(op) => write!(f, "{category}/{op}"),
            None => write!(f, "{category}"),
        }
    }
}
