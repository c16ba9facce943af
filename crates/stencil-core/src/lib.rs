pub mod config;
pub mod error;
pub mod filter;
pub mod parse;
pub mod render;
pub mod selector;
pub mod session;
pub mod store;
pub mod template;
pub mod worker;

pub use filter::filter_schema;
pub use parse::{Operation, PathItem, Schema};
pub use render::{RenderOutput, compose_display, process, render};
pub use selector::Selector;
pub use template::{Template, TemplateSet};
