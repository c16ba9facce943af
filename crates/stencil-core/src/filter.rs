use indexmap::IndexMap;

use crate::parse::{Operation, PathItem, Schema};
use crate::selector::Selector;

/// Reduce `schema` to the operations matched by `selector`.
///
/// A category keeps operations tagged with it; an operation id then keeps
/// only operations with that exact id. Paths left without operations are
/// dropped. Members outside `paths` are carried over as-is.
pub fn filter_schema(schema: &Schema, selector: &Selector) -> Schema {
    let mut paths = retain_operations(&schema.paths, |op| match &selector.category {
        Some(category) => op.has_tag(category),
        None => true,
    });

    if let Some(ref operation_id) = selector.operation_id {
        paths = retain_operations(&paths, |op| {
            op.operation_id.as_deref() == Some(operation_id.as_str())
        });
    }

    log::debug!(
        "selector {:?} kept {} of {} paths",
        selector.to_string(),
        paths.len(),
        schema.paths.len()
    );

    Schema {
        paths,
        extra: schema.extra.clone(),
    }
}

fn retain_operations<F>(paths: &IndexMap<String, PathItem>, keep: F) -> IndexMap<String, PathItem>
where
    F: Fn(&Operation) -> bool,
{
    paths
        .iter()
        .filter_map(|(path, item)| {
            let kept: PathItem = item
                .iter()
                .filter(|(_, op)| keep(op))
                .map(|(method, op)| (method.clone(), op.clone()))
                .collect();
            (!kept.is_empty()).then(|| (path.clone(), kept))
        })
        .collect()
}
