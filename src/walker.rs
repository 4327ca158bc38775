//! Mapping walker.
//!
//! Turns a nested `properties` object into a flat, pre-order list of
//! [`FieldNode`]s. Object children follow their parent directly; multi-fields
//! stay attached to their owner as `sub_fields`.

use crate::field::{FieldDef, FieldNode};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Walk a `properties` object.
///
/// The output follows declaration order. An empty object yields an empty
/// list; the walk never fails. Paths are unique: when two entries resolve
/// to the same dotted path (a root key `"a.b"` next to `a.properties.b`,
/// or a multi-field and a child sharing a name) the first one wins and
/// later ones are dropped with their subtree.
pub fn walk(properties: &Map<String, Value>) -> Vec<FieldNode> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    walk_into(properties, None, 0, &mut seen, &mut out);
    out
}

fn walk_into(
    properties: &Map<String, Value>,
    parent_path: Option<&str>,
    depth: usize,
    seen: &mut HashSet<String>,
    out: &mut Vec<FieldNode>,
) {
    for (name, value) in properties {
        let def = FieldDef::from_value(value);
        let mut node = FieldNode::from_def(name, parent_path, depth, &def);

        if !seen.insert(node.path.clone()) {
            warn!("Skipping field '{}': path already declared", node.path);
            continue;
        }

        if node.type_inferred {
            debug!(
                "Field '{}' has no explicit type; assuming '{}'",
                node.path, node.field_type
            );
        }

        if let Some(fields) = &def.fields {
            node.sub_fields = sub_fields(fields, &node.path, depth + 1, seen);
        }

        let path = node.path.clone();
        out.push(node);

        if let Some(children) = &def.properties {
            walk_into(children, Some(&path), depth + 1, seen, out);
        }
    }
}

// Multi-fields are leaves: anything nested below them is ignored.
fn sub_fields(
    fields: &Map<String, Value>,
    owner_path: &str,
    depth: usize,
    seen: &mut HashSet<String>,
) -> Vec<FieldNode> {
    let mut out = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let def = FieldDef::from_value(value);
        let mut node = FieldNode::from_def(name, Some(owner_path), depth, &def);
        if !seen.insert(node.path.clone()) {
            warn!("Skipping multi-field '{}': path already declared", node.path);
            continue;
        }
        node.child_count = 0;
        out.push(node);
    }
    out
}

/// Walker records plus every sub-field, flattened in display order
/// (each owner followed by its multi-fields).
pub fn flatten_with_sub_fields(fields: &[FieldNode]) -> Vec<&FieldNode> {
    let mut out = Vec::with_capacity(fields.len());
    for field in fields {
        out.push(field);
        out.extend(field.sub_fields.iter());
    }
    out
}

/// Number of fields declared directly at the mapping root.
pub fn top_level_count(fields: &[FieldNode]) -> usize {
    fields.iter().filter(|f| f.depth == 0).count()
}

/// Total number of multi-fields across all walker records.
pub fn sub_field_count(fields: &[FieldNode]) -> usize {
    fields.iter().map(|f| f.sub_fields.len()).sum()
}
