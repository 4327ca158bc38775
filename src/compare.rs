//! Index comparison.
//!
//! Fields are matched by dotted path (multi-fields included). Settings are
//! diffed key by key over the top-level scalars, independently of fields.

use crate::document::{IndexDocument, IndexSet, IndexSettings};
use crate::error::ViewerResult;
use crate::field::FieldNode;
use crate::walker::flatten_with_sub_fields;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Options for [`compare_indexes`].
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Settings keys left out of the settings diff.
    pub ignore_settings: Vec<String>,
}

/// A path present on both sides with a different declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeChange {
    pub path: String,
    pub type_a: String,
    pub type_b: String,
}

/// One differing attribute of a same-typed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    pub attribute: &'static str,
    pub value_a: Option<String>,
    pub value_b: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldAttributeChanges {
    pub path: String,
    pub changes: Vec<AttributeChange>,
}

/// A settings key whose value differs. `None` means absent on that side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingChange {
    pub key: String,
    pub value_a: Option<Value>,
    pub value_b: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub index_a: String,
    pub index_b: String,
    /// In A's walker order.
    pub fields_only_in_a: Vec<String>,
    /// In B's walker order.
    pub fields_only_in_b: Vec<String>,
    /// In A's walker order.
    pub fields_with_type_changes: Vec<TypeChange>,
    pub fields_with_attribute_changes: Vec<FieldAttributeChanges>,
    /// Sorted by key.
    pub settings_diff: Vec<SettingChange>,
}

impl ComparisonResult {
    /// True when neither fields nor settings differ.
    pub fn is_identical(&self) -> bool {
        self.fields_only_in_a.is_empty()
            && self.fields_only_in_b.is_empty()
            && self.fields_with_type_changes.is_empty()
            && self.fields_with_attribute_changes.is_empty()
            && self.settings_diff.is_empty()
    }
}

/// Compare two indexes of the same file.
///
/// Both names are resolved before anything is diffed, so a missing index
/// never produces a partial result.
pub fn compare_indexes(
    set: &IndexSet,
    a: &str,
    b: &str,
    options: &CompareOptions,
) -> ViewerResult<ComparisonResult> {
    let doc_a = set.get(a)?;
    let doc_b = set.get(b)?;
    Ok(compare_documents(doc_a, doc_b, options))
}

pub fn compare_documents(
    a: &IndexDocument,
    b: &IndexDocument,
    options: &CompareOptions,
) -> ComparisonResult {
    let fields_a = a.fields();
    let fields_b = b.fields();

    let mut result = diff_fields(&fields_a, &fields_b);
    result.index_a = a.name.clone();
    result.index_b = b.name.clone();
    result.settings_diff = diff_settings(&a.settings, &b.settings, &options.ignore_settings);

    debug!(
        "Compared '{}' and '{}': {} only in A, {} only in B, {} type change(s)",
        a.name,
        b.name,
        result.fields_only_in_a.len(),
        result.fields_only_in_b.len(),
        result.fields_with_type_changes.len()
    );
    result
}

/// Diff two field lists by path. Index names and settings are left empty.
pub fn diff_fields(a: &[FieldNode], b: &[FieldNode]) -> ComparisonResult {
    let flat_a = flatten_with_sub_fields(a);
    let flat_b = flatten_with_sub_fields(b);
    let by_path_b: HashMap<&str, &FieldNode> =
        flat_b.iter().map(|f| (f.path.as_str(), *f)).collect();
    let paths_a: BTreeSet<&str> = flat_a.iter().map(|f| f.path.as_str()).collect();

    let mut result = ComparisonResult::default();

    for field_a in &flat_a {
        match by_path_b.get(field_a.path.as_str()) {
            None => result.fields_only_in_a.push(field_a.path.clone()),
            Some(field_b) if field_a.field_type != field_b.field_type => {
                result.fields_with_type_changes.push(TypeChange {
                    path: field_a.path.clone(),
                    type_a: field_a.field_type.clone(),
                    type_b: field_b.field_type.clone(),
                });
            }
            Some(field_b) => {
                let changes = attribute_changes(field_a, field_b);
                if !changes.is_empty() {
                    result.fields_with_attribute_changes.push(FieldAttributeChanges {
                        path: field_a.path.clone(),
                        changes,
                    });
                }
            }
        }
    }

    result.fields_only_in_b = flat_b
        .iter()
        .filter(|f| !paths_a.contains(f.path.as_str()))
        .map(|f| f.path.clone())
        .collect();

    result
}

fn attribute_changes(a: &FieldNode, b: &FieldNode) -> Vec<AttributeChange> {
    let pairs = [
        ("analyzer", a.analyzer.clone(), b.analyzer.clone()),
        ("search_analyzer", a.search_analyzer.clone(), b.search_analyzer.clone()),
        ("normalizer", a.normalizer.clone(), b.normalizer.clone()),
        (
            "index",
            Some(a.flags.indexed.to_string()),
            Some(b.flags.indexed.to_string()),
        ),
        (
            "doc_values",
            Some(a.flags.doc_values.to_string()),
            Some(b.flags.doc_values.to_string()),
        ),
    ];

    pairs
        .into_iter()
        .filter(|(_, va, vb)| va != vb)
        .map(|(attribute, value_a, value_b)| AttributeChange {
            attribute,
            value_a,
            value_b,
        })
        .collect()
}

/// Key-by-key diff of the top-level scalar settings.
pub fn diff_settings(
    a: &IndexSettings,
    b: &IndexSettings,
    ignore: &[String],
) -> Vec<SettingChange> {
    let keys: BTreeSet<&String> = a.scalars.keys().chain(b.scalars.keys()).collect();

    keys.into_iter()
        .filter(|k| !ignore.contains(k))
        .filter_map(|key| {
            let value_a = a.scalars.get(key.as_str());
            let value_b = b.scalars.get(key.as_str());
            (value_a != value_b).then(|| SettingChange {
                key: key.clone(),
                value_a: value_a.cloned(),
                value_b: value_b.cloned(),
            })
        })
        .collect()
}
