//! Readable JSON export.
//!
//! The export shape is stable: field order follows the walker, the type
//! summary follows [`summarize_types`], and analyzers follow the settings
//! declaration order. Serializing the same index twice yields identical bytes.

use crate::document::IndexDocument;
use crate::error::{ViewerError, ViewerResult};
use crate::field::FieldNode;
use crate::summary::{
    AnalyzerInfo, SummaryScope, TypeCount, summarize_analyzers, summarize_types,
};
use crate::walker::{sub_field_count, top_level_count};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOverview {
    /// Fields in the type percentage base (top-level only by default).
    pub total_fields: usize,
    /// Every walker record, at any depth.
    pub all_fields: usize,
    pub top_level_fields: usize,
    pub sub_fields: usize,
    pub shards: Option<Value>,
    pub replicas: Option<Value>,
    pub creation_date: Option<Value>,
    pub uuid: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportField {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalizer: Option<String>,
    pub indexed: bool,
    pub doc_values: bool,
    pub sub_fields: Vec<String>,
}

impl From<&FieldNode> for ExportField {
    fn from(node: &FieldNode) -> Self {
        Self {
            path: node.path.clone(),
            name: node.name.clone(),
            field_type: node.field_type.clone(),
            depth: node.depth,
            analyzer: node.analyzer.clone(),
            search_analyzer: node.search_analyzer.clone(),
            normalizer: node.normalizer.clone(),
            indexed: node.flags.indexed,
            doc_values: node.flags.doc_values,
            sub_fields: node.sub_fields.iter().map(|s| s.path.clone()).collect(),
        }
    }
}

/// Export document for one index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexExport {
    pub index_name: String,
    pub overview: ExportOverview,
    pub fields: Vec<ExportField>,
    pub type_summary: Vec<TypeCount>,
    pub analyzers: Vec<AnalyzerInfo>,
}

impl IndexExport {
    pub fn build(doc: &IndexDocument, scope: SummaryScope, example_limit: usize) -> Self {
        let fields = doc.fields();
        let types = summarize_types(&fields, scope, example_limit);
        let analyzers = summarize_analyzers(&fields, &doc.settings);
        let settings = &doc.settings;

        Self {
            index_name: doc.name.clone(),
            overview: ExportOverview {
                total_fields: types.total_fields,
                all_fields: fields.len(),
                top_level_fields: top_level_count(&fields),
                sub_fields: sub_field_count(&fields),
                shards: settings.shards().cloned(),
                replicas: settings.replicas().cloned(),
                creation_date: settings.creation_date().cloned(),
                uuid: settings.uuid().cloned(),
            },
            fields: fields.iter().map(ExportField::from).collect(),
            type_summary: types.types,
            analyzers: analyzers.analyzers,
        }
    }
}

/// Serialize exports: a single object for one index, an array otherwise.
pub fn to_json_string(exports: &[IndexExport]) -> ViewerResult<String> {
    let rendered = match exports {
        [single] => serde_json::to_string_pretty(single),
        many => serde_json::to_string_pretty(many),
    };
    rendered
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| ViewerError::Export(e.to_string()))
}

/// Write exports to `path`.
pub fn write_exports(exports: &[IndexExport], path: impl AsRef<Path>) -> ViewerResult<()> {
    let path = path.as_ref();
    let content = to_json_string(exports)?;
    std::fs::write(path, content)?;
    info!("Exported {} index summary(ies) to {}", exports.len(), path.display());
    Ok(())
}
