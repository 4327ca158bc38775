//! Type and analyzer summaries.

use crate::document::IndexSettings;
use crate::field::FieldNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Example paths kept per type unless configured otherwise.
pub const EXAMPLE_LIMIT: usize = 5;

/// Which walker records count towards the type percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryScope {
    /// Every declared field, at any depth.
    All,
    /// Only fields declared at the mapping root. An object with nested
    /// children counts once.
    #[default]
    TopLevel,
}

impl SummaryScope {
    fn includes(self, field: &FieldNode) -> bool {
        match self {
            Self::All => true,
            Self::TopLevel => field.depth == 0,
        }
    }
}

/// Count of one declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub field_type: String,
    pub count: usize,
    /// Share of the counted fields, 0–100.
    pub percentage: f64,
    /// Multi-fields of this type. Not part of `percentage`.
    pub sub_field_count: usize,
    pub examples: Vec<String>,
}

/// Per-type counts over a field list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeSummary {
    /// Fields that entered the percentages.
    pub total_fields: usize,
    pub total_sub_fields: usize,
    /// Ordered by count (descending), ties by first appearance.
    pub types: Vec<TypeCount>,
}

impl TypeSummary {
    pub fn get(&self, field_type: &str) -> Option<&TypeCount> {
        self.types.iter().find(|t| t.field_type == field_type)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Count declared types.
///
/// Sub-fields are tallied per type in `sub_field_count` but never added to
/// the denominator, so percentages over `scope` always sum to 100.
pub fn summarize_types(
    fields: &[FieldNode],
    scope: SummaryScope,
    example_limit: usize,
) -> TypeSummary {
    let mut types: Vec<TypeCount> = Vec::new();
    let mut total_fields = 0;
    let mut total_sub_fields = 0;

    for field in fields.iter().filter(|f| scope.includes(f)) {
        total_fields += 1;
        let entry = entry_for(&mut types, &field.field_type);
        entry.count += 1;
        if entry.examples.len() < example_limit {
            entry.examples.push(field.path.clone());
        }

        for sub in &field.sub_fields {
            total_sub_fields += 1;
            entry_for(&mut types, &sub.field_type).sub_field_count += 1;
        }
    }

    for entry in &mut types {
        entry.percentage = if total_fields > 0 {
            entry.count as f64 / total_fields as f64 * 100.0
        } else {
            0.0
        };
    }

    // Stable sort keeps first-seen order among equal counts.
    types.sort_by(|a, b| b.count.cmp(&a.count));

    TypeSummary {
        total_fields,
        total_sub_fields,
        types,
    }
}

fn entry_for<'a>(types: &'a mut Vec<TypeCount>, field_type: &str) -> &'a mut TypeCount {
    let idx = match types.iter().position(|t| t.field_type == field_type) {
        Some(idx) => idx,
        None => {
            types.push(TypeCount {
                field_type: field_type.to_string(),
                count: 0,
                percentage: 0.0,
                sub_field_count: 0,
                examples: Vec::new(),
            });
            types.len() - 1
        }
    };
    &mut types[idx]
}

/// A filter or tokenizer reference with its custom definition, when the
/// index defines one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<Value>,
}

/// One analyzer defined in the index settings and used by at least one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzerInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub analyzer_type: String,
    pub tokenizer: Option<ComponentRef>,
    pub filters: Vec<ComponentRef>,
    pub char_filters: Vec<ComponentRef>,
    /// Paths of the fields (or sub-fields) referencing this analyzer.
    pub used_by: Vec<String>,
}

/// Analyzer inventory for one index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyzerSummary {
    /// Referenced analyzers, in settings declaration order.
    pub analyzers: Vec<AnalyzerInfo>,
    /// Analyzers defined in settings that no field references.
    pub unused: Vec<String>,
}

impl AnalyzerSummary {
    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}

/// Collect the custom analyzers that the fields actually reference.
pub fn summarize_analyzers(fields: &[FieldNode], settings: &IndexSettings) -> AnalyzerSummary {
    let Some(defined) = settings.analysis_section("analyzer") else {
        return AnalyzerSummary::default();
    };
    let tokenizers = settings.analysis_section("tokenizer");
    let filters = settings.analysis_section("filter");
    let char_filters = settings.analysis_section("char_filter");

    let mut summary = AnalyzerSummary::default();
    for (name, config) in defined {
        let used_by = referencing_paths(fields, name);
        if used_by.is_empty() {
            summary.unused.push(name.clone());
            continue;
        }

        summary.analyzers.push(AnalyzerInfo {
            name: name.clone(),
            analyzer_type: config
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("custom")
                .to_string(),
            tokenizer: config
                .get("tokenizer")
                .and_then(Value::as_str)
                .map(|t| component(t, tokenizers)),
            filters: component_list(config.get("filter"), filters),
            char_filters: component_list(config.get("char_filter"), char_filters),
            used_by,
        });
    }

    summary
}

fn referencing_paths(fields: &[FieldNode], analyzer: &str) -> Vec<String> {
    let mut paths = Vec::new();
    for field in fields {
        for node in std::iter::once(field).chain(field.sub_fields.iter()) {
            if node.analyzer_refs().contains(&analyzer) {
                paths.push(node.path.clone());
            }
        }
    }
    paths
}

fn component(name: &str, defined: Option<&Map<String, Value>>) -> ComponentRef {
    ComponentRef {
        name: name.to_string(),
        definition: defined.and_then(|d| d.get(name)).cloned(),
    }
}

// `filter` may be a list or, in hand-written mappings, a single name.
fn component_list(
    value: Option<&Value>,
    defined: Option<&Map<String, Value>>,
) -> Vec<ComponentRef> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|n| component(n, defined))
            .collect(),
        Some(Value::String(name)) => vec![component(name, defined)],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::walk;
    use serde_json::json;

    fn fields(value: Value) -> Vec<FieldNode> {
        walk(value.as_object().unwrap())
    }

    #[test]
    fn test_two_types_fifty_percent() {
        let summary = summarize_types(
            &fields(json!({"a": {"type": "text"}, "b": {"type": "keyword"}})),
            SummaryScope::All,
            EXAMPLE_LIMIT,
        );
        assert_eq!(summary.total_fields, 2);
        assert_eq!(summary.get("text").unwrap().count, 1);
        assert_eq!(summary.get("text").unwrap().percentage, 50.0);
        assert_eq!(summary.get("keyword").unwrap().percentage, 50.0);
        assert_eq!(summary.types[0].field_type, "text");
    }

    #[test]
    fn test_sub_fields_counted_separately() {
        let summary = summarize_types(
            &fields(json!({
                "title": {"type": "text", "fields": {"keyword": {"type": "keyword"}}},
                "body": {"type": "text"}
            })),
            SummaryScope::All,
            EXAMPLE_LIMIT,
        );
        assert_eq!(summary.total_fields, 2);
        assert_eq!(summary.total_sub_fields, 1);
        let text = summary.get("text").unwrap();
        assert_eq!(text.count, 2);
        assert_eq!(text.percentage, 100.0);
        let keyword = summary.get("keyword").unwrap();
        assert_eq!(keyword.count, 0);
        assert_eq!(keyword.sub_field_count, 1);
        assert_eq!(keyword.percentage, 0.0);
    }

    #[test]
    fn test_scope_top_level() {
        let list = fields(json!({
            "user": {"properties": {"name": {"type": "text"}, "id": {"type": "keyword"}}},
            "age": {"type": "integer"}
        }));
        let all = summarize_types(&list, SummaryScope::All, EXAMPLE_LIMIT);
        assert_eq!(all.total_fields, 4);

        let top = summarize_types(&list, SummaryScope::TopLevel, EXAMPLE_LIMIT);
        assert_eq!(top.total_fields, 2);
        assert!(top.get("text").is_none());
        assert_eq!(top.get("object").unwrap().percentage, 50.0);
    }

    #[test]
    fn test_default_scope_counts_object_once() {
        let list = fields(json!({
            "user": {"properties": {
                "n": {"type": "text"},
                "m": {"type": "text"},
                "o": {"type": "text"}
            }},
            "age": {"type": "integer"}
        }));
        let summary = summarize_types(&list, SummaryScope::default(), EXAMPLE_LIMIT);
        assert_eq!(summary.total_fields, 2);
        assert_eq!(summary.get("object").unwrap().percentage, 50.0);
        assert_eq!(summary.get("integer").unwrap().percentage, 50.0);
        assert!(summary.get("text").is_none());
    }

    #[test]
    fn test_order_and_examples() {
        let summary = summarize_types(
            &fields(json!({
                "d": {"type": "date"},
                "k1": {"type": "keyword"},
                "k2": {"type": "keyword"},
                "k3": {"type": "keyword"},
                "l": {"type": "long"}
            })),
            SummaryScope::All,
            2,
        );
        let order: Vec<_> = summary.types.iter().map(|t| t.field_type.as_str()).collect();
        assert_eq!(order, vec!["keyword", "date", "long"]);
        assert_eq!(summary.types[0].examples, vec!["k1", "k2"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize_types(&[], SummaryScope::All, EXAMPLE_LIMIT);
        assert!(summary.is_empty());
        assert_eq!(summary.total_fields, 0);
    }

    #[test]
    fn test_analyzers_filtered_to_referenced() {
        let settings = IndexSettings::from_value(json!({
            "index": {
                "analysis": {
                    "analyzer": {
                        "unused_one": {"type": "standard"},
                        "folding": {
                            "tokenizer": "edge",
                            "filter": ["lowercase", "my_stop"],
                            "char_filter": "html_strip"
                        }
                    },
                    "tokenizer": {"edge": {"type": "edge_ngram", "min_gram": 2}},
                    "filter": {"my_stop": {"type": "stop", "stopwords": "_english_"}}
                }
            }
        }));
        let list = fields(json!({
            "title": {
                "type": "text",
                "fields": {"folded": {"type": "text", "analyzer": "folding"}}
            },
            "body": {"type": "text", "search_analyzer": "folding", "analyzer": "standard"}
        }));

        let summary = summarize_analyzers(&list, &settings);
        assert_eq!(summary.unused, vec!["unused_one"]);
        assert_eq!(summary.analyzers.len(), 1);

        let folding = &summary.analyzers[0];
        assert_eq!(folding.analyzer_type, "custom");
        assert_eq!(folding.used_by, vec!["title.folded", "body"]);
        let tokenizer = folding.tokenizer.as_ref().unwrap();
        assert_eq!(tokenizer.name, "edge");
        assert_eq!(tokenizer.definition.as_ref().unwrap()["min_gram"], 2);
        assert_eq!(folding.filters[0].definition, None);
        assert_eq!(folding.filters[1].name, "my_stop");
        assert!(folding.filters[1].definition.is_some());
        assert_eq!(folding.char_filters[0].name, "html_strip");
    }

    #[test]
    fn test_no_analysis_section() {
        let list = fields(json!({"title": {"type": "text", "analyzer": "english"}}));
        let summary = summarize_analyzers(&list, &IndexSettings::default());
        assert!(summary.is_empty());
        assert!(summary.unused.is_empty());
    }
}
