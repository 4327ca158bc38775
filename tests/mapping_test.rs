use osview::compare::{CompareOptions, compare_indexes};
use osview::error::ViewerError;
use osview::export::{IndexExport, to_json_string};
use osview::prelude::*;
use osview::search::ancestor_paths;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const PRODUCTS: &str = r#"{
    "products-v1": {
        "mappings": {
            "properties": {
                "title": {
                    "type": "text",
                    "analyzer": "english_folding",
                    "fields": {"keyword": {"type": "keyword", "ignore_above": 256}}
                },
                "price": {"type": "scaled_float", "scaling_factor": 100},
                "sku": {"type": "keyword", "doc_values": false},
                "vendor": {
                    "properties": {
                        "name": {"type": "text"},
                        "country": {"type": "keyword"}
                    }
                }
            }
        },
        "settings": {
            "index": {
                "number_of_shards": "3",
                "number_of_replicas": "1",
                "creation_date": "1640995200000",
                "uuid": "Zq4vJ3xlT9y2n8m1k0aBcd",
                "analysis": {
                    "analyzer": {
                        "english_folding": {
                            "type": "custom",
                            "tokenizer": "standard",
                            "filter": ["lowercase", "english_stop"]
                        }
                    },
                    "filter": {
                        "english_stop": {"type": "stop", "stopwords": "_english_"}
                    }
                }
            }
        }
    },
    "products-v2": {
        "mappings": {
            "properties": {
                "title": {
                    "type": "text",
                    "fields": {"keyword": {"type": "keyword"}}
                },
                "price": {"type": "double"},
                "vendor": {
                    "properties": {
                        "name": {"type": "text"},
                        "country": {"type": "keyword"}
                    }
                },
                "tags": {"type": "keyword"}
            }
        },
        "settings": {
            "index": {
                "number_of_shards": "5",
                "number_of_replicas": "1"
            }
        }
    }
}"#;

fn products() -> IndexSet {
    IndexSet::from_json_str(PRODUCTS).expect("fixture parses")
}

#[test]
fn test_two_field_index_end_to_end() {
    let set = IndexSet::from_json_str(
        r#"{"idx":{"mappings":{"properties":{"a":{"type":"text"},"b":{"type":"keyword"}}}}}"#,
    )
    .unwrap();
    let fields = set.get("idx").unwrap().fields();

    let paths: Vec<&str> = fields.iter().map(|f| f.path.as_str()).collect();
    let types: Vec<&str> = fields.iter().map(|f| f.field_type.as_str()).collect();
    assert_eq!(paths, vec!["a", "b"]);
    assert_eq!(types, vec!["text", "keyword"]);

    let summary = summarize_types(&fields, SummaryScope::All, EXAMPLE_LIMIT);
    assert_eq!(summary.total_fields, 2);
    assert_eq!(summary.get("text").unwrap().count, 1);
    assert_eq!(summary.get("text").unwrap().percentage, 50.0);
    assert_eq!(summary.get("keyword").unwrap().percentage, 50.0);
}

#[test]
fn test_multi_field_is_sub_field() {
    let set = products();
    let fields = set.get("products-v1").unwrap().fields();

    let title = fields.iter().find(|f| f.path == "title").unwrap();
    assert_eq!(title.sub_fields.len(), 1);
    assert_eq!(title.sub_fields[0].path, "title.keyword");
    assert_eq!(title.sub_fields[0].field_type, "keyword");
    assert!(fields.iter().all(|f| f.path != "title.keyword"));
}

#[test]
fn test_index_order_and_names() {
    let set = products();
    assert_eq!(set.names(), vec!["products-v1", "products-v2"]);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_walker_order_is_preorder() {
    let set = products();
    let fields = set.get("products-v1").unwrap().fields();
    let paths: Vec<&str> = fields.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["title", "price", "sku", "vendor", "vendor.name", "vendor.country"]
    );
}

#[test]
fn test_analyzers_only_referenced() {
    let set = products();
    let doc = set.get("products-v1").unwrap();
    let analyzers = summarize_analyzers(&doc.fields(), &doc.settings);

    assert_eq!(analyzers.analyzers.len(), 1);
    let info = &analyzers.analyzers[0];
    assert_eq!(info.name, "english_folding");
    assert_eq!(info.used_by, vec!["title".to_string()]);
    assert_eq!(info.filters.len(), 2);
    assert!(info.filters[1].definition.is_some());

    let doc = set.get("products-v2").unwrap();
    assert!(summarize_analyzers(&doc.fields(), &doc.settings).is_empty());
}

#[test]
fn test_compare_missing_index_names_it() {
    let set = IndexSet::from_json_str(r#"{"x":{}}"#).unwrap();
    let err = compare_indexes(&set, "x", "y", &CompareOptions::default()).unwrap_err();

    match err {
        ViewerError::IndexNotFound { name, available } => {
            assert_eq!(name, "y");
            assert_eq!(available, vec!["x".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_compare_products() {
    let set = products();
    let result =
        compare_indexes(&set, "products-v1", "products-v2", &CompareOptions::default()).unwrap();

    assert_eq!(result.fields_only_in_a, vec!["sku".to_string()]);
    assert_eq!(result.fields_only_in_b, vec!["tags".to_string()]);
    assert_eq!(result.fields_with_type_changes.len(), 1);
    assert_eq!(result.fields_with_type_changes[0].path, "price");
    assert_eq!(result.fields_with_type_changes[0].type_a, "scaled_float");
    assert_eq!(result.fields_with_type_changes[0].type_b, "double");

    let keys: Vec<&str> = result.settings_diff.iter().map(|s| s.key.as_str()).collect();
    assert!(keys.contains(&"number_of_shards"));
    assert!(!keys.contains(&"number_of_replicas"));
    assert!(!result.is_identical());
}

#[test]
fn test_compare_is_symmetric() {
    let set = products();
    let options = CompareOptions::default();
    let ab = compare_indexes(&set, "products-v1", "products-v2", &options).unwrap();
    let ba = compare_indexes(&set, "products-v2", "products-v1", &options).unwrap();

    assert_eq!(ab.fields_only_in_a, ba.fields_only_in_b);
    assert_eq!(ab.fields_only_in_b, ba.fields_only_in_a);
    assert_eq!(
        ab.fields_with_type_changes.len(),
        ba.fields_with_type_changes.len()
    );
}

#[test]
fn test_compare_ignored_settings() {
    let set = products();
    let options = CompareOptions {
        ignore_settings: vec!["number_of_shards".into(), "uuid".into(), "creation_date".into()],
    };
    let result = compare_indexes(&set, "products-v1", "products-v2", &options).unwrap();
    assert!(result.settings_diff.is_empty());
}

#[test]
fn test_compare_index_with_itself() {
    let set = products();
    let result =
        compare_indexes(&set, "products-v1", "products-v1", &CompareOptions::default()).unwrap();
    assert!(result.is_identical());
}

#[test]
fn test_search_sub_field_keeps_context() {
    let set = products();
    let fields = set.get("products-v1").unwrap().fields();
    let hits = search_fields(&fields, &FieldPattern::new("KEYWORD").unwrap()).unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "title.keyword");
    assert!(hits[0].is_sub_field);
    assert_eq!(hits[0].parent_path.as_deref(), Some("title"));
}

#[test]
fn test_search_nested_ancestors() {
    let set = products();
    let fields = set.get("products-v1").unwrap().fields();
    let hits = search_fields(&fields, &FieldPattern::new("country").unwrap()).unwrap();
    let visible = ancestor_paths(&fields, &hits);

    assert!(visible.contains("vendor"));
    assert!(visible.contains("vendor.country"));
    assert!(!visible.contains("vendor.name"));
}

#[test]
fn test_search_empty_and_never_matching() {
    let set = products();
    let fields = set.get("products-v1").unwrap().fields();

    let all = search_fields(&fields, &FieldPattern::new("").unwrap()).unwrap();
    assert_eq!(all.len(), fields.len() + 1);

    let none = search_fields(&fields, &FieldPattern::new("^(?!)").unwrap()).unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_invalid_pattern_is_an_error() {
    let err = FieldPattern::new("title[").unwrap_err();
    assert!(matches!(err, ViewerError::InvalidPattern { ref pattern, .. } if pattern == "title["));
}

#[test]
fn test_malformed_input() {
    assert!(matches!(
        IndexSet::from_json_str("{not json"),
        Err(ViewerError::MalformedInput(_))
    ));
    assert!(matches!(
        IndexSet::from_json_str("[1, 2]"),
        Err(ViewerError::MalformedInput(_))
    ));
}

#[test]
fn test_minimal_definitions_never_fail() {
    let set = IndexSet::from_json_str(
        r#"{"odd":{"mappings":{"properties":{"bare":{},"nested":{"properties":{"leaf":{}}}}}}}"#,
    )
    .unwrap();
    let fields = set.get("odd").unwrap().fields();

    assert_eq!(fields.len(), 3);
    assert!(fields.iter().all(|f| f.type_inferred));
    assert_eq!(fields[1].field_type, "object");
}

#[test]
fn test_export_shape_and_idempotence() {
    let set = products();
    let doc = set.get("products-v1").unwrap();
    let build = || IndexExport::build(doc, SummaryScope::All, EXAMPLE_LIMIT);
    let first = to_json_string(&[build()]).unwrap();
    let second = to_json_string(&[build()]).unwrap();
    assert_eq!(first, second);

    let value: Value = serde_json::from_str(&first).unwrap();
    assert_eq!(value["index_name"], json!("products-v1"));
    assert_eq!(value["overview"]["total_fields"], json!(6));
    assert_eq!(value["overview"]["all_fields"], json!(6));

    let paths: Vec<&str> = value["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec!["title", "price", "sku", "vendor", "vendor.name", "vendor.country"]
    );
    assert_eq!(value["fields"][2]["doc_values"], json!(false));
    assert_eq!(value["analyzers"][0]["name"], json!("english_folding"));
}

#[test]
fn test_default_export_counts_top_level() {
    let set = products();
    let doc = set.get("products-v1").unwrap();
    let export = IndexExport::build(doc, SummaryScope::default(), EXAMPLE_LIMIT);

    assert_eq!(export.overview.total_fields, 4);
    assert_eq!(export.overview.all_fields, 6);
    let total: f64 = export.type_summary.iter().map(|t| t.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9);
    let object = export.type_summary.iter().find(|t| t.field_type == "object").unwrap();
    assert_eq!(object.count, 1);
    assert_eq!(object.percentage, 25.0);
}

#[test]
fn test_export_many_is_array() {
    let set = products();
    let exports: Vec<IndexExport> = set
        .iter()
        .map(|doc| IndexExport::build(doc, SummaryScope::All, EXAMPLE_LIMIT))
        .collect();
    let value: Value = serde_json::from_str(&to_json_string(&exports).unwrap()).unwrap();
    assert_eq!(value.as_array().map(|a| a.len()), Some(2));
}
