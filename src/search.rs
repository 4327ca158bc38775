//! Field search.
//!
//! Patterns are case-insensitive regular expressions matched against a
//! field's name and its dotted path. Look-around is supported, so patterns
//! written for other regex dialects (e.g. `^(?!)`) behave as expected.

use crate::error::{ViewerError, ViewerResult};
use crate::field::{FieldFlags, FieldNode};
use fancy_regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// A compiled search pattern.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    source: String,
    // None for the empty pattern, which matches everything.
    regex: Option<Regex>,
}

impl FieldPattern {
    /// Compile a pattern. Invalid syntax is an error, never a literal match.
    pub fn new(pattern: &str) -> ViewerResult<Self> {
        let regex = if pattern.is_empty() {
            None
        } else {
            let compiled = Regex::new(&format!("(?i){}", pattern))
                .map_err(|e| ViewerError::pattern(pattern, e))?;
            Some(compiled)
        };

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a single string.
    ///
    /// Fails only when the backtracking engine gives up on a pathological
    /// pattern.
    pub fn is_match(&self, text: &str) -> ViewerResult<bool> {
        match &self.regex {
            None => Ok(true),
            Some(regex) => regex
                .is_match(text)
                .map_err(|e| ViewerError::pattern(&self.source, e)),
        }
    }

    fn matches_field(&self, field: &FieldNode) -> ViewerResult<bool> {
        Ok(self.is_match(&field.name)? || self.is_match(&field.path)?)
    }
}

/// One matching field, with enough context to place it in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub path: String,
    pub name: String,
    pub field_type: String,
    pub analyzer: Option<String>,
    pub flags: FieldFlags,
    pub sub_field_count: usize,
    /// `None` for root fields.
    pub parent_path: Option<String>,
    /// True when the hit is a multi-field of `parent_path`.
    pub is_sub_field: bool,
    pub depth: usize,
}

impl SearchHit {
    fn from_node(node: &FieldNode, is_sub_field: bool) -> Self {
        Self {
            path: node.path.clone(),
            name: node.name.clone(),
            field_type: node.field_type.clone(),
            analyzer: node.analyzer.clone(),
            flags: node.flags,
            sub_field_count: node.sub_fields.len(),
            parent_path: node.parent.clone(),
            is_sub_field,
            depth: node.depth,
        }
    }

    /// Short description of the non-default properties.
    pub fn properties(&self) -> Vec<String> {
        let mut props: Vec<String> = self.flags.labels().into_iter().map(String::from).collect();
        if self.sub_field_count > 0 {
            props.push(format!("{} sub-fields", self.sub_field_count));
        }
        props
    }
}

/// Return every field (and sub-field) whose name or path matches, in walker
/// order with multi-fields right after their owner.
pub fn search_fields(fields: &[FieldNode], pattern: &FieldPattern) -> ViewerResult<Vec<SearchHit>> {
    let mut hits = Vec::new();
    for field in fields {
        if pattern.matches_field(field)? {
            hits.push(SearchHit::from_node(field, false));
        }
        for sub in &field.sub_fields {
            if pattern.matches_field(sub)? {
                hits.push(SearchHit::from_node(sub, true));
            }
        }
    }

    debug!(
        "Pattern '{}' matched {} field(s)",
        pattern.as_str(),
        hits.len()
    );
    Ok(hits)
}

/// Paths that must stay visible to show `hits` in tree context: every hit
/// plus each of its ancestors.
pub fn ancestor_paths(fields: &[FieldNode], hits: &[SearchHit]) -> HashSet<String> {
    let parents: std::collections::HashMap<&str, Option<&str>> = fields
        .iter()
        .map(|f| (f.path.as_str(), f.parent_path()))
        .collect();

    let mut visible = HashSet::new();
    for hit in hits {
        visible.insert(hit.path.clone());
        let mut current = hit.parent_path.as_deref();
        while let Some(path) = current {
            if !visible.insert(path.to_string()) {
                break;
            }
            current = parents.get(path).copied().flatten();
        }
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::{flatten_with_sub_fields, walk};
    use serde_json::json;

    fn sample() -> Vec<FieldNode> {
        walk(
            json!({
                "name": {"type": "text", "analyzer": "standard"},
                "age": {"type": "integer"},
                "created_at": {"type": "date"},
                "tags": {"type": "keyword", "doc_values": false},
                "title": {"type": "text", "fields": {"keyword": {"type": "keyword"}}},
                "user": {"properties": {"email": {"type": "keyword"}}}
            })
            .as_object()
            .unwrap(),
        )
    }

    fn paths(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.path.as_str()).collect()
    }

    #[test]
    fn test_case_insensitive_name_match() {
        let hits = search_fields(&sample(), &FieldPattern::new("NAME").unwrap()).unwrap();
        assert_eq!(paths(&hits), vec!["name"]);
        assert_eq!(hits[0].analyzer.as_deref(), Some("standard"));
    }

    #[test]
    fn test_regex_pattern() {
        let hits = search_fields(&sample(), &FieldPattern::new("^(age|tags)$").unwrap()).unwrap();
        assert_eq!(paths(&hits), vec!["age", "tags"]);
        assert_eq!(hits[1].properties(), vec!["No Doc Values"]);
    }

    #[test]
    fn test_sub_field_hit_keeps_parent() {
        let hits = search_fields(&sample(), &FieldPattern::new("keyword").unwrap()).unwrap();
        assert_eq!(paths(&hits), vec!["title.keyword"]);
        assert!(hits[0].is_sub_field);
        assert_eq!(hits[0].parent_path.as_deref(), Some("title"));
    }

    #[test]
    fn test_path_match_on_nested() {
        let hits = search_fields(&sample(), &FieldPattern::new(r"user\.").unwrap()).unwrap();
        assert_eq!(paths(&hits), vec!["user.email"]);
        assert_eq!(hits[0].depth, 1);
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let fields = sample();
        let hits = search_fields(&fields, &FieldPattern::new("").unwrap()).unwrap();
        let all: Vec<_> = flatten_with_sub_fields(&fields)
            .iter()
            .map(|f| f.path.as_str())
            .collect();
        assert_eq!(paths(&hits), all);
    }

    #[test]
    fn test_never_matching_pattern() {
        let hits = search_fields(&sample(), &FieldPattern::new("^(?!)").unwrap()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FieldPattern::new("(unclosed").unwrap_err();
        match err {
            ViewerError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_ancestor_paths() {
        let fields = walk(
            json!({
                "a": {"properties": {"b": {"properties": {"c": {"type": "text"}}}}},
                "z": {"type": "text"}
            })
            .as_object()
            .unwrap(),
        );
        let hits = search_fields(&fields, &FieldPattern::new("^c$").unwrap()).unwrap();
        let visible = ancestor_paths(&fields, &hits);
        assert_eq!(visible.len(), 3);
        assert!(visible.contains("a"));
        assert!(visible.contains("a.b"));
        assert!(visible.contains("a.b.c"));
        assert!(!visible.contains("z"));
    }
}
