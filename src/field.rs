//! Field node model.
//!
//! A [`FieldNode`] is one mapped field as the walker sees it. Raw mapping
//! entries are read through [`FieldDef`], which turns the optional JSON keys
//! into explicit `Option`s so the defaulting rules live in one place.

use serde::Serialize;
use serde_json::{Map, Value};

/// Type assumed for a field that declares nested `properties` but no `type`.
pub const IMPLICIT_CONTAINER_TYPE: &str = "object";

/// Type assumed for a field that declares neither `type` nor `properties`.
pub const FALLBACK_TYPE: &str = "text";

/// Negative-default field flags. Both are `true` unless the mapping
/// explicitly disables them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldFlags {
    pub indexed: bool,
    pub doc_values: bool,
}

impl Default for FieldFlags {
    fn default() -> Self {
        Self {
            indexed: true,
            doc_values: true,
        }
    }
}

impl FieldFlags {
    /// Human-readable labels for every flag that is switched off.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if !self.indexed {
            labels.push("Not Indexed");
        }
        if !self.doc_values {
            labels.push("No Doc Values");
        }
        labels
    }
}

/// One mapped field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    /// Dotted path from the mapping root, unique within an index.
    pub path: String,
    /// Path of the enclosing field or multi-field owner.
    pub parent: Option<String>,
    pub field_type: String,
    /// Set when `field_type` came from the defaulting policy rather than
    /// an explicit `"type"` key.
    pub type_inferred: bool,
    pub analyzer: Option<String>,
    pub search_analyzer: Option<String>,
    pub normalizer: Option<String>,
    pub flags: FieldFlags,
    /// Multi-fields declared under `"fields"`, in declaration order.
    pub sub_fields: Vec<FieldNode>,
    /// Root fields sit at depth 0.
    pub depth: usize,
    /// Number of direct `properties` children.
    pub child_count: usize,
}

impl FieldNode {
    /// Build a node from a raw mapping entry.
    ///
    /// `parent_path` is `None` for fields declared at the mapping root.
    /// Children and sub-fields are not attached here.
    pub fn from_def(name: &str, parent_path: Option<&str>, depth: usize, def: &FieldDef) -> Self {
        let (field_type, type_inferred) = def.resolved_type();
        Self {
            name: name.to_string(),
            path: join_path(parent_path, name),
            parent: parent_path.map(str::to_string),
            field_type,
            type_inferred,
            analyzer: def.analyzer.clone(),
            search_analyzer: def.search_analyzer.clone(),
            normalizer: def.normalizer.clone(),
            flags: def.flags(),
            sub_fields: Vec::new(),
            depth,
            child_count: def.properties.as_ref().map_or(0, Map::len),
        }
    }

    /// Path of the enclosing field, if any.
    pub fn parent_path(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Analyzer names this field refers to, without duplicates.
    pub fn analyzer_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = Vec::new();
        for name in [&self.analyzer, &self.search_analyzer].into_iter().flatten() {
            if !refs.contains(&name.as_str()) {
                refs.push(name);
            }
        }
        refs
    }
}

/// Join a parent path and a field name with a dot.
pub fn join_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{}.{}", parent, name),
        _ => name.to_string(),
    }
}

/// The recognised attributes of one raw mapping entry.
///
/// Parsing never fails: anything that does not have the expected JSON shape
/// is treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDef {
    pub field_type: Option<String>,
    pub analyzer: Option<String>,
    pub search_analyzer: Option<String>,
    pub normalizer: Option<String>,
    pub index: Option<bool>,
    pub doc_values: Option<bool>,
    pub fields: Option<Map<String, Value>>,
    pub properties: Option<Map<String, Value>>,
}

impl FieldDef {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            field_type: string_attr(obj, "type"),
            analyzer: string_attr(obj, "analyzer"),
            search_analyzer: string_attr(obj, "search_analyzer"),
            normalizer: string_attr(obj, "normalizer"),
            index: bool_attr(obj, "index"),
            doc_values: bool_attr(obj, "doc_values"),
            fields: object_attr(obj, "fields"),
            properties: object_attr(obj, "properties"),
        }
    }

    /// The declared type, or the inferred default with `true` as the second
    /// element.
    pub fn resolved_type(&self) -> (String, bool) {
        match &self.field_type {
            Some(t) => (t.clone(), false),
            None if self.properties.is_some() => (IMPLICIT_CONTAINER_TYPE.to_string(), true),
            None => (FALLBACK_TYPE.to_string(), true),
        }
    }

    pub fn flags(&self) -> FieldFlags {
        FieldFlags {
            indexed: self.index != Some(false),
            doc_values: self.doc_values != Some(false),
        }
    }
}

fn string_attr(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

// Legacy exports carry booleans as strings.
fn bool_attr(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn object_attr(obj: &Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    obj.get(key).and_then(Value::as_object).cloned()
}
