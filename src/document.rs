//! Loading index exports.
//!
//! The input file maps index names to `{ "mappings": …, "settings": … }`
//! objects. Everything below the index level is kept as raw JSON and only
//! interpreted by the walker and the summarizer.

use crate::error::{ViewerError, ViewerResult};
use crate::field::FieldNode;
use crate::walker;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

/// Settings keys surfaced in the overview panel.
pub const SHARDS_KEY: &str = "number_of_shards";
pub const REPLICAS_KEY: &str = "number_of_replicas";
pub const CREATION_DATE_KEY: &str = "creation_date";
pub const UUID_KEY: &str = "uuid";

/// All indexes from one input file, in file order.
#[derive(Debug, Clone, Default)]
pub struct IndexSet {
    indexes: Vec<IndexDocument>,
}

impl IndexSet {
    /// Read and parse an export file.
    pub fn load(path: impl AsRef<Path>) -> ViewerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json_str(&content)?;
        info!(
            "Loaded {} index(es) from {}",
            set.indexes.len(),
            path.display()
        );
        Ok(set)
    }

    /// Parse an export from a JSON string.
    pub fn from_json_str(content: &str) -> ViewerResult<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ViewerError::MalformedInput(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Build from an already parsed document. The top level must be an object.
    pub fn from_value(value: Value) -> ViewerResult<Self> {
        let Value::Object(root) = value else {
            return Err(ViewerError::MalformedInput(format!(
                "top level must be an object of index names, found {}",
                json_kind(&value)
            )));
        };

        let indexes = root
            .into_iter()
            .map(|(name, body)| IndexDocument::from_value(name, body))
            .collect();

        Ok(Self { indexes })
    }

    pub fn names(&self) -> Vec<String> {
        self.indexes.iter().map(|i| i.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexDocument> {
        self.indexes.iter()
    }

    /// Look up an index by name.
    pub fn get(&self, name: &str) -> ViewerResult<&IndexDocument> {
        self.indexes
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| ViewerError::not_found(name, self.names()))
    }
}

/// One named index entry.
#[derive(Debug, Clone)]
pub struct IndexDocument {
    pub name: String,
    /// The `properties` object of the mapping. Empty when absent.
    pub properties: Map<String, Value>,
    pub settings: IndexSettings,
}

impl IndexDocument {
    pub fn from_value(name: impl Into<String>, body: Value) -> Self {
        let name = name.into();
        let Value::Object(mut body) = body else {
            warn!("Index '{}' is not an object; treating it as empty", name);
            return Self {
                name,
                properties: Map::new(),
                settings: IndexSettings::default(),
            };
        };

        let properties = body
            .remove("mappings")
            .map(|m| extract_properties(&name, m))
            .unwrap_or_default();
        let settings = body
            .remove("settings")
            .map(IndexSettings::from_value)
            .unwrap_or_default();

        Self {
            name,
            properties,
            settings,
        }
    }

    /// Walk the mapping into its flat field list.
    pub fn fields(&self) -> Vec<FieldNode> {
        walker::walk(&self.properties)
    }
}

fn extract_properties(index: &str, mappings: Value) -> Map<String, Value> {
    let Value::Object(mut mappings) = mappings else {
        return Map::new();
    };

    if let Some(Value::Object(props)) = mappings.remove("properties") {
        return props;
    }

    // Pre-7.x exports nest everything under a single mapping type.
    if mappings.len() == 1
        && let Some((type_name, Value::Object(mut typed))) = mappings.into_iter().next()
        && let Some(Value::Object(props)) = typed.remove("properties")
    {
        debug!(
            "Unwrapped legacy mapping type '{}' for index '{}'",
            type_name, index
        );
        return props;
    }

    Map::new()
}

/// Index-level settings. Values are untyped passthroughs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSettings {
    /// Top-level scalar settings (`number_of_shards`, `uuid`, …) in file order.
    pub scalars: Map<String, Value>,
    /// The `analysis` section, if any.
    pub analysis: Option<Map<String, Value>>,
}

impl IndexSettings {
    /// Accepts the nested `{ "index": { … } }` form as well as the flat
    /// `{ "index.number_of_shards": … }` form.
    pub fn from_value(settings: Value) -> Self {
        let Value::Object(settings) = settings else {
            return Self::default();
        };

        let mut index = Map::new();
        for (key, value) in settings {
            if key == "index" {
                if let Value::Object(nested) = value {
                    index.extend(nested);
                }
            } else if let Some(stripped) = key.strip_prefix("index.") {
                insert_dotted(&mut index, stripped, value);
            }
        }

        let mut scalars = Map::new();
        let mut analysis = None;
        for (key, value) in index {
            match value {
                Value::Object(section) if key == "analysis" => analysis = Some(section),
                Value::Object(_) | Value::Array(_) => {}
                scalar => {
                    scalars.insert(key, scalar);
                }
            }
        }

        Self { scalars, analysis }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.scalars.get(key)
    }

    pub fn shards(&self) -> Option<&Value> {
        self.get(SHARDS_KEY)
    }

    pub fn replicas(&self) -> Option<&Value> {
        self.get(REPLICAS_KEY)
    }

    pub fn creation_date(&self) -> Option<&Value> {
        self.get(CREATION_DATE_KEY)
    }

    pub fn uuid(&self) -> Option<&Value> {
        self.get(UUID_KEY)
    }

    /// A named section of `analysis` (`analyzer`, `tokenizer`, `filter`, …).
    pub fn analysis_section(&self, section: &str) -> Option<&Map<String, Value>> {
        self.analysis
            .as_ref()
            .and_then(|a| a.get(section))
            .and_then(Value::as_object)
    }
}

// "analysis.analyzer.folding.tokenizer" becomes nested objects so flat and
// nested exports read the same way.
fn insert_dotted(target: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        Some((head, rest)) => {
            let entry = target
                .entry(head)
                .or_insert_with(|| Value::Object(Map::new()));
            match entry {
                Value::Object(inner) => insert_dotted(inner, rest, value),
                _ => debug!("Ignoring flat setting '{}' shadowed by a scalar", key),
            }
        }
        None => {
            target.insert(key.to_string(), value);
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
