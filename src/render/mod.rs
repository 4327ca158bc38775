//! Terminal rendering.
//!
//! Every function here takes already computed records and returns the text
//! to print. Nothing in this module inspects raw mapping JSON.

mod compare;
mod tables;
mod tree;


pub use compare::comparison;
pub use tables::{analyzer_table, search_table, type_summary_table};
pub use tree::{TreeOptions, field_tree};

use crate::document::IndexDocument;
use crate::field::FieldNode;
use crate::walker::{sub_field_count, top_level_count};
use chrono::{DateTime, Utc};
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;
use std::fmt::Write;

const UNKNOWN: &str = "Unknown";
const UUID_PREFIX_LEN: usize = 12;

/// Headline facts about one index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOverview {
    pub name: String,
    pub total_fields: usize,
    pub top_level_fields: usize,
    pub sub_fields: usize,
    pub shards: String,
    pub replicas: String,
    pub created: String,
    pub uuid: String,
}

impl IndexOverview {
    pub fn new(doc: &IndexDocument, fields: &[FieldNode]) -> Self {
        let settings = &doc.settings;
        Self {
            name: doc.name.clone(),
            total_fields: fields.len(),
            top_level_fields: top_level_count(fields),
            sub_fields: sub_field_count(fields),
            shards: settings.shards().map_or_else(|| UNKNOWN.to_string(), value_to_string),
            replicas: settings
                .replicas()
                .map_or_else(|| UNKNOWN.to_string(), value_to_string),
            created: settings
                .creation_date()
                .map_or_else(|| UNKNOWN.to_string(), format_creation_date),
            uuid: settings.uuid().map_or_else(|| UNKNOWN.to_string(), short_uuid),
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("📊 Index Name", self.name.clone()),
            (
                "📈 Total Fields",
                format!(
                    "{} ({} top-level, {} sub-fields)",
                    self.total_fields, self.top_level_fields, self.sub_fields
                ),
            ),
            ("🔧 Shards", self.shards.clone()),
            ("🔄 Replicas", self.replicas.clone()),
            ("📅 Created", self.created.clone()),
            ("🆔 UUID", self.uuid.clone()),
        ]
    }

    /// Uncolored text, for embedding in table cells.
    pub fn plain(&self) -> String {
        self.rows()
            .into_iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The overview panel.
pub fn overview(overview: &IndexOverview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "🗂️  Index Overview".blue().bold());
    for (label, value) in overview.rows() {
        let _ = writeln!(out, "  {} {}", format!("{}:", label).bold(), value);
    }
    out
}

/// Section divider with the index name.
pub fn rule(title: &str) -> String {
    let line = "─".repeat(20);
    format!(
        "{} {} {}",
        line.dimmed(),
        format!("📋 {}", title).blue().bold(),
        line.dimmed()
    )
}

/// Numbered list of index names.
pub fn index_list(names: &[String]) -> String {
    let mut out = String::new();
    if names.is_empty() {
        let _ = writeln!(out, "{}", "No indexes found".yellow());
        return out;
    }
    let _ = writeln!(out, "{}", "📋 Available Indexes:".blue().bold());
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, name.cyan());
    }
    out
}

/// Render an epoch-millisecond or ISO-8601 creation date.
pub fn format_creation_date(value: &Value) -> String {
    let millis = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    if let Some(ms) = millis {
        return match DateTime::<Utc>::from_timestamp_millis(ms) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => value_to_string(value),
        };
    }

    if let Value::String(s) = value
        && let Ok(dt) = DateTime::parse_from_rfc3339(s)
    {
        return dt
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string();
    }

    value_to_string(value)
}

fn short_uuid(value: &Value) -> String {
    let uuid = value_to_string(value);
    if uuid.chars().count() > UUID_PREFIX_LEN {
        format!("{}...", uuid.chars().take(UUID_PREFIX_LEN).collect::<String>())
    } else {
        uuid
    }
}

pub(crate) fn value_to_string(val: &Value) -> String {
    match val {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

/// Emoji shown next to a field of the given type.
pub(crate) fn type_emoji(field_type: &str) -> &'static str {
    match field_type {
        "text" | "match_only_text" => "📝",
        "keyword" | "constant_keyword" | "wildcard" => "🔤",
        "date" | "date_nanos" => "📅",
        "long" | "integer" | "short" | "byte" | "float" | "double" | "half_float"
        | "scaled_float" | "unsigned_long" => "🔢",
        "boolean" => "✅",
        "object" | "flattened" => "📦",
        "nested" => "🔗",
        "geo_point" | "geo_shape" => "🌍",
        "knn_vector" | "dense_vector" => "🧭",
        _ => "❓",
    }
}

/// Field name colored by its type family.
pub(crate) fn styled_name(name: &str, field_type: &str) -> ColoredString {
    match field_type {
        "text" | "match_only_text" => name.cyan(),
        "keyword" | "constant_keyword" | "wildcard" => name.green(),
        "date" | "date_nanos" => name.magenta(),
        "long" | "integer" | "short" | "byte" | "float" | "double" | "half_float"
        | "scaled_float" | "unsigned_long" => name.yellow(),
        _ => name.white(),
    }
}

/// Table with the shared look. Styling is dropped when colors are off.
pub(crate) fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if !colored::control::SHOULD_COLORIZE.should_colorize() {
        table.force_no_tty();
    }
    table
}
