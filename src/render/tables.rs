use super::new_table;
use crate::search::SearchHit;
use crate::summary::{AnalyzerSummary, ComponentRef, TypeSummary};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color};
use std::fmt::Write;

// Examples shown inline before collapsing into "(+n more)".
const INLINE_EXAMPLES: usize = 2;

pub fn type_summary_table(index: &str, summary: &TypeSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("📊 Field Types Summary - {}", index).cyan().bold()
    );

    let mut table = new_table();
    table.set_header(vec!["Type", "Count", "Percentage", "Sub-fields", "Examples"]);

    if summary.is_empty() {
        table.add_row(vec!["ℹ️", "0", "0%", "0", "No fields"]);
    }

    for entry in &summary.types {
        let mut examples = entry
            .examples
            .iter()
            .take(INLINE_EXAMPLES)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let hidden = entry.count.saturating_sub(INLINE_EXAMPLES.min(entry.examples.len()));
        if hidden > 0 && !examples.is_empty() {
            let _ = write!(examples, " (+{} more)", hidden);
        }

        table.add_row(vec![
            Cell::new(&entry.field_type).fg(Color::Cyan),
            Cell::new(entry.count).fg(Color::Green),
            Cell::new(format!("{:.1}%", entry.percentage)).fg(Color::Yellow),
            Cell::new(entry.sub_field_count),
            Cell::new(examples),
        ]);
    }

    for idx in 1..=3 {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    let _ = writeln!(out, "{}", table);
    let _ = writeln!(
        out,
        "  {} field(s) counted, {} sub-field(s) listed separately",
        summary.total_fields, summary.total_sub_fields
    );
    out
}

pub fn analyzer_table(index: &str, summary: &AnalyzerSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format!("🔍 Analyzers - {}", index).cyan().bold());

    let mut table = new_table();
    table.set_header(vec!["Name", "Type", "Tokenizer", "Filters", "Used By"]);

    if summary.is_empty() {
        table.add_row(vec!["ℹ️", "No custom analyzers in use", "", "", ""]);
    }

    for analyzer in &summary.analyzers {
        let tokenizer = analyzer
            .tokenizer
            .as_ref()
            .map(component_label)
            .unwrap_or_default();
        let filters = analyzer
            .char_filters
            .iter()
            .map(|c| format!("{} (char)", component_label(c)))
            .chain(analyzer.filters.iter().map(component_label))
            .collect::<Vec<_>>();

        table.add_row(vec![
            Cell::new(&analyzer.name).fg(Color::Cyan),
            Cell::new(&analyzer.analyzer_type).fg(Color::Green),
            Cell::new(tokenizer).fg(Color::Yellow),
            Cell::new(if filters.is_empty() {
                "None".to_string()
            } else {
                filters.join(", ")
            })
            .fg(Color::Magenta),
            Cell::new(analyzer.used_by.join(", ")),
        ]);
    }

    let _ = writeln!(out, "{}", table);
    if !summary.unused.is_empty() {
        let _ = writeln!(
            out,
            "  {} {}",
            "Defined but unused:".dimmed(),
            summary.unused.join(", ").dimmed()
        );
    }
    out
}

// Custom components are marked with `*`.
fn component_label(component: &ComponentRef) -> String {
    match &component.definition {
        Some(def) => match def.get("type").and_then(|t| t.as_str()) {
            Some(kind) => format!("{}* [{}]", component.name, kind),
            None => format!("{}*", component.name),
        },
        None => component.name.clone(),
    }
}

pub fn search_table(index: &str, pattern: &str, hits: &[SearchHit]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("🔍 Search Results for '{}' in {}", pattern, index)
            .cyan()
            .bold()
    );

    let mut table = new_table();
    table.set_header(vec!["Field", "Type", "Analyzer", "Properties"]);

    if hits.is_empty() {
        table.add_row(vec!["ℹ️", "No matches found", "", ""]);
    }

    for hit in hits {
        let field = match (&hit.parent_path, hit.is_sub_field) {
            (Some(parent), true) => format!("{} (sub-field of {})", hit.path, parent),
            _ => hit.path.clone(),
        };
        let props = hit.properties();
        table.add_row(vec![
            Cell::new(field).fg(Color::Cyan),
            Cell::new(&hit.field_type).fg(Color::Green),
            Cell::new(hit.analyzer.as_deref().unwrap_or("None")).fg(Color::Yellow),
            Cell::new(if props.is_empty() {
                "Standard".to_string()
            } else {
                props.join(", ")
            })
            .fg(Color::Magenta),
        ]);
    }

    let _ = writeln!(out, "{}", table);
    let _ = writeln!(out, "  {} match(es)", hits.len().to_string().cyan());
    out
}
