use super::{IndexOverview, new_table, value_to_string};
use crate::compare::ComparisonResult;
use crate::summary::TypeSummary;
use colored::*;
use comfy_table::Cell;
use std::fmt::Write;

/// Side-by-side overviews and type summaries, then the diff.
pub fn comparison(
    result: &ComparisonResult,
    overviews: (&IndexOverview, &IndexOverview),
    summaries: (&TypeSummary, &TypeSummary),
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ↔ {}",
        "⚖️  Comparing".cyan().bold(),
        result.index_a.yellow(),
        result.index_b.yellow()
    );

    let mut side_by_side = new_table();
    side_by_side.set_header(vec![result.index_a.as_str(), result.index_b.as_str()]);
    side_by_side.add_row(vec![
        Cell::new(overviews.0.plain()),
        Cell::new(overviews.1.plain()),
    ]);
    side_by_side.add_row(vec![
        Cell::new(plain_types(summaries.0)),
        Cell::new(plain_types(summaries.1)),
    ]);
    let _ = writeln!(out, "{}", side_by_side);
    let _ = writeln!(out);

    if result.is_identical() {
        let _ = writeln!(out, "{}", "✓ No differences in fields or settings".green());
        return out;
    }

    section(&mut out, &format!("Only in {}", result.index_a), &result.fields_only_in_a, "-");
    section(&mut out, &format!("Only in {}", result.index_b), &result.fields_only_in_b, "+");

    if !result.fields_with_type_changes.is_empty() {
        let _ = writeln!(
            out,
            "{} ({})",
            "Type changes".yellow().bold(),
            result.fields_with_type_changes.len()
        );
        for change in &result.fields_with_type_changes {
            let _ = writeln!(
                out,
                "  {} {}: {} → {}",
                "~".yellow(),
                change.path.white(),
                change.type_a.red(),
                change.type_b.green()
            );
        }
        let _ = writeln!(out);
    }

    if !result.fields_with_attribute_changes.is_empty() {
        let _ = writeln!(
            out,
            "{} ({})",
            "Attribute changes".yellow().bold(),
            result.fields_with_attribute_changes.len()
        );
        for field in &result.fields_with_attribute_changes {
            let _ = writeln!(out, "  {} {}", "~".yellow(), field.path.white());
            for change in &field.changes {
                let _ = writeln!(
                    out,
                    "      {}: {} → {}",
                    change.attribute.dimmed(),
                    change.value_a.as_deref().unwrap_or("-").red(),
                    change.value_b.as_deref().unwrap_or("-").green()
                );
            }
        }
        let _ = writeln!(out);
    }

    if !result.settings_diff.is_empty() {
        let _ = writeln!(out, "{}", "Settings differences".yellow().bold());
        let mut table = new_table();
        table.set_header(vec!["Setting", result.index_a.as_str(), result.index_b.as_str()]);
        for change in &result.settings_diff {
            table.add_row(vec![
                change.key.clone(),
                change.value_a.as_ref().map_or("-".to_string(), value_to_string),
                change.value_b.as_ref().map_or("-".to_string(), value_to_string),
            ]);
        }
        let _ = writeln!(out, "{}", table);
    }

    out
}

fn section(out: &mut String, title: &str, paths: &[String], marker: &str) {
    if paths.is_empty() {
        return;
    }
    let _ = writeln!(out, "{} ({})", title.bold(), paths.len());
    for path in paths {
        let line = format!("  {} {}", marker, path);
        let _ = writeln!(
            out,
            "{}",
            if marker == "+" { line.green() } else { line.red() }
        );
    }
    let _ = writeln!(out);
}

fn plain_types(summary: &TypeSummary) -> String {
    if summary.is_empty() {
        return "No fields".to_string();
    }
    summary
        .types
        .iter()
        .map(|t| format!("{:<12} {:>4}  {:>5.1}%", t.field_type, t.count, t.percentage))
        .collect::<Vec<_>>()
        .join("\n")
}
