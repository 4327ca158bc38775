use super::{styled_name, type_emoji};
use crate::field::FieldNode;
use colored::*;
use std::collections::HashSet;
use std::fmt::Write;

/// What the tree view draws.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions<'a> {
    /// Deepest field level to draw (root fields are level 0).
    pub max_depth: Option<usize>,
    /// When set, only these paths are drawn (search results plus ancestors).
    pub visible: Option<&'a HashSet<String>>,
}

impl TreeOptions<'_> {
    fn shows(&self, path: &str, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth <= max)
            && self.visible.is_none_or(|v| v.contains(path))
    }
}

struct Branch {
    label: String,
    children: Vec<Branch>,
}

impl Branch {
    fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }
}

/// Draw the walker output as a tree.
pub fn field_tree(index: &str, fields: &[FieldNode], options: &TreeOptions<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📋 {} Fields", index.bold());

    let roots = build(fields, options);
    if roots.is_empty() {
        let _ = writeln!(out, "└── {}", "(no fields)".dimmed());
        return out;
    }

    let last = roots.len() - 1;
    for (i, branch) in roots.iter().enumerate() {
        draw(&mut out, branch, "", i == last);
    }
    out
}

// Rebuild nesting from the pre-order list with a depth stack.
fn build(fields: &[FieldNode], options: &TreeOptions<'_>) -> Vec<Branch> {
    let mut roots: Vec<Branch> = Vec::new();
    let mut stack: Vec<(usize, Branch)> = Vec::new();

    for field in fields.iter().filter(|f| options.shows(&f.path, f.depth)) {
        while stack.last().is_some_and(|(depth, _)| *depth >= field.depth) {
            if let Some((_, done)) = stack.pop() {
                attach(&mut stack, &mut roots, done);
            }
        }
        stack.push((field.depth, branch_for(field, options)));
    }

    while let Some((_, done)) = stack.pop() {
        attach(&mut stack, &mut roots, done);
    }
    roots
}

fn attach(stack: &mut [(usize, Branch)], roots: &mut Vec<Branch>, branch: Branch) {
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push(branch),
        None => roots.push(branch),
    }
}

fn branch_for(field: &FieldNode, options: &TreeOptions<'_>) -> Branch {
    let mut branch = Branch::leaf(label(field));

    if let Some(analyzer) = &field.analyzer {
        branch.children.push(Branch::leaf(format!("🔍 Analyzer: {}", analyzer)));
    }
    if let Some(analyzer) = &field.search_analyzer {
        branch
            .children
            .push(Branch::leaf(format!("🔎 Search Analyzer: {}", analyzer)));
    }
    if let Some(normalizer) = &field.normalizer {
        branch
            .children
            .push(Branch::leaf(format!("🧹 Normalizer: {}", normalizer)));
    }

    let subs: Vec<Branch> = field
        .sub_fields
        .iter()
        .filter(|s| options.visible.is_none_or(|v| v.contains(&s.path)))
        .map(|s| Branch::leaf(label(s)))
        .collect();
    if !subs.is_empty() {
        branch.children.push(Branch {
            label: "📎 Sub-fields".to_string(),
            children: subs,
        });
    }

    if field.child_count > 0 && options.max_depth.is_some_and(|max| field.depth >= max) {
        branch.children.push(Branch::leaf(
            format!("… {} nested field(s)", field.child_count)
                .dimmed()
                .to_string(),
        ));
    }

    if !field.flags.indexed {
        branch
            .children
            .push(Branch::leaf("🚫 Not Indexed".yellow().to_string()));
    }
    if !field.flags.doc_values {
        branch
            .children
            .push(Branch::leaf("📊 No Doc Values".yellow().to_string()));
    }

    branch
}

fn label(field: &FieldNode) -> String {
    let mut type_note = field.field_type.clone();
    if field.type_inferred {
        type_note.push_str(", inferred");
    }
    format!(
        "{} {} ({})",
        type_emoji(&field.field_type),
        styled_name(&field.name, &field.field_type),
        type_note.dimmed()
    )
}

fn draw(out: &mut String, branch: &Branch, prefix: &str, is_last: bool) {
    let connector = if is_last { "└── " } else { "├── " };
    let _ = writeln!(out, "{}{}{}", prefix, connector.dimmed(), branch.label);

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
    let last = branch.children.len().saturating_sub(1);
    for (i, child) in branch.children.iter().enumerate() {
        draw(out, child, &child_prefix, i == last);
    }
}
