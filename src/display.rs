use crate::bar::FilterBar;
use crate::catalog::FieldSpec;
use crate::filter::Compilation;
use colored::Colorize;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde_json::{Value, json};
use std::fmt::Write as _;

/// Table with the house style: rounded UTF-8 borders and bold headers
pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

/// Text report for `explain`
pub fn format_explain_text(bar: &FilterBar, preview: &str, compilation: &Compilation) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "PREVIEW".bold());
    if preview.is_empty() {
        let _ = writeln!(out, "  {}", "(matches everything)".bright_black());
    } else {
        let _ = writeln!(out, "  {}", preview.cyan());
    }

    let _ = writeln!(out, "\n{}", "TREE".bold());
    match bar.ast() {
        Some(node) => {
            for line in node.outline().lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
        None => {
            let _ = writeln!(out, "  {}", "(empty)".bright_black());
        }
    }

    let separators = bar.separators();
    if !separators.is_empty() {
        let _ = writeln!(out, "\n{}", "SEPARATORS".bold());
        let mut table = create_styled_table(&["Between", "Connector", "Group boundary", "Group"]);
        for (i, sep) in separators.iter().enumerate() {
            table.add_row(vec![
                Cell::new(format!("{} - {}", i, i + 1)),
                Cell::new(sep.connector_type),
                Cell::new(if sep.is_group_boundary { "yes" } else { "" }),
                Cell::new(sep.group_id.as_deref().unwrap_or("")),
            ]);
        }
        let _ = writeln!(out, "{table}");
    }

    if !compilation.issues.is_empty() {
        let _ = writeln!(out, "\n{}", "SKIPPED CLAUSES".bold());
        for issue in &compilation.issues {
            let label = if issue.is_warning() {
                "warning".yellow().bold()
            } else {
                "not ready".bright_black()
            };
            let _ = writeln!(out, "  {label}: {issue}");
        }
    }

    out
}

pub fn format_explain_json(bar: &FilterBar, preview: &str, compilation: &Compilation) -> String {
    let report = json!({
        "preview": preview,
        "query": compilation.query,
        "separators": bar.separators(),
        "groups": bar.groups(),
        "issues": compilation
            .issues
            .iter()
            .map(|issue| json!({ "warning": issue.is_warning(), "message": issue.to_string() }))
            .collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|_| "{\"error\":\"failed to serialize explain output\"}".into())
}

pub fn format_fields_text(fields: &[&FieldSpec]) -> String {
    if fields.is_empty() {
        return "No fields in catalog.\n".to_string();
    }

    let mut table = create_styled_table(&["Field", "Type", "Operators"]);
    for spec in fields {
        let operators = spec
            .field_type
            .operators()
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&spec.name),
            Cell::new(spec.field_type),
            Cell::new(operators),
        ]);
    }
    format!("{table}\n")
}

pub fn format_fields_json(fields: &[&FieldSpec]) -> String {
    let entries: Vec<Value> = fields
        .iter()
        .map(|spec| {
            json!({
                "name": spec.name,
                "type": spec.field_type,
                "operators": spec.field_type.operators(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".into())
}
