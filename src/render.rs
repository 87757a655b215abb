//! Bare-bones plain-text renderer over the Document Model (spec §6.2).
//!
//! This is deliberately minimal: column alignment, Markdown/HTML/JSON
//! output, and the collapsible-section UI primitive are rendering-backend
//! concerns that live above this crate. This renderer always expands
//! collapsible values so the text output is complete.

use crate::plan::document::{Content, Document};

fn render_table(title: &str, columns: &[String], rows: &[Vec<Content>], out: &mut String, indent: usize) {
    let pad = "  ".repeat(indent);
    out.push_str(&format!("{pad}## {title}\n"));
    if rows.is_empty() {
        out.push_str(&format!("{pad}(no rows)\n\n"));
        return;
    }
    out.push_str(&pad);
    out.push_str(&columns.join(" | "));
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| render_cell(c)).collect();
        out.push_str(&pad);
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    out.push('\n');
}

fn render_cell(content: &Content) -> String {
    match content {
        Content::Text(s) => s.clone(),
        Content::CollapsibleValue { summary, detail, .. } => {
            if detail.is_empty() {
                summary.clone()
            } else {
                format!("{summary} ({detail})")
            }
        }
        other => render_to_string(other),
    }
}

fn render_node(content: &Content, out: &mut String, indent: usize) {
    match content {
        Content::Text(s) => {
            out.push_str(&"  ".repeat(indent));
            out.push_str(s);
            out.push('\n');
        }
        Content::Table { title, columns, rows } => render_table(title, columns, rows, out, indent),
        Content::Section { title, content } => {
            let pad = "  ".repeat(indent);
            out.push_str(&format!("{pad}# {title}\n\n"));
            for child in content {
                render_node(child, out, indent + 1);
            }
        }
        Content::CollapsibleValue { summary, detail, .. } => {
            let pad = "  ".repeat(indent);
            out.push_str(&format!("{pad}{summary}\n"));
            if !detail.is_empty() {
                for line in detail.lines() {
                    out.push_str(&format!("{pad}  {line}\n"));
                }
            }
        }
    }
}

fn render_to_string(content: &Content) -> String {
    let mut out = String::new();
    render_node(content, &mut out, 0);
    out
}

/// Renders a full document to plain text.
pub fn render(document: &Document) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", document.title));
    for content in &document.content {
        render_node(content, &mut out, 0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::document::Content;

    #[test]
    fn renders_title_and_table() {
        let doc = Document {
            title: "Terraform Plan Summary".to_string(),
            content: vec![Content::Table {
                title: "Plan Information".to_string(),
                columns: vec!["Plan File".to_string()],
                rows: vec![vec![Content::Text("plan.json".to_string())]],
            }],
        };
        let text = render(&doc);
        assert!(text.contains("Terraform Plan Summary"));
        assert!(text.contains("Plan Information"));
        assert!(text.contains("plan.json"));
    }

    #[test]
    fn empty_table_reports_no_rows() {
        let doc = Document {
            title: "t".to_string(),
            content: vec![Content::Table {
                title: "Resource Changes".to_string(),
                columns: vec!["Action".to_string()],
                rows: vec![],
            }],
        };
        assert!(render(&doc).contains("(no rows)"));
    }
}
