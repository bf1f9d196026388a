//! Result presentation
//!
//! Turns a session snapshot into a view model (method rows, per-item JSON
//! trees, empty states) that both the CLI and the TUI draw from.

use colored::Colorize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::model::{DetectionMethod, ScanResults, SourceKind, StructuredDataItem};
use crate::session::{Banner, Snapshot};

/// Containers nested this deep or deeper are shown collapsed
pub const DEFAULT_EXPAND_LEVELS: usize = 2;

/// Context lines this short carry no information and are hidden
const MIN_CONTEXT_CHARS: usize = 10;

/// One rendered line of a JSON tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub text: String,
}

/// One result card
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    /// Heading: the item's type, or its index for DataLayer entries
    pub label: String,
    /// Source kind in capitals (schema items only)
    pub badge: Option<String>,
    pub tree: Vec<TreeLine>,
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    /// No scan has produced results yet
    Hidden,
    Empty {
        title: &'static str,
        hint: &'static str,
    },
    Items(Vec<ItemView>),
}

/// Build the result panel for whatever mode is active
pub fn result_view(results: Option<&ScanResults>) -> ResultView {
    match results {
        None => ResultView::Hidden,
        Some(ScanResults::Schema(items)) if items.is_empty() => ResultView::Empty {
            title: "No Schema.org JSON-LD data found",
            hint: "This website may not use structured data markup",
        },
        Some(ScanResults::DataLayer(entries)) if entries.is_empty() => ResultView::Empty {
            title: "No DataLayer found",
            hint: "This website may not use Google Tag Manager",
        },
        Some(ScanResults::Schema(items)) => ResultView::Items(
            items
                .iter()
                .map(|item| ItemView {
                    label: display_type(item),
                    badge: Some(item.source_kind.as_str().to_uppercase()),
                    tree: json_tree(&item.data, DEFAULT_EXPAND_LEVELS),
                    context: (item.context.chars().count() > MIN_CONTEXT_CHARS)
                        .then(|| item.context.clone()),
                })
                .collect(),
        ),
        Some(ScanResults::DataLayer(entries)) => ResultView::Items(
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| ItemView {
                    label: format!("{}:", i),
                    badge: None,
                    tree: json_tree(entry, DEFAULT_EXPAND_LEVELS),
                    context: None,
                })
                .collect(),
        ),
    }
}

/// Heading for a structured data item
///
/// Prefers `@type`, then `type`, then the markup kind.
pub fn display_type(item: &StructuredDataItem) -> String {
    for key in ["@type", "type"] {
        if let Some(label) = item.data.get(key).and_then(type_label) {
            return label;
        }
    }
    match item.source_kind {
        SourceKind::Microdata => "Microdata".to_string(),
        SourceKind::Rdfa => "RDFa".to_string(),
        SourceKind::JsonLd => "Unknown".to_string(),
    }
}

fn type_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(types) => {
            let names: Vec<&str> = types.iter().filter_map(|t| t.as_str()).collect();
            (!names.is_empty()).then(|| names.join(", "))
        }
        _ => None,
    }
}

pub fn method_status(method: &DetectionMethod) -> &'static str {
    if method.found {
        "Found"
    } else {
        "Not found"
    }
}

/// Render an object as a tree, expanding `expand_levels` levels of nesting
pub fn json_tree(data: &Map<String, Value>, expand_levels: usize) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    for (key, value) in data {
        push_node(&mut lines, key, value, 1, 0, expand_levels);
    }
    lines
}

fn push_node(
    lines: &mut Vec<TreeLine>,
    key: &str,
    value: &Value,
    level: usize,
    depth: usize,
    expand_levels: usize,
) {
    match value {
        Value::Object(map) if map.is_empty() => lines.push(line(depth, format!("{}: {{}}", key))),
        Value::Array(items) if items.is_empty() => lines.push(line(depth, format!("{}: []", key))),
        Value::Object(map) if level < expand_levels => {
            lines.push(line(depth, format!("{}: {{", key)));
            for (k, v) in map {
                push_node(lines, k, v, level + 1, depth + 1, expand_levels);
            }
            lines.push(line(depth, "}".to_string()));
        }
        Value::Array(items) if level < expand_levels => {
            lines.push(line(depth, format!("{}: [", key)));
            for (i, v) in items.iter().enumerate() {
                push_node(lines, &i.to_string(), v, level + 1, depth + 1, expand_levels);
            }
            lines.push(line(depth, "]".to_string()));
        }
        Value::Object(map) => lines.push(line(
            depth,
            format!("{}: {{…}} {} {}", key, map.len(), plural(map.len(), "key")),
        )),
        Value::Array(items) => lines.push(line(
            depth,
            format!("{}: […] {} {}", key, items.len(), plural(items.len(), "item")),
        )),
        scalar => lines.push(line(depth, format!("{}: {}", key, scalar))),
    }
}

fn line(depth: usize, text: String) -> TreeLine {
    TreeLine { depth, text }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Pretty-printed JSON for copying one item
pub fn pretty_json(data: &Map<String, Value>) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Plain-terminal rendering of a finished snapshot
pub fn render_report(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    match &snapshot.banner {
        Some(Banner::Success(msg)) => out.push_str(&format!("{} {}\n\n", "✓".green(), msg.green())),
        Some(Banner::Error(msg)) => out.push_str(&format!("{} {}\n\n", "✗".red(), msg.red())),
        None => {}
    }

    if let Some(url) = &snapshot.current_url {
        out.push_str(&format!("Scanning: {}\n\n", url.cyan()));
    }

    if !snapshot.methods.is_empty() {
        out.push_str(&format!("{}\n", "Extraction Results".bold()));
        for method in &snapshot.methods {
            let status = if method.found {
                method_status(method).green().to_string()
            } else {
                method_status(method).red().to_string()
            };
            out.push_str(&format!("  {:<24} {}\n", method.name, status));
            if let Some(details) = &method.details {
                out.push_str(&format!("  {}\n", details.dimmed()));
            }
        }
        out.push('\n');
    }

    match result_view(snapshot.results.as_ref()) {
        ResultView::Hidden => {}
        ResultView::Empty { title, hint } => {
            out.push_str(&format!("{}\n{}\n", title.yellow(), hint.dimmed()));
        }
        ResultView::Items(items) => {
            let rule = "─".repeat(60);
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(&format!("{}\n", rule.dimmed()));
                }
                match &item.badge {
                    Some(badge) => out.push_str(&format!(
                        "{} {}\n",
                        item.label.cyan().bold(),
                        format!("[{}]", badge).dimmed()
                    )),
                    None => out.push_str(&format!("{}\n", item.label.cyan().bold())),
                }
                for tree_line in &item.tree {
                    out.push_str(&format!("{}{}\n", "  ".repeat(tree_line.depth + 1), tree_line.text));
                }
                if let Some(context) = &item.context {
                    out.push_str(&format!("  {}\n", format!("Context: {}", context).dimmed()));
                }
            }
        }
    }

    out
}
