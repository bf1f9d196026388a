//! Schema.org structured data detection
//!
//! Three independent regex scans over the raw markup:
//! - JSON-LD `<script type="application/ld+json">` blocks, parsed into items
//! - Microdata `itemtype="https://schema.org/..."` attributes, summarized
//! - RDFa `typeof="..."` attributes, summarized
//!
//! The scans work on the HTML text, not a parsed DOM, so broken markup
//! never stops detection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::model::{DetectionMethod, SourceKind, StructuredDataItem};

pub const JSON_LD_METHOD: &str = "JSON-LD Script Tags";
pub const MICRODATA_METHOD: &str = "Microdata";
pub const RDFA_METHOD: &str = "RDFa";

/// Characters of the matched tag kept as a JSON-LD item's context
const CONTEXT_EXCERPT_CHARS: usize = 100;

static JSON_LD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("Invalid JSON-LD regex")
});

static MICRODATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)itemtype\s*=\s*["']https?://schema\.org/([^"']*)["']"#)
        .expect("Invalid microdata regex")
});

static RDFA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)typeof\s*=\s*["'][^"']*["']"#).expect("Invalid RDFa regex")
});

/// Items and per-method report from one page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaExtraction {
    pub items: Vec<StructuredDataItem>,
    pub methods: Vec<DetectionMethod>,
}

/// Scan HTML for JSON-LD, Microdata and RDFa markup.
///
/// Methods are always reported in the order JSON-LD, Microdata, RDFa.
/// Deterministic: identical input gives identical output.
pub fn extract_schema(html: &str) -> SchemaExtraction {
    let mut items = Vec::new();
    let mut methods = Vec::with_capacity(3);

    let (json_ld_items, json_ld_method) = scan_json_ld(html);
    items.extend(json_ld_items);
    methods.push(json_ld_method);

    let (microdata_item, microdata_method) = scan_microdata(html);
    items.extend(microdata_item);
    methods.push(microdata_method);

    let (rdfa_item, rdfa_method) = scan_rdfa(html);
    items.extend(rdfa_item);
    methods.push(rdfa_method);

    SchemaExtraction { items, methods }
}

fn scan_json_ld(html: &str) -> (Vec<StructuredDataItem>, DetectionMethod) {
    let mut items = Vec::new();
    let mut any_parsed = false;

    for cap in JSON_LD_RE.captures_iter(html) {
        let (Some(tag), Some(content)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        let parsed: Value = match serde_json::from_str(content.as_str().trim()) {
            Ok(v) => v,
            Err(e) => {
                log::debug!("Invalid JSON-LD found: {}", e);
                continue;
            }
        };
        any_parsed = true;

        let context = context_excerpt(tag.as_str());
        match parsed {
            Value::Array(elements) => {
                for element in elements {
                    if let Some(data) = into_object(element) {
                        items.push(json_ld_item(data, &context));
                    }
                }
            }
            other => {
                if let Some(data) = into_object(other) {
                    items.push(json_ld_item(data, &context));
                }
            }
        }
    }

    let mut method = DetectionMethod::not_found(JSON_LD_METHOD);
    method.found = any_parsed;
    if !items.is_empty() {
        method.details = Some(format!("{} JSON-LD items", items.len()));
    }

    (items, method)
}

fn scan_microdata(html: &str) -> (Option<StructuredDataItem>, DetectionMethod) {
    let mut total = 0usize;
    let mut item_types: Vec<String> = Vec::new();

    for cap in MICRODATA_RE.captures_iter(html) {
        total += 1;
        let item_type = cap.get(1).map(|m| m.as_str()).unwrap_or("Unknown");
        if !item_types.iter().any(|t| t == item_type) {
            item_types.push(item_type.to_string());
        }
    }

    if total == 0 {
        return (None, DetectionMethod::not_found(MICRODATA_METHOD));
    }

    let item = summary_item(
        json!({
            "@type": "MicrodataSummary",
            "itemTypes": item_types,
            "totalItems": total,
        }),
        "Microdata markup detected in HTML",
        SourceKind::Microdata,
    );

    (
        Some(item),
        DetectionMethod::found(MICRODATA_METHOD, format!("{} microdata items", total)),
    )
}

fn scan_rdfa(html: &str) -> (Option<StructuredDataItem>, DetectionMethod) {
    let total = RDFA_RE.find_iter(html).count();
    if total == 0 {
        return (None, DetectionMethod::not_found(RDFA_METHOD));
    }

    let item = summary_item(
        json!({
            "@type": "RDFaSummary",
            "totalItems": total,
        }),
        "RDFa markup detected in HTML",
        SourceKind::Rdfa,
    );

    (
        Some(item),
        DetectionMethod::found(RDFA_METHOD, format!("{} RDFa items", total)),
    )
}

/// First 100 characters of the matched tag, plus an ellipsis
fn context_excerpt(tag: &str) -> String {
    let head: String = tag.chars().take(CONTEXT_EXCERPT_CHARS).collect();
    format!("{}...", head)
}

fn into_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        other => {
            log::debug!("Skipping non-object JSON-LD value: {}", other);
            None
        }
    }
}

fn json_ld_item(data: Map<String, Value>, context: &str) -> StructuredDataItem {
    StructuredDataItem {
        data,
        context: context.to_string(),
        source_kind: SourceKind::JsonLd,
    }
}

fn summary_item(data: Value, context: &str, source_kind: SourceKind) -> StructuredDataItem {
    let data = match data {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    StructuredDataItem {
        data,
        context: context.to_string(),
        source_kind,
    }
}
