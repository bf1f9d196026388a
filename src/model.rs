use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Markup convention a structured data item was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    JsonLd,
    Microdata,
    Rdfa,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::JsonLd => "json-ld",
            SourceKind::Microdata => "microdata",
            SourceKind::Rdfa => "rdfa",
        }
    }
}

/// One structured data record discovered in a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDataItem {
    pub data: Map<String, Value>,
    /// Short excerpt of the markup, or a description for summary items
    pub context: String,
    #[serde(rename = "type")]
    pub source_kind: SourceKind,
}

/// Outcome of one detection technique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionMethod {
    pub name: String,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl DetectionMethod {
    pub fn not_found(name: &str) -> Self {
        Self {
            name: name.to_string(),
            found: false,
            details: None,
        }
    }

    pub fn found(name: &str, details: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            found: true,
            details: Some(details.into()),
        }
    }
}

/// One event object pushed to a tag-manager array
pub type DataLayerEntry = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A line in the session log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
}

impl LogEntry {
    /// Create an entry stamped with the current local time
    pub fn now(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
            severity,
        }
    }
}

/// Which pipeline produced the active results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Schema,
    #[serde(rename = "datalayer")]
    DataLayer,
}

impl ScanMode {
    pub fn label(&self) -> &'static str {
        match self {
            ScanMode::Schema => "Schema.org",
            ScanMode::DataLayer => "DataLayer",
        }
    }
}

/// Results of one run; the two kinds are never merged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "items", rename_all = "lowercase")]
pub enum ScanResults {
    Schema(Vec<StructuredDataItem>),
    #[serde(rename = "datalayer")]
    DataLayer(Vec<DataLayerEntry>),
}

impl ScanResults {
    pub fn mode(&self) -> ScanMode {
        match self {
            ScanResults::Schema(_) => ScanMode::Schema,
            ScanResults::DataLayer(_) => ScanMode::DataLayer,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScanResults::Schema(items) => items.len(),
            ScanResults::DataLayer(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The JSON object shown (and copied) for the item at `index`
    pub fn item_data(&self, index: usize) -> Option<&Map<String, Value>> {
        match self {
            ScanResults::Schema(items) => items.get(index).map(|item| &item.data),
            ScanResults::DataLayer(entries) => entries.get(index),
        }
    }
}

/// A completed scan run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub url: String,
    pub methods: Vec<DetectionMethod>,
    #[serde(flatten)]
    pub results: ScanResults,
}
