//! Shared helpers for the CLI commands

use colored::Colorize;

use schemascope::error::{Result, ScanError};
use schemascope::model::{LogEntry, Severity};

/// Use the URL argument if given, otherwise ask for one on an interactive terminal.
///
/// Without a terminal the empty string is returned and validation reports it.
pub fn resolve_url_input(arg: Option<String>) -> Result<String> {
    if let Some(url) = arg {
        return Ok(url);
    }
    if !atty::is(atty::Stream::Stdin) {
        return Ok(String::new());
    }

    inquire::Text::new("Website URL:")
        .with_placeholder("https://example.com")
        .prompt()
        .map_err(|e| ScanError::PromptError(e.to_string()))
}

/// Format a session log line the way the log panel shows it
pub fn format_log_entry(entry: &LogEntry) -> String {
    let message = match entry.severity {
        Severity::Success => entry.message.green(),
        Severity::Error => entry.message.red(),
        Severity::Info => entry.message.normal(),
    };
    format!("{} {}", format!("[{}]", entry.timestamp).blue(), message)
}

/// Placeholder page URL for a scan of a local file
pub fn file_page_url(path: &std::path::Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page.html".to_string());
    format!("http://localhost/{}", urlencoding::encode(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_resolve_url_input_prefers_argument() {
        assert_eq!(resolve_url_input(Some("example.com".into())).unwrap(), "example.com");
    }

    #[test]
    fn test_format_log_entry() {
        colored::control::set_override(false);
        let entry = LogEntry {
            timestamp: "12:34:56".into(),
            message: "Found GTM container data".into(),
            severity: Severity::Success,
        };
        assert_eq!(format_log_entry(&entry), "[12:34:56] Found GTM container data");
    }

    #[test]
    fn test_file_page_url() {
        assert_eq!(file_page_url(Path::new("/tmp/saved page.html")), "http://localhost/saved%20page.html");
        assert_eq!(file_page_url(Path::new("/")), "http://localhost/page.html");
    }
}
