//! Scan pipelines
//!
//! Each pipeline validates the input, runs one extractor and reports what
//! happened through a [`ScanObserver`]. Failures are logged once, as a
//! single message, before being returned to the caller.

use rand::Rng;

use crate::datalayer::Simulator;
use crate::error::Result;
use crate::extract::extract_schema;
use crate::fetch::HtmlSource;
use crate::model::{ScanMode, ScanOutcome, ScanResults, Severity};
use crate::validate::normalize_url;

/// Receives progress text and log lines while a scan runs
pub trait ScanObserver {
    fn on_progress(&mut self, text: &str);

    fn on_log(&mut self, message: &str, severity: Severity);

    /// Called once the input has been validated
    fn on_started(&mut self, _url: &str) {}
}

/// Observer that discards everything
pub struct Silent;

impl ScanObserver for Silent {
    fn on_progress(&mut self, _text: &str) {}
    fn on_log(&mut self, _message: &str, _severity: Severity) {}
}

/// Fetch a page and scan it for Schema.org markup
pub fn run_schema_scan(
    input: &str,
    source: &dyn HtmlSource,
    observer: &mut dyn ScanObserver,
) -> Result<ScanOutcome> {
    observer.on_progress("Scanning for Schema.org JSON-LD data...");

    let result = (|| -> Result<ScanOutcome> {
        let url = normalize_url(input)?;
        observer.on_started(&url);
        observer.on_log(&format!("Starting Schema.org scan: {}", url), Severity::Info);

        let html = source.fetch_html(&url)?;
        let extraction = extract_schema(&html);
        Ok(ScanOutcome {
            url,
            methods: extraction.methods,
            results: ScanResults::Schema(extraction.items),
        })
    })();

    report(ScanMode::Schema, result, observer)
}

/// Run the simulated DataLayer capture for a URL
pub fn run_datalayer_scan<R: Rng>(
    input: &str,
    simulator: &mut Simulator<R>,
    observer: &mut dyn ScanObserver,
) -> Result<ScanOutcome> {
    let result = (|| -> Result<ScanOutcome> {
        let url = normalize_url(input)?;
        observer.on_started(&url);
        observer.on_log(&format!("Starting DataLayer scan: {}", url), Severity::Info);

        let extraction = simulator.run(&url, &mut *observer)?;
        Ok(ScanOutcome {
            url,
            methods: extraction.methods,
            results: ScanResults::DataLayer(extraction.entries),
        })
    })();

    report(ScanMode::DataLayer, result, observer)
}

fn report(
    mode: ScanMode,
    result: Result<ScanOutcome>,
    observer: &mut dyn ScanObserver,
) -> Result<ScanOutcome> {
    match &result {
        Ok(outcome) if outcome.results.is_empty() => {
            let message = match mode {
                ScanMode::Schema => "Schema.org scan completed: No structured data found",
                ScanMode::DataLayer => "DataLayer scan completed: No DataLayer found",
            };
            observer.on_log(message, Severity::Info);
        }
        Ok(outcome) => {
            observer.on_log(
                &format!(
                    "{} scan completed: {} items found",
                    mode.label(),
                    outcome.results.len()
                ),
                Severity::Success,
            );
        }
        Err(e) => {
            observer.on_log(&format!("{} scan error: {}", mode.label(), e), Severity::Error);
        }
    }
    result
}
