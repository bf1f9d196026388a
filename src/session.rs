//! Session state shared by the scan surfaces
//!
//! Everything the result view shows lives in one immutable [`Snapshot`]
//! that is swapped out whole on every transition. Each run carries a
//! generation number; progress and results from a run that has since been
//! superseded are dropped. The log is append-only for the whole session.

use std::sync::Arc;

use crate::error::ScanError;
use crate::model::{DetectionMethod, LogEntry, ScanMode, ScanOutcome, ScanResults, Severity};
use crate::scan::ScanObserver;

pub const READY_MESSAGE: &str = "DataLayer & Schema.org Extractor Ready";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

/// Identifies one run; handed out by [`Session::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    pub generation: u64,
    pub mode: ScanMode,
}

/// Everything the result view renders, as of one moment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub generation: u64,
    /// Mode of the run in flight, if any
    pub running: Option<ScanMode>,
    pub progress: Option<String>,
    pub current_url: Option<String>,
    pub methods: Vec<DetectionMethod>,
    pub results: Option<ScanResults>,
    pub banner: Option<Banner>,
}

impl Snapshot {
    /// Mode whose results are on display
    pub fn mode(&self) -> Option<ScanMode> {
        self.results.as_ref().map(|r| r.mode())
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

pub struct Session {
    generation: u64,
    snapshot: Arc<Snapshot>,
    log: Vec<LogEntry>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            generation: 0,
            snapshot: Arc::new(Snapshot::default()),
            log: vec![LogEntry {
                timestamp: "00:00:00".to_string(),
                message: READY_MESSAGE.to_string(),
                severity: Severity::Info,
            }],
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn log(&mut self, message: &str, severity: Severity) {
        self.log.push(LogEntry::now(message, severity));
    }

    /// Start a new run, clearing results and banners from earlier ones
    pub fn begin(&mut self, mode: ScanMode) -> RunTicket {
        self.generation += 1;
        self.snapshot = Arc::new(Snapshot {
            generation: self.generation,
            running: Some(mode),
            ..Snapshot::default()
        });
        RunTicket {
            generation: self.generation,
            mode,
        }
    }

    pub fn is_current(&self, ticket: RunTicket) -> bool {
        ticket.generation == self.generation
    }

    pub fn set_progress(&mut self, ticket: RunTicket, text: &str) -> bool {
        self.update(ticket, |s| s.progress = Some(text.to_string()))
    }

    pub fn set_url(&mut self, ticket: RunTicket, url: &str) -> bool {
        self.update(ticket, |s| s.current_url = Some(url.to_string()))
    }

    /// Apply a finished run. Returns false (and changes nothing) if a newer
    /// run has started since `ticket` was issued.
    pub fn finish(
        &mut self,
        ticket: RunTicket,
        result: &std::result::Result<ScanOutcome, ScanError>,
    ) -> bool {
        let applied = self.update(ticket, |s| {
            s.running = None;
            s.progress = None;
            match result {
                Ok(outcome) => {
                    s.current_url = Some(outcome.url.clone());
                    s.methods = outcome.methods.clone();
                    s.results = Some(outcome.results.clone());
                    s.banner = success_banner(&outcome.results);
                }
                Err(e) => {
                    s.banner = Some(Banner::Error(e.to_string()));
                }
            }
        });
        if !applied {
            log::debug!(
                "Discarding {} results from stale run {} (current {})",
                ticket.mode.label(),
                ticket.generation,
                self.generation
            );
        }
        applied
    }

    fn update(&mut self, ticket: RunTicket, f: impl FnOnce(&mut Snapshot)) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let mut next = (*self.snapshot).clone();
        f(&mut next);
        self.snapshot = Arc::new(next);
        true
    }
}

fn success_banner(results: &ScanResults) -> Option<Banner> {
    if results.is_empty() {
        return None;
    }
    let message = match results {
        ScanResults::Schema(items) => format!("Found {} Schema.org items", items.len()),
        ScanResults::DataLayer(entries) => format!("DataLayer scan found {} items", entries.len()),
    };
    Some(Banner::Success(message))
}

/// Routes a run's progress and log lines into a session
pub struct SessionObserver<'a> {
    pub session: &'a mut Session,
    pub ticket: RunTicket,
}

impl ScanObserver for SessionObserver<'_> {
    fn on_progress(&mut self, text: &str) {
        self.session.set_progress(self.ticket, text);
    }

    fn on_log(&mut self, message: &str, severity: Severity) {
        self.session.log(message, severity);
    }

    fn on_started(&mut self, url: &str) {
        self.session.set_url(self.ticket, url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StructuredDataItem;

    fn schema_outcome(count: usize) -> ScanOutcome {
        let items = (0..count)
            .map(|i| StructuredDataItem {
                data: serde_json::json!({"@type": "Thing", "n": i})
                    .as_object()
                    .cloned()
                    .unwrap(),
                context: "ctx".into(),
                source_kind: crate::model::SourceKind::JsonLd,
            })
            .collect();
        ScanOutcome {
            url: "https://example.com".into(),
            methods: vec![DetectionMethod::found("JSON-LD Script Tags", "1 JSON-LD items")],
            results: ScanResults::Schema(items),
        }
    }

    #[test]
    fn test_new_session_has_ready_log() {
        let session = Session::new();
        assert_eq!(session.logs().len(), 1);
        assert_eq!(session.logs()[0].message, READY_MESSAGE);
        assert_eq!(session.logs()[0].timestamp, "00:00:00");
        assert_eq!(session.snapshot().mode(), None);
    }

    #[test]
    fn test_finish_applies_results_and_banner() {
        let mut session = Session::new();
        let ticket = session.begin(ScanMode::Schema);
        assert!(session.snapshot().is_running());

        assert!(session.finish(ticket, &Ok(schema_outcome(2))));
        let snap = session.snapshot();
        assert!(!snap.is_running());
        assert_eq!(snap.mode(), Some(ScanMode::Schema));
        assert_eq!(snap.banner, Some(Banner::Success("Found 2 Schema.org items".into())));
        assert_eq!(snap.current_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_empty_results_have_no_banner() {
        let mut session = Session::new();
        let ticket = session.begin(ScanMode::Schema);
        session.finish(ticket, &Ok(schema_outcome(0)));
        assert_eq!(session.snapshot().banner, None);
        assert_eq!(session.snapshot().mode(), Some(ScanMode::Schema));
    }

    #[test]
    fn test_error_sets_banner_without_results() {
        let mut session = Session::new();
        let ticket = session.begin(ScanMode::Schema);
        session.finish(ticket, &Err(ScanError::FetchError { status: 404 }));
        let snap = session.snapshot();
        assert_eq!(snap.banner, Some(Banner::Error("Failed to fetch website: 404".into())));
        assert!(snap.results.is_none());
        assert!(snap.methods.is_empty());
    }

    #[test]
    fn test_begin_clears_previous_results_but_not_log() {
        let mut session = Session::new();
        let first = session.begin(ScanMode::Schema);
        session.log("first run", Severity::Info);
        session.finish(first, &Ok(schema_outcome(1)));

        session.begin(ScanMode::DataLayer);
        let snap = session.snapshot();
        assert!(snap.results.is_none());
        assert!(snap.banner.is_none());
        assert!(snap.methods.is_empty());
        assert_eq!(session.logs().len(), 2);
    }

    #[test]
    fn test_stale_run_is_discarded() {
        let mut session = Session::new();
        let slow = session.begin(ScanMode::Schema);
        let fast = session.begin(ScanMode::DataLayer);

        assert!(session.finish(fast, &Ok(ScanOutcome {
            url: "https://b.example".into(),
            methods: vec![],
            results: ScanResults::DataLayer(vec![]),
        })));
        let before = session.snapshot();

        assert!(!session.set_progress(slow, "late progress"));
        assert!(!session.finish(slow, &Ok(schema_outcome(3))));
        assert_eq!(*session.snapshot(), *before);
        assert_eq!(session.snapshot().mode(), Some(ScanMode::DataLayer));
    }

    #[test]
    fn test_old_snapshot_is_unchanged_by_updates() {
        let mut session = Session::new();
        let ticket = session.begin(ScanMode::Schema);
        let held = session.snapshot();
        session.set_progress(ticket, "Scanning...");
        assert_eq!(held.progress, None);
        assert_eq!(session.snapshot().progress.as_deref(), Some("Scanning..."));
    }

    #[test]
    fn test_session_observer_routes_events() {
        let mut session = Session::new();
        let ticket = session.begin(ScanMode::DataLayer);
        {
            let mut observer = SessionObserver {
                session: &mut session,
                ticket,
            };
            observer.on_started("https://example.com");
            observer.on_progress("Loading website content...");
            observer.on_log("Page loaded", Severity::Info);
        }
        let snap = session.snapshot();
        assert_eq!(snap.current_url.as_deref(), Some("https://example.com"));
        assert_eq!(snap.progress.as_deref(), Some("Loading website content..."));
        assert_eq!(session.logs().last().unwrap().message, "Page loaded");
    }
}
