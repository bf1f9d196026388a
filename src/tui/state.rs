//! TUI state - the App and the scan worker plumbing

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::clipboard;
use crate::config::Config;
use crate::datalayer::Simulator;
use crate::error::Result;
use crate::fetch::RelayClient;
use crate::model::{ScanMode, Severity};
use crate::scan::{run_datalayer_scan, run_schema_scan, ScanObserver};
use crate::session::{RunTicket, Session};

use super::types::*;

/// How long the copied marker stays next to an item
const COPIED_MARKER: Duration = Duration::from_secs(2);

/// Main application state
pub struct App {
    pub input: String,
    pub mode: Mode,
    pub should_quit: bool,
    pub session: Session,
    pub config: Config,
    pub status_message: Option<String>,
    pub selected_item: usize,
    pub results_scroll: usize,
    /// Lines scrolled back from the newest log entry
    pub log_scroll: usize,
    copied: Option<(usize, Instant)>,
    cancel: Option<Arc<AtomicBool>>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
}

impl App {
    pub fn new() -> Result<Self> {
        Ok(Self::with_config(Config::load()?))
    }

    pub fn with_config(config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            input: String::new(),
            mode: Mode::Normal,
            should_quit: false,
            session: Session::new(),
            config,
            status_message: None,
            selected_item: 0,
            results_scroll: 0,
            log_scroll: 0,
            copied: None,
            cancel: None,
            tx,
            rx,
        }
    }

    /// Start a scan of the current input, superseding any run in flight
    pub fn start_scan(&mut self, mode: ScanMode) {
        if let Some(flag) = self.cancel.take() {
            flag.store(true, Ordering::SeqCst);
        }

        let ticket = self.session.begin(mode);
        self.selected_item = 0;
        self.results_scroll = 0;
        self.status_message = None;
        self.copied = None;

        let flag = Arc::new(AtomicBool::new(false));
        self.cancel = Some(Arc::clone(&flag));

        let input = self.input.clone();
        let config = self.config.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let mut observer = ChannelObserver {
                tx: tx.clone(),
                ticket,
            };
            let result = match mode {
                ScanMode::Schema => {
                    let client = RelayClient::new(&config);
                    run_schema_scan(&input, &client, &mut observer)
                }
                ScanMode::DataLayer => {
                    let mut simulator =
                        Simulator::from_config(StdRng::from_entropy(), &config).with_cancel_flag(flag);
                    run_datalayer_scan(&input, &mut simulator, &mut observer)
                }
            };
            let _ = tx.send(WorkerEvent::Finished { ticket, result });
        });
    }

    /// Apply everything the workers have sent since the last frame
    pub fn poll_workers(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.apply_event(event);
        }
    }

    pub fn apply_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Started { ticket, url } => {
                self.session.set_url(ticket, &url);
            }
            WorkerEvent::Progress { ticket, text } => {
                self.session.set_progress(ticket, &text);
            }
            WorkerEvent::Log { message, severity } => {
                self.session.log(&message, severity);
                self.log_scroll = 0;
            }
            WorkerEvent::Finished { ticket, result } => {
                if self.session.finish(ticket, &result) {
                    self.cancel = None;
                }
            }
        }
    }

    /// Number of items in the result panel
    pub fn item_count(&self) -> usize {
        self.session
            .snapshot()
            .results
            .as_ref()
            .map(|r| r.len())
            .unwrap_or(0)
    }

    pub fn select_next(&mut self) {
        let count = self.item_count();
        if count > 0 && self.selected_item + 1 < count {
            self.selected_item += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_item = self.selected_item.saturating_sub(1);
    }

    /// Copy the selected item to the clipboard as JSON
    pub fn copy_selected(&mut self) {
        let snapshot = self.session.snapshot();
        let Some(results) = snapshot.results.as_ref() else {
            self.status_message = Some("Nothing to copy yet".to_string());
            return;
        };

        match clipboard::copy_item(results, self.selected_item) {
            Ok(()) => {
                self.copied = Some((self.selected_item, Instant::now()));
                self.session.log(
                    &format!("Copied item {} to clipboard", self.selected_item + 1),
                    Severity::Success,
                );
                self.status_message = Some("Data copied to clipboard".to_string());
            }
            Err(e) => {
                self.session.log(&format!("Copy failed: {}", e), Severity::Error);
                self.status_message = Some("Unable to copy to clipboard".to_string());
            }
        }
    }

    /// Whether `index` was copied within the last couple of seconds
    pub fn recently_copied(&self, index: usize) -> bool {
        matches!(self.copied, Some((i, at)) if i == index && at.elapsed() < COPIED_MARKER)
    }
}

/// Forwards a worker's observer calls to the UI loop
struct ChannelObserver {
    tx: Sender<WorkerEvent>,
    ticket: RunTicket,
}

impl ScanObserver for ChannelObserver {
    fn on_progress(&mut self, text: &str) {
        let _ = self.tx.send(WorkerEvent::Progress {
            ticket: self.ticket,
            text: text.to_string(),
        });
    }

    fn on_log(&mut self, message: &str, severity: Severity) {
        let _ = self.tx.send(WorkerEvent::Log {
            message: message.to_string(),
            severity,
        });
    }

    fn on_started(&mut self, url: &str) {
        let _ = self.tx.send(WorkerEvent::Started {
            ticket: self.ticket,
            url: url.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DetectionMethod, ScanOutcome, ScanResults};
    use crate::session::Banner;
    use serde_json::json;

    fn instant_app() -> App {
        App::with_config(Config {
            delay_scale: 0.0,
            ..Config::default()
        })
    }

    fn wait_until_idle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            app.poll_workers();
            if !app.session.snapshot().is_running() || Instant::now() > deadline {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn datalayer_outcome(entries: usize) -> ScanOutcome {
        ScanOutcome {
            url: "https://example.com".into(),
            methods: vec![DetectionMethod::not_found("Global Variable")],
            results: ScanResults::DataLayer(
                (0..entries)
                    .map(|i| json!({"event": i}).as_object().cloned().unwrap())
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_datalayer_scan_on_sample_domain() {
        let mut app = instant_app();
        app.input = "whitespark.ca".into();
        app.start_scan(ScanMode::DataLayer);
        wait_until_idle(&mut app);

        let snap = app.session.snapshot();
        assert_eq!(snap.mode(), Some(ScanMode::DataLayer));
        assert_eq!(app.item_count(), 5);
        assert!(matches!(snap.banner, Some(Banner::Success(_))));
    }

    #[test]
    fn test_empty_input_sets_error_banner() {
        let mut app = instant_app();
        app.start_scan(ScanMode::DataLayer);
        wait_until_idle(&mut app);

        assert_eq!(
            app.session.snapshot().banner,
            Some(Banner::Error("Please enter a URL".into()))
        );
        assert_eq!(
            app.session.logs().last().unwrap().message,
            "DataLayer scan error: Please enter a URL"
        );
    }

    #[test]
    fn test_superseded_run_results_are_dropped() {
        let mut app = instant_app();
        let stale = app.session.begin(ScanMode::Schema);
        let current = app.session.begin(ScanMode::DataLayer);

        app.apply_event(WorkerEvent::Finished {
            ticket: current,
            result: Ok(datalayer_outcome(2)),
        });
        app.apply_event(WorkerEvent::Progress {
            ticket: stale,
            text: "Scanning for Schema.org JSON-LD data...".into(),
        });
        app.apply_event(WorkerEvent::Log {
            message: "late line".into(),
            severity: Severity::Info,
        });

        let snap = app.session.snapshot();
        assert_eq!(snap.mode(), Some(ScanMode::DataLayer));
        assert!(snap.progress.is_none());
        assert_eq!(app.session.logs().last().unwrap().message, "late line");
    }

    #[test]
    fn test_selection_stays_in_range() {
        let mut app = instant_app();
        let ticket = app.session.begin(ScanMode::DataLayer);
        app.apply_event(WorkerEvent::Finished {
            ticket,
            result: Ok(datalayer_outcome(2)),
        });

        app.select_previous();
        assert_eq!(app.selected_item, 0);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_item, 1);
    }

    #[test]
    fn test_copy_without_results() {
        let mut app = instant_app();
        app.copy_selected();
        assert_eq!(app.status_message.as_deref(), Some("Nothing to copy yet"));
        assert!(!app.recently_copied(0));
    }
}
