//! Scan commands: schema, datalayer

use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use schemascope::clipboard;
use schemascope::config::Config;
use schemascope::datalayer::Simulator;
use schemascope::error::{Result, ScanError};
use schemascope::fetch::{FileSource, HtmlSource, RelayClient};
use schemascope::model::{ScanMode, ScanOutcome, Severity};
use schemascope::present::render_report;
use schemascope::scan::{run_datalayer_scan, run_schema_scan, ScanObserver};
use schemascope::session::{Session, SessionObserver};

use crate::utils::{file_page_url, format_log_entry, resolve_url_input};

/// Mirrors session events to stderr while a scan runs
struct TerminalObserver<'a> {
    inner: SessionObserver<'a>,
    quiet: bool,
}

impl ScanObserver for TerminalObserver<'_> {
    fn on_progress(&mut self, text: &str) {
        self.inner.on_progress(text);
        if !self.quiet {
            eprintln!("  {}", text.dimmed());
        }
    }

    fn on_log(&mut self, message: &str, severity: Severity) {
        self.inner.on_log(message, severity);
        if !self.quiet {
            if let Some(entry) = self.inner.session.logs().last() {
                eprintln!("{}", format_log_entry(entry));
            }
        }
    }

    fn on_started(&mut self, url: &str) {
        self.inner.on_started(url);
    }
}

/// Scan a page for Schema.org structured data
pub fn cmd_schema(url: Option<String>, json: bool, copy: Option<usize>, file: Option<PathBuf>) -> Result<()> {
    let input = match (url, &file) {
        (None, Some(path)) => file_page_url(path),
        (url, _) => resolve_url_input(url)?,
    };

    let config = Config::load()?;
    let source: Box<dyn HtmlSource> = match file {
        Some(path) => Box::new(FileSource { path }),
        None => Box::new(RelayClient::new(&config)),
    };

    let mut session = Session::new();
    let ticket = session.begin(ScanMode::Schema);
    let result = {
        let mut observer = TerminalObserver {
            inner: SessionObserver { session: &mut session, ticket },
            quiet: json,
        };
        run_schema_scan(&input, source.as_ref(), &mut observer)
    };
    session.finish(ticket, &result);

    finish_scan(&mut session, result, json, copy)
}

/// Run the simulated DataLayer capture
pub fn cmd_datalayer(
    url: Option<String>,
    json: bool,
    copy: Option<usize>,
    seed: Option<u64>,
    instant: bool,
) -> Result<()> {
    let input = resolve_url_input(url)?;
    let config = Config::load()?;

    let cancel = Arc::new(AtomicBool::new(false));
    install_cancel_handler(Arc::clone(&cancel))?;

    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut simulator = Simulator::from_config(rng, &config).with_cancel_flag(cancel);
    if instant {
        simulator = simulator.with_delay_scale(0.0);
    }

    if !json {
        eprintln!(
            "{}\n",
            "Simulated capture: no page scripts are executed; results are sample data.".yellow()
        );
    }

    let mut session = Session::new();
    let ticket = session.begin(ScanMode::DataLayer);
    let result = {
        let mut observer = TerminalObserver {
            inner: SessionObserver { session: &mut session, ticket },
            quiet: json,
        };
        run_datalayer_scan(&input, &mut simulator, &mut observer)
    };
    session.finish(ticket, &result);

    finish_scan(&mut session, result, json, copy)
}

/// First Ctrl+C cancels the simulation, a second one exits
fn install_cancel_handler(flag: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        eprintln!("\nCancelling... (press Ctrl+C again to quit)");
    })
    .map_err(|e| ScanError::ConfigError(format!("Failed to set Ctrl+C handler: {}", e)))
}

fn finish_scan(
    session: &mut Session,
    result: Result<ScanOutcome>,
    json: bool,
    copy: Option<usize>,
) -> Result<()> {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) if json => return Err(e),
        Err(e) => {
            // The error banner is the report; don't print it a second time from main
            print!("\n{}", render_report(&session.snapshot()));
            if let Some(hint) = e.hint() {
                eprintln!("\n{}", hint.dimmed());
            }
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("\n{}", render_report(&session.snapshot()));
    }

    if let Some(n) = copy {
        copy_to_clipboard(session, &outcome, n);
    }

    Ok(())
}

/// Copy failures are reported, not fatal
fn copy_to_clipboard(session: &mut Session, outcome: &ScanOutcome, n: usize) {
    let copied = match n.checked_sub(1) {
        Some(index) => clipboard::copy_item(&outcome.results, index),
        None => Err(ScanError::ClipboardWriteFailure("items are numbered from 1".into())),
    };

    match copied {
        Ok(()) => {
            session.log(&format!("Copied item {} to clipboard", n), Severity::Success);
            eprintln!("{} Copied item {} to clipboard", "✓".green(), n);
        }
        Err(e) => {
            session.log(&format!("Copy failed: {}", e), Severity::Error);
            eprintln!("{} Copy failed: {}", "✗".red(), e);
            if let Some(hint) = e.hint() {
                eprintln!("  {}", hint.dimmed());
            }
        }
    }
}
