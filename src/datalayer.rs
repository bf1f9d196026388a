//! DataLayer capture simulation
//!
//! This is a demo mode, not an instrumented browser: nothing is fetched and
//! no page script runs. A fixed sequence of timed phases reports progress,
//! then three checkpoints decide (per checkpoint, with their own random
//! draw) whether to "find" a tag-manager feature and emit sample entries.
//! URLs containing the sample domain always find everything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde_json::{json, Value};

use crate::config::{Config, DEFAULT_SAMPLE_DOMAIN, MAX_DELAY_SCALE};
use crate::error::{Result, ScanError};
use crate::model::{DataLayerEntry, DetectionMethod, Severity};
use crate::scan::ScanObserver;

/// Longest single sleep between cancellation checks
const CANCEL_POLL: Duration = Duration::from_millis(50);

struct Phase {
    progress: &'static str,
    log: Option<&'static str>,
    delay_ms: u64,
}

const LEAD_IN: [Phase; 4] = [
    Phase {
        progress: "Initializing browser environment...",
        log: None,
        delay_ms: 1000,
    },
    Phase {
        progress: "Loading website content...",
        log: Some("Browser simulation started, loading page..."),
        delay_ms: 1500,
    },
    Phase {
        progress: "Executing JavaScript...",
        log: Some("Page loaded, executing scripts..."),
        delay_ms: 2000,
    },
    Phase {
        progress: "Extracting DataLayer data...",
        log: Some("Scanning for DataLayer objects..."),
        delay_ms: 1000,
    },
];

const CHECKPOINT_DELAY_MS: u64 = 500;

/// The three detection points, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    GlobalVariable,
    Container,
    PushEvents,
}

impl Checkpoint {
    pub const ALL: [Checkpoint; 3] = [
        Checkpoint::GlobalVariable,
        Checkpoint::Container,
        Checkpoint::PushEvents,
    ];

    pub fn method_name(&self) -> &'static str {
        match self {
            Checkpoint::GlobalVariable => "window.dataLayer",
            Checkpoint::Container => "GTM Container",
            Checkpoint::PushEvents => "Push Events",
        }
    }

    fn progress(&self) -> &'static str {
        match self {
            Checkpoint::GlobalVariable => "Analyzing window.dataLayer...",
            Checkpoint::Container => "Checking GTM containers...",
            Checkpoint::PushEvents => "Monitoring push events...",
        }
    }

    fn details(&self) -> &'static str {
        match self {
            Checkpoint::GlobalVariable => "Array with GTM events",
            Checkpoint::Container => "Google Tag Manager data",
            Checkpoint::PushEvents => "Dynamic event tracking",
        }
    }

    fn success_log(&self) -> &'static str {
        match self {
            Checkpoint::GlobalVariable => "Found window.dataLayer with GTM configuration",
            Checkpoint::Container => "Found GTM container data",
            Checkpoint::PushEvents => "Captured dynamic push events",
        }
    }

    /// A draw strictly above this value counts as found (~70%, 60%, 50%)
    pub fn threshold(&self) -> f64 {
        match self {
            Checkpoint::GlobalVariable => 0.3,
            Checkpoint::Container => 0.4,
            Checkpoint::PushEvents => 0.5,
        }
    }

    fn sample_entries(&self) -> Vec<DataLayerEntry> {
        let now = Utc::now();
        let values = match self {
            Checkpoint::GlobalVariable => vec![
                json!({"0": "js", "1": now.to_rfc3339_opts(SecondsFormat::Millis, true)}),
                json!({"0": "config", "1": "G-24WSJEMDEL"}),
                json!({"gtm.start": now.timestamp_millis(), "event": "gtm.js"}),
            ],
            Checkpoint::Container => vec![json!({"event": "gtm.dom"})],
            Checkpoint::PushEvents => vec![json!({
                "event": "pageview",
                "pagePath": "/",
                "pageTitle": "Home Page",
            })],
        };
        values
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()
    }
}

/// Entries and per-checkpoint report from one simulated run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataLayerExtraction {
    pub entries: Vec<DataLayerEntry>,
    pub methods: Vec<DetectionMethod>,
}

/// Scripted DataLayer capture with an injectable random source
pub struct Simulator<R: Rng> {
    rng: R,
    sample_domain: String,
    delay_scale: f64,
    cancel: Option<Arc<AtomicBool>>,
}

impl<R: Rng> Simulator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            sample_domain: DEFAULT_SAMPLE_DOMAIN.to_string(),
            delay_scale: 1.0,
            cancel: None,
        }
    }

    /// Simulator using the sample domain and delay scale from `config`
    pub fn from_config(rng: R, config: &Config) -> Self {
        Self::new(rng)
            .with_sample_domain(&config.sample_domain)
            .with_delay_scale(config.delay_scale)
    }

    pub fn with_sample_domain(mut self, domain: &str) -> Self {
        self.sample_domain = domain.to_string();
        self
    }

    /// Scale all phase delays; 0 runs the phases back to back
    ///
    /// Clamped to `0..=MAX_DELAY_SCALE`; non-finite values fall back to 1.
    pub fn with_delay_scale(mut self, scale: f64) -> Self {
        self.delay_scale = if scale.is_finite() {
            scale.clamp(0.0, MAX_DELAY_SCALE)
        } else {
            1.0
        };
        self
    }

    /// Abort with `ScanError::Cancelled` once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn run(&mut self, url: &str, observer: &mut dyn ScanObserver) -> Result<DataLayerExtraction> {
        for phase in &LEAD_IN {
            observer.on_progress(phase.progress);
            if let Some(message) = phase.log {
                observer.on_log(message, Severity::Info);
            }
            self.pause(phase.delay_ms)?;
        }

        let mut extraction = DataLayerExtraction::default();
        let always_found = self.is_sample_url(url);

        for checkpoint in Checkpoint::ALL {
            observer.on_progress(checkpoint.progress());
            self.pause(CHECKPOINT_DELAY_MS)?;

            let found = always_found || self.rng.gen::<f64>() > checkpoint.threshold();
            if found {
                extraction.methods.push(DetectionMethod::found(
                    checkpoint.method_name(),
                    checkpoint.details(),
                ));
                extraction.entries.extend(checkpoint.sample_entries());
                observer.on_log(checkpoint.success_log(), Severity::Success);
            } else {
                extraction
                    .methods
                    .push(DetectionMethod::not_found(checkpoint.method_name()));
            }
        }

        Ok(extraction)
    }

    fn is_sample_url(&self, url: &str) -> bool {
        !self.sample_domain.is_empty() && url.contains(&self.sample_domain)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::SeqCst) => Err(ScanError::Cancelled),
            _ => Ok(()),
        }
    }

    fn pause(&self, delay_ms: u64) -> Result<()> {
        self.check_cancelled()?;
        if self.delay_scale == 0.0 {
            return Ok(());
        }

        let total = Duration::try_from_secs_f64(delay_ms as f64 / 1000.0 * self.delay_scale)
            .unwrap_or(Duration::ZERO);
        let deadline = Instant::now() + total;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(CANCEL_POLL));
            self.check_cancelled()?;
        }
        Ok(())
    }
}
