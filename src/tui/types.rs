//! TUI type definitions - modes and worker events

use crate::error::ScanError;
use crate::model::{ScanOutcome, Severity};
use crate::session::RunTicket;

/// Current application mode
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Normal,
    Help,
}

/// Messages from a scan worker thread to the UI loop
#[derive(Debug)]
pub enum WorkerEvent {
    Started { ticket: RunTicket, url: String },
    Progress { ticket: RunTicket, text: String },
    /// Log lines are kept even when the run has been superseded
    Log { message: String, severity: Severity },
    Finished {
        ticket: RunTicket,
        result: std::result::Result<ScanOutcome, ScanError>,
    },
}
