pub mod cli;
pub mod clipboard;
pub mod config;
pub mod datalayer;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod present;
pub mod scan;
pub mod session;
#[cfg(feature = "tui")]
pub mod tui;
pub mod validate;

pub use error::{Result, ScanError};
