//! Command implementations for the schemascope CLI

mod misc;
mod scan;

pub use misc::*;
pub use scan::*;
