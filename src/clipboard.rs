//! Best-effort clipboard writes through the platform's clipboard command

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{Result, ScanError};
use crate::model::ScanResults;
use crate::present::pretty_json;

#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("clip", &[])];

// Wayland first, then X11
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Write text to the system clipboard
pub fn write_text(text: &str) -> Result<()> {
    let mut failures = Vec::new();

    for (program, args) in CLIPBOARD_COMMANDS {
        match pipe_to(program, args, text) {
            Ok(()) => return Ok(()),
            Err(e) => {
                log::debug!("Clipboard command {} failed: {}", program, e);
                failures.push(format!("{}: {}", program, e));
            }
        }
    }

    Err(ScanError::ClipboardWriteFailure(failures.join("; ")))
}

/// Copy one displayed item as pretty-printed JSON
pub fn copy_item(results: &ScanResults, index: usize) -> Result<()> {
    let data = results.item_data(index).ok_or_else(|| {
        ScanError::ClipboardWriteFailure(format!(
            "no item {} (there are {})",
            index + 1,
            results.len()
        ))
    })?;
    write_text(&pretty_json(data)?)
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> std::io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // stdin is dropped before waiting so the helper sees EOF
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };

    // Reap the helper even when the write failed
    let status = child.wait()?;
    written?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("exited with {}", status),
        ))
    }
}
