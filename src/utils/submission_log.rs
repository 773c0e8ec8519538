//! Per-submission diagnostic log
//!
//! Each submission may write one append-only text file with timestamped lines:
//! stage transitions and truncated snippets of what was sent to the generation
//! backend. The pipeline never reads these files back. Logging problems are
//! reported through `tracing` and otherwise ignored.

use chrono::Utc;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Longest snippet (in characters) written for a single prompt or payload
pub const SNIPPET_MAX_CHARS: usize = 500;

/// Append-only log sink owned by one submission
pub struct SubmissionLog {
    path: Option<PathBuf>,
    file: Mutex<Option<File>>,
}

impl SubmissionLog {
    /// A log that drops every record
    pub fn disabled() -> Self {
        Self {
            path: None,
            file: Mutex::new(None),
        }
    }

    /// Create a fresh log file inside `dir`, or a disabled log when `dir` is `None`.
    pub fn create(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::disabled();
        };

        if let Err(e) = fs::create_dir_all(dir) {
            warn!("Cannot create submission log directory {:?}: {}", dir, e);
            return Self::disabled();
        }

        let name = format!(
            "{}_{}.log",
            Utc::now().format("%Y%m%dT%H%M%SZ"),
            Uuid::new_v4().simple()
        );
        let path = dir.join(name);

        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Self {
                path: Some(path),
                file: Mutex::new(Some(file)),
            },
            Err(e) => {
                warn!("Cannot open submission log {:?}: {}", path, e);
                Self::disabled()
            }
        }
    }

    /// Location of the log file, if logging is enabled
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Append one timestamped line
    pub fn record(&self, message: &str) {
        let mut guard = self.file.lock();
        let Some(file) = guard.as_mut() else {
            return;
        };

        let line = format!(
            "[{}] {}\n",
            Utc::now().to_rfc3339(),
            message.replace(['\r', '\n'], " ")
        );
        if let Err(e) = file.write_all(line.as_bytes()) {
            warn!("Submission log write failed, disabling: {}", e);
            *guard = None;
        }
    }

    /// Append a labelled, truncated snippet of a larger payload
    pub fn record_snippet(&self, label: &str, text: &str) {
        if !self.is_enabled() {
            return;
        }
        self.record(&format!("{}: {}", label, truncate_chars(text, SNIPPET_MAX_CHARS)));
    }
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
