//! The thin external surface of a running scan: coarse phase events, a
//! cancellation token, and the scan error taxonomy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPhase {
    Discovery,
    Parsing,
    Analysis,
    Graph,
    Detection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub phase: ScanPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_found: Option<usize>,
}

impl ProgressEvent {
    pub fn phase(phase: ScanPhase) -> Self {
        Self {
            phase,
            message: None,
            current: None,
            total: None,
            files_found: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_counts(mut self, current: usize, total: usize) -> Self {
        self.current = Some(current);
        self.total = Some(total);
        self
    }

    pub fn with_files_found(mut self, files_found: usize) -> Self {
        self.files_found = Some(files_found);
        self
    }
}

/// Receives coarse phase transitions. Implemented for closures, so
/// `|event| { ... }` works directly as the progress argument.
pub trait ProgressHandler: Sync {
    fn on_progress(&self, event: ProgressEvent);
}

impl<F: Fn(ProgressEvent) + Sync> ProgressHandler for F {
    fn on_progress(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Progress sink that drops everything; the default.
pub struct NoProgress;

impl ProgressHandler for NoProgress {
    fn on_progress(&self, _event: ProgressEvent) {}
}

/// Cooperative cancellation, checked at phase boundaries and between
/// file parses. Cloneable across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The caller cancelled; partial state was discarded.
    #[error("scan cancelled")]
    Cancelled,
    #[error("invalid scan configuration: {0}")]
    Config(#[from] crate::cfg::ConfigError),
    /// Host-level faults only; per-file errors never surface here.
    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}
