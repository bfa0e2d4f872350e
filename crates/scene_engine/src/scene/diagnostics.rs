//! Diagnostics sink shared by the scene loader and traversal
//!
//! Traversal never fails: structural problems found while displaying (a
//! child id with no node, an unknown animation id) are reported here as
//! warnings and the affected subtree or animation is left out.

use std::collections::VecDeque;

/// Receiver for loader and traversal diagnostics
pub trait Diagnostics {
    /// Problem that makes the scene unusable
    fn report_error(&mut self, message: &str);

    /// Problem that only leaves something out of the scene
    fn report_warning(&mut self, message: &str);

    /// Informational message
    fn log(&mut self, message: &str);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report_error(&mut self, message: &str) {
        log::error!("Scene error: {message}");
    }

    fn report_warning(&mut self, message: &str) {
        log::warn!("Scene warning: {message}");
    }

    fn log(&mut self, message: &str) {
        log::info!("{message}");
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Fatal to loading
    Error,
    /// Non-fatal
    Warning,
    /// Informational
    Info,
}

/// One recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Message text
    pub message: String,
}

/// Forwards to the `log` facade and keeps the most recent entries
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
}

impl DiagnosticLog {
    /// Default number of retained entries
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Create a log retaining [`Self::DEFAULT_CAPACITY`] entries
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a log retaining at most `capacity` entries (oldest dropped first)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Retained entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Retained warnings, oldest first
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.severity == Severity::Warning)
            .map(|entry| entry.message.as_str())
    }

    /// Number of retained entries of a severity
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|entry| entry.severity == severity).count()
    }

    /// Remove and return all retained entries
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        self.entries.drain(..).collect()
    }

    fn record(&mut self, severity: Severity, message: &str) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Diagnostic {
            severity,
            message: message.to_string(),
        });
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics for DiagnosticLog {
    fn report_error(&mut self, message: &str) {
        LogDiagnostics.report_error(message);
        self.record(Severity::Error, message);
    }

    fn report_warning(&mut self, message: &str) {
        LogDiagnostics.report_warning(message);
        self.record(Severity::Warning, message);
    }

    fn log(&mut self, message: &str) {
        LogDiagnostics.log(message);
        self.record(Severity::Info, message);
    }
}
