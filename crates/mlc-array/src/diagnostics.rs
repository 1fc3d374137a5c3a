//! Optional diagnostic side channel.
//!
//! The core operations return `Result`s and never log. A `Context` forwards
//! each failure to a `DiagnosticSink`, so applications can route them to the
//! `log` facade and tests can assert on them deterministically.
use std::sync::Mutex;

use crate::error::{ErrorKind, MlcError};

/// A single reported event.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Name of the operation that produced the event, e.g. `"softmax"`.
    pub operation: &'static str,
    /// Failure category, or `None` for informational events.
    pub kind: Option<ErrorKind>,
    pub message: String,
}

impl Diagnostic {
    pub fn failure(operation: &'static str, err: &MlcError) -> Self {
        Self {
            operation,
            kind: Some(err.kind()),
            message: err.to_string(),
        }
    }

    pub fn info(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind: None,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind.is_some()
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic.kind {
            Some(kind) => log::warn!(
                "{} failed ({}): {}",
                diagnostic.operation,
                kind,
                diagnostic.message
            ),
            None => log::debug!("{}: {}", diagnostic.operation, diagnostic.message),
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn failures(&self) -> Vec<Diagnostic> {
        self.events()
            .into_iter()
            .filter(Diagnostic::is_failure)
            .collect()
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic.clone()),
            Err(poisoned) => poisoned.into_inner().push(diagnostic.clone()),
        }
    }
}
