use crate::errors::GenerateError;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

/// A diagnostic message, optionally tied to the type it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub type_name: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(type_name: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, type_name, message)
    }

    pub fn warning(type_name: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, type_name, message)
    }

    pub fn info(type_name: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, type_name, message)
    }

    fn new(level: DiagnosticLevel, type_name: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level,
            type_name: type_name.map(str::to_string),
            message: message.into(),
        }
    }
}

impl From<&GenerateError> for Diagnostic {
    fn from(err: &GenerateError) -> Self {
        Diagnostic::error(err.type_name(), err.to_string())
    }
}

/// Trait for handling diagnostics
/// This allows for dependency injection and testing with mock handlers
pub trait DiagnosticHandler: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);

    fn error(&self, type_name: Option<&str>, message: &str) {
        self.report(Diagnostic::error(type_name, message));
    }

    fn warning(&self, type_name: Option<&str>, message: &str) {
        self.report(Diagnostic::warning(type_name, message));
    }

    fn info(&self, type_name: Option<&str>, message: &str) {
        self.report(Diagnostic::info(type_name, message));
    }

    fn has_errors(&self) -> bool;
    fn error_count(&self) -> usize;
    fn warning_count(&self) -> usize;
    fn get_diagnostics(&self) -> Vec<Diagnostic>;
}

fn lock(diagnostics: &Mutex<Vec<Diagnostic>>) -> MutexGuard<'_, Vec<Diagnostic>> {
    diagnostics.lock().unwrap_or_else(PoisonError::into_inner)
}

fn count(diagnostics: &Mutex<Vec<Diagnostic>>, level: DiagnosticLevel) -> usize {
    lock(diagnostics).iter().filter(|d| d.level == level).count()
}

/// Console-based diagnostic handler that prints to stderr
pub struct ConsoleDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
    pretty: bool,
}

impl ConsoleDiagnosticHandler {
    pub fn new(pretty: bool) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            pretty,
        }
    }
}

impl DiagnosticHandler for ConsoleDiagnosticHandler {
    fn report(&self, diagnostic: Diagnostic) {
        let level_str = match diagnostic.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Info => "info",
        };
        let subject = diagnostic
            .type_name
            .as_deref()
            .map(|name| format!(" [{}]", name))
            .unwrap_or_default();

        if self.pretty {
            eprintln!(
                "\x1b[1m{}\x1b[0m{}: {}",
                level_str, subject, diagnostic.message
            );
        } else {
            eprintln!("{}{}: {}", level_str, subject, diagnostic.message);
        }

        lock(&self.diagnostics).push(diagnostic);
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn error_count(&self) -> usize {
        count(&self.diagnostics, DiagnosticLevel::Error)
    }

    fn warning_count(&self) -> usize {
        count(&self.diagnostics, DiagnosticLevel::Warning)
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic> {
        lock(&self.diagnostics).clone()
    }
}

/// Collecting diagnostic handler for testing
/// Stores all diagnostics without printing them
#[derive(Default)]
pub struct CollectingDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnosticHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticHandler for CollectingDiagnosticHandler {
    fn report(&self, diagnostic: Diagnostic) {
        lock(&self.diagnostics).push(diagnostic);
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn error_count(&self) -> usize {
        count(&self.diagnostics, DiagnosticLevel::Error)
    }

    fn warning_count(&self) -> usize {
        count(&self.diagnostics, DiagnosticLevel::Warning)
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic> {
        lock(&self.diagnostics).clone()
    }
}
