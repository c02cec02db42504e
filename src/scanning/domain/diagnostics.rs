use std::fmt;
use std::path::{Path, PathBuf};

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable; the scan continues and the condition is reported at the end
    Warning,
    /// Fatal for the manifest being processed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One recorded scan condition.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Manifest or metadata file the condition was observed in, when known
    pub source: Option<PathBuf>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {} ({})", self.severity, self.message, source.display()),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Append-only sink for warnings and errors recorded during a scan.
///
/// Analyzers checkpoint the error count before a unit of work and ask
/// `has_errors_since` afterwards; that is what gates the linking phase
/// per manifest without one manifest's failure poisoning another's.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    error_count: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            source: None,
        });
    }

    pub fn warn_at(&mut self, source: &Path, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            source: Some(source.to_path_buf()),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.error_count += 1;
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            source: None,
        });
    }

    pub fn error_at(&mut self, source: &Path, message: impl Into<String>) {
        self.error_count += 1;
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            source: Some(source.to_path_buf()),
        });
    }

    /// Whether any error has been recorded during the whole run.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.entries.len() - self.error_count
    }

    /// Marks the current error count so a unit of work can later ask whether
    /// it recorded errors of its own.
    pub fn checkpoint(&self) -> usize {
        self.error_count
    }

    pub fn has_errors_since(&self, checkpoint: usize) -> bool {
        self.error_count > checkpoint
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
