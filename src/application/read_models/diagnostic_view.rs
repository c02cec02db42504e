//! Diagnostic view structs for the read model

/// Severity of a rendered diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityView {
    Warning,
    Error,
}

impl SeverityView {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityView::Warning => "warning",
            SeverityView::Error => "error",
        }
    }
}

/// View representation of one recorded scan condition
#[derive(Debug, Clone)]
pub struct DiagnosticView {
    pub severity: SeverityView,
    pub message: String,
    /// Manifest or metadata file the condition was observed in, when known
    pub source: Option<String>,
}
