use crate::application::read_models::{DiagnosticView, SeverityView};
use owo_colors::OwoColorize;

/// How much diagnostic detail ends up on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Errors plus a warning count summary
    Normal,
    /// Every recorded entry with its source file
    Verbose,
}

impl Verbosity {
    /// Resolves the verbosity from the two CLI flags; quiet wins when both
    /// are given.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// DiagnosticsRenderer adapter for printing scan diagnostics to stderr
///
/// Errors are always printed individually. Warnings are summarized as a
/// single count line in normal mode, spelled out in verbose mode and
/// dropped entirely in quiet mode.
pub struct DiagnosticsRenderer {
    verbosity: Verbosity,
}

impl DiagnosticsRenderer {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Prints the recorded diagnostics to stderr
    pub fn render(&self, diagnostics: &[DiagnosticView]) {
        if diagnostics.is_empty() {
            return;
        }

        if self.verbosity == Verbosity::Verbose {
            for diagnostic in diagnostics {
                self.render_entry(diagnostic);
            }
            return;
        }

        for diagnostic in diagnostics
            .iter()
            .filter(|d| d.severity == SeverityView::Error)
        {
            self.render_entry(diagnostic);
        }

        if self.verbosity == Verbosity::Quiet {
            return;
        }

        let warning_count = diagnostics
            .iter()
            .filter(|d| d.severity == SeverityView::Warning)
            .count();
        if warning_count > 0 {
            eprintln!(
                "⚠️  {} warning(s) recorded during the scan (re-run with --verbose for details)",
                warning_count
            );
        }
    }

    fn render_entry(&self, diagnostic: &DiagnosticView) {
        let location = diagnostic
            .source
            .as_deref()
            .map(|source| format!(" ({})", source))
            .unwrap_or_default();

        match diagnostic.severity {
            SeverityView::Warning => {
                eprintln!("⚠️  {}{}", diagnostic.message.yellow(), location)
            }
            SeverityView::Error => {
                eprintln!("❌ {}{}", diagnostic.message.red(), location)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(message: &str) -> DiagnosticView {
        DiagnosticView {
            severity: SeverityView::Warning,
            message: message.to_string(),
            source: None,
        }
    }

    fn error(message: &str) -> DiagnosticView {
        DiagnosticView {
            severity: SeverityView::Error,
            message: message.to_string(),
            source: Some("/tmp/project/poetry.lock".to_string()),
        }
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        // Quiet wins over verbose.
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
    }

    #[test]
    fn test_render_does_not_panic() {
        for verbosity in [Verbosity::Quiet, Verbosity::Normal, Verbosity::Verbose] {
            let renderer = DiagnosticsRenderer::new(verbosity);
            renderer.render(&[]);
            renderer.render(&[
                warning("unresolved dependency"),
                error("unreadable lock file"),
            ]);
        }
    }
}
