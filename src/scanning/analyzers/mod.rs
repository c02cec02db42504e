use crate::scanning::orchestrator::AnalysisContext;
use crate::scanning::settings::OptionRegistry;
use std::path::Path;

pub mod npm;
pub mod nuget;
pub mod poetry;

pub use npm::NpmAnalyzer;
pub use nuget::NugetAnalyzer;
pub use poetry::PoetryAnalyzer;

/// Capability interface implemented by every ecosystem analyzer.
///
/// The orchestrator drives analyzers purely through this trait: pattern
/// claiming, traversal pruning and the per-manifest analysis itself. Hooks
/// with no ecosystem-specific behavior keep their default no-op.
pub trait Analyzer {
    /// Stable identifier used for option namespacing and diagnostics
    /// (`"poetry"`, `"npm"`, `"nuget"`).
    fn name(&self) -> &'static str;

    /// File-name glob patterns this analyzer claims (e.g. `pyproject.toml`,
    /// `*.csproj`). Matched against file names, not full paths.
    fn patterns(&self) -> &[&'static str];

    /// Whether this analyzer participates in the current run. Analyzers
    /// read their disable option in `before_analysis` and may also disable
    /// themselves there when per-run setup fails.
    fn enabled(&self) -> bool;

    /// Registers this analyzer's named options. Called once at startup,
    /// before any settings are bound.
    fn initialize(&self, registry: &mut OptionRegistry) {
        let _ = registry;
    }

    /// Per-run setup: read options, resolve auxiliary directories, decide
    /// whether to participate. May record diagnostics.
    fn before_analysis(&mut self, context: &mut AnalysisContext) {
        let _ = context;
    }

    /// Final veto after a pattern match, e.g. for a manifest file that does
    /// not actually belong to this analyzer's ecosystem.
    fn can_handle(&self, manifest: &Path) -> bool {
        let _ = manifest;
        true
    }

    /// Traversal pruning: returning false stops the walk from descending
    /// into `directory` at all.
    fn should_traverse(&self, directory: &Path) -> bool {
        let _ = directory;
        true
    }

    /// Analyzes one claimed manifest. Failures are recorded as diagnostics
    /// on the context; they never abort the run as a whole.
    fn analyze(&mut self, context: &mut AnalysisContext, manifest: &Path);

    /// Per-run teardown hook, called after the walk completes.
    fn after_analysis(&mut self, context: &mut AnalysisContext) {
        let _ = context;
    }
}

/// The full analyzer set in dispatch order.
pub fn default_set() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(PoetryAnalyzer::new()),
        Box::new(NpmAnalyzer::new()),
        Box::new(NugetAnalyzer::new()),
    ]
}
