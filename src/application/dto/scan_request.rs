use crate::scanning::AnalysisSettings;

/// Request parameters for a dependency scan
///
/// The settings are fully bound before the request is built: CLI arguments
/// and config file values have already been merged into analyzer options.
#[derive(Debug)]
pub struct ScanRequest {
    /// Analyzer settings, including the project root to scan
    pub settings: AnalysisSettings,
    /// Whether to enrich unresolved licenses from package registries
    pub online: bool,
}

impl ScanRequest {
    pub fn new(settings: AnalysisSettings, online: bool) -> Self {
        Self { settings, online }
    }
}
