use crate::application::read_models::BomReadModel;

/// Response from a completed scan
///
/// Carries the query-optimized read model along with the diagnostic counts
/// the CLI needs for its exit code decision.
#[derive(Debug, Clone)]
pub struct ScanResponse {
    /// The read model built from the component graph
    pub read_model: BomReadModel,
    /// Number of error diagnostics recorded during the scan
    pub error_count: usize,
    /// Number of warning diagnostics recorded during the scan
    pub warning_count: usize,
}

impl ScanResponse {
    pub fn new(read_model: BomReadModel, error_count: usize, warning_count: usize) -> Self {
        Self {
            read_model,
            error_count,
            warning_count,
        }
    }

    /// Whether any manifest failed during the scan.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
