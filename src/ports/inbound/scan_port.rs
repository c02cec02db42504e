use crate::application::dto::{ScanRequest, ScanResponse};
use crate::shared::Result;
use async_trait::async_trait;

/// ScanPort - Inbound port for the dependency scan use case
///
/// This port defines the interface that external adapters (CLI, API, etc.)
/// use to trigger a project scan. It represents the application's public API.
///
/// The returned futures are driven from the caller's task; they are not
/// required to be `Send` because progress reporting adapters hold
/// single-threaded console state.
#[async_trait(?Send)]
pub trait ScanPort {
    /// Scans a project tree and builds the BoM read model
    ///
    /// # Arguments
    /// * `request` - Request parameters containing the bound analyzer
    ///   settings and enrichment options
    ///
    /// # Returns
    /// A response containing the read model and diagnostic counts
    ///
    /// # Errors
    /// Returns an error if:
    /// - The project directory cannot be traversed at all
    /// - Read model construction fails
    async fn execute_scan(&mut self, request: ScanRequest) -> Result<ScanResponse>;
}
