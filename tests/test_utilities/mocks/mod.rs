/// Mock implementations for testing
mod mock_license_registry;
mod mock_progress_reporter;

pub use mock_license_registry::MockLicenseRegistry;
pub use mock_progress_reporter::MockProgressReporter;
