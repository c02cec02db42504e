/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, network, console, etc.).
pub mod bom_formatter;
pub mod license_registry;
pub mod output_presenter;
pub mod progress_reporter;

pub use bom_formatter::BomFormatter;
pub use license_registry::{LicenseRegistry, RegistryLicense};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
