//! polybom - multi-ecosystem dependency BoM scanner
//!
//! This library scans Poetry, npm and NuGet manifests into a unified
//! component graph and emits it as a CycloneDX 1.6 JSON or Markdown
//! Bill of Materials, following hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`scanning`): The component graph, per-ecosystem
//!   analyzers and the orchestrator that drives them
//! - **Application Layer** (`application`): Use cases, read models and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use polybom::prelude::*;
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Create the use case over the default analyzer set, offline
//! let progress_reporter = StderrProgressReporter::new();
//! let mut use_case = RunScanUseCase::new(
//!     default_set(),
//!     None::<RegistryLicenseClient>,
//!     progress_reporter,
//! );
//!
//! // Bind settings and execute
//! let settings = AnalysisSettings::new(PathBuf::from("."));
//! let response = use_case.execute(ScanRequest::new(settings, false)).await?;
//!
//! // Format the read model
//! let formatter = CycloneDxFormatter::new();
//! let output = formatter.format(&response.read_model)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod scanning;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{
        DiagnosticsRenderer, StderrProgressReporter, Verbosity,
    };
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formatters::{CycloneDxFormatter, MarkdownFormatter};
    pub use crate::adapters::outbound::network::{CachingLicenseRegistry, RegistryLicenseClient};
    pub use crate::application::dto::{OutputFormat, ScanRequest, ScanResponse};
    pub use crate::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
    pub use crate::application::read_models::{
        BomMetadataView, BomReadModel, BomReadModelBuilder, ComponentView, DependencyEdgeView,
        DiagnosticView, LicenseView, SeverityView,
    };
    pub use crate::application::use_cases::RunScanUseCase;
    pub use crate::ports::inbound::ScanPort;
    pub use crate::ports::outbound::{
        BomFormatter, LicenseRegistry, OutputPresenter, ProgressReporter, RegistryLicense,
    };
    pub use crate::scanning::analyzers::default_set;
    pub use crate::scanning::domain::{
        Component, ComponentGraph, ComponentKind, ComponentName, ComponentVersion, ContentHash,
        Diagnostic, Diagnostics, Ecosystem, HashAlgorithm, LicenseRecord, RangeSyntax, Severity,
        VersionRange,
    };
    pub use crate::scanning::policies::LicenseSourcePriority;
    pub use crate::scanning::services::{VersionResolution, VersionResolver};
    pub use crate::scanning::{
        AnalysisSettings, Analyzer, Orchestrator, OptionKind, OptionRegistry,
    };
    pub use crate::shared::error::{ExitCode, ScanError};
    pub use crate::shared::Result;
}
