//! Scanning bounded context
//!
//! Everything that turns manifest and lock files on disk into the unified
//! component graph: the domain model (components, versions, ranges, licenses,
//! hashes, diagnostics), the per-ecosystem analyzers, and the orchestrator
//! that walks a project tree and dispatches manifests to them.

pub mod analyzers;
pub mod domain;
pub mod orchestrator;
pub mod policies;
pub mod services;
pub mod settings;

pub use analyzers::Analyzer;
pub use orchestrator::{AnalysisContext, Orchestrator};
pub use settings::{AnalysisSettings, OptionKind, OptionRegistry, OptionSpec, OptionValue};
