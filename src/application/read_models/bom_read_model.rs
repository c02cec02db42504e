//! BoM read model for query operations
//!
//! This module provides the main read model struct that aggregates
//! all scan output in a format ready for emission.

use super::component_view::ComponentView;
use super::dependency_view::DependencyEdgeView;
use super::diagnostic_view::DiagnosticView;

/// Main read model for BoM data
///
/// This struct provides a denormalized, query-optimized view of the scan
/// result following the CQRS-lite pattern.
#[derive(Debug, Clone)]
pub struct BomReadModel {
    /// Document metadata
    pub metadata: BomMetadataView,
    /// All components in graph insertion order, roots included
    pub components: Vec<ComponentView>,
    /// Dependency relations in graph insertion order
    pub dependencies: Vec<DependencyEdgeView>,
    /// Diagnostics recorded during the scan, in recording order
    pub diagnostics: Vec<DiagnosticView>,
}

/// View representation of BoM document metadata
#[derive(Debug, Clone)]
pub struct BomMetadataView {
    /// Timestamp when the document was created (RFC 3339, UTC)
    pub timestamp: String,
    /// Name of the tool that generated the document
    pub tool_name: String,
    /// Version of the tool
    pub tool_version: String,
    /// Serial number of the document (`urn:uuid:<v4>`)
    pub serial_number: String,
}
