//! Builder for constructing BomReadModel from the scan output
//!
//! This module provides the builder that transforms the component graph and
//! diagnostic sink into the query-optimized read model.

use super::bom_read_model::{BomMetadataView, BomReadModel};
use super::component_view::{ComponentView, LicenseView};
use super::dependency_view::DependencyEdgeView;
use super::diagnostic_view::{DiagnosticView, SeverityView};
use crate::scanning::domain::{
    Component, ComponentGraph, ComponentKind, Diagnostics, LicenseRecord, Severity,
};
use chrono::Utc;
use uuid::Uuid;

/// Builder for constructing BomReadModel from the scan output
///
/// The builder flattens graph nodes into component views, derives one
/// dependency entry per node with outgoing edges (plus every scanned root)
/// and copies the diagnostic log, all in insertion order.
pub struct BomReadModelBuilder;

impl BomReadModelBuilder {
    /// Builds a BomReadModel from the component graph and diagnostics
    ///
    /// # Arguments
    /// * `graph` - The component graph produced by the scan
    /// * `diagnostics` - The diagnostic sink recorded during the scan
    ///
    /// # Returns
    /// A fully constructed BomReadModel with freshly generated metadata
    pub fn build(graph: &ComponentGraph, diagnostics: &Diagnostics) -> BomReadModel {
        BomReadModel {
            metadata: Self::build_metadata(),
            components: Self::build_components(graph),
            dependencies: Self::build_dependencies(graph),
            diagnostics: Self::build_diagnostics(diagnostics),
        }
    }

    /// Generates document metadata with the current timestamp and a unique
    /// serial number
    fn build_metadata() -> BomMetadataView {
        BomMetadataView {
            timestamp: Utc::now().to_rfc3339(),
            tool_name: "polybom".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            serial_number: format!("urn:uuid:{}", Uuid::new_v4()),
        }
    }

    /// Converts graph nodes to component views in insertion order
    fn build_components(graph: &ComponentGraph) -> Vec<ComponentView> {
        graph
            .components()
            .map(|(_, component)| Self::component_view(component))
            .collect()
    }

    fn component_view(component: &Component) -> ComponentView {
        ComponentView {
            bom_ref: component.bom_ref(),
            ecosystem: component.ecosystem().as_str().to_string(),
            name: component.name().to_string(),
            version: component.version().as_str().to_string(),
            purl: component.purl(),
            license: Self::license_view(component.license()),
            content_hash: component.content_hash().map(|hash| hash.to_string()),
            is_root: component.kind() == ComponentKind::Root,
        }
    }

    /// Flattens a license record into its view representation
    fn license_view(record: Option<&LicenseRecord>) -> LicenseView {
        let mut view = LicenseView {
            spdx_id: None,
            expression: None,
            url: None,
            raw: None,
            display: "None".to_string(),
        };
        let Some(record) = record else {
            return view;
        };
        view.display = record.to_string();
        match record {
            LicenseRecord::Known { id, .. } => view.spdx_id = Some(id.clone()),
            LicenseRecord::Expression(expression) => view.expression = Some(expression.clone()),
            LicenseRecord::Url(url) => view.url = Some(url.clone()),
            LicenseRecord::Unknown { raw } => view.raw = Some(raw.clone()),
            LicenseRecord::Absent => {}
        }
        view
    }

    /// Derives dependency entries: one per node with outgoing edges, plus one
    /// for each scanned root even when it has none
    fn build_dependencies(graph: &ComponentGraph) -> Vec<DependencyEdgeView> {
        graph
            .components()
            .filter_map(|(node, component)| {
                let depends_on: Vec<String> = graph
                    .dependencies_of(node)
                    .into_iter()
                    .map(|dependency| graph.component(dependency).bom_ref())
                    .collect();
                if depends_on.is_empty() && component.kind() != ComponentKind::Root {
                    return None;
                }
                Some(DependencyEdgeView {
                    bom_ref: component.bom_ref(),
                    depends_on,
                })
            })
            .collect()
    }

    fn build_diagnostics(diagnostics: &Diagnostics) -> Vec<DiagnosticView> {
        diagnostics
            .entries()
            .iter()
            .map(|entry| DiagnosticView {
                severity: match entry.severity {
                    Severity::Warning => SeverityView::Warning,
                    Severity::Error => SeverityView::Error,
                },
                message: entry.message.clone(),
                source: entry.source.as_ref().map(|path| path.display().to_string()),
            })
            .collect()
    }
}
