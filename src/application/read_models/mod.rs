//! Read models for BoM emission
//!
//! These structs provide a denormalized, query-optimized view of the scan
//! result following the CQRS-lite pattern. Formatters consume the read model
//! and never touch the component graph directly.
mod bom_read_model;
mod bom_read_model_builder;
mod component_view;
mod dependency_view;
mod diagnostic_view;

pub use bom_read_model::{BomMetadataView, BomReadModel};
pub use bom_read_model_builder::BomReadModelBuilder;
pub use component_view::{ComponentView, LicenseView};
pub use dependency_view::DependencyEdgeView;
pub use diagnostic_view::{DiagnosticView, SeverityView};
