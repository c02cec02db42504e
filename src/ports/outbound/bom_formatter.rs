use crate::application::read_models::BomReadModel;
use crate::shared::Result;

/// BomFormatter port for rendering BoM output
///
/// This port abstracts the rendering logic for different output formats
/// (CycloneDX JSON, Markdown, etc.).
pub trait BomFormatter {
    /// Renders BoM output from the unified read model
    ///
    /// # Arguments
    /// * `model` - The unified read model containing metadata, components,
    ///   dependency edges, and recorded diagnostics
    ///
    /// # Returns
    /// Formatted BoM content as a string
    ///
    /// # Errors
    /// Returns an error if rendering or serialization fails
    fn format(&self, model: &BomReadModel) -> Result<String>;
}
