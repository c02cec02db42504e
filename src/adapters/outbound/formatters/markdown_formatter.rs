use crate::application::read_models::{
    BomReadModel, ComponentView, DependencyEdgeView, DiagnosticView, SeverityView,
};
use crate::ports::outbound::BomFormatter;
use crate::shared::Result;
use std::collections::HashMap;

/// Markdown table header for component information
const TABLE_HEADER: &str = "| Package | Version | License | Hash |\n";

/// Markdown table separator line
const TABLE_SEPARATOR: &str = "|---------|---------|---------|------|\n";

/// Markdown table header for diagnostics
const DIAGNOSTICS_TABLE_HEADER: &str = "| Severity | Message | Source |\n";

/// Markdown table separator line for the diagnostics table
const DIAGNOSTICS_TABLE_SEPARATOR: &str = "|----------|---------|--------|\n";

/// MarkdownFormatter adapter for generating a human-readable BoM report
///
/// This adapter implements the BomFormatter port for Markdown format, with
/// one component table per ecosystem, a dependency edge listing and a
/// diagnostics section.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

/// Helper methods for rendering sections
impl MarkdownFormatter {
    /// Renders the header section
    fn render_header(&self, output: &mut String, model: &BomReadModel) {
        output.push_str("# Software Bill of Materials\n\n");
        output.push_str(&format!(
            "*Generated by {} {} at {}*\n\n",
            model.metadata.tool_name, model.metadata.tool_version, model.metadata.timestamp
        ));
    }

    /// Renders the scanned project roots
    fn render_projects(&self, output: &mut String, components: &[ComponentView]) {
        let roots: Vec<&ComponentView> = components.iter().filter(|c| c.is_root).collect();
        if roots.is_empty() {
            return;
        }

        output.push_str("## Scanned Projects\n\n");
        output.push_str("| Project | Version | Ecosystem |\n");
        output.push_str("|---------|---------|-----------|\n");
        for root in roots {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&root.name),
                Self::escape_markdown_table_cell(&root.version),
                root.ecosystem
            ));
        }
        output.push('\n');
    }

    /// Renders one component table per ecosystem, in first-seen order
    fn render_components(&self, output: &mut String, components: &[ComponentView]) {
        output.push_str("## Components\n\n");

        let libraries: Vec<&ComponentView> = components.iter().filter(|c| !c.is_root).collect();
        if libraries.is_empty() {
            output.push_str("*No components were resolved.*\n\n");
            return;
        }

        let mut ecosystems: Vec<&str> = Vec::new();
        for library in &libraries {
            if !ecosystems.contains(&library.ecosystem.as_str()) {
                ecosystems.push(&library.ecosystem);
            }
        }

        for ecosystem in ecosystems {
            output.push_str(&format!("### {}\n\n", ecosystem));
            output.push_str(TABLE_HEADER);
            output.push_str(TABLE_SEPARATOR);

            for component in libraries.iter().filter(|c| c.ecosystem == ecosystem) {
                let hash = component.content_hash.as_deref().unwrap_or("N/A");
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    Self::escape_markdown_table_cell(&component.name),
                    Self::escape_markdown_table_cell(&component.version),
                    Self::escape_markdown_table_cell(&component.license.display),
                    Self::escape_markdown_table_cell(hash)
                ));
            }
            output.push('\n');
        }
    }

    /// Renders the dependency edge listing
    fn render_dependencies(
        &self,
        output: &mut String,
        edges: &[DependencyEdgeView],
        components: &[ComponentView],
    ) {
        output.push_str("## Dependencies\n\n");

        if edges.is_empty() {
            output.push_str("*No dependency edges were resolved.*\n\n");
            return;
        }

        let component_map: HashMap<&str, &ComponentView> =
            components.iter().map(|c| (c.bom_ref.as_str(), c)).collect();

        for edge in edges {
            let label = Self::component_label(&component_map, &edge.bom_ref);
            if edge.depends_on.is_empty() {
                output.push_str(&format!("- **{}** has no resolved dependencies\n", label));
                continue;
            }

            output.push_str(&format!("- **{}** depends on:\n", label));
            for dependency_ref in &edge.depends_on {
                output.push_str(&format!(
                    "  - {}\n",
                    Self::component_label(&component_map, dependency_ref)
                ));
            }
        }
        output.push('\n');
    }

    /// Resolves a bom-ref to a `name version` label, falling back to the
    /// raw reference when the component is missing from the inventory
    fn component_label(component_map: &HashMap<&str, &ComponentView>, bom_ref: &str) -> String {
        match component_map.get(bom_ref) {
            Some(component) => format!(
                "{} {}",
                Self::escape_markdown_table_cell(&component.name),
                Self::escape_markdown_table_cell(&component.version)
            ),
            None => format!("`{}`", bom_ref),
        }
    }

    /// Renders the diagnostics section
    fn render_diagnostics(&self, output: &mut String, diagnostics: &[DiagnosticView]) {
        output.push_str("## Diagnostics\n\n");

        if diagnostics.is_empty() {
            output.push_str("No warnings or errors were recorded during the scan.\n");
            return;
        }

        let error_count = diagnostics
            .iter()
            .filter(|d| d.severity == SeverityView::Error)
            .count();
        let warning_count = diagnostics.len() - error_count;
        output.push_str(&format!(
            "**{} error(s), {} warning(s) recorded during the scan.**\n\n",
            error_count, warning_count
        ));

        output.push_str(DIAGNOSTICS_TABLE_HEADER);
        output.push_str(DIAGNOSTICS_TABLE_SEPARATOR);
        for diagnostic in diagnostics {
            let source = diagnostic.source.as_deref().unwrap_or("");
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                diagnostic.severity.as_str(),
                Self::escape_markdown_table_cell(&diagnostic.message),
                Self::escape_markdown_table_cell(source)
            ));
        }
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl BomFormatter for MarkdownFormatter {
    fn format(&self, model: &BomReadModel) -> Result<String> {
        let mut output = String::new();

        self.render_header(&mut output, model);
        self.render_projects(&mut output, &model.components);
        self.render_components(&mut output, &model.components);
        self.render_dependencies(&mut output, &model.dependencies, &model.components);
        self.render_diagnostics(&mut output, &model.diagnostics);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::read_models::{BomMetadataView, LicenseView};

    fn license_view(display: &str) -> LicenseView {
        LicenseView {
            spdx_id: None,
            expression: None,
            url: None,
            raw: None,
            display: display.to_string(),
        }
    }

    fn component(
        bom_ref: &str,
        ecosystem: &str,
        name: &str,
        version: &str,
        is_root: bool,
    ) -> ComponentView {
        ComponentView {
            bom_ref: bom_ref.to_string(),
            ecosystem: ecosystem.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            purl: format!("pkg:{}/{}@{}", ecosystem, name, version),
            license: license_view("MIT"),
            content_hash: None,
            is_root,
        }
    }

    fn create_test_read_model() -> BomReadModel {
        BomReadModel {
            metadata: BomMetadataView {
                timestamp: "2024-01-01T00:00:00Z".to_string(),
                tool_name: "polybom".to_string(),
                tool_version: "1.0.0".to_string(),
                serial_number: "urn:uuid:test-123".to_string(),
            },
            components: vec![
                component("poetry:my-project@0.1.0", "poetry", "my-project", "0.1.0", true),
                component("pkg:pypi/requests@2.31.0", "poetry", "requests", "2.31.0", false),
                component("pkg:npm/left-pad@1.3.0", "npm", "left-pad", "1.3.0", false),
            ],
            dependencies: vec![DependencyEdgeView {
                bom_ref: "poetry:my-project@0.1.0".to_string(),
                depends_on: vec!["pkg:pypi/requests@2.31.0".to_string()],
            }],
            diagnostics: vec![],
        }
    }

    #[test]
    fn test_escape_markdown_table_cell() {
        let input = "Text with | pipe and\nnewline";
        let escaped = MarkdownFormatter::escape_markdown_table_cell(input);
        assert_eq!(escaped, "Text with \\| pipe and newline");
    }

    #[test]
    fn test_format_basic() {
        let model = create_test_read_model();
        let formatter = MarkdownFormatter::new();

        let result = formatter.format(&model);

        assert!(result.is_ok());
        let markdown = result.unwrap();
        assert!(markdown.contains("# Software Bill of Materials"));
        assert!(markdown.contains("## Scanned Projects"));
        assert!(markdown.contains("my-project"));
        assert!(markdown.contains("## Components"));
        assert!(markdown.contains("requests"));
        assert!(markdown.contains("2.31.0"));
    }

    #[test]
    fn test_format_groups_components_by_ecosystem() {
        let model = create_test_read_model();
        let formatter = MarkdownFormatter::new();

        let markdown = formatter.format(&model).unwrap();

        assert!(markdown.contains("### poetry"));
        assert!(markdown.contains("### npm"));
        let poetry_at = markdown.find("### poetry").unwrap();
        let npm_at = markdown.find("### npm").unwrap();
        // First-seen order is preserved.
        assert!(poetry_at < npm_at);
    }

    #[test]
    fn test_format_roots_excluded_from_component_tables() {
        let model = create_test_read_model();
        let formatter = MarkdownFormatter::new();

        let markdown = formatter.format(&model).unwrap();

        let components_at = markdown.find("## Components").unwrap();
        let component_section = &markdown[components_at..];
        assert!(!component_section.contains("| my-project |"));
    }

    #[test]
    fn test_format_dependency_listing_resolves_names() {
        let model = create_test_read_model();
        let formatter = MarkdownFormatter::new();

        let markdown = formatter.format(&model).unwrap();

        assert!(markdown.contains("- **my-project 0.1.0** depends on:"));
        assert!(markdown.contains("  - requests 2.31.0"));
    }

    #[test]
    fn test_format_root_without_edges() {
        let mut model = create_test_read_model();
        model.dependencies = vec![DependencyEdgeView {
            bom_ref: "poetry:my-project@0.1.0".to_string(),
            depends_on: vec![],
        }];

        let formatter = MarkdownFormatter::new();
        let markdown = formatter.format(&model).unwrap();

        assert!(markdown.contains("- **my-project 0.1.0** has no resolved dependencies"));
    }

    #[test]
    fn test_format_diagnostics_table() {
        let mut model = create_test_read_model();
        model.diagnostics = vec![
            DiagnosticView {
                severity: SeverityView::Warning,
                message: "No version constraint for left-pad".to_string(),
                source: Some("/tmp/project/package.json".to_string()),
            },
            DiagnosticView {
                severity: SeverityView::Error,
                message: "Failed to parse lock file".to_string(),
                source: None,
            },
        ];

        let formatter = MarkdownFormatter::new();
        let markdown = formatter.format(&model).unwrap();

        assert!(markdown.contains("**1 error(s), 1 warning(s) recorded during the scan.**"));
        assert!(markdown.contains("| warning | No version constraint for left-pad |"));
        assert!(markdown.contains("| error | Failed to parse lock file |  |"));
    }

    #[test]
    fn test_format_clean_scan_reports_no_diagnostics() {
        let model = create_test_read_model();
        let formatter = MarkdownFormatter::new();

        let markdown = formatter.format(&model).unwrap();

        assert!(markdown.contains("No warnings or errors were recorded during the scan."));
    }

    #[test]
    fn test_format_hash_column() {
        let mut model = create_test_read_model();
        model.components[1].content_hash = Some("sha256:deadbeef".to_string());

        let formatter = MarkdownFormatter::new();
        let markdown = formatter.format(&model).unwrap();

        assert!(markdown.contains("| requests | 2.31.0 | MIT | sha256:deadbeef |"));
        assert!(markdown.contains("| left-pad | 1.3.0 | MIT | N/A |"));
    }
}
