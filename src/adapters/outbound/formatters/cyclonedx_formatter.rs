use crate::application::read_models::{
    BomMetadataView, BomReadModel, ComponentView, DependencyEdgeView, LicenseView,
};
use crate::ports::outbound::BomFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Bom {
    #[serde(rename = "bomFormat")]
    bom_format: String,
    #[serde(rename = "specVersion")]
    spec_version: String,
    version: u32,
    #[serde(rename = "serialNumber")]
    serial_number: String,
    metadata: Metadata,
    components: Vec<Component>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    timestamp: String,
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<Component>,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct Component {
    #[serde(rename = "type")]
    component_type: String,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    licenses: Option<Vec<LicenseEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hashes: Option<Vec<Hash>>,
}

/// One entry of a CycloneDX `licenses` array: either a `license` object or a
/// bare SPDX `expression`, never both.
#[derive(Debug, Serialize)]
struct LicenseEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<LicenseContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expression: Option<String>,
}

#[derive(Debug, Serialize)]
struct LicenseContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct Hash {
    alg: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Dependency {
    #[serde(rename = "ref")]
    bom_ref: String,
    #[serde(rename = "dependsOn", skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
}

/// CycloneDxFormatter adapter for generating CycloneDX 1.6 JSON format
///
/// This adapter implements the BomFormatter port for CycloneDX format.
/// The first scanned project root becomes `metadata.component`; all other
/// nodes are listed under `components`, typed `application` for additional
/// roots and `library` for resolved packages.
pub struct CycloneDxFormatter;

impl CycloneDxFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl BomFormatter for CycloneDxFormatter {
    fn format(&self, model: &BomReadModel) -> Result<String> {
        let primary_root = model.components.iter().position(|view| view.is_root);

        let components = model
            .components
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != primary_root)
            .map(|(_, view)| self.build_component(view))
            .collect();

        let bom = Bom {
            bom_format: "CycloneDX".to_string(),
            spec_version: "1.6".to_string(),
            version: 1,
            serial_number: model.metadata.serial_number.clone(),
            metadata: self.build_metadata(
                &model.metadata,
                primary_root.map(|index| &model.components[index]),
            ),
            components,
            dependencies: self.build_dependencies(&model.dependencies),
        };

        serde_json::to_string_pretty(&bom).map_err(Into::into)
    }
}

impl CycloneDxFormatter {
    /// Build metadata from BomMetadataView, promoting the primary root to
    /// `metadata.component`
    fn build_metadata(&self, metadata: &BomMetadataView, root: Option<&ComponentView>) -> Metadata {
        Metadata {
            timestamp: metadata.timestamp.clone(),
            tools: vec![Tool {
                name: metadata.tool_name.clone(),
                version: metadata.tool_version.clone(),
            }],
            component: root.map(|view| self.build_component(view)),
        }
    }

    /// Build one component entry from a ComponentView
    ///
    /// Roots are applications and carry no purl; libraries use their purl as
    /// the bom-ref.
    fn build_component(&self, view: &ComponentView) -> Component {
        let component_type = if view.is_root { "application" } else { "library" };
        Component {
            component_type: component_type.to_string(),
            bom_ref: view.bom_ref.clone(),
            name: view.name.clone(),
            version: view.version.clone(),
            purl: (!view.is_root).then(|| view.purl.clone()),
            licenses: self.build_licenses(&view.license),
            hashes: self.build_hashes(view.content_hash.as_deref()),
        }
    }

    /// Build the licenses array from a LicenseView
    ///
    /// A single known identifier becomes `license.id`, a compound expression
    /// becomes a bare `expression` entry, a URL-only license becomes
    /// `license.url` and unclassified text is carried as `license.name`. A
    /// component without license information gets no licenses array at all.
    fn build_licenses(&self, license: &LicenseView) -> Option<Vec<LicenseEntry>> {
        if let Some(expression) = &license.expression {
            return Some(vec![LicenseEntry {
                license: None,
                expression: Some(expression.clone()),
            }]);
        }

        let content = if let Some(id) = &license.spdx_id {
            LicenseContent {
                id: Some(id.clone()),
                name: None,
                url: None,
            }
        } else if let Some(url) = &license.url {
            LicenseContent {
                id: None,
                name: None,
                url: Some(url.clone()),
            }
        } else if let Some(raw) = &license.raw {
            LicenseContent {
                id: None,
                name: Some(raw.clone()),
                url: None,
            }
        } else {
            return None;
        };

        Some(vec![LicenseEntry {
            license: Some(content),
            expression: None,
        }])
    }

    /// Build the hashes array from the algorithm-tagged hash string
    fn build_hashes(&self, content_hash: Option<&str>) -> Option<Vec<Hash>> {
        let tagged = content_hash?;
        let (algorithm, value) = tagged.split_once(':')?;
        Some(vec![Hash {
            alg: Self::cyclonedx_hash_name(algorithm).to_string(),
            content: value.to_string(),
        }])
    }

    /// Map an algorithm tag to its CycloneDX spelling
    fn cyclonedx_hash_name(tag: &str) -> &str {
        match tag {
            "sha256" => "SHA-256",
            other => other,
        }
    }

    /// Build dependencies from the edge views, preserving insertion order
    fn build_dependencies(&self, edges: &[DependencyEdgeView]) -> Vec<Dependency> {
        edges
            .iter()
            .map(|edge| Dependency {
                bom_ref: edge.bom_ref.clone(),
                depends_on: edge.depends_on.clone(),
            })
            .collect()
    }
}
