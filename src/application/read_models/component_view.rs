//! Component view structs for the read model
//!
//! These structs provide a flattened, query-optimized view of component data.

/// View representation of a scanned component
#[derive(Debug, Clone)]
pub struct ComponentView {
    /// BOM reference identifier
    pub bom_ref: String,
    /// Ecosystem the component belongs to ("poetry", "npm", "nuget")
    pub ecosystem: String,
    /// Component name
    pub name: String,
    /// Component version
    pub version: String,
    /// Package URL (purl)
    pub purl: String,
    /// Normalized license information
    pub license: LicenseView,
    /// Algorithm-tagged content hash, e.g. `sha256:ab34...`
    pub content_hash: Option<String>,
    /// Whether this is a scanned project root rather than a resolved package
    pub is_root: bool,
}

/// View representation of a normalized license record
///
/// Exactly one of the optional fields is populated for a classified license;
/// all four stay `None` when no license information was found. `display` is
/// always usable for report tables.
#[derive(Debug, Clone)]
pub struct LicenseView {
    /// Canonical SPDX identifier, when the source named a single known license
    pub spdx_id: Option<String>,
    /// SPDX expression, when the source was a compound expression
    pub expression: Option<String>,
    /// URL, when the license terms were referenced by URL only
    pub url: Option<String>,
    /// Raw text that could not be classified
    pub raw: Option<String>,
    /// Human-readable rendering for reports ("None" when absent)
    pub display: String,
}
