use super::{ComponentVersion, ContentHash, LicenseRecord};
use crate::shared::Result;
use std::fmt;
use std::str::FromStr;

/// Maximum length for component names (security limit)
const MAX_COMPONENT_NAME_LENGTH: usize = 255;

/// Package ecosystem a component belongs to.
///
/// The ecosystem is part of component identity: the same package name in two
/// ecosystems (e.g. `pip` on PyPI vs a hypothetical npm `pip`) must never
/// collapse into one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    /// Python projects managed with Poetry (pyproject.toml + poetry.lock)
    Poetry,
    /// JavaScript projects managed with npm (package.json + package-lock.json)
    Npm,
    /// .NET projects (*.csproj + packages.lock.json)
    Nuget,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Poetry => "poetry",
            Ecosystem::Npm => "npm",
            Ecosystem::Nuget => "nuget",
        }
    }

    /// Package URL type component for this ecosystem.
    ///
    /// Note that Poetry packages live on PyPI, so their purl type is `pypi`
    /// rather than the analyzer name.
    pub fn purl_type(&self) -> &'static str {
        match self {
            Ecosystem::Poetry => "pypi",
            Ecosystem::Npm => "npm",
            Ecosystem::Nuget => "nuget",
        }
    }

    /// All ecosystems known to the scanner, in dispatch order.
    pub fn all() -> [Ecosystem; 3] {
        [Ecosystem::Poetry, Ecosystem::Npm, Ecosystem::Nuget]
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "poetry" => Ok(Ecosystem::Poetry),
            "npm" => Ok(Ecosystem::Npm),
            "nuget" => Ok(Ecosystem::Nuget),
            _ => Err(format!(
                "Unknown analyzer '{}'. Valid analyzers: poetry, npm, nuget",
                s
            )),
        }
    }
}

/// Whether a component is the scanned project itself or a resolved package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// The project a manifest describes
    Root,
    /// A package resolved from a lock inventory
    Library,
}

/// NewType wrapper for component name with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentName(String);

impl ComponentName {
    pub fn new(name: String) -> Result<Self> {
        if name.is_empty() {
            anyhow::bail!("Component name cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if name.len() > MAX_COMPONENT_NAME_LENGTH {
            anyhow::bail!(
                "Component name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_COMPONENT_NAME_LENGTH
            );
        }

        // Security: Validate characters. The charset covers PyPI names,
        // scoped npm names (@scope/pkg) and dotted NuGet package ids.
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '/' | '+'))
        {
            anyhow::bail!(
                "Component name '{}' contains invalid characters. Only alphanumeric, hyphens, underscores, dots, '@', '/' and '+' are allowed.",
                name
            );
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node of the component graph: the scanned project or one resolved package.
///
/// Identity is the (ecosystem, name, version text) triple; license and content
/// hash are payload that may be attached after insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    kind: ComponentKind,
    ecosystem: Ecosystem,
    name: ComponentName,
    version: ComponentVersion,
    license: Option<LicenseRecord>,
    content_hash: Option<ContentHash>,
}

impl Component {
    /// Creates a root component for the scanned project.
    pub fn root(ecosystem: Ecosystem, name: String, version: &str) -> Result<Self> {
        Ok(Self {
            kind: ComponentKind::Root,
            ecosystem,
            name: ComponentName::new(name)?,
            version: ComponentVersion::parse(version),
            license: None,
            content_hash: None,
        })
    }

    /// Creates a library component for a locked package.
    pub fn library(ecosystem: Ecosystem, name: String, version: &str) -> Result<Self> {
        Ok(Self {
            kind: ComponentKind::Library,
            ecosystem,
            name: ComponentName::new(name)?,
            version: ComponentVersion::parse(version),
            license: None,
            content_hash: None,
        })
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn version(&self) -> &ComponentVersion {
        &self.version
    }

    pub fn license(&self) -> Option<&LicenseRecord> {
        self.license.as_ref()
    }

    pub fn content_hash(&self) -> Option<&ContentHash> {
        self.content_hash.as_ref()
    }

    /// Attaches or overwrites the license record.
    pub fn set_license(&mut self, record: LicenseRecord) {
        self.license = Some(record);
    }

    /// Attaches or overwrites the content hash.
    pub fn set_content_hash(&mut self, hash: ContentHash) {
        self.content_hash = Some(hash);
    }

    /// Package URL for this component.
    ///
    /// PyPI names are normalized per PEP 503 (lowercase, underscores to
    /// hyphens); scoped npm names keep their `/` separator with each segment
    /// percent-encoded.
    pub fn purl(&self) -> String {
        let name = match self.ecosystem {
            Ecosystem::Poetry => self.name.as_str().to_lowercase().replace('_', "-"),
            _ => self.name.as_str().to_string(),
        };
        let encoded_name = name
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let encoded_version = urlencoding::encode(self.version.as_str());
        format!(
            "pkg:{}/{}@{}",
            self.ecosystem.purl_type(),
            encoded_name,
            encoded_version
        )
    }

    /// Stable reference string for BoM emission.
    ///
    /// Libraries use their purl; roots are applications rather than published
    /// packages, so they get an ecosystem-qualified reference instead.
    pub fn bom_ref(&self) -> String {
        match self.kind {
            ComponentKind::Library => self.purl(),
            ComponentKind::Root => format!(
                "{}:{}@{}",
                self.ecosystem.as_str(),
                self.name.as_str(),
                self.version.as_str()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecosystem_as_str() {
        assert_eq!(Ecosystem::Poetry.as_str(), "poetry");
        assert_eq!(Ecosystem::Npm.as_str(), "npm");
        assert_eq!(Ecosystem::Nuget.as_str(), "nuget");
    }

    #[test]
    fn test_ecosystem_purl_type() {
        assert_eq!(Ecosystem::Poetry.purl_type(), "pypi");
        assert_eq!(Ecosystem::Npm.purl_type(), "npm");
        assert_eq!(Ecosystem::Nuget.purl_type(), "nuget");
    }

    #[test]
    fn test_ecosystem_from_str() {
        assert_eq!("poetry".parse::<Ecosystem>().unwrap(), Ecosystem::Poetry);
        assert_eq!("NPM".parse::<Ecosystem>().unwrap(), Ecosystem::Npm);
        assert!("cargo".parse::<Ecosystem>().is_err());
    }

    #[test]
    fn test_component_name_valid() {
        let name = ComponentName::new("@types/node".to_string()).unwrap();
        assert_eq!(name.as_str(), "@types/node");
    }

    #[test]
    fn test_component_name_empty() {
        assert!(ComponentName::new("".to_string()).is_err());
    }

    #[test]
    fn test_component_name_invalid_characters() {
        assert!(ComponentName::new("bad name".to_string()).is_err());
        assert!(ComponentName::new("pkg;rm".to_string()).is_err());
    }

    #[test]
    fn test_component_name_too_long() {
        let result = ComponentName::new("a".repeat(300));
        assert!(result.is_err());
    }

    #[test]
    fn test_library_component_accessors() {
        let component =
            Component::library(Ecosystem::Poetry, "requests".to_string(), "2.31.0").unwrap();
        assert_eq!(component.kind(), ComponentKind::Library);
        assert_eq!(component.ecosystem(), Ecosystem::Poetry);
        assert_eq!(component.name(), "requests");
        assert_eq!(component.version().as_str(), "2.31.0");
        assert!(component.license().is_none());
        assert!(component.content_hash().is_none());
    }

    #[test]
    fn test_set_license_overwrites() {
        let mut component =
            Component::library(Ecosystem::Npm, "lodash".to_string(), "4.17.21").unwrap();
        component.set_license(LicenseRecord::from_raw("MIT"));
        component.set_license(LicenseRecord::from_raw("Apache-2.0"));
        assert_eq!(component.license().unwrap().id(), Some("Apache-2.0"));
    }

    #[test]
    fn test_purl_pypi_normalization() {
        let component =
            Component::library(Ecosystem::Poetry, "Typing_Extensions".to_string(), "4.8.0")
                .unwrap();
        assert_eq!(component.purl(), "pkg:pypi/typing-extensions@4.8.0");
    }

    #[test]
    fn test_purl_scoped_npm_name() {
        let component =
            Component::library(Ecosystem::Npm, "@babel/core".to_string(), "7.23.0").unwrap();
        assert_eq!(component.purl(), "pkg:npm/%40babel/core@7.23.0");
    }

    #[test]
    fn test_purl_nuget_preserves_case() {
        let component =
            Component::library(Ecosystem::Nuget, "Newtonsoft.Json".to_string(), "13.0.3").unwrap();
        assert_eq!(component.purl(), "pkg:nuget/Newtonsoft.Json@13.0.3");
    }

    #[test]
    fn test_root_bom_ref_is_not_a_purl() {
        let component = Component::root(Ecosystem::Poetry, "my-app".to_string(), "0.1.0").unwrap();
        assert_eq!(component.bom_ref(), "poetry:my-app@0.1.0");
    }
}
