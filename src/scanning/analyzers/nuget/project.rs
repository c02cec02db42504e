use crate::shared::Result;
use serde::Deserialize;

/// Parsed .csproj project file (SDK-style XML).
///
/// Only the pieces the scan needs are modeled: the `<Version>` property and
/// `<PackageReference>` items. Everything else in the project XML is ignored.
#[derive(Debug, Deserialize)]
pub struct ProjectFile {
    #[serde(default, rename = "PropertyGroup")]
    property_groups: Vec<PropertyGroup>,
    #[serde(default, rename = "ItemGroup")]
    item_groups: Vec<ItemGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct PropertyGroup {
    #[serde(default, rename = "Version")]
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ItemGroup {
    #[serde(default, rename = "PackageReference")]
    package_references: Vec<PackageReference>,
}

/// One `<PackageReference>` item. The version may be an attribute or a child
/// element; `Update=` items (no `Include=`) carry no name and are skipped by
/// the accessor.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageReference {
    #[serde(default, rename = "@Include")]
    include: Option<String>,
    #[serde(default, rename = "@Version")]
    version_attribute: Option<String>,
    #[serde(default, rename = "Version")]
    version_element: Option<String>,
}

impl PackageReference {
    pub fn name(&self) -> Option<&str> {
        self.include.as_deref().filter(|name| !name.is_empty())
    }

    pub fn version(&self) -> Option<&str> {
        self.version_attribute
            .as_deref()
            .or(self.version_element.as_deref())
    }
}

impl ProjectFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(quick_xml::de::from_str(content)?)
    }

    /// The first `<Version>` property declared in any property group.
    pub fn version(&self) -> Option<&str> {
        self.property_groups
            .iter()
            .find_map(|group| group.version.as_deref())
            .filter(|version| !version.is_empty())
    }

    /// All package references in document order.
    pub fn package_references(&self) -> impl Iterator<Item = &PackageReference> {
        self.item_groups
            .iter()
            .flat_map(|group| group.package_references.iter())
    }
}
