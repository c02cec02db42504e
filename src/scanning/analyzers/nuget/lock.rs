use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Parsed packages.lock.json.
///
/// The inventory is keyed by target framework; each framework section maps
/// package names to their locked records. A multi-targeted project lists the
/// same package once per framework.
#[derive(Debug, Deserialize)]
pub struct PackagesLock {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, BTreeMap<String, LockedDependency>>,
}

/// How a package entered the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DependencyKind {
    Direct,
    Transitive,
    CentralTransitive,
    /// Project-to-project references; not packages.
    Project,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedDependency {
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    /// Requested range in interval notation, present on direct dependencies.
    #[serde(default)]
    pub requested: Option<String>,
    #[serde(default)]
    pub resolved: Option<String>,
    /// The package's single recorded hash.
    #[serde(default)]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl PackagesLock {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
