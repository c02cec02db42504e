use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Parsed package-lock.json, lockfile versions 2 and 3.
///
/// Both versions carry the flat `packages` map keyed by install path
/// (`node_modules/...`); that map is the package inventory. The legacy v1
/// `dependencies` tree is not read.
#[derive(Debug, Deserialize)]
pub struct PackageLock {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "lockfileVersion")]
    pub lockfile_version: Option<u32>,
    #[serde(default)]
    pub packages: BTreeMap<String, LockedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct LockedEntry {
    #[serde(default)]
    pub version: Option<String>,
    /// SRI string (`sha512-...`); the package's single recorded file hash.
    #[serde(default)]
    pub integrity: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// Symlink entries pointing at workspace directories carry no inventory.
    #[serde(default)]
    pub link: bool,
}

/// The package name encoded in a `packages` map key: everything after the
/// innermost `node_modules/` segment, which keeps scoped names
/// (`@scope/pkg`) and nested installs (`node_modules/a/node_modules/b`)
/// intact. The root key `""` and workspace paths carry no package name.
pub fn package_name(key: &str) -> Option<&str> {
    let position = key.rfind("node_modules/")?;
    let name = &key[position + "node_modules/".len()..];
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

impl PackageLock {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
