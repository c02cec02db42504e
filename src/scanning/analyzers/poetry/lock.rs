use super::manifest::DependencySpec;
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Parsed poetry.lock.
///
/// Package order and per-package file order are preserved exactly as written;
/// content hashing depends on the file order.
#[derive(Debug, Deserialize)]
pub struct PoetryLock {
    #[serde(default)]
    pub package: Vec<LockedPackage>,
    #[serde(default)]
    metadata: Option<LockMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,
    #[serde(default)]
    pub files: Vec<PackageFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageFile {
    pub file: String,
    pub hash: String,
}

/// Pre-1.5 locks record file hashes under a top-level `[metadata.files]`
/// table instead of per-package `files` arrays.
#[derive(Debug, Deserialize)]
struct LockMetadata {
    #[serde(default)]
    files: BTreeMap<String, Vec<PackageFile>>,
}

impl PoetryLock {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The per-file hash strings recorded for a package, in lock order.
    pub fn recorded_hashes(&self, package: &LockedPackage) -> Vec<String> {
        if !package.files.is_empty() {
            return package.files.iter().map(|f| f.hash.clone()).collect();
        }
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.files.get(&package.name))
            .map(|files| files.iter().map(|f| f.hash.clone()).collect())
            .unwrap_or_default()
    }

    /// The locked record for (name, version). Names are compared in PEP 503
    /// canonical form; versions as exact text.
    pub fn find(&self, name: &str, version: &str) -> Option<&LockedPackage> {
        let wanted = super::canonical_name(name);
        self.package
            .iter()
            .find(|p| super::canonical_name(&p.name) == wanted && p.version == version)
    }
}
