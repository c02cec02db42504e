use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Parsed package.json. Constraint values in npm manifests are always plain
/// strings, so no table variant exists here.
#[derive(Debug, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "optionalDependencies")]
    pub optional_dependencies: BTreeMap<String, String>,
}

impl PackageJson {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Declared groups in dispatch order. Group names line up with the other
    /// analyzers so one `--exclude-group` value applies everywhere.
    pub fn dependency_groups(&self) -> Vec<(&'static str, &BTreeMap<String, String>)> {
        let mut groups = Vec::new();
        if !self.dependencies.is_empty() {
            groups.push(("main", &self.dependencies));
        }
        if !self.dev_dependencies.is_empty() {
            groups.push(("dev", &self.dev_dependencies));
        }
        if !self.optional_dependencies.is_empty() {
            groups.push(("optional", &self.optional_dependencies));
        }
        groups
    }
}
