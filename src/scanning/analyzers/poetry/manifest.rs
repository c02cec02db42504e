use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A dependency value as Poetry writes it: either a bare constraint string
/// (`requests = ">=2.28"`) or an inline table
/// (`requests = { version = ">=2.28", extras = ["socks"] }`).
///
/// The two shapes are resolved here, at the parsing boundary. Downstream code
/// only ever sees this enum, never a raw dynamic value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Text(String),
    Table(DependencyTable),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DependencyTable {
    #[serde(default)]
    pub version: Option<String>,
}

impl DependencySpec {
    /// The declared version constraint, if any. Git, path and URL tables
    /// carry no `version` key and match any locked version of the package.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DependencySpec::Text(text) => Some(text),
            DependencySpec::Table(table) => table.version.as_deref(),
        }
    }
}

/// One dependency group of a Poetry manifest with its declarations in
/// name order.
#[derive(Debug)]
pub struct DependencyGroup {
    pub name: String,
    pub dependencies: BTreeMap<String, DependencySpec>,
}

/// Parsed pyproject.toml, covering both the classic `[tool.poetry]` layout
/// and the modern `[project]` metadata table.
#[derive(Debug, Deserialize)]
pub struct PyProjectDocument {
    #[serde(default)]
    tool: Option<ToolSection>,
    #[serde(default)]
    project: Option<ProjectMeta>,
}

#[derive(Debug, Deserialize)]
struct ToolSection {
    #[serde(default)]
    poetry: Option<PoetrySection>,
}

#[derive(Debug, Deserialize)]
struct PoetrySection {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, DependencySpec>,
    #[serde(default, rename = "dev-dependencies")]
    dev_dependencies: BTreeMap<String, DependencySpec>,
    #[serde(default)]
    group: BTreeMap<String, GroupSection>,
}

#[derive(Debug, Deserialize)]
struct GroupSection {
    #[serde(default)]
    dependencies: BTreeMap<String, DependencySpec>,
}

#[derive(Debug, Deserialize)]
struct ProjectMeta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

impl PyProjectDocument {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn poetry_section(&self) -> Option<&PoetrySection> {
        self.tool.as_ref().and_then(|tool| tool.poetry.as_ref())
    }

    /// Project name from `[tool.poetry]`, falling back to `[project]`.
    pub fn project_name(&self) -> Option<&str> {
        self.poetry_section()
            .and_then(|poetry| poetry.name.as_deref())
            .or_else(|| {
                self.project
                    .as_ref()
                    .and_then(|project| project.name.as_deref())
            })
    }

    pub fn project_version(&self) -> &str {
        self.poetry_section()
            .and_then(|poetry| poetry.version.as_deref())
            .or_else(|| {
                self.project
                    .as_ref()
                    .and_then(|project| project.version.as_deref())
            })
            .unwrap_or("0.0.0")
    }

    /// All declared dependency groups: `main` first, then named groups in
    /// name order. The legacy `[tool.poetry.dev-dependencies]` table is
    /// folded into the `dev` group.
    pub fn dependency_groups(&self) -> Vec<DependencyGroup> {
        let Some(poetry) = self.poetry_section() else {
            return Vec::new();
        };

        let mut groups = Vec::new();
        if !poetry.dependencies.is_empty() {
            groups.push(DependencyGroup {
                name: "main".to_string(),
                dependencies: poetry.dependencies.clone(),
            });
        }

        let mut named: BTreeMap<String, BTreeMap<String, DependencySpec>> = BTreeMap::new();
        for (name, section) in &poetry.group {
            named
                .entry(name.clone())
                .or_default()
                .extend(section.dependencies.clone());
        }
        if !poetry.dev_dependencies.is_empty() {
            named
                .entry("dev".to_string())
                .or_default()
                .extend(poetry.dev_dependencies.clone());
        }

        for (name, dependencies) in named {
            if !dependencies.is_empty() {
                groups.push(DependencyGroup { name, dependencies });
            }
        }
        groups
    }
}
