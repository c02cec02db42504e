//! NuGet analyzer
//!
//! Handles SDK-style `.csproj` projects with `packages.lock.json` inventories.
//! The lock carries resolved versions and content hashes; license data is not
//! recorded locally and stays absent unless online enrichment fills it in.

mod lock;
mod project;

pub use lock::{DependencyKind, LockedDependency, PackagesLock};
pub use project::{PackageReference, ProjectFile};

use super::Analyzer;
use crate::scanning::domain::{
    Component, ContentHash, Ecosystem, LicenseRecord, RangeSyntax, VersionRange,
};
use crate::scanning::orchestrator::AnalysisContext;
use crate::scanning::services::{VersionResolution, VersionResolver};
use crate::scanning::settings::{OptionKind, OptionRegistry};
use crate::shared::security;
use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// (name, resolved version) -> locked record, across all framework sections.
type LockIndex<'a> = HashMap<(&'a str, &'a str), &'a LockedDependency>;

pub struct NugetAnalyzer {
    enabled: bool,
}

impl NugetAnalyzer {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    fn read_inputs(
        &self,
        context: &mut AnalysisContext,
        manifest: &Path,
    ) -> Option<(ProjectFile, PackagesLock)> {
        let project_text = match security::safe_read_to_string(manifest) {
            Ok(text) => text,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(manifest, format!("Cannot read project file: {e:#}"));
                return None;
            }
        };
        let project = match ProjectFile::parse(&project_text) {
            Ok(project) => project,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(manifest, format!("Cannot parse project file: {e:#}"));
                return None;
            }
        };

        let lock_path = manifest.with_file_name("packages.lock.json");
        if !lock_path.is_file() {
            context.diagnostics.error_at(
                manifest,
                "No packages.lock.json next to the project file; restore with RestorePackagesWithLockFile enabled",
            );
            return None;
        }
        let lock_text = match security::safe_read_to_string(&lock_path) {
            Ok(text) => text,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(&lock_path, format!("Cannot read packages.lock.json: {e:#}"));
                return None;
            }
        };
        let lock = match PackagesLock::parse(&lock_text) {
            Ok(lock) => lock,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(&lock_path, format!("Cannot parse packages.lock.json: {e:#}"));
                return None;
            }
        };
        Some((project, lock))
    }

    fn populate(
        &self,
        context: &mut AnalysisContext,
        manifest: &Path,
        project: &ProjectFile,
        lock: &PackagesLock,
    ) -> Option<NodeIndex> {
        let Some(stem) = manifest.file_stem().and_then(|stem| stem.to_str()) else {
            context
                .diagnostics
                .error_at(manifest, "Project file has no usable name");
            return None;
        };
        let version = project.version().unwrap_or("0.0.0");
        let root_component = match Component::root(Ecosystem::Nuget, stem.to_string(), version) {
            Ok(component) => component,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(manifest, format!("Invalid project name: {e:#}"));
                return None;
            }
        };
        let root = context.graph.add_component(root_component);

        for packages in lock.dependencies.values() {
            for (name, entry) in packages {
                if entry.kind == DependencyKind::Project {
                    continue;
                }
                let Some(resolved) = entry.resolved.as_deref() else {
                    context.diagnostics.warn(format!(
                        "Lock entry '{}' has no resolved version; skipping it",
                        name
                    ));
                    continue;
                };
                let component =
                    match Component::library(Ecosystem::Nuget, name.clone(), resolved) {
                        Ok(component) => component,
                        Err(e) => {
                            context.diagnostics.error(format!(
                                "Invalid lock entry '{}' in packages.lock.json: {e:#}",
                                name
                            ));
                            continue;
                        }
                    };
                let handle = context.graph.add_component(component);
                context
                    .graph
                    .set_license(handle, LicenseRecord::from_optional(None));
                if let Some(content_hash) = &entry.content_hash {
                    if let Some(hash) =
                        ContentHash::from_recorded_hashes(&[content_hash.clone()])
                    {
                        context.graph.set_content_hash(handle, hash);
                    }
                }
            }
        }
        Some(root)
    }

    fn link(
        &self,
        context: &mut AnalysisContext,
        project: &ProjectFile,
        index: &LockIndex<'_>,
        root: NodeIndex,
    ) {
        let mut visited: HashSet<(String, String)> = HashSet::new();
        for reference in project.package_references() {
            let Some(name) = reference.name() else {
                continue;
            };
            let range = match reference.version() {
                Some(text) => VersionRange::parse(text, RangeSyntax::Nuget),
                None => VersionRange::any(),
            };
            self.link_dependency(context, index, root, name, &range, &mut visited);
        }
    }

    fn link_dependency(
        &self,
        context: &mut AnalysisContext,
        index: &LockIndex<'_>,
        dependent: NodeIndex,
        name: &str,
        range: &VersionRange,
        visited: &mut HashSet<(String, String)>,
    ) {
        match VersionResolver::resolve(&context.graph, Ecosystem::Nuget, name, range) {
            VersionResolution::Exact(handle) => {
                self.connect_and_descend(context, index, dependent, handle, visited);
            }
            VersionResolution::SoleCandidate(handle) => {
                context.diagnostics.warn(format!(
                    "No locked version of {} satisfies '{}'; using the only one available",
                    name,
                    range.as_str()
                ));
                self.connect_and_descend(context, index, dependent, handle, visited);
            }
            VersionResolution::Unresolved => {
                context.diagnostics.warn(format!(
                    "Cannot resolve {} ('{}') against packages.lock.json",
                    name,
                    range.as_str()
                ));
            }
        }
    }

    fn connect_and_descend(
        &self,
        context: &mut AnalysisContext,
        index: &LockIndex<'_>,
        dependent: NodeIndex,
        dependency: NodeIndex,
        visited: &mut HashSet<(String, String)>,
    ) {
        context.graph.connect(dependent, dependency);
        let (name, version) = {
            let component = context.graph.component(dependency);
            (
                component.name().to_string(),
                component.version().as_str().to_string(),
            )
        };
        if !visited.insert((name.clone(), version.clone())) {
            return;
        }
        let Some(entry) = index.get(&(name.as_str(), version.as_str())) else {
            return;
        };
        for (dep_name, dep_constraint) in &entry.dependencies {
            let range = VersionRange::parse(dep_constraint, RangeSyntax::Nuget);
            self.link_dependency(context, index, dependency, dep_name, &range, visited);
        }
    }
}

impl Default for NugetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for NugetAnalyzer {
    fn name(&self) -> &'static str {
        "nuget"
    }

    fn patterns(&self) -> &[&'static str] {
        &["*.csproj"]
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn initialize(&self, registry: &mut OptionRegistry) {
        registry.register("nuget.disable", OptionKind::Flag, "Disable the NuGet analyzer");
    }

    fn before_analysis(&mut self, context: &mut AnalysisContext) {
        if context.settings().flag("nuget.disable").unwrap_or(false) {
            self.enabled = false;
        }
    }

    fn should_traverse(&self, directory: &Path) -> bool {
        directory
            .file_name()
            .map(|name| name != "bin" && name != "obj")
            .unwrap_or(true)
    }

    fn analyze(&mut self, context: &mut AnalysisContext, manifest: &Path) {
        let checkpoint = context.diagnostics.checkpoint();

        let Some((project, lock)) = self.read_inputs(context, manifest) else {
            return;
        };
        let Some(root) = self.populate(context, manifest, &project, &lock) else {
            return;
        };
        if context.diagnostics.has_errors_since(checkpoint) {
            return;
        }

        let mut index: LockIndex<'_> = HashMap::new();
        for packages in lock.dependencies.values() {
            for (name, entry) in packages {
                if entry.kind == DependencyKind::Project {
                    continue;
                }
                let Some(resolved) = entry.resolved.as_deref() else {
                    continue;
                };
                index.entry((name.as_str(), resolved)).or_insert(entry);
            }
        }
        self.link(context, &project, &index, root);
    }
}
