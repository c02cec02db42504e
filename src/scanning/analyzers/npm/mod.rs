//! npm analyzer
//!
//! Handles `package.json` + `package-lock.json` projects (lockfile v2/v3).
//! Licenses come from the lock's per-entry `license` field, content hashes
//! from the SRI `integrity` string.

mod lock;
mod manifest;

pub use lock::{LockedEntry, PackageLock};
pub use manifest::PackageJson;

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

/// (name, version) -> lock entry, for walking transitive declarations.
type LockIndex<'a> = HashMap<(&'a str, &'a str), &'a LockedEntry>;

pub struct NpmAnalyzer {
    enabled: bool,
    excluded_groups: Vec<String>,
}

impl NpmAnalyzer {
    pub fn new() -> Self {
        Self {
            enabled: true,
            excluded_groups: Vec::new(),
        }
    }

    fn read_inputs(
        &self,
        context: &mut AnalysisContext,
        manifest: &Path,
    ) -> Option<(PackageJson, PackageLock)> {
        let manifest_text = match security::safe_read_to_string(manifest) {
            Ok(text) => text,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(manifest, format!("Cannot read package.json: {e:#}"));
                return None;
            }
        };
        let package_json = match PackageJson::parse(&manifest_text) {
            Ok(parsed) => parsed,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(manifest, format!("Cannot parse package.json: {e:#}"));
                return None;
            }
        };

        let lock_path = manifest.with_file_name("package-lock.json");
        if !lock_path.is_file() {
            context.diagnostics.error_at(
                manifest,
                "No package-lock.json next to package.json; run `npm install` first",
            );
            return None;
        }
        let lock_text = match security::safe_read_to_string(&lock_path) {
            Ok(text) => text,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(&lock_path, format!("Cannot read package-lock.json: {e:#}"));
                return None;
            }
        };
        let lock = match PackageLock::parse(&lock_text) {
            Ok(lock) => lock,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(&lock_path, format!("Cannot parse package-lock.json: {e:#}"));
                return None;
            }
        };
        Some((package_json, lock))
    }

    fn populate(
        &self,
        context: &mut AnalysisContext,
        manifest: &Path,
        package_json: &PackageJson,
        lock: &PackageLock,
    ) -> Option<NodeIndex> {
        // private roots may omit the name; the lock records it either way
        let name = package_json.name.as_deref().or(lock.name.as_deref());
        let Some(name) = name else {
            context
                .diagnostics
                .error_at(manifest, "Neither package.json nor the lock declares a package name");
            return None;
        };
        let version = package_json.version.as_deref().unwrap_or("0.0.0");
        let root_component = match Component::root(Ecosystem::Npm, name.to_string(), version) {
            Ok(component) => component,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(manifest, format!("Invalid package name: {e:#}"));
                return None;
            }
        };
        let root = context.graph.add_component(root_component);

        for (key, entry) in &lock.packages {
            if entry.link {
                continue;
            }
            // skips the "" root entry and workspace paths
            let Some(name) = lock::package_name(key) else {
                continue;
            };
            let Some(version) = entry.version.as_deref() else {
                context.diagnostics.warn(format!(
                    "Lock entry '{}' has no version; skipping it",
                    key
                ));
                continue;
            };
            let component = match Component::library(Ecosystem::Npm, name.to_string(), version) {
                Ok(component) => component,
                Err(e) => {
                    context.diagnostics.error(format!(
                        "Invalid lock entry '{}' in package-lock.json: {e:#}",
                        key
                    ));
                    continue;
                }
            };
            let handle = context.graph.add_component(component);
            context
                .graph
                .set_license(handle, LicenseRecord::from_optional(entry.license.as_deref()));
            if let Some(integrity) = &entry.integrity {
                if let Some(hash) = ContentHash::from_recorded_hashes(&[integrity.clone()]) {
                    context.graph.set_content_hash(handle, hash);
                }
            }
        }
        Some(root)
    }

    fn link(
        &self,
        context: &mut AnalysisContext,
        package_json: &PackageJson,
        index: &LockIndex<'_>,
        root: NodeIndex,
    ) {
        let mut visited: HashSet<(String, String)> = HashSet::new();
        for (group, dependencies) in package_json.dependency_groups() {
            if self.excluded_groups.iter().any(|excluded| excluded == group) {
                continue;
            }
            for (name, constraint) in dependencies {
                self.link_dependency(context, index, root, name, constraint, &mut visited);
            }
        }
    }

    fn link_dependency(
        &self,
        context: &mut AnalysisContext,
        index: &LockIndex<'_>,
        dependent: NodeIndex,
        name: &str,
        constraint: &str,
        visited: &mut HashSet<(String, String)>,
    ) {
        let range = VersionRange::parse(constraint, RangeSyntax::Semver);
        match VersionResolver::resolve(&context.graph, Ecosystem::Npm, name, &range) {
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
                    "Cannot resolve {} ('{}') against package-lock.json",
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
            self.link_dependency(context, index, dependency, dep_name, dep_constraint, visited);
        }
    }
}

impl Default for NpmAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for NpmAnalyzer {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn patterns(&self) -> &[&'static str] {
        &["package.json"]
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn initialize(&self, registry: &mut OptionRegistry) {
        registry.register("npm.disable", OptionKind::Flag, "Disable the npm analyzer");
        registry.register(
            "npm.exclude-groups",
            OptionKind::TextList,
            "Dependency groups to skip when linking",
        );
    }

    fn before_analysis(&mut self, context: &mut AnalysisContext) {
        if context.settings().flag("npm.disable").unwrap_or(false) {
            self.enabled = false;
            return;
        }
        self.excluded_groups = context
            .settings()
            .list("npm.exclude-groups")
            .map(<[String]>::to_vec)
            .unwrap_or_default();
    }

    /// package.json files inside an installed tree are library manifests,
    /// not project roots.
    fn can_handle(&self, manifest: &Path) -> bool {
        !manifest
            .components()
            .any(|component| component.as_os_str() == "node_modules")
    }

    fn should_traverse(&self, directory: &Path) -> bool {
        directory
            .file_name()
            .map(|name| name != "node_modules")
            .unwrap_or(true)
    }

    fn analyze(&mut self, context: &mut AnalysisContext, manifest: &Path) {
        let checkpoint = context.diagnostics.checkpoint();

        let Some((package_json, lock)) = self.read_inputs(context, manifest) else {
            return;
        };
        let Some(root) = self.populate(context, manifest, &package_json, &lock) else {
            return;
        };
        if context.diagnostics.has_errors_since(checkpoint) {
            return;
        }

        let mut index: LockIndex<'_> = HashMap::new();
        for (key, entry) in &lock.packages {
            if entry.link {
                continue;
            }
            let (Some(name), Some(version)) = (lock::package_name(key), entry.version.as_deref())
            else {
                continue;
            };
            index.entry((name, version)).or_insert(entry);
        }
        self.link(context, &package_json, &index, root);
    }
}
