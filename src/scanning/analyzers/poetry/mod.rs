//! Poetry analyzer
//!
//! Handles `pyproject.toml` + `poetry.lock` projects. Licenses come from the
//! installed distribution metadata in the project's virtual environment,
//! content hashes from the file hashes recorded in the lock.

mod lock;
mod manifest;
mod metadata;

pub use lock::{LockedPackage, PackageFile, PoetryLock};
pub use manifest::{DependencyGroup, DependencySpec, PyProjectDocument};
pub use metadata::{DistMetadata, VenvResolution, VirtualEnv};

use super::Analyzer;
use crate::scanning::domain::{
    Component, ContentHash, Diagnostics, Ecosystem, LicenseRecord, RangeSyntax, VersionRange,
};
use crate::scanning::orchestrator::AnalysisContext;
use crate::scanning::policies::LicenseSourcePriority;
use crate::scanning::services::{VersionResolution, VersionResolver};
use crate::scanning::settings::{OptionKind, OptionRegistry};
use crate::shared::security;
use petgraph::graph::NodeIndex;
use std::collections::HashSet;
use std::path::Path;

/// PEP 503 canonical form: lowercase with runs of `-`, `_` and `.` collapsed
/// to a single hyphen. Lock files record names in this form; manifests often
/// do not, so both sides are canonicalized before they meet.
pub(crate) fn canonical_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut previous_was_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !previous_was_separator {
                canonical.push('-');
            }
            previous_was_separator = true;
        } else {
            canonical.push(c.to_ascii_lowercase());
            previous_was_separator = false;
        }
    }
    canonical
}

pub struct PoetryAnalyzer {
    enabled: bool,
    excluded_groups: Vec<String>,
    venv: Option<VirtualEnv>,
}

impl PoetryAnalyzer {
    pub fn new() -> Self {
        Self {
            enabled: true,
            excluded_groups: Vec::new(),
            venv: None,
        }
    }

    fn read_inputs(
        &self,
        context: &mut AnalysisContext,
        manifest: &Path,
    ) -> Option<(PyProjectDocument, PoetryLock)> {
        let manifest_text = match security::safe_read_to_string(manifest) {
            Ok(text) => text,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(manifest, format!("Cannot read pyproject.toml: {e:#}"));
                return None;
            }
        };
        let document = match PyProjectDocument::parse(&manifest_text) {
            Ok(document) => document,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(manifest, format!("Cannot parse pyproject.toml: {e}"));
                return None;
            }
        };

        let lock_path = manifest.with_file_name("poetry.lock");
        if !lock_path.is_file() {
            context.diagnostics.error_at(
                manifest,
                "No poetry.lock next to pyproject.toml; run `poetry lock` first",
            );
            return None;
        }
        let lock_text = match security::safe_read_to_string(&lock_path) {
            Ok(text) => text,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(&lock_path, format!("Cannot read poetry.lock: {e:#}"));
                return None;
            }
        };
        let lock = match PoetryLock::parse(&lock_text) {
            Ok(lock) => lock,
            Err(e) => {
                context
                    .diagnostics
                    .error_at(&lock_path, format!("Cannot parse poetry.lock: {e}"));
                return None;
            }
        };
        Some((document, lock))
    }

    fn populate(
        &self,
        context: &mut AnalysisContext,
        manifest: &Path,
        document: &PyProjectDocument,
        lock: &PoetryLock,
    ) -> Option<NodeIndex> {
        let Some(name) = document.project_name() else {
            context.diagnostics.error_at(
                manifest,
                "pyproject.toml declares no project name ([tool.poetry] or [project])",
            );
            return None;
        };
        let root_component =
            match Component::root(Ecosystem::Poetry, name.to_string(), document.project_version()) {
                Ok(component) => component,
                Err(e) => {
                    context
                        .diagnostics
                        .error_at(manifest, format!("Invalid project name: {e:#}"));
                    return None;
                }
            };
        let root = context.graph.add_component(root_component);

        if self.venv.is_none() && !lock.package.is_empty() {
            context.diagnostics.warn_at(
                manifest,
                "No Python virtual environment found; package licenses cannot be resolved",
            );
        }

        for package in &lock.package {
            let component = match Component::library(
                Ecosystem::Poetry,
                canonical_name(&package.name),
                &package.version,
            ) {
                Ok(component) => component,
                Err(e) => {
                    context.diagnostics.error(format!(
                        "Invalid package entry '{}' in poetry.lock: {e:#}",
                        package.name
                    ));
                    continue;
                }
            };
            let handle = context.graph.add_component(component);

            let record = self.resolve_license(&mut context.diagnostics, package);
            context.graph.set_license(handle, record);

            if let Some(hash) = ContentHash::from_recorded_hashes(&lock.recorded_hashes(package)) {
                context.graph.set_content_hash(handle, hash);
            }
        }
        Some(root)
    }

    fn resolve_license(&self, diagnostics: &mut Diagnostics, package: &LockedPackage) -> LicenseRecord {
        let Some(venv) = &self.venv else {
            return LicenseRecord::from_optional(None);
        };
        match venv.dist_metadata(&package.name, &package.version) {
            Some(metadata) => {
                let raw = LicenseSourcePriority::select(
                    metadata.license_expression,
                    metadata.license_field,
                    &metadata.classifiers,
                    metadata.license_file_heading,
                );
                LicenseRecord::from_optional(raw.as_deref())
            }
            None => {
                diagnostics.warn(format!(
                    "No installed metadata for {} {}; is the virtual environment up to date?",
                    package.name, package.version
                ));
                LicenseRecord::from_optional(None)
            }
        }
    }

    fn link(
        &self,
        context: &mut AnalysisContext,
        document: &PyProjectDocument,
        lock: &PoetryLock,
        root: NodeIndex,
    ) {
        let mut visited: HashSet<(String, String)> = HashSet::new();
        for group in document.dependency_groups() {
            if self.excluded_groups.iter().any(|excluded| excluded == &group.name) {
                continue;
            }
            for (name, spec) in &group.dependencies {
                if canonical_name(name) == "python" {
                    continue;
                }
                self.link_dependency(context, lock, root, name, spec, &mut visited);
            }
        }
    }

    fn link_dependency(
        &self,
        context: &mut AnalysisContext,
        lock: &PoetryLock,
        dependent: NodeIndex,
        declared_name: &str,
        spec: &DependencySpec,
        visited: &mut HashSet<(String, String)>,
    ) {
        let range = match spec.constraint() {
            Some(text) => VersionRange::parse(text, RangeSyntax::Python),
            None => VersionRange::any(),
        };
        let name = canonical_name(declared_name);
        match VersionResolver::resolve(&context.graph, Ecosystem::Poetry, &name, &range) {
            VersionResolution::Exact(handle) => {
                self.connect_and_descend(context, lock, dependent, handle, visited);
            }
            VersionResolution::SoleCandidate(handle) => {
                context.diagnostics.warn(format!(
                    "No locked version of {} satisfies '{}'; using the only one available",
                    declared_name,
                    range.as_str()
                ));
                self.connect_and_descend(context, lock, dependent, handle, visited);
            }
            VersionResolution::Unresolved => {
                context.diagnostics.warn(format!(
                    "Cannot resolve {} ('{}') against poetry.lock",
                    declared_name,
                    range.as_str()
                ));
            }
        }
    }

    /// Connects the edge, then walks the dependency's own locked declarations.
    /// The visited set terminates cycles in the lock data.
    fn connect_and_descend(
        &self,
        context: &mut AnalysisContext,
        lock: &PoetryLock,
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
        let Some(package) = lock.find(&name, &version) else {
            return;
        };
        for (dep_name, dep_spec) in &package.dependencies {
            if canonical_name(dep_name) == "python" {
                continue;
            }
            self.link_dependency(context, lock, dependency, dep_name, dep_spec, visited);
        }
    }
}

impl Default for PoetryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for PoetryAnalyzer {
    fn name(&self) -> &'static str {
        "poetry"
    }

    fn patterns(&self) -> &[&'static str] {
        &["pyproject.toml"]
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn initialize(&self, registry: &mut OptionRegistry) {
        registry.register("poetry.disable", OptionKind::Flag, "Disable the Poetry analyzer");
        registry.register(
            "poetry.exclude-groups",
            OptionKind::TextList,
            "Dependency groups to skip when linking",
        );
        registry.register(
            "poetry.venv",
            OptionKind::Dir,
            "Virtual environment directory used for license metadata",
        );
    }

    fn before_analysis(&mut self, context: &mut AnalysisContext) {
        if context.settings().flag("poetry.disable").unwrap_or(false) {
            self.enabled = false;
            return;
        }
        self.excluded_groups = context
            .settings()
            .list("poetry.exclude-groups")
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        let explicit = context.settings().dir("poetry.venv").map(Path::to_path_buf);
        match VirtualEnv::resolve(context.settings().root(), explicit.as_deref()) {
            VenvResolution::Found(venv) => self.venv = Some(venv),
            VenvResolution::NotFound => self.venv = None,
            VenvResolution::ExplicitMissing(dir) => {
                context
                    .diagnostics
                    .error_at(&dir, "Configured virtual environment directory does not exist");
                self.enabled = false;
            }
            VenvResolution::Ambiguous(first, second) => {
                context.diagnostics.error(format!(
                    "Found two virtual environments ({} and {}); pass --venv to pick one",
                    first.display(),
                    second.display()
                ));
                self.enabled = false;
            }
        }
    }

    /// A pyproject.toml is ours when `[tool.poetry]` is present or a
    /// poetry.lock sits next to it; plain PEP 621 projects are not.
    fn can_handle(&self, manifest: &Path) -> bool {
        if manifest
            .parent()
            .map(|dir| dir.join("poetry.lock").is_file())
            .unwrap_or(false)
        {
            return true;
        }
        match security::safe_read_to_string(manifest) {
            Ok(content) => content.contains("[tool.poetry]"),
            // let analyze() surface the read error
            Err(_) => true,
        }
    }

    fn should_traverse(&self, directory: &Path) -> bool {
        if let Some(venv) = &self.venv {
            if directory == venv.root() {
                return false;
            }
        }
        !directory.join("pyvenv.cfg").is_file()
    }

    fn analyze(&mut self, context: &mut AnalysisContext, manifest: &Path) {
        let checkpoint = context.diagnostics.checkpoint();

        let Some((document, lock)) = self.read_inputs(context, manifest) else {
            return;
        };
        let Some(root) = self.populate(context, manifest, &document, &lock) else {
            return;
        };
        if context.diagnostics.has_errors_since(checkpoint) {
            return;
        }
        self.link(context, &document, &lock, root);
    }
}
