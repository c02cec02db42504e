use crate::shared::security;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of the per-run virtual environment lookup.
#[derive(Debug)]
pub enum VenvResolution {
    Found(VirtualEnv),
    /// No candidate directory; licenses cannot be resolved locally.
    NotFound,
    /// An explicitly configured directory that does not exist.
    ExplicitMissing(PathBuf),
    /// More than one candidate directory; the caller must pick one.
    Ambiguous(PathBuf, PathBuf),
}

/// A resolved Python virtual environment and its site-packages directories.
#[derive(Debug)]
pub struct VirtualEnv {
    root: PathBuf,
    site_packages: Vec<PathBuf>,
}

impl VirtualEnv {
    /// Resolves the virtual environment for a project. An explicitly
    /// configured directory (relative paths are taken from the project root)
    /// wins; otherwise `.venv` and `venv` directories containing a
    /// `pyvenv.cfg` marker are considered.
    pub fn resolve(project_root: &Path, explicit: Option<&Path>) -> VenvResolution {
        if let Some(dir) = explicit {
            let dir = if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                project_root.join(dir)
            };
            if dir.is_dir() {
                return VenvResolution::Found(VirtualEnv::new(dir));
            }
            return VenvResolution::ExplicitMissing(dir);
        }

        let candidates: Vec<PathBuf> = [".venv", "venv"]
            .iter()
            .map(|name| project_root.join(name))
            .filter(|dir| dir.join("pyvenv.cfg").is_file())
            .collect();
        match candidates.as_slice() {
            [] => VenvResolution::NotFound,
            [only] => VenvResolution::Found(VirtualEnv::new(only.clone())),
            [first, second, ..] => VenvResolution::Ambiguous(first.clone(), second.clone()),
        }
    }

    fn new(root: PathBuf) -> Self {
        let site_packages = discover_site_packages(&root);
        Self {
            root,
            site_packages,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// License-relevant metadata of the installed distribution matching
    /// (name, version), if one is present in any site-packages directory.
    pub fn dist_metadata(&self, name: &str, version: &str) -> Option<DistMetadata> {
        let dist_info = self.find_dist_info(name, version)?;
        let content = security::safe_read_to_string(&dist_info.join("METADATA")).ok()?;
        let mut metadata = DistMetadata::parse(&content);
        metadata.license_file_heading = license_file_heading(&dist_info);
        Some(metadata)
    }

    fn find_dist_info(&self, name: &str, version: &str) -> Option<PathBuf> {
        let wanted = super::canonical_name(name);
        for dir in &self.site_packages {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
            paths.sort();
            for path in paths {
                if !path.is_dir() {
                    continue;
                }
                let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let Some(stem) = dir_name.strip_suffix(".dist-info") else {
                    continue;
                };
                // directory layout is {distribution}-{version}.dist-info
                let Some((dist, dist_version)) = stem.rsplit_once('-') else {
                    continue;
                };
                if dist_version == version && super::canonical_name(dist) == wanted {
                    return Some(path);
                }
            }
        }
        None
    }
}

/// Both the POSIX (`lib/pythonX.Y/site-packages`) and the Windows
/// (`Lib/site-packages`) layouts are probed.
fn discover_site_packages(venv: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let windows_layout = venv.join("Lib").join("site-packages");
    if windows_layout.is_dir() {
        found.push(windows_layout);
    }
    if let Ok(entries) = fs::read_dir(venv.join("lib")) {
        let mut subdirs: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        subdirs.sort();
        for subdir in subdirs {
            let site = subdir.join("site-packages");
            if site.is_dir() {
                found.push(site);
            }
        }
    }
    found
}

/// License-relevant fields of an installed distribution's METADATA file.
#[derive(Debug, Default)]
pub struct DistMetadata {
    pub license_expression: Option<String>,
    pub license_field: Option<String>,
    pub classifiers: Vec<String>,
    pub license_file_heading: Option<String>,
}

impl DistMetadata {
    /// Parses the RFC 822 style header block. Headers end at the first blank
    /// line; everything after it is the long description and is ignored.
    pub fn parse(content: &str) -> Self {
        let mut metadata = DistMetadata::default();
        for line in content.lines() {
            if line.trim().is_empty() {
                break;
            }
            if let Some(value) = line.strip_prefix("License-Expression:") {
                metadata.license_expression = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("License:") {
                if metadata.license_field.is_none() {
                    metadata.license_field = Some(value.trim().to_string());
                }
            } else if let Some(value) = line.strip_prefix("Classifier:") {
                metadata.classifiers.push(value.trim().to_string());
            }
        }
        metadata
    }
}

/// First non-empty line of a license text file shipped in the dist-info
/// directory, or in its `licenses/` subdirectory for newer wheels.
fn license_file_heading(dist_info: &Path) -> Option<String> {
    for base in [dist_info.to_path_buf(), dist_info.join("licenses")] {
        let Ok(entries) = fs::read_dir(&base) else {
            continue;
        };
        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();
        for path in paths {
            if !path.is_file() || !is_license_file(&path) {
                continue;
            }
            let Ok(content) = security::safe_read_to_string(&path) else {
                continue;
            };
            if let Some(line) = content.lines().map(str::trim).find(|line| !line.is_empty()) {
                return Some(line.to_string());
            }
        }
    }
    None
}

fn is_license_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            let upper = name.to_ascii_uppercase();
            upper.starts_with("LICENSE") || upper.starts_with("LICENCE") || upper.starts_with("COPYING")
        })
        .unwrap_or(false)
}
