//! Configuration file support for polybom.
//!
//! Provides YAML-based configuration through `polybom.config.yml` files,
//! including data structures, file loading, and validation. Command-line
//! arguments always win over config file values.

use anyhow::bail;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::application::dto::OutputFormat;
use crate::shared::error::ScanError;
use crate::shared::Result;

const CONFIG_FILENAME: &str = "polybom.config.yml";
const CONFIG_FILENAME_ALT: &str = "polybom.config.yaml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub online: Option<bool>,
    pub exclude_groups: Option<Vec<String>>,
    pub analyzers: Option<AnalyzersConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Per-analyzer configuration sections.
#[derive(Debug, Deserialize, Default)]
pub struct AnalyzersConfig {
    pub poetry: Option<PoetryAnalyzerConfig>,
    pub npm: Option<AnalyzerToggle>,
    pub nuget: Option<AnalyzerToggle>,
    /// Captures unknown analyzer names for warnings.
    #[serde(flatten)]
    pub unknown_analyzers: HashMap<String, serde_yaml_ng::Value>,
}

/// The Poetry analyzer additionally accepts a virtual environment path used
/// for installed-package license lookups.
#[derive(Debug, Deserialize, Default)]
pub struct PoetryAnalyzerConfig {
    pub enabled: Option<bool>,
    pub venv: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AnalyzerToggle {
    pub enabled: Option<bool>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| ScanError::FileReadError {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    let config: ConfigFile =
        serde_yaml_ng::from_str(&content).map_err(|e| ScanError::ConfigParseError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
///
/// `polybom.config.yml` is preferred; the `.yaml` spelling is accepted as a
/// fallback.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    for filename in [CONFIG_FILENAME, CONFIG_FILENAME_ALT] {
        let config_path = dir.join(filename);
        if config_path.exists() {
            let config = load_config_from_path(&config_path)?;
            return Ok(Some(config));
        }
    }

    Ok(None)
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref format) = config.format {
        if let Err(e) = OutputFormat::from_str(format) {
            bail!(
                "Invalid config: {}\n\n\
                 💡 Hint: Set 'format' to \"json\" or \"markdown\".",
                e
            );
        }
    }

    if let Some(ref groups) = config.exclude_groups {
        for (i, group) in groups.iter().enumerate() {
            if group.trim().is_empty() {
                bail!(
                    "Invalid config: exclude_groups[{}] must not be empty.\n\n\
                     💡 Hint: Each exclude_groups entry must name a dependency group (e.g., \"dev\").",
                    i
                );
            }
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }

    if let Some(ref analyzers) = config.analyzers {
        for key in analyzers.unknown_analyzers.keys() {
            eprintln!(
                "⚠️  Warning: Unknown analyzer '{}' in config will be ignored.",
                key
            );
        }
    }
}
