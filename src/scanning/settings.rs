use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Value shape of a registered analyzer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Flag,
    Text,
    TextList,
    Dir,
}

/// A named option an analyzer declares at startup.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub key: &'static str,
    pub kind: OptionKind,
    pub description: &'static str,
}

/// Registry of analyzer options, populated once via `Analyzer::initialize`.
///
/// The registry is what binds generic CLI/config inputs to the analyzers
/// that actually declared an option for them: the group-exclusion list, for
/// example, is applied to every key ending in `.exclude-groups` and nothing
/// else.
#[derive(Debug, Default)]
pub struct OptionRegistry {
    specs: Vec<OptionSpec>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an option; a key registered twice keeps its first spec.
    pub fn register(&mut self, key: &'static str, kind: OptionKind, description: &'static str) {
        if self.specs.iter().any(|spec| spec.key == key) {
            return;
        }
        self.specs.push(OptionSpec {
            key,
            kind,
            description,
        });
    }

    pub fn contains(&self, key: &str) -> bool {
        self.specs.iter().any(|spec| spec.key == key)
    }

    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// All registered keys ending in `suffix`, e.g. `.exclude-groups`.
    pub fn keys_with_suffix(&self, suffix: &str) -> Vec<&'static str> {
        self.specs
            .iter()
            .filter(|spec| spec.key.ends_with(suffix))
            .map(|spec| spec.key)
            .collect()
    }
}

/// A bound option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Flag(bool),
    Text(String),
    TextList(Vec<String>),
    Dir(PathBuf),
}

/// Typed option bag for one analysis run.
///
/// Keys are namespaced by analyzer name (`poetry.venv`, `npm.disable`).
/// Lookups are typed; asking for the wrong shape behaves like an absent key
/// so analyzers can rely on their registered defaults.
#[derive(Debug, Default)]
pub struct AnalysisSettings {
    root: PathBuf,
    values: HashMap<String, OptionValue>,
}

impl AnalysisSettings {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            values: HashMap::new(),
        }
    }

    /// The project directory this run scans.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), OptionValue::Flag(value));
    }

    pub fn set_text(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), OptionValue::Text(value));
    }

    pub fn set_list(&mut self, key: &str, value: Vec<String>) {
        self.values
            .insert(key.to_string(), OptionValue::TextList(value));
    }

    pub fn set_dir(&mut self, key: &str, value: PathBuf) {
        self.values.insert(key.to_string(), OptionValue::Dir(value));
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(OptionValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(OptionValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(OptionValue::TextList(value)) => Some(value),
            _ => None,
        }
    }

    pub fn dir(&self, key: &str) -> Option<&Path> {
        match self.values.get(key) {
            Some(OptionValue::Dir(value)) => Some(value),
            _ => None,
        }
    }
}
