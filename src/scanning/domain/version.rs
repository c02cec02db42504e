use semver::Version;
use std::fmt;

/// A component version, either ordered or opaque.
///
/// Ordered (semantic) versions sort against each other so range matching can
/// pick a deterministic lowest satisfying candidate. Opaque text versions
/// participate only in exact string equality. The two variants never compare
/// against each other; callers partition by variant before ordering anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentVersion {
    /// Ordered version. `raw` preserves the text exactly as the lock recorded
    /// it, which may differ from the parsed form (e.g. `"2.28"`).
    Semantic { raw: String, parsed: Version },
    /// Opaque text that did not parse as a semantic version.
    Text(String),
}

impl ComponentVersion {
    /// Parses a version string leniently.
    ///
    /// Strict semver is accepted as-is. One- or two-segment numeric versions
    /// (`"2"`, `"2.28"`) are zero-padded and re-parsed so common Python and
    /// npm shorthand stays ordered. Everything else (PEP 440 post/dev
    /// releases, date-based versions, arbitrary tags) becomes opaque text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(parsed) = Version::parse(trimmed) {
            return ComponentVersion::Semantic {
                raw: trimmed.to_string(),
                parsed,
            };
        }
        if let Some(padded) = zero_pad(trimmed) {
            if let Ok(parsed) = Version::parse(&padded) {
                return ComponentVersion::Semantic {
                    raw: trimmed.to_string(),
                    parsed,
                };
            }
        }
        ComponentVersion::Text(trimmed.to_string())
    }

    /// The version text exactly as recorded. Identity comparisons and BoM
    /// output use this, never the normalized parse.
    pub fn as_str(&self) -> &str {
        match self {
            ComponentVersion::Semantic { raw, .. } => raw,
            ComponentVersion::Text(text) => text,
        }
    }

    /// The parsed semantic version, if this is the ordered variant.
    pub fn semantic(&self) -> Option<&Version> {
        match self {
            ComponentVersion::Semantic { parsed, .. } => Some(parsed),
            ComponentVersion::Text(_) => None,
        }
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, ComponentVersion::Semantic { .. })
    }
}

impl fmt::Display for ComponentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pads `"2"` to `"2.0.0"` and `"2.28"` to `"2.28.0"`. Returns None for
/// anything that is not purely one or two numeric dot-separated segments.
fn zero_pad(text: &str) -> Option<String> {
    let segments: Vec<&str> = text.split('.').collect();
    if segments.is_empty() || segments.len() > 2 {
        return None;
    }
    let numeric = segments
        .iter()
        .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()));
    if !numeric {
        return None;
    }
    match segments.len() {
        1 => Some(format!("{}.0.0", text)),
        _ => Some(format!("{}.0", text)),
    }
}
