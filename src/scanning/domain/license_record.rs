use super::spdx;
use std::fmt;

/// Normalized license information attached to a component.
///
/// Raw license text from package metadata is classified exactly once, at
/// record construction; everything downstream (BoM emission, reports)
/// branches on the variant instead of re-parsing strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseRecord {
    /// A recognized SPDX identifier with its canonical casing and full name.
    Known { id: String, name: String },
    /// A syntactically valid SPDX expression that is not a single identifier.
    Expression(String),
    /// License terms referenced by URL only.
    Url(String),
    /// Non-empty text that could not be classified.
    Unknown { raw: String },
    /// No license information was found at all.
    Absent,
}

impl LicenseRecord {
    /// Classifies raw license text per the normalization rules.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return LicenseRecord::Absent;
        }
        if let Some(id) = spdx::canonical_id(trimmed) {
            return LicenseRecord::Known {
                id: id.to_string(),
                name: spdx::full_name(id).unwrap_or(id).to_string(),
            };
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return LicenseRecord::Url(trimmed.to_string());
        }
        if spdx::is_valid_expression(trimmed) {
            return LicenseRecord::Expression(trimmed.to_string());
        }
        LicenseRecord::Unknown {
            raw: trimmed.to_string(),
        }
    }

    /// Classifies optional license text; `None` and empty text both yield
    /// `Absent`.
    pub fn from_optional(raw: Option<&str>) -> Self {
        match raw {
            Some(text) => LicenseRecord::from_raw(text),
            None => LicenseRecord::Absent,
        }
    }

    /// Identifier field of the record.
    ///
    /// Unknown text is carried as its own id with name `"Unknown"`, and a
    /// fully absent license reports the sentinel id `"None"`.
    pub fn id(&self) -> Option<&str> {
        match self {
            LicenseRecord::Known { id, .. } => Some(id),
            LicenseRecord::Unknown { raw } => Some(raw),
            LicenseRecord::Absent => Some("None"),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            LicenseRecord::Known { name, .. } => Some(name),
            LicenseRecord::Unknown { .. } => Some("Unknown"),
            _ => None,
        }
    }

    pub fn expression(&self) -> Option<&str> {
        match self {
            LicenseRecord::Known { id, .. } => Some(id),
            LicenseRecord::Expression(expression) => Some(expression),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            LicenseRecord::Url(url) => Some(url),
            _ => None,
        }
    }

    /// Whether this record carries any usable license information.
    ///
    /// Used to decide which components are worth an online enrichment lookup.
    pub fn is_resolved(&self) -> bool {
        !matches!(
            self,
            LicenseRecord::Absent | LicenseRecord::Unknown { .. }
        )
    }
}

impl fmt::Display for LicenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseRecord::Known { id, .. } => write!(f, "{}", id),
            LicenseRecord::Expression(expression) => write!(f, "{}", expression),
            LicenseRecord::Url(url) => write!(f, "{}", url),
            LicenseRecord::Unknown { raw } => write!(f, "{}", raw),
            LicenseRecord::Absent => write!(f, "None"),
        }
    }
}
