use crate::scanning::domain::spdx;

/// LicenseSourcePriority policy for selecting among license sources
///
/// Package metadata usually carries license information in several places at
/// once. This policy encodes the precedence when more than one is available:
///
/// 1. structured expression metadata (`License-Expression:` header)
/// 2. free-text license field (if non-empty and not "UNKNOWN")
/// 3. trove classifier lines
/// 4. the heading line of a shipped license-text file, when it names a
///    recognizable license
pub struct LicenseSourcePriority;

impl LicenseSourcePriority {
    /// Selects the most authoritative raw license text.
    ///
    /// The winner is raw text, not a normalized record; classification
    /// happens exactly once, downstream, wherever the record is attached.
    ///
    /// # Arguments
    /// * `expression` - Structured license expression metadata
    /// * `license_field` - Free-text license field
    /// * `classifiers` - Trove classifier strings
    /// * `license_file_heading` - First non-empty line of a shipped license file
    pub fn select(
        expression: Option<String>,
        license_field: Option<String>,
        classifiers: &[String],
        license_file_heading: Option<String>,
    ) -> Option<String> {
        expression
            .filter(|text| !text.trim().is_empty())
            .or_else(|| {
                license_field.filter(|text| {
                    let trimmed = text.trim();
                    !trimmed.is_empty() && trimmed != "UNKNOWN"
                })
            })
            .or_else(|| Self::from_classifiers(classifiers))
            .or_else(|| Self::from_file_heading(license_file_heading))
    }

    /// Extracts a license name from trove classifier strings.
    ///
    /// Both `License :: OSI Approved :: X` and the shorter `License :: X`
    /// shapes occur in real metadata; the first match wins.
    fn from_classifiers(classifiers: &[String]) -> Option<String> {
        for classifier in classifiers {
            if let Some(license) = classifier.strip_prefix("License :: OSI Approved :: ") {
                return Some(license.to_string());
            }
        }
        for classifier in classifiers {
            if let Some(license) = classifier.strip_prefix("License :: ") {
                return Some(license.to_string());
            }
        }
        None
    }

    /// A license file only contributes when its heading line names a license
    /// the identifier table recognizes; arbitrary prose contributes nothing.
    fn from_file_heading(heading: Option<String>) -> Option<String> {
        heading.filter(|line| spdx::canonical_id(line).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_wins_over_everything() {
        let result = LicenseSourcePriority::select(
            Some("MIT OR Apache-2.0".to_string()),
            Some("BSD".to_string()),
            &["License :: OSI Approved :: ISC License (ISCL)".to_string()],
            Some("MIT License".to_string()),
        );
        assert_eq!(result, Some("MIT OR Apache-2.0".to_string()));
    }

    #[test]
    fn test_license_field_beats_classifiers() {
        let result = LicenseSourcePriority::select(
            None,
            Some("Apache 2.0".to_string()),
            &["License :: OSI Approved :: MIT License".to_string()],
            None,
        );
        assert_eq!(result, Some("Apache 2.0".to_string()));
    }

    #[test]
    fn test_unknown_license_field_is_skipped() {
        let result = LicenseSourcePriority::select(
            None,
            Some("UNKNOWN".to_string()),
            &["License :: OSI Approved :: MIT License".to_string()],
            None,
        );
        assert_eq!(result, Some("MIT License".to_string()));
    }

    #[test]
    fn test_empty_license_field_is_skipped() {
        let result = LicenseSourcePriority::select(
            None,
            Some("  ".to_string()),
            &["License :: OSI Approved :: BSD License".to_string()],
            None,
        );
        assert_eq!(result, Some("BSD License".to_string()));
    }

    #[test]
    fn test_osi_classifier_preferred_over_plain_license_classifier() {
        let result = LicenseSourcePriority::select(
            None,
            None,
            &[
                "License :: Public Domain".to_string(),
                "License :: OSI Approved :: MIT License".to_string(),
            ],
            None,
        );
        assert_eq!(result, Some("MIT License".to_string()));
    }

    #[test]
    fn test_plain_license_classifier_as_fallback() {
        let result = LicenseSourcePriority::select(
            None,
            None,
            &[
                "Programming Language :: Python :: 3".to_string(),
                "License :: Public Domain".to_string(),
            ],
            None,
        );
        assert_eq!(result, Some("Public Domain".to_string()));
    }

    #[test]
    fn test_recognized_file_heading_is_last_resort() {
        let result = LicenseSourcePriority::select(
            None,
            None,
            &["Programming Language :: Python :: 3".to_string()],
            Some("The MIT License".to_string()),
        );
        assert_eq!(result, Some("The MIT License".to_string()));
    }

    #[test]
    fn test_unrecognized_file_heading_contributes_nothing() {
        let result = LicenseSourcePriority::select(
            None,
            None,
            &[],
            Some("Copyright (c) 2023 Some Author".to_string()),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn test_no_sources_yields_none() {
        let result = LicenseSourcePriority::select(None, None, &[], None);
        assert_eq!(result, None);
    }
}
