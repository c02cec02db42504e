//! Compact SPDX identifier table.
//!
//! This deliberately covers the identifiers that actually show up in Python,
//! npm and NuGet package metadata rather than the full SPDX corpus. Anything
//! outside the table flows through the normalization contract as unknown
//! license text.

/// Canonical identifiers with their human-readable names.
const KNOWN_IDS: &[(&str, &str)] = &[
    ("MIT", "MIT License"),
    ("MIT-0", "MIT No Attribution"),
    ("Apache-2.0", "Apache License 2.0"),
    ("BSD-2-Clause", "BSD 2-Clause \"Simplified\" License"),
    ("BSD-3-Clause", "BSD 3-Clause \"New\" or \"Revised\" License"),
    ("BSD-4-Clause", "BSD 4-Clause \"Original\" or \"Old\" License"),
    ("0BSD", "BSD Zero Clause License"),
    ("ISC", "ISC License"),
    ("Unlicense", "The Unlicense"),
    ("Zlib", "zlib License"),
    ("WTFPL", "Do What The F*ck You Want To Public License"),
    ("CC0-1.0", "Creative Commons Zero v1.0 Universal"),
    ("CC-BY-3.0", "Creative Commons Attribution 3.0 Unported"),
    ("CC-BY-4.0", "Creative Commons Attribution 4.0 International"),
    ("CC-BY-SA-4.0", "Creative Commons Attribution Share Alike 4.0 International"),
    ("PSF-2.0", "Python Software Foundation License 2.0"),
    ("Python-2.0", "Python License 2.0"),
    ("Artistic-2.0", "Artistic License 2.0"),
    ("BlueOak-1.0.0", "Blue Oak Model License 1.0.0"),
    ("GPL-2.0-only", "GNU General Public License v2.0 only"),
    ("GPL-2.0-or-later", "GNU General Public License v2.0 or later"),
    ("GPL-3.0-only", "GNU General Public License v3.0 only"),
    ("GPL-3.0-or-later", "GNU General Public License v3.0 or later"),
    ("LGPL-2.1-only", "GNU Lesser General Public License v2.1 only"),
    ("LGPL-2.1-or-later", "GNU Lesser General Public License v2.1 or later"),
    ("LGPL-3.0-only", "GNU Lesser General Public License v3.0 only"),
    ("LGPL-3.0-or-later", "GNU Lesser General Public License v3.0 or later"),
    ("AGPL-3.0-only", "GNU Affero General Public License v3.0 only"),
    ("AGPL-3.0-or-later", "GNU Affero General Public License v3.0 or later"),
    ("GPL-2.0", "GNU General Public License v2.0"),
    ("GPL-3.0", "GNU General Public License v3.0"),
    ("LGPL-2.1", "GNU Lesser General Public License v2.1"),
    ("LGPL-3.0", "GNU Lesser General Public License v3.0"),
    ("AGPL-3.0", "GNU Affero General Public License v3.0"),
    ("MPL-2.0", "Mozilla Public License 2.0"),
    ("EPL-1.0", "Eclipse Public License 1.0"),
    ("EPL-2.0", "Eclipse Public License 2.0"),
    ("EUPL-1.2", "European Union Public License 1.2"),
    ("CDDL-1.0", "Common Development and Distribution License 1.0"),
    ("OSL-3.0", "Open Software License 3.0"),
    ("MS-PL", "Microsoft Public License"),
    ("MS-RL", "Microsoft Reciprocal License"),
];

/// Exception identifiers accepted after WITH in expressions.
const KNOWN_EXCEPTIONS: &[&str] = &[
    "Classpath-exception-2.0",
    "LLVM-exception",
    "GCC-exception-3.1",
];

/// Resolves raw text to a canonical SPDX identifier.
///
/// Matching is case-insensitive against the known-id table; common non-SPDX
/// spellings (`"Apache 2.0"`, `"BSD"`, `"GPLv3"`) go through the alias table
/// first. Returns the canonical casing.
pub fn canonical_id(raw: &str) -> Option<&'static str> {
    let candidate = apply_alias(raw.trim());
    KNOWN_IDS
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(candidate))
        .map(|(id, _)| *id)
}

/// Human-readable name for a canonical identifier.
pub fn full_name(id: &str) -> Option<&'static str> {
    KNOWN_IDS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
}

/// Maps common non-SPDX spellings to their SPDX equivalents.
fn apply_alias(raw: &str) -> &str {
    match raw {
        "Apache 2.0" | "Apache 2" | "Apache License 2.0" | "Apache License, Version 2.0"
        | "Apache Software License" => "Apache-2.0",
        "MIT License" | "The MIT License" | "The MIT License (MIT)" => "MIT",
        "BSD" | "BSD License" => "BSD-3-Clause",
        "BSD 2-Clause" | "BSD-2" | "Simplified BSD" => "BSD-2-Clause",
        "BSD 3-Clause" | "BSD-3" | "New BSD" | "New BSD License" | "Modified BSD" => {
            "BSD-3-Clause"
        }
        "GNU GPL v2" | "GNU General Public License v2" | "GPL v2" | "GPLv2" => "GPL-2.0",
        "GNU GPL v3" | "GNU General Public License v3" | "GPL v3" | "GPLv3"
        | "GNU General Public License v3 (GPLv3)" => "GPL-3.0",
        "GNU LGPL v2.1" | "LGPL v2.1" | "LGPLv2.1" => "LGPL-2.1",
        "GNU LGPL v3" | "LGPL v3" | "LGPLv3" => "LGPL-3.0",
        "AGPL v3" | "AGPLv3" | "GNU AGPL v3" => "AGPL-3.0",
        "Mozilla Public License 2.0" | "Mozilla Public License 2.0 (MPL 2.0)" | "MPL 2.0"
        | "MPLv2" => "MPL-2.0",
        "ISC License" | "ISC License (ISCL)" => "ISC",
        "CC0" | "Public Domain" => "CC0-1.0",
        "Python Software Foundation License" | "PSF" => "PSF-2.0",
        "zlib/libpng License" => "Zlib",
        other => other,
    }
}

/// Whether `text` is a syntactically valid SPDX license expression.
///
/// Accepted grammar: known identifiers (optionally `id WITH exception`,
/// optionally a trailing `+`) joined by `AND` / `OR`, with balanced
/// parentheses. A single bare identifier is not considered an expression by
/// callers; they check `canonical_id` first.
pub fn is_valid_expression(text: &str) -> bool {
    let spaced = text.replace('(', " ( ").replace(')', " ) ");
    let tokens: Vec<&str> = spaced.split_whitespace().collect();
    if tokens.is_empty() {
        return false;
    }

    let mut depth: i32 = 0;
    // After an operand we expect an operator or ')'; after an operator or '('
    // we expect an operand.
    let mut expect_operand = true;
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "(" => {
                if !expect_operand {
                    return false;
                }
                depth += 1;
            }
            ")" => {
                if expect_operand || depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            "AND" | "OR" => {
                if expect_operand {
                    return false;
                }
                expect_operand = true;
            }
            "WITH" => {
                // Must follow an operand and be followed by a known exception
                if expect_operand {
                    return false;
                }
                i += 1;
                match tokens.get(i) {
                    Some(exception) if KNOWN_EXCEPTIONS.contains(exception) => {}
                    _ => return false,
                }
            }
            id => {
                if !expect_operand {
                    return false;
                }
                let bare = id.strip_suffix('+').unwrap_or(id);
                if canonical_id(bare).is_none() {
                    return false;
                }
                expect_operand = false;
            }
        }
        i += 1;
    }
    depth == 0 && !expect_operand
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_id_exact() {
        assert_eq!(canonical_id("MIT"), Some("MIT"));
        assert_eq!(canonical_id("Apache-2.0"), Some("Apache-2.0"));
    }

    #[test]
    fn test_canonical_id_case_insensitive() {
        assert_eq!(canonical_id("mit"), Some("MIT"));
        assert_eq!(canonical_id("apache-2.0"), Some("Apache-2.0"));
    }

    #[test]
    fn test_canonical_id_aliases() {
        assert_eq!(canonical_id("Apache 2.0"), Some("Apache-2.0"));
        assert_eq!(canonical_id("BSD"), Some("BSD-3-Clause"));
        assert_eq!(canonical_id("The MIT License"), Some("MIT"));
        assert_eq!(canonical_id("GPLv3"), Some("GPL-3.0"));
    }

    #[test]
    fn test_canonical_id_unknown() {
        assert_eq!(canonical_id("My Custom License"), None);
        assert_eq!(canonical_id(""), None);
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("MIT"), Some("MIT License"));
        assert_eq!(full_name("nonsense"), None);
    }

    #[test]
    fn test_valid_expressions() {
        assert!(is_valid_expression("MIT OR Apache-2.0"));
        assert!(is_valid_expression("(MIT OR GPL-3.0-only) AND ISC"));
        assert!(is_valid_expression("GPL-2.0-only WITH Classpath-exception-2.0"));
        assert!(is_valid_expression("GPL-2.0+ OR MIT"));
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(!is_valid_expression("MIT OR"));
        assert!(!is_valid_expression("OR MIT"));
        assert!(!is_valid_expression("MIT SomethingElse Apache-2.0"));
        assert!(!is_valid_expression("(MIT OR Apache-2.0"));
        assert!(!is_valid_expression("MIT WITH UnknownException"));
        assert!(!is_valid_expression(""));
    }

    #[test]
    fn test_expression_with_unknown_id_is_invalid() {
        assert!(!is_valid_expression("MIT OR TotallyMadeUp-1.0"));
    }
}
