use super::ComponentVersion;
use semver::VersionReq;
use std::fmt;

/// Surface syntax a constraint was written in, selected per analyzer.
///
/// The matcher itself is ecosystem-agnostic; syntax only affects how a raw
/// constraint is normalized before structured parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSyntax {
    /// Native semver ranges (npm): `^1.2`, `~1.2.3`, `>=1.0 <2.0`, `1.2.x`
    Semver,
    /// Poetry / PEP 440 constraints: `^1.2`, `>=1.0,<2.0`, `~=1.4.2`, `==1.0`
    Python,
    /// NuGet interval notation: `[1.0.0, )`, `[1.0]`, `(1.0, 2.0]`, bare minimum
    Nuget,
}

/// A dependency constraint, structured when the text parses as a range and
/// literal otherwise.
///
/// Literal ranges are not an error: they flow into exact-text matching and
/// the fallback tier instead of ordered satisfaction checks.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionRange {
    /// Parsed range able to test semantic versions for satisfaction.
    Structured { raw: String, req: VersionReq },
    /// Raw constraint text kept verbatim after structured parsing failed.
    Literal(String),
}

impl VersionRange {
    /// Parses a constraint in the given surface syntax.
    ///
    /// Parse failure always degrades to `Literal`, never to an error: lock
    /// files contain constraint dialects no single grammar covers.
    pub fn parse(raw: &str, syntax: RangeSyntax) -> Self {
        let trimmed = raw.trim();
        let normalized = match syntax {
            RangeSyntax::Semver => normalize_semver(trimmed),
            RangeSyntax::Python => normalize_python(trimmed),
            RangeSyntax::Nuget => normalize_nuget(trimmed),
        };
        if let Some(candidate) = normalized {
            if let Ok(req) = VersionReq::parse(&candidate) {
                return VersionRange::Structured {
                    raw: trimmed.to_string(),
                    req,
                };
            }
        }
        VersionRange::Literal(trimmed.to_string())
    }

    /// A structured wildcard range matching every semantic version.
    pub fn any() -> Self {
        VersionRange::Structured {
            raw: "*".to_string(),
            req: VersionReq::STAR,
        }
    }

    /// The constraint text as written, for diagnostics.
    pub fn as_str(&self) -> &str {
        match self {
            VersionRange::Structured { raw, .. } => raw,
            VersionRange::Literal(text) => text,
        }
    }

    /// Whether `version` satisfies this range.
    ///
    /// A structured range only ever admits semantic versions and a literal
    /// only ever admits exact (case-sensitive) text matches; the variants
    /// never cross-compare.
    pub fn admits(&self, version: &ComponentVersion) -> bool {
        match (self, version) {
            (VersionRange::Structured { req, .. }, ComponentVersion::Semantic { parsed, .. }) => {
                req.matches(parsed)
            }
            (VersionRange::Literal(text), ComponentVersion::Text(candidate)) => text == candidate,
            _ => false,
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// npm ranges are mostly native semver. Unions (`||`) and hyphen ranges have
/// no single-requirement equivalent and stay literal; space-separated
/// comparator lists (`>=1.0.0 <2.0.0`) are rejoined with commas.
fn normalize_semver(raw: &str) -> Option<String> {
    if raw.is_empty() || raw.contains("||") {
        return None;
    }
    if VersionReq::parse(raw).is_ok() {
        return Some(raw.to_string());
    }
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() > 1 && tokens.iter().all(|t| looks_like_comparator(t)) {
        return Some(tokens.join(", "));
    }
    None
}

fn looks_like_comparator(token: &str) -> bool {
    token
        .chars()
        .next()
        .map(|c| c.is_ascii_digit() || matches!(c, '^' | '~' | '>' | '<' | '=' | '*'))
        .unwrap_or(false)
}

/// Poetry constraints are close to semver; the differences are PEP 440
/// spellings. `==` becomes `=`, and `~=` maps onto `^`/`~` depending on how
/// many segments the version carries (`~=1.4` pins the major, `~=1.4.2` pins
/// major.minor).
fn normalize_python(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let mut comparators = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some(rest) = part.strip_prefix("~=") {
            let rest = rest.trim();
            let segments = rest.split('.').count();
            if segments >= 3 {
                comparators.push(format!("~{}", rest));
            } else {
                comparators.push(format!("^{}", rest));
            }
        } else if part.starts_with("===") {
            // Arbitrary equality has no ordered meaning
            return None;
        } else if let Some(rest) = part.strip_prefix("==") {
            comparators.push(format!("={}", rest.trim()));
        } else {
            comparators.push(part.to_string());
        }
    }
    if comparators.is_empty() {
        return None;
    }
    Some(comparators.join(", "))
}

/// NuGet interval notation mapped to comparator lists. A bare version is a
/// minimum bound per NuGet convention, not an exact pin.
fn normalize_nuget(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let open = raw.starts_with('[') || raw.starts_with('(');
    let close = raw.ends_with(']') || raw.ends_with(')');
    if open != close {
        return None;
    }
    if !open {
        if raw == "*" {
            return Some(raw.to_string());
        }
        // Bare version: minimum-version semantics
        if raw.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            return Some(format!(">={}", raw));
        }
        return None;
    }

    let inclusive_lower = raw.starts_with('[');
    let inclusive_upper = raw.ends_with(']');
    let inner = &raw[1..raw.len() - 1];
    let bounds: Vec<&str> = inner.split(',').map(str::trim).collect();
    match bounds.as_slice() {
        // [1.2.3] pins exactly
        [only] if !only.is_empty() => {
            if inclusive_lower && inclusive_upper {
                Some(format!("={}", only))
            } else {
                None
            }
        }
        [lower, upper] => {
            let mut comparators = Vec::new();
            if !lower.is_empty() {
                let op = if inclusive_lower { ">=" } else { ">" };
                comparators.push(format!("{}{}", op, lower));
            }
            if !upper.is_empty() {
                let op = if inclusive_upper { "<=" } else { "<" };
                comparators.push(format!("{}{}", op, upper));
            }
            if comparators.is_empty() {
                None
            } else {
                Some(comparators.join(", "))
            }
        }
        _ => None,
    }
}
