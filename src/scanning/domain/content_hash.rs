use sha2::{Digest, Sha256};
use std::fmt;

/// Digest algorithm of a content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
}

impl HashAlgorithm {
    /// Lowercase tag used in the rendered form.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    /// Algorithm name in CycloneDX spelling.
    pub fn cyclonedx_name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
        }
    }
}

/// An algorithm-tagged content hash, rendered as `sha256:<lowercase hex>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHash {
    algorithm: HashAlgorithm,
    value: String,
}

impl ContentHash {
    /// Wraps an already-computed digest, normalizing the hex to lowercase.
    pub fn sha256(value: String) -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            value: value.to_lowercase(),
        }
    }

    /// Derives a package content hash from the per-file hash strings a lock
    /// recorded for it, concatenated in lock order and digested with SHA-256.
    ///
    /// Ecosystems that record one aggregate hash per package (npm `integrity`,
    /// NuGet `contentHash`) contribute that single string. A package with no
    /// recorded hashes yields `None`.
    pub fn from_recorded_hashes(recorded: &[String]) -> Option<Self> {
        if recorded.is_empty() {
            return None;
        }
        let mut hasher = Sha256::new();
        for entry in recorded {
            hasher.update(entry.as_bytes());
        }
        Some(Self::sha256(hex::encode(hasher.finalize())))
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The lowercase hex digest without the algorithm tag.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.as_str(), self.value)
    }
}
