use crate::ports::outbound::{LicenseRegistry, RegistryLicense};
use crate::scanning::domain::Ecosystem;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Cache key for license information
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    ecosystem: Ecosystem,
    name: String,
    version: String,
}

impl CacheKey {
    fn new(ecosystem: Ecosystem, name: &str, version: &str) -> Self {
        Self {
            ecosystem,
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

/// CachingLicenseRegistry wraps a LicenseRegistry and adds in-memory caching.
///
/// This adapter implements the decorator pattern to add caching capability
/// to any LicenseRegistry implementation. The cache is thread-safe and
/// suitable for concurrent access. Failed lookups are not cached, so a
/// transient network error does not poison later attempts.
pub struct CachingLicenseRegistry<R: LicenseRegistry> {
    inner: R,
    cache: Arc<DashMap<CacheKey, RegistryLicense>>,
}

impl<R: LicenseRegistry> CachingLicenseRegistry<R> {
    /// Creates a new caching registry wrapping the given inner registry
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: LicenseRegistry> LicenseRegistry for CachingLicenseRegistry<R> {
    async fn fetch_license(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<RegistryLicense> {
        let key = CacheKey::new(ecosystem, name, version);

        // Check cache first
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        // Cache miss: fetch from the inner registry
        let metadata = self.inner.fetch_license(ecosystem, name, version).await?;

        // Store in cache
        self.cache.insert(key, metadata.clone());

        Ok(metadata)
    }
}
