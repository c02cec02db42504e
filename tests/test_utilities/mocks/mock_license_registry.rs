use async_trait::async_trait;
use polybom::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock LicenseRegistry for testing
///
/// Clones share the call counter, so a kept clone can assert on lookups
/// made after the original moved into the use case.
#[derive(Clone)]
pub struct MockLicenseRegistry {
    pub licenses: HashMap<String, RegistryLicense>,
    pub should_fail: bool,
    call_count: Arc<AtomicUsize>,
}

impl MockLicenseRegistry {
    pub fn new() -> Self {
        Self {
            licenses: HashMap::new(),
            should_fail: false,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_expression(
        mut self,
        ecosystem: Ecosystem,
        package: &str,
        version: &str,
        expression: &str,
    ) -> Self {
        self.licenses.insert(
            Self::key(ecosystem, package, version),
            (None, Some(expression.to_string()), vec![]),
        );
        self
    }

    pub fn with_license_field(
        mut self,
        ecosystem: Ecosystem,
        package: &str,
        version: &str,
        field: &str,
    ) -> Self {
        self.licenses.insert(
            Self::key(ecosystem, package, version),
            (Some(field.to_string()), None, vec![]),
        );
        self
    }

    pub fn with_failure() -> Self {
        Self {
            licenses: HashMap::new(),
            should_fail: true,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn key(ecosystem: Ecosystem, package: &str, version: &str) -> String {
        format!("{}:{}@{}", ecosystem.as_str(), package, version)
    }
}

impl Default for MockLicenseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LicenseRegistry for MockLicenseRegistry {
    async fn fetch_license(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<RegistryLicense> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            anyhow::bail!("Mock registry failure");
        }

        Ok(self
            .licenses
            .get(&Self::key(ecosystem, name, version))
            .cloned()
            .unwrap_or((None, None, vec![])))
    }
}
