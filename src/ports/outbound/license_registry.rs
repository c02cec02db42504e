use crate::scanning::domain::{Ecosystem, LicenseRecord};
use crate::shared::Result;
use async_trait::async_trait;

/// Type alias for raw registry metadata: (license field, license expression, classifiers)
pub type RegistryLicense = (Option<String>, Option<String>, Vec<String>);

/// LicenseRegistry port for fetching license information
///
/// This port abstracts the ecosystem package registries (PyPI, the npm
/// registry, NuGet) used to fill in license information that local
/// metadata could not provide.
///
/// # Async Support
/// All methods are async for efficient parallel license fetching.
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait LicenseRegistry: Send + Sync {
    /// Fetches raw license metadata for a specific package version
    ///
    /// # Arguments
    /// * `ecosystem` - Ecosystem whose registry should be queried
    /// * `name` - Name of the package
    /// * `version` - Version of the package
    ///
    /// # Returns
    /// RegistryLicense tuple containing:
    /// - Optional free-text license field from the registry metadata
    /// - Optional structured license expression
    /// - List of classifier strings (empty for registries without them)
    ///
    /// # Errors
    /// Returns an error if:
    /// - The network request fails
    /// - The API returns an error status code
    /// - The response cannot be parsed
    async fn fetch_license(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<RegistryLicense>;

    /// Resolves a package's license to a normalized record
    ///
    /// This is a convenience method that fetches raw registry data and runs
    /// it through the same source-priority and normalization rules applied
    /// to local metadata.
    ///
    /// # Arguments
    /// * `ecosystem` - Ecosystem whose registry should be queried
    /// * `name` - Name of the package
    /// * `version` - Version of the package
    ///
    /// # Returns
    /// A normalized LicenseRecord selected from the fetched sources
    async fn resolve_license(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<LicenseRecord> {
        let (license_field, expression, classifiers) =
            self.fetch_license(ecosystem, name, version).await?;

        use crate::scanning::policies::LicenseSourcePriority;
        let selected = LicenseSourcePriority::select(expression, license_field, &classifiers, None);
        Ok(LicenseRecord::from_optional(selected.as_deref()))
    }
}
