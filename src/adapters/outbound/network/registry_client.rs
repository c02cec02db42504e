use crate::ports::outbound::{LicenseRegistry, RegistryLicense};
use crate::scanning::domain::Ecosystem;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct PyPiPackageInfo {
    info: PyPiInfo,
}

#[derive(Debug, Deserialize)]
struct PyPiInfo {
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    license_expression: Option<String>,
    #[serde(default)]
    classifiers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NpmVersionInfo {
    #[serde(default)]
    license: Option<NpmLicenseField>,
}

/// The npm registry serves the license either as a bare SPDX string or, for
/// packages published by old clients, as an object with a `type` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmLicenseField {
    Spdx(String),
    Legacy {
        #[serde(rename = "type")]
        license_type: String,
    },
}

impl NpmLicenseField {
    fn into_string(self) -> String {
        match self {
            NpmLicenseField::Spdx(value) => value,
            NpmLicenseField::Legacy { license_type } => license_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Nuspec {
    metadata: NuspecMetadata,
}

#[derive(Debug, Deserialize)]
struct NuspecMetadata {
    #[serde(default)]
    license: Option<NuspecLicense>,
    #[serde(default, rename = "licenseUrl")]
    license_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NuspecLicense {
    #[serde(default, rename = "@type")]
    license_type: Option<String>,
    #[serde(default, rename = "$text")]
    value: String,
}

/// RegistryLicenseClient adapter for fetching license metadata from the
/// public package registries
///
/// This adapter implements the LicenseRegistry port, dispatching each lookup
/// to the registry of the component's ecosystem: the PyPI JSON API, the npm
/// registry, or the NuGet flat-container nuspec endpoint.
///
/// # Async Support
/// Uses an async reqwest client for non-blocking HTTP requests, enabling
/// parallel license fetching for improved performance.
pub struct RegistryLicenseClient {
    client: reqwest::Client,
    max_retries: u32,
}

impl RegistryLicenseClient {
    /// Creates a new registry client with default configuration
    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("polybom/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            max_retries: 3,
        })
    }

    /// Fetches registry metadata with retry logic (async)
    async fn fetch_with_retry(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<RegistryLicense> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.fetch_once(ecosystem, name, version).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        // Retry after a short wait (async)
                        tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Registry fetch failed")))
    }

    async fn fetch_once(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<RegistryLicense> {
        Self::validate_url_component(name, "Package name")?;
        Self::validate_url_component(version, "Version")?;

        match ecosystem {
            Ecosystem::Poetry => self.fetch_from_pypi(name, version).await,
            Ecosystem::Npm => self.fetch_from_npm(name, version).await,
            Ecosystem::Nuget => self.fetch_from_nuget(name, version).await,
        }
    }

    /// Validates package name and version for URL safety
    ///
    /// Slashes stay allowed because scoped npm names contain one; every
    /// component is percent-encoded before it reaches a URL anyway.
    fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
        // Security: Prevent URL injection attacks
        if component.contains("..") {
            anyhow::bail!(
                "Security: {} contains '..' which is not allowed",
                component_type
            );
        }

        if component.contains('\\') {
            anyhow::bail!(
                "Security: {} contains backslashes which are not allowed",
                component_type
            );
        }

        if component.contains('#') || component.contains('?') {
            anyhow::bail!(
                "Security: {} contains URL-unsafe characters",
                component_type
            );
        }

        Ok(())
    }

    /// Fetches package metadata from the PyPI JSON API (async)
    async fn fetch_from_pypi(&self, name: &str, version: &str) -> Result<RegistryLicense> {
        let url = format!(
            "https://pypi.org/pypi/{}/{}/json",
            urlencoding::encode(name),
            urlencoding::encode(version)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("PyPI API returned status code {}", response.status());
        }

        let package_info: PyPiPackageInfo = response.json().await?;
        Ok((
            package_info.info.license,
            package_info.info.license_expression,
            package_info.info.classifiers,
        ))
    }

    /// Fetches package metadata from the npm registry (async)
    ///
    /// Scoped names are encoded whole, so `@scope/name` becomes
    /// `%40scope%2Fname` in the request path.
    async fn fetch_from_npm(&self, name: &str, version: &str) -> Result<RegistryLicense> {
        let url = format!(
            "https://registry.npmjs.org/{}/{}",
            urlencoding::encode(name),
            urlencoding::encode(version)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("npm registry returned status code {}", response.status());
        }

        let version_info: NpmVersionInfo = response.json().await?;
        // npm has a single license field; compound values like
        // "(MIT OR Apache-2.0)" are classified downstream.
        let license = version_info.license.map(NpmLicenseField::into_string);
        Ok((license, None, Vec::new()))
    }

    /// Fetches the nuspec manifest from the NuGet flat-container (async)
    async fn fetch_from_nuget(&self, name: &str, version: &str) -> Result<RegistryLicense> {
        let url = Self::nuget_nuspec_url(name, version);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("NuGet API returned status code {}", response.status());
        }

        let body = response.text().await?;
        let nuspec: Nuspec = quick_xml::de::from_str(&body)?;
        Ok(Self::nuspec_license(nuspec.metadata))
    }

    /// Flat-container URLs require the lower-cased package id and version
    fn nuget_nuspec_url(name: &str, version: &str) -> String {
        let id = name.to_lowercase();
        let version = version.to_lowercase();
        format!(
            "https://api.nuget.org/v3-flatcontainer/{}/{}/{}.nuspec",
            urlencoding::encode(&id),
            urlencoding::encode(&version),
            urlencoding::encode(&id)
        )
    }

    /// Maps nuspec license metadata onto the registry tuple
    ///
    /// A `type="expression"` license carries an SPDX expression; a
    /// `type="file"` license points inside the package and is useless
    /// remotely. Old packages may only have the deprecated `licenseUrl`,
    /// which the downstream classifier turns into a URL record.
    fn nuspec_license(metadata: NuspecMetadata) -> RegistryLicense {
        if let Some(license) = metadata.license {
            if license.license_type.as_deref() == Some("expression") && !license.value.is_empty() {
                return (None, Some(license.value), Vec::new());
            }
        }
        (metadata.license_url, None, Vec::new())
    }
}

// Note: no Default implementation. Default::default() would have to panic if
// client creation fails; callers use RegistryLicenseClient::new() and handle
// the Result.

#[async_trait]
impl LicenseRegistry for RegistryLicenseClient {
    async fn fetch_license(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<RegistryLicense> {
        self.fetch_with_retry(ecosystem, name, version).await
    }
}
