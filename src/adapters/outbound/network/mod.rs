/// Network adapters for registry license lookups
mod caching_registry;
mod registry_client;

pub use caching_registry::CachingLicenseRegistry;
pub use registry_client::RegistryLicenseClient;
