mod license_sources;

pub use license_sources::LicenseSourcePriority;
