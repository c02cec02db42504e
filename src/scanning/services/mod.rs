mod version_resolver;

pub use version_resolver::{VersionResolution, VersionResolver};
