pub mod component;
pub mod component_graph;
pub mod content_hash;
pub mod diagnostics;
pub mod license_record;
pub mod spdx;
pub mod version;
pub mod version_range;

pub use component::{Component, ComponentKind, ComponentName, Ecosystem};
pub use component_graph::ComponentGraph;
pub use content_hash::{ContentHash, HashAlgorithm};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use license_record::LicenseRecord;
pub use version::ComponentVersion;
pub use version_range::{RangeSyntax, VersionRange};
