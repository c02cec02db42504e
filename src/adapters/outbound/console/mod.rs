/// Console adapters for progress and diagnostics output
mod diagnostics_renderer;
mod progress_reporter;

pub use diagnostics_renderer::{DiagnosticsRenderer, Verbosity};
pub use progress_reporter::StderrProgressReporter;
