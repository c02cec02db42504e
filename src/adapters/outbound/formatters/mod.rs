/// Formatter adapters for the supported BoM output formats
mod cyclonedx_formatter;
mod markdown_formatter;

pub use cyclonedx_formatter::CycloneDxFormatter;
pub use markdown_formatter::MarkdownFormatter;
