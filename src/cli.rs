use clap::Parser;
use std::path::PathBuf;

use polybom::application::dto::OutputFormat;
use polybom::scanning::domain::Ecosystem;

/// Scan dependency manifests into a unified Bill of Materials
#[derive(Parser, Debug)]
#[command(name = "polybom")]
#[command(version)]
#[command(
    about = "Scan Poetry, npm and NuGet manifests into a unified dependency BoM",
    long_about = None
)]
pub struct Args {
    /// Path to the project directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format: json or markdown (defaults to json)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exclude a dependency group from edge linking (repeatable):
    /// -e dev -e docs
    #[arg(short = 'e', long = "exclude-group", value_name = "GROUP")]
    pub exclude_groups: Vec<String>,

    /// Disable an ecosystem analyzer (repeatable): --disable npm
    #[arg(long = "disable", value_name = "ANALYZER")]
    pub disabled_analyzers: Vec<Ecosystem>,

    /// Python virtual environment to use for installed-package license lookups
    #[arg(long, value_name = "DIR")]
    pub venv: Option<PathBuf>,

    /// Fetch missing license data from the package registries
    #[arg(long)]
    pub online: bool,

    /// Suppress progress output; errors are still printed
    #[arg(short, long)]
    pub quiet: bool,

    /// Print every recorded diagnostic instead of a summary
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
