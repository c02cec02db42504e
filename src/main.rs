mod cli;

use cli::Args;
use polybom::adapters::outbound::console::{DiagnosticsRenderer, StderrProgressReporter, Verbosity};
use polybom::adapters::outbound::network::{CachingLicenseRegistry, RegistryLicenseClient};
use polybom::application::dto::{OutputFormat, ScanRequest};
use polybom::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use polybom::application::use_cases::RunScanUseCase;
use polybom::config::{self, ConfigFile};
use polybom::ports::inbound::ScanPort;
use polybom::scanning::domain::Ecosystem;
use polybom::scanning::{self, AnalysisSettings, OptionRegistry};
use polybom::shared::error::{ExitCode, ScanError};
use polybom::shared::Result;
use std::path::Path;
use std::process;
use std::str::FromStr;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run() -> Result<ExitCode> {
    // Parse command-line arguments (clap itself exits with
    // ExitCode::InvalidArguments on a bad invocation)
    let args = Args::parse_args();

    validate_project_path(&args.path)?;

    // Layer config file values underneath the command line
    let config = config::discover_config(&args.path)?.unwrap_or_default();
    let format = resolve_format(&args, &config)?;
    let online = args.online || config.online.unwrap_or(false);
    let output_path = args.output.clone().or_else(|| config.output.clone());

    // Create adapters (Dependency Injection)
    let license_registry = if online {
        Some(CachingLicenseRegistry::new(RegistryLicenseClient::new()?))
    } else {
        None
    };
    let progress_reporter = if args.quiet {
        StderrProgressReporter::quiet()
    } else {
        StderrProgressReporter::new()
    };

    // Create use case with injected dependencies
    let mut use_case = RunScanUseCase::new(
        scanning::analyzers::default_set(),
        license_registry,
        progress_reporter,
    );

    // Analyzers register their option keys before settings are bound
    let mut option_registry = OptionRegistry::new();
    use_case.register_options(&mut option_registry);
    let settings = bind_settings(&args, &config, &option_registry);

    // Execute scan through the inbound port
    let response = use_case
        .execute_scan(ScanRequest::new(settings, online))
        .await?;

    // Report diagnostics before the document so they land on stderr first
    let renderer = DiagnosticsRenderer::new(Verbosity::from_flags(args.quiet, args.verbose));
    renderer.render(&response.read_model.diagnostics);

    if !args.quiet {
        eprintln!("{}", FormatterFactory::progress_message(format));
    }

    // Format and present output
    let formatter = FormatterFactory::create(format);
    let document = formatter.format(&response.read_model)?;

    let presenter = PresenterFactory::create(match output_path {
        Some(path) => PresenterType::File(path),
        None => PresenterType::Stdout,
    });
    presenter.present(&document)?;

    Ok(if response.has_errors() {
        ExitCode::AnalysisErrors
    } else {
        ExitCode::Success
    })
}

/// Resolves the output format: command line wins over the config file,
/// falling back to CycloneDX JSON.
fn resolve_format(args: &Args, config: &ConfigFile) -> Result<OutputFormat> {
    if let Some(format) = args.format {
        return Ok(format);
    }
    match config.format.as_deref() {
        Some(raw) => OutputFormat::from_str(raw).map_err(anyhow::Error::msg),
        None => Ok(OutputFormat::Json),
    }
}

/// Binds command-line and config values onto the option keys the analyzers
/// registered, producing the settings for this run.
fn bind_settings(args: &Args, config: &ConfigFile, registry: &OptionRegistry) -> AnalysisSettings {
    let mut settings = AnalysisSettings::new(args.path.clone());

    for ecosystem in disabled_analyzers(args, config) {
        settings.set_flag(&format!("{}.disable", ecosystem.as_str()), true);
    }

    // The command line replaces the config list entirely rather than merging
    let exclude_groups = if args.exclude_groups.is_empty() {
        config.exclude_groups.clone().unwrap_or_default()
    } else {
        args.exclude_groups.clone()
    };
    if !exclude_groups.is_empty() {
        for key in registry.keys_with_suffix(".exclude-groups") {
            settings.set_list(key, exclude_groups.clone());
        }
    }

    let venv = args.venv.clone().or_else(|| {
        config
            .analyzers
            .as_ref()
            .and_then(|analyzers| analyzers.poetry.as_ref())
            .and_then(|poetry| poetry.venv.clone())
    });
    if let Some(venv) = venv {
        settings.set_dir("poetry.venv", venv);
    }

    settings
}

/// Collects every analyzer disabled on the command line or toggled off in
/// the config file.
fn disabled_analyzers(args: &Args, config: &ConfigFile) -> Vec<Ecosystem> {
    let mut disabled = args.disabled_analyzers.clone();

    if let Some(analyzers) = config.analyzers.as_ref() {
        let toggles = [
            (
                Ecosystem::Poetry,
                analyzers.poetry.as_ref().and_then(|poetry| poetry.enabled),
            ),
            (
                Ecosystem::Npm,
                analyzers.npm.as_ref().and_then(|toggle| toggle.enabled),
            ),
            (
                Ecosystem::Nuget,
                analyzers.nuget.as_ref().and_then(|toggle| toggle.enabled),
            ),
        ];
        for (ecosystem, enabled) in toggles {
            if enabled == Some(false) && !disabled.contains(&ecosystem) {
                disabled.push(ecosystem);
            }
        }
    }

    disabled
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| ScanError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(ScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(ScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    // Security check: Canonicalize path to prevent path traversal
    let canonical_path = path
        .canonicalize()
        .map_err(|e| ScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: format!("Failed to canonicalize path: {}", e),
        })?;

    if !canonical_path.is_dir() {
        return Err(ScanError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Resolved path is not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}
