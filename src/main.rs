mod adapters;
mod application;
mod cli;
mod config;
mod ports;
mod sbom_generation;
mod shared;

use adapters::outbound::console::StderrProgressReporter;
use adapters::outbound::filesystem::FileSystemReader;
use adapters::outbound::formatters::CycloneDxFormatter;
use adapters::outbound::metadata::DescriptorRepository;
use application::dto::{SbomOptions, SbomRequest};
use application::factories::{PresenterFactory, PresenterType};
use application::use_cases::GenerateSbomUseCase;
use cli::Args;
use config::ConfigFile;
use ports::outbound::SbomFormatter;
use sbom_generation::services::BuildEnvironment;
use shared::error::{ExitCode, SbomError};
use shared::Result;
use std::path::{Path, PathBuf};
use std::process::{self, Command, Stdio};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SOURCE_DATE_EPOCH_VAR: &str = "SOURCE_DATE_EPOCH";
const GIT_URL_VAR: &str = "GIT_URL";

fn main() {
    // Invalid arguments exit with code 2 inside clap
    let args = Args::parse_args();
    init_logging(args.verbose);

    match run(args) {
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

/// Diagnostics go to stderr so stdout stays a clean BOM
fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    validate_input_path(&args.input)?;

    let config = load_config(&args)?;
    let mut options = build_options(
        &args,
        config.as_ref(),
        std::env::var(SOURCE_DATE_EPOCH_VAR).ok(),
    )?;
    options.build_environment = capture_build_environment(&config_dir(&args.input));

    let presenter_type = presenter_type(&args);
    if !options.aggregate && !presenter_type.accepts_multiple_documents() {
        return Err(SbomError::Validation {
            message: "Per-module output writes one BOM per module and requires --output-dir"
                .to_string(),
        }
        .into());
    }

    // Create adapters (Dependency Injection)
    let resolution_reader = FileSystemReader::new();
    let metadata_repository = override_repository(config.as_ref())?;
    let progress_reporter = StderrProgressReporter::new();

    let use_case =
        GenerateSbomUseCase::new(resolution_reader, metadata_repository, progress_reporter);
    let response = use_case.execute(SbomRequest::new(args.input.clone(), options))?;

    eprintln!("📝 Generating CycloneDX JSON format output...");
    let formatter = CycloneDxFormatter::new();
    let names: Vec<&str> = response.documents.iter().map(|d| d.name.as_str()).collect();
    let presenters = PresenterFactory::create_all(&presenter_type, &names);
    for (document, presenter) in response.documents.iter().zip(&presenters) {
        let formatted_output = formatter.format(&document.model)?;
        presenter.present(&formatted_output)?;
    }

    if response.summary.has_failures() {
        for failure in &response.summary.failed {
            eprintln!("   ❌ {}: {}", failure.module, failure.reason);
        }
        return Ok(ExitCode::ModulesFailed);
    }
    Ok(ExitCode::Success)
}

/// Explicit `--config` or `resolved-sbom.config.yml` next to the input
fn load_config(args: &Args) -> Result<Option<ConfigFile>> {
    if let Some(path) = &args.config {
        return config::load_config_from_path(path).map(Some);
    }
    config::discover_config(&config_dir(&args.input))
}

fn config_dir(input: &Path) -> PathBuf {
    if input.is_dir() {
        return input.to_path_buf();
    }
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Defaults, then the config file, then `SOURCE_DATE_EPOCH`, then flags
fn build_options(
    args: &Args,
    config: Option<&ConfigFile>,
    source_date_epoch: Option<String>,
) -> Result<SbomOptions> {
    let mut options = SbomOptions::default();
    if let Some(config) = config {
        config.apply_to(&mut options)?;
    }

    if let Some(raw) = source_date_epoch {
        let epoch = raw.trim().parse::<i64>().map_err(|_| SbomError::Validation {
            message: format!(
                "{} must be a Unix timestamp in seconds (got '{}')",
                SOURCE_DATE_EPOCH_VAR, raw
            ),
        })?;
        options.source_date_epoch = Some(epoch);
    }

    replace_if_given(&mut options.include_scopes, &args.include_scopes);
    replace_if_given(&mut options.skip_scopes, &args.skip_scopes);
    replace_if_given(&mut options.include_modules, &args.include_modules);
    replace_if_given(&mut options.skip_modules, &args.skip_modules);
    replace_if_given(&mut options.exclude_artifacts, &args.exclude);

    if args.per_module {
        options.aggregate = false;
    }
    if args.no_serial_number {
        options.include_serial_number = false;
    }
    if let Some(order) = args.order {
        options.component_order = order;
    }
    if let Some(policy) = args.unresolved_edges {
        options.unresolved_edges = policy;
    }
    if let Some(component) = &args.component {
        options.metadata_component = Some(component.clone());
    }
    if let Some(project_type) = args.project_type {
        options.project_type = project_type;
    }
    if args.include_license_text {
        options.include_license_text = true;
    }
    if args.no_metadata_resolution {
        options.include_metadata_resolution = false;
    }
    if args.no_build_system {
        options.include_build_system = false;
    }
    if let Some(variable) = &args.build_system_variable {
        options.build_system_environment_variable = Some(variable.clone());
    }

    Ok(options)
}

/// Process environment plus the `origin` remote when `GIT_URL` is unset
fn capture_build_environment(project_dir: &Path) -> BuildEnvironment {
    let variables: Vec<(String, String)> = std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
        .collect();
    let has_git_url = variables
        .iter()
        .any(|(name, value)| name == GIT_URL_VAR && !value.trim().is_empty());
    let git_remote = if has_git_url {
        None
    } else {
        origin_remote(project_dir)
    };
    BuildEnvironment::new(variables, git_remote)
}

fn origin_remote(project_dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(project_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        tracing::debug!("no git origin remote in {}", project_dir.display());
        return None;
    }
    let remote = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!remote.is_empty()).then_some(remote)
}

fn replace_if_given(target: &mut Vec<String>, given: &[String]) {
    if !given.is_empty() {
        *target = given.to_vec();
    }
}

fn presenter_type(args: &Args) -> PresenterType {
    if let Some(dir) = &args.output_dir {
        PresenterType::Directory(dir.clone())
    } else if let Some(path) = &args.output {
        PresenterType::File(path.clone())
    } else {
        PresenterType::Stdout
    }
}

fn override_repository(config: Option<&ConfigFile>) -> Result<DescriptorRepository> {
    let mut repository = DescriptorRepository::new();
    if let Some(config) = config {
        for (selector, source) in config.metadata_overrides() {
            repository.insert(&selector, source)?;
        }
    }
    tracing::debug!(overrides = repository.len(), "metadata overrides loaded");
    Ok(repository)
}

fn validate_input_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SbomError::ResolutionNotFound {
            path: path.to_path_buf(),
            suggestion: "Pass a resolution export file or a directory containing resolution.json"
                .to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for input paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| SbomError::FileReadError {
        path: path.to_path_buf(),
        details: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: "Input path is a symbolic link".to_string(),
            hint: "Pass the resolved target path instead".to_string(),
        }
        .into());
    }

    Ok(())
}
