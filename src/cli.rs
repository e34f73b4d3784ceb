use clap::Parser;
use std::path::PathBuf;

use crate::application::dto::{ComponentOrder, UnresolvedEdgePolicy};
use crate::sbom_generation::domain::{PackageType, RawCoordinates};

/// Generate deduplicated CycloneDX SBOMs from resolved multi-module dependency graphs
#[derive(Parser, Debug)]
#[command(name = "resolved-sbom")]
#[command(version)]
#[command(
    about = "Generate deduplicated CycloneDX SBOMs from resolved multi-module dependency graphs",
    long_about = None
)]
pub struct Args {
    /// Resolution export (JSON) or a directory containing resolution.json
    #[arg(value_name = "INPUT", default_value = ".")]
    pub input: PathBuf,

    /// Config file (defaults to resolved-sbom.config.yml next to the input)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Write one <name>.cdx.json per document into this directory
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Emit one BOM per module instead of a single aggregate
    #[arg(long)]
    pub per_module: bool,

    /// Only walk configuration scopes matching these patterns (supports wildcards: *)
    #[arg(long = "include-scope", value_name = "PATTERN")]
    pub include_scopes: Vec<String>,

    /// Skip configuration scopes matching these patterns
    #[arg(long = "skip-scope", value_name = "PATTERN")]
    pub skip_scopes: Vec<String>,

    /// Only walk modules matching these patterns
    #[arg(long = "include-module", value_name = "PATTERN")]
    pub include_modules: Vec<String>,

    /// Skip modules matching these patterns
    #[arg(long = "skip-module", value_name = "PATTERN")]
    pub skip_modules: Vec<String>,

    /// Exclude artifacts matching group[:name[:version]] patterns
    /// Can be specified multiple times: -e "org.slf4j" -e "com.acme:*-test"
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Component order: canonical or declaration
    #[arg(long, value_name = "ORDER")]
    pub order: Option<ComponentOrder>,

    /// Dependency edges to unresolved components: include or exclude
    #[arg(long, value_name = "POLICY")]
    pub unresolved_edges: Option<UnresolvedEdgePolicy>,

    /// Omit the random serialNumber (for reproducible output)
    #[arg(long)]
    pub no_serial_number: bool,

    /// Metadata component of the aggregate BOM as group:name:version
    #[arg(long, value_name = "COORDINATES", value_parser = parse_coordinates)]
    pub component: Option<RawCoordinates>,

    /// Type of the metadata component: library, framework or application
    #[arg(long, value_name = "TYPE")]
    pub project_type: Option<PackageType>,

    /// Keep full license texts in the output
    #[arg(long)]
    pub include_license_text: bool,

    /// Ignore metadata carried by the export; apply configured overrides only
    #[arg(long)]
    pub no_metadata_resolution: bool,

    /// Do not add the CI build URL to the metadata component
    #[arg(long)]
    pub no_build_system: bool,

    /// Variable name or ${VAR} pattern that yields the CI build URL
    #[arg(long, value_name = "VAR|PATTERN")]
    pub build_system_variable: Option<String>,

    /// Log debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Parses `group:name:version` into coordinates
fn parse_coordinates(value: &str) -> Result<RawCoordinates, String> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();
    match parts.as_slice() {
        [group, name, version] if !name.is_empty() && !version.is_empty() => {
            Ok(RawCoordinates::new(group, name, version))
        }
        _ => Err(format!(
            "Invalid coordinates: {}. Please specify 'group:name:version'",
            value
        )),
    }
}
