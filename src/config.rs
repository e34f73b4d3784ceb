//! Configuration file support for resolved-sbom.
//!
//! Provides YAML-based configuration through `resolved-sbom.config.yml`
//! files, including data structures, file loading, validation, and folding
//! into `SbomOptions`.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::application::dto::{ComponentOrder, SbomOptions, UnresolvedEdgePolicy};
use crate::sbom_generation::domain::{
    ExternalReference, License, MetadataSource, PackageType, RawCoordinates, Supplier,
};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "resolved-sbom.config.yml";

/// Top-level configuration file schema.
///
/// Every field is optional; unset fields leave the defaults (or command-line
/// values) untouched.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub include_scopes: Option<Vec<String>>,
    pub skip_scopes: Option<Vec<String>>,
    pub include_modules: Option<Vec<String>>,
    pub skip_modules: Option<Vec<String>>,
    /// `group[:name[:version]]` artifact exclusion patterns
    pub exclude: Option<Vec<String>>,
    pub aggregate: Option<bool>,
    /// Metadata component of the aggregate BOM
    pub component: Option<RawCoordinates>,
    pub include_serial_number: Option<bool>,
    pub source_date_epoch: Option<i64>,
    pub component_order: Option<String>,
    pub unresolved_edges: Option<String>,
    pub project_type: Option<String>,
    pub purl_type: Option<String>,
    pub manufacture: Option<Supplier>,
    pub licenses: Option<Vec<License>>,
    pub include_license_text: Option<bool>,
    pub include_metadata_resolution: Option<bool>,
    pub include_build_system: Option<bool>,
    /// Variable name or `${VAR}` pattern giving the CI build URL
    pub build_system_environment_variable: Option<String>,
    /// References attached to the metadata component
    pub external_references: Option<Vec<ExternalReference>>,
    pub component_overrides: Option<Vec<ComponentOverride>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// User-supplied metadata that wins over anything discovered.
#[derive(Debug, Deserialize)]
pub struct ComponentOverride {
    /// `group:name[:version]` selector
    pub component: String,
    pub supplier: Option<Supplier>,
    pub licenses: Option<Vec<License>>,
    pub description: Option<String>,
    pub external_references: Option<Vec<ExternalReference>>,
}

impl ComponentOverride {
    pub fn to_metadata_source(&self) -> MetadataSource {
        MetadataSource {
            authoritative: true,
            licenses: self.licenses.clone().unwrap_or_default(),
            supplier: self.supplier.clone(),
            hashes: Vec::new(),
            external_references: self.external_references.clone().unwrap_or_default(),
            description: self.description.clone(),
        }
    }
}

impl ConfigFile {
    /// Folds every field set in the file into `options`.
    ///
    /// # Errors
    /// Fails for enum-valued fields that do not parse; `load_config_from_path`
    /// has already rejected those, so this only fails for hand-built configs.
    pub fn apply_to(&self, options: &mut SbomOptions) -> Result<()> {
        if let Some(patterns) = &self.include_scopes {
            options.include_scopes = patterns.clone();
        }
        if let Some(patterns) = &self.skip_scopes {
            options.skip_scopes = patterns.clone();
        }
        if let Some(patterns) = &self.include_modules {
            options.include_modules = patterns.clone();
        }
        if let Some(patterns) = &self.skip_modules {
            options.skip_modules = patterns.clone();
        }
        if let Some(patterns) = &self.exclude {
            options.exclude_artifacts = patterns.clone();
        }
        if let Some(aggregate) = self.aggregate {
            options.aggregate = aggregate;
        }
        if let Some(component) = &self.component {
            options.metadata_component = Some(component.clone());
        }
        if let Some(include) = self.include_serial_number {
            options.include_serial_number = include;
        }
        if let Some(epoch) = self.source_date_epoch {
            options.source_date_epoch = Some(epoch);
        }
        if let Some(order) = &self.component_order {
            options.component_order = parse_field::<ComponentOrder>("component_order", order)?;
        }
        if let Some(policy) = &self.unresolved_edges {
            options.unresolved_edges =
                parse_field::<UnresolvedEdgePolicy>("unresolved_edges", policy)?;
        }
        if let Some(project_type) = &self.project_type {
            options.project_type = parse_field::<PackageType>("project_type", project_type)?;
        }
        if let Some(purl_type) = &self.purl_type {
            options.purl_type = purl_type.trim().to_string();
        }
        if let Some(manufacture) = &self.manufacture {
            options.manufacture = Some(manufacture.clone());
        }
        if let Some(licenses) = &self.licenses {
            options.licenses = licenses.clone();
        }
        if let Some(include) = self.include_license_text {
            options.include_license_text = include;
        }
        if let Some(include) = self.include_metadata_resolution {
            options.include_metadata_resolution = include;
        }
        if let Some(include) = self.include_build_system {
            options.include_build_system = include;
        }
        if let Some(variable) = &self.build_system_environment_variable {
            options.build_system_environment_variable = Some(variable.trim().to_string());
        }
        if let Some(references) = &self.external_references {
            options.external_references = references.clone();
        }
        Ok(())
    }

    /// `(selector, source)` pairs for every component override
    pub fn metadata_overrides(&self) -> Vec<(String, MetadataSource)> {
        self.component_overrides
            .iter()
            .flatten()
            .map(|o| (o.component.trim().to_string(), o.to_metadata_source()))
            .collect()
    }
}

fn parse_field<T>(field: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}: {}", field, e))
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    tracing::debug!(path = %path.display(), "config file loaded");
    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(order) = &config.component_order {
        parse_field::<ComponentOrder>("component_order", order)?;
    }
    if let Some(policy) = &config.unresolved_edges {
        parse_field::<UnresolvedEdgePolicy>("unresolved_edges", policy)?;
    }
    if let Some(project_type) = &config.project_type {
        parse_field::<PackageType>("project_type", project_type)?;
    }
    if let Some(purl_type) = &config.purl_type {
        let purl_type = purl_type.trim();
        let valid = !purl_type.is_empty()
            && purl_type
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'));
        if !valid {
            bail!(
                "Invalid config: purl_type '{}' is not a valid package URL type.\n\n\
                 💡 Hint: Use a type such as \"maven\" or \"gradle\".",
                purl_type
            );
        }
    }
    if let Some(epoch) = config.source_date_epoch {
        if epoch < 0 {
            bail!(
                "Invalid config: source_date_epoch must not be negative (got {}).",
                epoch
            );
        }
    }
    if let Some(variable) = &config.build_system_environment_variable {
        if variable.trim().is_empty() {
            bail!(
                "Invalid config: build_system_environment_variable must not be empty.\n\n\
                 💡 Hint: Name a variable such as BUILD_URL or a pattern like \"${{SERVER}}/jobs/${{JOB_ID}}\"."
            );
        }
    }
    if let Some(references) = &config.external_references {
        for (i, reference) in references.iter().enumerate() {
            if reference.url.trim().is_empty() {
                bail!("Invalid config: external_references[{}].url must not be empty.", i);
            }
        }
    }
    if let Some(component) = &config.component {
        if component.name.trim().is_empty() {
            bail!(
                "Invalid config: component.name must not be empty.\n\n\
                 💡 Hint: Set group, name and version of the component the aggregate BOM describes."
            );
        }
    }
    if let Some(overrides) = &config.component_overrides {
        for (i, entry) in overrides.iter().enumerate() {
            if entry.component.trim().is_empty() {
                bail!(
                    "Invalid config: component_overrides[{}].component must not be empty.\n\n\
                     💡 Hint: Each override must name a component as \"group:name\" or \"group:name:version\".",
                    i
                );
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!("⚠️  Warning: Unknown config field '{}' will be ignored.", key);
    }
}
