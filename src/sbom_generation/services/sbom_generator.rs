use crate::sbom_generation::domain::SbomMetadata;
use crate::shared::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// SbomGenerator service for generating SBOM document metadata
///
/// Timestamps are RFC 3339 in UTC with second precision. A fixed
/// `source_date_epoch` replaces the wall clock for reproducible builds.
pub struct SbomGenerator;

impl SbomGenerator {
    /// Generates SBOM metadata
    ///
    /// # Arguments
    /// * `tool_name` - Name of the tool generating the SBOM
    /// * `tool_version` - Version of the tool
    /// * `source_date_epoch` - Fixed Unix timestamp to use instead of now
    /// * `include_serial_number` - Whether to mint a `urn:uuid:` serial
    ///
    /// # Errors
    /// Fails if `source_date_epoch` is outside the representable range.
    pub fn generate_metadata(
        tool_name: &str,
        tool_version: &str,
        source_date_epoch: Option<i64>,
        include_serial_number: bool,
    ) -> Result<SbomMetadata> {
        let timestamp = Self::timestamp(source_date_epoch)?;
        let serial_number = include_serial_number.then(|| format!("urn:uuid:{}", Uuid::new_v4()));

        Ok(SbomMetadata::new(
            timestamp,
            tool_name.to_string(),
            tool_version.to_string(),
            serial_number,
        ))
    }

    /// Generates SBOM metadata with default tool information (resolved-sbom)
    ///
    /// This uses the compile-time version from Cargo.toml
    pub fn generate_default_metadata(
        source_date_epoch: Option<i64>,
        include_serial_number: bool,
    ) -> Result<SbomMetadata> {
        Self::generate_metadata(
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            source_date_epoch,
            include_serial_number,
        )
    }

    fn timestamp(source_date_epoch: Option<i64>) -> Result<String> {
        let instant = match source_date_epoch {
            Some(epoch) => DateTime::<Utc>::from_timestamp(epoch, 0).ok_or_else(|| {
                anyhow::anyhow!("source_date_epoch {} is out of range", epoch)
            })?,
            None => Utc::now(),
        };
        Ok(instant.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}
