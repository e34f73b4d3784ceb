use crate::sbom_generation::domain::{ComponentIdentity, ComponentKey, RawCoordinates, UNSPECIFIED};
use crate::shared::Result;

/// Maximum length for group and name segments (security limit)
const MAX_SEGMENT_LENGTH: usize = 255;

/// Maximum length for versions and qualifiers (security limit)
const MAX_VERSION_LENGTH: usize = 128;

/// Extension implied when none is given; never rendered as a qualifier
const DEFAULT_EXTENSION: &str = "jar";

/// IdentityResolver derives canonical identities and package URLs from raw
/// resolver coordinates.
///
/// Resolution is a pure function of its input: the same coordinates always
/// produce the same key and the same purl.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    purl_type: String,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new("maven")
    }
}

impl IdentityResolver {
    pub fn new(purl_type: &str) -> Self {
        Self {
            purl_type: purl_type.to_string(),
        }
    }

    /// Resolves raw coordinates into a canonical identity.
    ///
    /// Group and version fall back to `UNSPECIFIED` when missing or blank.
    /// Every segment is trimmed; no other normalization happens, so identity
    /// stays case-sensitive. A blank or `jar` extension is treated as absent.
    ///
    /// # Errors
    /// Returns an error for a blank name, an overlong segment, or a segment
    /// containing control characters.
    pub fn resolve(&self, raw: &RawCoordinates) -> Result<ComponentIdentity> {
        let name = raw.name.trim();
        if name.is_empty() {
            anyhow::bail!("Component name cannot be empty");
        }

        let group = or_unspecified(raw.group.as_deref());
        let version = or_unspecified(raw.version.as_deref());
        let classifier = optional(raw.classifier.as_deref());
        let extension =
            optional(raw.extension.as_deref()).filter(|ext| ext != DEFAULT_EXTENSION);

        validate_segment("group", &group, MAX_SEGMENT_LENGTH)?;
        validate_segment("name", name, MAX_SEGMENT_LENGTH)?;
        validate_segment("version", &version, MAX_VERSION_LENGTH)?;
        if let Some(classifier) = &classifier {
            validate_segment("classifier", classifier, MAX_VERSION_LENGTH)?;
        }
        if let Some(extension) = &extension {
            validate_segment("extension", extension, MAX_VERSION_LENGTH)?;
        }

        let key = ComponentKey::new(group, name.to_string(), version, classifier, extension);
        let purl = self.purl_for(&key);
        Ok(ComponentIdentity::new(key, purl))
    }

    /// Builds `pkg:<type>/<group>/<name>@<version>[?qualifiers]`.
    ///
    /// Qualifiers are emitted in lexicographic key order (`classifier`,
    /// then `type`), so the purl is a function of the key alone.
    pub fn purl_for(&self, key: &ComponentKey) -> String {
        let mut purl = format!(
            "pkg:{}/{}/{}@{}",
            self.purl_type,
            urlencoding::encode(key.group()),
            urlencoding::encode(key.name()),
            urlencoding::encode(key.version())
        );

        let qualifiers: Vec<String> = [("classifier", key.classifier()), ("type", key.extension())]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| format!("{}={}", k, urlencoding::encode(v))))
            .collect();
        if !qualifiers.is_empty() {
            purl.push('?');
            purl.push_str(&qualifiers.join("&"));
        }
        purl
    }
}

fn or_unspecified(value: Option<&str>) -> String {
    optional(value).unwrap_or_else(|| UNSPECIFIED.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn validate_segment(field: &str, value: &str, max_length: usize) -> Result<()> {
    if value.len() > max_length {
        anyhow::bail!(
            "Component {} is too long ({} bytes). Maximum allowed: {} bytes",
            field,
            value.len(),
            max_length
        );
    }
    if value.chars().any(char::is_control) {
        anyhow::bail!("Component {} '{}' contains control characters", field, value.escape_debug());
    }
    Ok(())
}
