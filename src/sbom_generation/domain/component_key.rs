use serde::Deserialize;
use std::fmt;

/// Marker used in place of a missing group or version.
///
/// Unresolved dependencies frequently arrive without a version; they keep
/// their place in the graph under this marker instead of being dropped.
pub const UNSPECIFIED: &str = "unspecified";

/// Canonical deduplication key for a component.
///
/// Field order defines the canonical ordering: group, then name, then
/// version, then the optional qualifiers (absent sorts first). Two records
/// with equal keys are the same component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey {
    group: String,
    name: String,
    version: String,
    classifier: Option<String>,
    extension: Option<String>,
}

impl ComponentKey {
    pub fn new(
        group: String,
        name: String,
        version: String,
        classifier: Option<String>,
        extension: Option<String>,
    ) -> Self {
        Self {
            group,
            name,
            version,
            classifier,
            extension,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// `group:name:version`, the form used by exclusion patterns and overrides
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group, self.name, self.version)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        if let Some(extension) = &self.extension {
            write!(f, "@{}", extension)?;
        }
        Ok(())
    }
}

/// Canonical identity produced by the identity resolver: the key plus the
/// package URL derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentIdentity {
    key: ComponentKey,
    purl: String,
}

impl ComponentIdentity {
    pub fn new(key: ComponentKey, purl: String) -> Self {
        Self { key, purl }
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    pub fn purl(&self) -> &str {
        &self.purl
    }

    pub fn into_parts(self) -> (ComponentKey, String) {
        (self.key, self.purl)
    }
}

/// Package type attribute. Not part of the identity key; the first type
/// seen for a key is kept and later disagreements are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    #[default]
    Library,
    Framework,
    Application,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Library => "library",
            PackageType::Framework => "framework",
            PackageType::Application => "application",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "library" => Ok(PackageType::Library),
            "framework" => Ok(PackageType::Framework),
            "application" => Ok(PackageType::Application),
            other => Err(format!(
                "Unknown package type '{}' (expected library, framework or application)",
                other
            )),
        }
    }
}

/// Raw coordinates as exposed by the dependency resolver, before any
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawCoordinates {
    #[serde(default)]
    pub group: Option<String>,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

impl RawCoordinates {
    pub fn new(group: &str, name: &str, version: &str) -> Self {
        Self {
            group: Some(group.to_string()),
            name: name.to_string(),
            version: Some(version.to_string()),
            classifier: None,
            extension: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(group: &str, name: &str, version: &str) -> ComponentKey {
        ComponentKey::new(
            group.to_string(),
            name.to_string(),
            version.to_string(),
            None,
            None,
        )
    }

    #[test]
    fn test_component_key_ordering_is_group_name_version() {
        let mut keys = vec![
            key("org.b", "a", "1.0"),
            key("org.a", "z", "1.0"),
            key("org.a", "b", "2.0"),
            key("org.a", "b", "10.0"),
        ];
        keys.sort();

        let display: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            display,
            vec!["org.a:b:10.0", "org.a:b:2.0", "org.a:z:1.0", "org.b:a:1.0"]
        );
    }

    #[test]
    fn test_component_key_qualifiers_sort_after_plain() {
        let plain = key("lib", "core", "1.0");
        let classified = ComponentKey::new(
            "lib".to_string(),
            "core".to_string(),
            "1.0".to_string(),
            Some("sources".to_string()),
            None,
        );
        assert!(plain < classified);
        assert_ne!(plain, classified);
    }

    #[test]
    fn test_component_key_display_with_qualifiers() {
        let k = ComponentKey::new(
            "lib".to_string(),
            "core".to_string(),
            "1.0".to_string(),
            Some("tests".to_string()),
            Some("zip".to_string()),
        );
        assert_eq!(k.to_string(), "lib:core:1.0:tests@zip");
        assert_eq!(k.coordinates(), "lib:core:1.0");
    }

    #[test]
    fn test_component_key_is_case_sensitive() {
        assert_ne!(key("Lib", "core", "1.0"), key("lib", "core", "1.0"));
    }

    #[test]
    fn test_package_type_from_str() {
        assert_eq!(
            "Framework".parse::<PackageType>().unwrap(),
            PackageType::Framework
        );
        assert!("firmware".parse::<PackageType>().is_err());
    }

    #[test]
    fn test_package_type_deserialize() {
        let parsed: PackageType = serde_json::from_str("\"application\"").unwrap();
        assert_eq!(parsed, PackageType::Application);
        assert_eq!(PackageType::default(), PackageType::Library);
    }
}
