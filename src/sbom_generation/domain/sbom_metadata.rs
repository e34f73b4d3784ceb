use super::{License, Supplier};

/// SbomMetadata value object: document-level metadata of one BOM
#[derive(Debug, Clone, PartialEq)]
pub struct SbomMetadata {
    timestamp: String,
    tool_name: String,
    tool_version: String,
    serial_number: Option<String>,
    manufacture: Option<Supplier>,
    licenses: Vec<License>,
}

impl SbomMetadata {
    pub fn new(
        timestamp: String,
        tool_name: String,
        tool_version: String,
        serial_number: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            tool_name,
            tool_version,
            serial_number,
            manufacture: None,
            licenses: Vec::new(),
        }
    }

    /// Organization that manufactured the described software
    pub fn with_manufacture(mut self, manufacture: Option<Supplier>) -> Self {
        self.manufacture = manufacture.filter(|m| !m.is_empty());
        self
    }

    /// Licenses of the BOM document's subject
    pub fn with_licenses(mut self, licenses: Vec<License>) -> Self {
        self.licenses = licenses;
        self
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    pub fn manufacture(&self) -> Option<&Supplier> {
        self.manufacture.as_ref()
    }

    pub fn licenses(&self) -> &[License] {
        &self.licenses
    }
}
