use serde::Deserialize;

/// License value object.
///
/// A license is known by an SPDX `id`, a free-form `name`, or both. `url`
/// and `text` are optional detail that makes an entry more specific.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "LicenseRecord")]
pub struct License {
    id: Option<String>,
    name: Option<String>,
    url: Option<String>,
    text: Option<String>,
}

/// Wire shape of a license; blank fields are dropped on conversion
#[derive(Deserialize)]
struct LicenseRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl From<LicenseRecord> for License {
    fn from(record: LicenseRecord) -> Self {
        License::new(record.id, record.name, record.url, record.text)
    }
}

impl License {
    pub fn new(
        id: Option<String>,
        name: Option<String>,
        url: Option<String>,
        text: Option<String>,
    ) -> Self {
        Self {
            id: non_blank(id),
            name: non_blank(name),
            url: non_blank(url),
            text: non_blank(text),
        }
    }

    /// License identified by an SPDX expression id, e.g. `Apache-2.0`
    pub fn spdx(id: &str) -> Self {
        Self::new(Some(id.to_string()), None, None, None)
    }

    /// License known only by name
    pub fn named(name: &str) -> Self {
        Self::new(None, Some(name.to_string()), None, None)
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = non_blank(Some(text.to_string()));
        self
    }

    /// Copy without the full text; `None` when only the text identified it
    pub fn without_text(&self) -> Option<Self> {
        if self.is_anonymous() {
            return None;
        }
        Some(Self {
            text: None,
            ..self.clone()
        })
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = non_blank(Some(url.to_string()));
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True when neither an id nor a name is present
    pub fn is_anonymous(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }

    /// Fills every field this license lacks from `other`.
    pub fn absorb(&mut self, other: &License) {
        fill(&mut self.id, &other.id);
        fill(&mut self.name, &other.name);
        fill(&mut self.url, &other.url);
        fill(&mut self.text, &other.text);
    }

    /// Returns a copy with blank fields normalized away
    pub fn normalized(&self) -> Self {
        Self::new(
            self.id.clone(),
            self.name.clone(),
            self.url.clone(),
            self.text.clone(),
        )
    }
}

fn fill(target: &mut Option<String>, source: &Option<String>) {
    if target.is_none() {
        target.clone_from(source);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
