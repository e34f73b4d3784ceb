use crate::sbom_generation::domain::ComponentKey;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum number of patterns per filter
const MAX_PATTERNS: usize = 64;

/// Maximum length of a single pattern
const MAX_PATTERN_LENGTH: usize = 255;

/// NameFilter - include/skip filter over scope or module names
///
/// Patterns support '*' matching zero or more characters. An empty include
/// list accepts every name; a skip match always wins over an include match.
#[derive(Debug, Default)]
pub struct NameFilter {
    include: Vec<WildcardPattern>,
    skip: Vec<WildcardPattern>,
}

impl NameFilter {
    /// # Errors
    /// - Too many patterns (> MAX_PATTERNS)
    /// - Empty, overlong or control-character patterns
    pub fn new(include: &[String], skip: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile_all(include, "include")?,
            skip: compile_all(skip, "skip")?,
        })
    }

    pub fn accepts(&self, name: &str) -> bool {
        if self.skip.iter().any(|p| p.matches(name)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.matches(name))
    }
}

fn compile_all(patterns: &[String], kind: &str) -> Result<Vec<WildcardPattern>> {
    if patterns.len() > MAX_PATTERNS {
        return Err(SbomError::Validation {
            message: format!(
                "Too many {} patterns: {} (maximum: {})",
                kind,
                patterns.len(),
                MAX_PATTERNS
            ),
        }
        .into());
    }
    patterns.iter().map(|p| WildcardPattern::new(p)).collect()
}

/// ArtifactFilter - excludes artifacts by `group:name:version` patterns
///
/// Missing trailing segments match anything, so `org.slf4j` excludes every
/// artifact of that group and `org.slf4j:slf4j-api` every version of it.
#[derive(Debug, Default)]
pub struct ArtifactFilter {
    patterns: Vec<ArtifactPattern>,
}

impl ArtifactFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.len() > MAX_PATTERNS {
            return Err(SbomError::Validation {
                message: format!(
                    "Too many exclusion patterns: {} (maximum: {})",
                    patterns.len(),
                    MAX_PATTERNS
                ),
            }
            .into());
        }
        let patterns = patterns
            .iter()
            .map(|p| ArtifactPattern::new(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any pattern matches the component's coordinates
    pub fn excludes(&self, key: &ComponentKey) -> bool {
        // Every pattern is evaluated so each one records whether it matched.
        self.patterns
            .iter()
            .fold(false, |excluded, p| p.matches(key) || excluded)
    }

    /// Patterns that never matched an artifact during the run
    pub fn unmatched_patterns(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !p.matched.load(Ordering::Relaxed))
            .map(|p| p.original.clone())
            .collect()
    }
}

#[derive(Debug)]
struct ArtifactPattern {
    original: String,
    group: WildcardPattern,
    name: WildcardPattern,
    version: WildcardPattern,
    matched: AtomicBool,
}

impl ArtifactPattern {
    fn new(pattern: &str) -> Result<Self> {
        let segments: Vec<&str> = pattern.trim().split(':').collect();
        if segments.len() > 3 || segments.iter().all(|s| s.trim().is_empty()) {
            return Err(SbomError::Validation {
                message: format!(
                    "Invalid exclusion pattern '{}': expected group[:name[:version]]",
                    pattern
                ),
            }
            .into());
        }
        let segment = |i: usize| -> Result<WildcardPattern> {
            match segments.get(i).map(|s| s.trim()).filter(|s| !s.is_empty()) {
                Some(s) => WildcardPattern::new(s),
                None => Ok(WildcardPattern::any()),
            }
        };
        Ok(Self {
            original: pattern.to_string(),
            group: segment(0)?,
            name: segment(1)?,
            version: segment(2)?,
            matched: AtomicBool::new(false),
        })
    }

    fn matches(&self, key: &ComponentKey) -> bool {
        let is_match = self.group.matches(key.group())
            && self.name.matches(key.name())
            && self.version.matches(key.version());
        if is_match {
            self.matched.store(true, Ordering::Relaxed);
        }
        is_match
    }
}

/// One compiled wildcard pattern
#[derive(Debug, Clone)]
struct WildcardPattern {
    matcher: PatternMatcher,
}

/// Pattern matcher types for efficient matching
#[derive(Debug, Clone)]
enum PatternMatcher {
    /// "*"
    Any,
    /// "name"
    Exact(String),
    /// "*-suffix"
    Suffix(String),
    /// "prefix-*"
    Prefix(String),
    /// "*middle*"
    Contains(String),
    /// "pre*mid*suf": anchored at both ends unless the pattern starts or
    /// ends with '*'
    Glob {
        parts: Vec<String>,
        anchored_start: bool,
        anchored_end: bool,
    },
}

impl WildcardPattern {
    fn new(pattern: &str) -> Result<Self> {
        validate_pattern(pattern)?;
        Ok(Self {
            matcher: compile_pattern(pattern),
        })
    }

    fn any() -> Self {
        Self {
            matcher: PatternMatcher::Any,
        }
    }

    fn matches(&self, value: &str) -> bool {
        match &self.matcher {
            PatternMatcher::Any => true,
            PatternMatcher::Exact(s) => value == s,
            PatternMatcher::Suffix(suffix) => value.ends_with(suffix.as_str()),
            PatternMatcher::Prefix(prefix) => value.starts_with(prefix.as_str()),
            PatternMatcher::Contains(middle) => value.contains(middle.as_str()),
            PatternMatcher::Glob {
                parts,
                anchored_start,
                anchored_end,
            } => glob_matches(value, parts, *anchored_start, *anchored_end),
        }
    }
}

fn glob_matches(value: &str, parts: &[String], anchored_start: bool, anchored_end: bool) -> bool {
    let mut rest = value;
    for (i, part) in parts.iter().enumerate() {
        let is_first = i == 0;
        let is_last = i + 1 == parts.len();

        if is_first && anchored_start {
            match rest.strip_prefix(part.as_str()) {
                Some(stripped) => rest = stripped,
                None => return false,
            }
        } else if is_last && anchored_end {
            return rest.ends_with(part.as_str());
        } else {
            match rest.find(part.as_str()) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    !anchored_end || rest.is_empty()
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(SbomError::Validation {
            message: "Filter pattern cannot be empty".to_string(),
        }
        .into());
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(SbomError::Validation {
            message: format!(
                "Filter pattern is too long: '{}' ({} chars). Maximum: {} chars",
                pattern,
                pattern.len(),
                MAX_PATTERN_LENGTH
            ),
        }
        .into());
    }

    if let Some(ch) = pattern.chars().find(|c| c.is_control() || c.is_whitespace()) {
        return Err(SbomError::Validation {
            message: format!(
                "Filter pattern contains invalid character {:?} in pattern '{}'",
                ch, pattern
            ),
        }
        .into());
    }

    Ok(())
}

fn compile_pattern(pattern: &str) -> PatternMatcher {
    if pattern.chars().all(|c| c == '*') {
        return PatternMatcher::Any;
    }

    let parts: Vec<String> = pattern
        .split('*')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();
    let anchored_start = !pattern.starts_with('*');
    let anchored_end = !pattern.ends_with('*');

    match (parts.len(), anchored_start, anchored_end) {
        (1, true, true) => PatternMatcher::Exact(parts[0].clone()),
        (1, false, true) => PatternMatcher::Suffix(parts[0].clone()),
        (1, true, false) => PatternMatcher::Prefix(parts[0].clone()),
        (1, false, false) => PatternMatcher::Contains(parts[0].clone()),
        _ => PatternMatcher::Glob {
            parts,
            anchored_start,
            anchored_end,
        },
    }
}
