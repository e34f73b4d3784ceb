use crate::sbom_generation::domain::{ExternalReference, ExternalReferenceType};
use std::collections::BTreeMap;

const GIT_URL_VAR: &str = "GIT_URL";

/// Variables holding the URL of the running build on CI systems that
/// expose one directly (Jenkins, CircleCI, Travis, Drone)
const BUILD_URL_VARS: [&str; 4] = [
    "BUILD_URL",
    "CIRCLE_BUILD_URL",
    "TRAVIS_BUILD_WEB_URL",
    "DRONE_BUILD_LINK",
];

/// Snapshot of the environment a BOM is generated in: the environment
/// variables and the `origin` remote of the surrounding git checkout.
///
/// Holding a snapshot instead of reading `std::env` keeps every lookup
/// deterministic for a given input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    variables: BTreeMap<String, String>,
    git_remote: Option<String>,
}

impl BuildEnvironment {
    pub fn new<I>(variables: I, git_remote: Option<String>) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            variables: variables.into_iter().collect(),
            git_remote,
        }
    }

    /// Value of a variable; blank values count as unset
    pub fn var(&self, name: &str) -> Option<&str> {
        self.variables
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// References describing where the BOM was built: a `build-system`
    /// reference when enabled and a CI build URL is known, and a `vcs`
    /// reference unless `existing` already carries one.
    ///
    /// `build_system_variable` is either a variable name or a pattern such
    /// as `${SERVER}/jobs/${JOB_ID}`; without it the URL is detected from
    /// the variables of common CI systems.
    pub fn references(
        &self,
        existing: &[ExternalReference],
        include_build_system: bool,
        build_system_variable: Option<&str>,
    ) -> Vec<ExternalReference> {
        let mut references = Vec::new();
        if include_build_system {
            if let Some(url) = self.build_system_url(build_system_variable) {
                references.push(ExternalReference::new(ExternalReferenceType::BuildSystem, &url));
            }
        }
        let has_vcs = existing
            .iter()
            .any(|reference| reference.kind == ExternalReferenceType::Vcs);
        if !has_vcs {
            if let Some(url) = self.vcs_url() {
                references.push(ExternalReference::new(ExternalReferenceType::Vcs, &url));
            }
        }
        references
    }

    pub fn build_system_url(&self, variable: Option<&str>) -> Option<String> {
        match variable.map(str::trim).filter(|v| !v.is_empty()) {
            Some(pattern) if pattern.contains("${") => self.expand(pattern),
            Some(name) => self.var(name).map(str::to_string),
            None => self.detect_build_url(),
        }
    }

    /// `GIT_URL`, else the `origin` remote, without credentials
    pub fn vcs_url(&self) -> Option<String> {
        let remote = self
            .git_remote
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty());
        self.var(GIT_URL_VAR).or(remote).map(strip_credentials)
    }

    fn detect_build_url(&self) -> Option<String> {
        if let (Some(server), Some(repository), Some(run)) = (
            self.var("GITHUB_SERVER_URL"),
            self.var("GITHUB_REPOSITORY"),
            self.var("GITHUB_RUN_ID"),
        ) {
            return Some(format!("{}/{}/actions/runs/{}", server, repository, run));
        }
        if let (Some(project), Some(job)) = (self.var("CI_PROJECT_URL"), self.var("CI_JOB_ID")) {
            return Some(format!("{}/-/jobs/{}", project, job));
        }
        BUILD_URL_VARS
            .iter()
            .find_map(|name| self.var(name))
            .map(str::to_string)
    }

    /// Substitutes every `${NAME}`. Any unset variable makes the whole
    /// pattern unusable.
    fn expand(&self, pattern: &str) -> Option<String> {
        let mut expanded = String::with_capacity(pattern.len());
        let mut rest = pattern;
        while let Some(start) = rest.find("${") {
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                break;
            };
            let name = after[..end].trim();
            if name.is_empty() {
                return None;
            }
            expanded.push_str(&rest[..start]);
            expanded.push_str(self.var(name)?);
            rest = &after[end + 1..];
        }
        expanded.push_str(rest);
        Some(expanded)
    }
}

/// Drops `user:token@` from http(s) URLs. SSH and scp-style remotes keep
/// their user, which names the account rather than a secret.
fn strip_credentials(url: &str) -> String {
    if let Some((scheme, rest)) = url.split_once("://") {
        if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
            let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
            if let Some((_, host)) = authority.rsplit_once('@') {
                return format!("{}://{}{}", scheme, host, path);
            }
        }
    }
    url.to_string()
}
