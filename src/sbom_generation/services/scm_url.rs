/// Converts SCM connection strings into browsable URLs.
///
/// Handles the common forms found in POM `<scm>` sections:
/// - `scm:git:https://host/path.git` -> `https://host/path.git`
/// - `scm:git:git@host:path` / `git@host:path` -> `https://host/path`
/// - `git://host/path` -> `https://host/path`
/// - `ssh://git@host/path` -> `https://host/path`
///
/// Anything else is returned trimmed but otherwise unchanged.
pub struct ScmUrlConverter;

impl ScmUrlConverter {
    pub fn normalize(url: &str) -> String {
        let mut url = url.trim();

        if let Some(rest) = url.strip_prefix("scm:") {
            // scm:<provider>:<url>
            url = match rest.split_once(':') {
                Some((_, remainder)) => remainder,
                None => rest,
            };
        }

        if let Some(rest) = url.strip_prefix("git@") {
            if let Some((host, path)) = rest.split_once(':') {
                return format!("https://{}/{}", host, path.trim_start_matches('/'));
            }
        }

        if let Some(rest) = url.strip_prefix("ssh://") {
            let rest = rest.split_once('@').map_or(rest, |(_, host_path)| host_path);
            return format!("https://{}", rest);
        }

        if let Some(rest) = url.strip_prefix("git://") {
            return format!("https://{}", rest);
        }

        url.to_string()
    }
}
