//! User-Agent string for add-on requests.

/// Repository URL from the package manifest; empty when none is set.
const PROJECT_REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");

/// Default User-Agent for lookup and archive requests.
///
/// `addon-installer/<version>`, followed by ` (+<repository>)` when the
/// manifest names a repository.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    if PROJECT_REPOSITORY.is_empty() {
        format!("addon-installer/{version}")
    } else {
        format!("addon-installer/{version} (+{PROJECT_REPOSITORY})")
    }
}
