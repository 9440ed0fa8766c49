//! JSON configuration file loading.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use url::Url;

use addon_installer::download::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use addon_installer::resolver::ResolverSource;

/// Contents of the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Directory archives are extracted into.
    pub addons_path: PathBuf,
    /// Add-on identifiers, in display order.
    pub addons: Vec<String>,
    /// Resolution strategy.
    #[serde(default)]
    pub source: ResolverSource,
    /// Overrides the strategy's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// HTTP connect timeout in seconds.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// HTTP read timeout in seconds.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.addons_path.as_os_str().is_empty() {
            bail!("Invalid config value for `addons_path`: must not be empty");
        }

        let mut seen = HashSet::new();
        for addon in &self.addons {
            if addon.trim().is_empty() {
                bail!("Invalid config value in `addons`: identifiers must not be empty");
            }
            // Each identifier is printed on exactly one progress line.
            if addon.chars().any(char::is_control) {
                bail!(
                    "Invalid config value in `addons`: {addon:?} contains control characters"
                );
            }
            if !seen.insert(addon.as_str()) {
                bail!("Invalid config value in `addons`: '{addon}' is listed more than once");
            }
        }

        if let Some(base_url) = &self.base_url {
            let parsed = Url::parse(base_url)
                .with_context(|| format!("Invalid config value for `base_url`: {base_url}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!("Invalid config value for `base_url`: {base_url}. Expected an http(s) URL");
            }
        }

        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }

    /// Connect timeout, falling back to the client default.
    #[must_use]
    pub fn connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS)
    }

    /// Read timeout, falling back to the client default.
    #[must_use]
    pub fn read_timeout_secs(&self) -> u64 {
        self.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS)
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Reads, parses and validates the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = serde_json::from_str(raw)?;
    config.validate()?;
    Ok(config)
}
