use std::sync::LazyLock;

use regex::Regex;

use crate::config::deploy_config::ConfigSource;
use crate::core::errors::{DeployError, Result};
use crate::core::models::variable_spec::{VARIABLE_SPECS, settings};

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("valid project name regex"));

static BUCKET_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]{1,61}[a-z0-9]$").expect("valid bucket name regex")
});

/// Check that every required variable resolves to a non-empty value.
/// Reports all missing names at once.
pub fn validate_required(config: &ConfigSource) -> Result<()> {
    let required_specs = VARIABLE_SPECS
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| spec.name);
    require(config, required_specs)
}

/// Check only the settings needed to talk to the platform.
pub fn validate_settings(config: &ConfigSource) -> Result<()> {
    require(config, settings::REQUIRED.iter().copied())
}

/// Platform settings plus the public bucket name.
pub fn validate_bucket_settings(config: &ConfigSource) -> Result<()> {
    require(
        config,
        settings::REQUIRED
            .iter()
            .copied()
            .chain([settings::PUBLIC_BUCKET]),
    )
}

fn require<'k>(config: &ConfigSource, keys: impl IntoIterator<Item = &'k str>) -> Result<()> {
    let missing: Vec<String> = keys
        .into_iter()
        .filter(|key| config.get(key, "").trim().is_empty())
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DeployError::MissingVariables {
            environment: config.environment().to_string(),
            names: missing,
        })
    }
}

/// Project names may only use ASCII letters, digits and hyphens.
pub fn validate_project_name(name: &str) -> Result<()> {
    if PROJECT_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(DeployError::InvalidProjectName {
            name: name.to_string(),
        })
    }
}

pub fn validate_bucket_name(name: &str) -> Result<()> {
    if BUCKET_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(DeployError::InvalidBucketName {
            name: name.to_string(),
        })
    }
}
