use std::path::Path;
use std::sync::OnceLock;

use crate::config::deploy_config::ConfigSource;
use crate::core::errors::Result;
use crate::core::models::environment::Environment;

/// How much terminal output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

static VERBOSITY: OnceLock<Verbosity> = OnceLock::new();

/// Initialize the global verbosity from the CLI flags. `quiet` wins.
pub fn init(quiet: bool, verbose: bool) {
    let level = if quiet {
        Verbosity::Quiet
    } else if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    let _ = VERBOSITY.set(level);
}

/// Get the current verbosity.
pub fn verbosity() -> Verbosity {
    VERBOSITY.get().copied().unwrap_or(Verbosity::Normal)
}

/// Resolve the active environment from `--env` / `DEPLOYMENT_ENVIRONMENT`,
/// falling back to the command's own default.
pub fn resolve_environment(requested: Option<&str>, default: Environment) -> Result<Environment> {
    match requested {
        Some(name) if !name.trim().is_empty() => name.parse(),
        _ => Ok(default),
    }
}

/// Load the config file for the resolved environment.
pub fn load_config(
    path: &Path,
    requested: Option<&str>,
    default: Environment,
) -> Result<ConfigSource> {
    let environment = resolve_environment(requested, default)?;
    ConfigSource::load(path, environment)
}
