use std::path::{Path, PathBuf};

use crate::cli::{BumpPart, context, output};
use crate::config::deploy_config::ConfigSource;
use crate::core::errors::Result;
use crate::core::models::environment::Environment;
use crate::core::models::variable_spec::settings;
use crate::core::services::version_bumper::VersionBumper;

const DEFAULT_VERSION_FILE: &str = "package.json";

/// Execute the `pagesync bump` command.
///
/// The manifest is `--file` when given, else `VERSION_FILE` from the
/// config file if one exists, else `package.json`.
pub fn execute(
    level: BumpPart,
    file: Option<&Path>,
    config_path: &Path,
    env: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => version_file(config_path, env)?,
    };
    let bumper = VersionBumper { path };

    output::header("🔖 pagesync bump");

    if dry_run {
        let bump = bumper.preview(level.into())?;
        output::success(&format!(
            "Would bump {}: {} → {}",
            bumper.path.display(),
            bump.previous,
            bump.next
        ));
        return Ok(());
    }

    let bump = bumper.bump(level.into())?;
    output::success(&format!(
        "Bumped {}: {} → {}",
        bumper.path.display(),
        bump.previous,
        bump.next
    ));
    Ok(())
}

fn version_file(config_path: &Path, env: Option<&str>) -> Result<PathBuf> {
    if !config_path.exists() {
        return Ok(PathBuf::from(DEFAULT_VERSION_FILE));
    }
    let environment = context::resolve_environment(env, Environment::Production)?;
    let config = ConfigSource::load(config_path, environment)?;
    Ok(PathBuf::from(
        config.get(settings::VERSION_FILE, DEFAULT_VERSION_FILE),
    ))
}
